// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod gate;
pub mod runtime;
pub mod terminal;

pub use crate::core::mappings::Mappings;
pub use crate::core::session::Session;
pub use crate::core::translator::TranslationEngine;
pub use crate::core::types::{Direction, SymbolMap};
pub use crate::error::{Result, TranslatorError};
