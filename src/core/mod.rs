// src/core/mod.rs

pub mod mappings;
pub mod session;
pub mod translator;
pub mod types;
