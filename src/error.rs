// File: src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranslatorError>;

#[derive(Debug, Error)]
pub enum TranslatorError {
    /// Every bootstrap attempt failed. Fatal for the session; the front end
    /// offers retry and reload.
    #[error("failed to initialize translator runtime after {attempts} attempts: {last}")]
    Bootstrap { attempts: u32, last: String },

    #[error("translator runtime failed its sanity check: {0}")]
    SanityCheck(String),

    #[error("failed to initialize translator script: {0}")]
    ScriptInit(String),

    /// A single translate call failed. Shown inline, the loop continues.
    #[error("{0}")]
    Execution(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranslatorError {
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Whether this error ends the session rather than a single request.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Execution(_))
    }

    /// Whether another bootstrap attempt could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::ScriptInit(_) | Self::Config(_))
    }
}
