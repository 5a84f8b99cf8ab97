// File: src/config.rs
use crate::error::{Result, TranslatorError};
use crate::runtime::{RetryPolicy, DEFAULT_BOOTSTRAP_ATTEMPTS, DEFAULT_RETRY_DELAY};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Front end settings, read from a JSON file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    /// How long the farewell stays on screen before the session resets.
    pub reset_delay_ms: u64,
    pub bootstrap_attempts: u32,
    pub retry_delay_ms: u64,
    /// Enables the access gate when set.
    pub passphrase: Option<String>,
    pub color: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: 2000,
            bootstrap_attempts: DEFAULT_BOOTSTRAP_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            passphrase: None,
            color: true,
        }
    }
}

impl TranslatorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bootstrap_attempts == 0 {
            return Err(TranslatorError::Config(
                "bootstrap_attempts must be at least 1".into(),
            ));
        }
        if matches!(&self.passphrase, Some(p) if p.is_empty()) {
            return Err(TranslatorError::Config("passphrase must not be empty".into()));
        }
        Ok(())
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.bootstrap_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
