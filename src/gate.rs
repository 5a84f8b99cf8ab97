// File: src/gate.rs

/// An optional passphrase prompt in front of the translator.
///
/// This is a plain equality check with no hashing, lockout or rate limit.
/// It keeps casual visitors out of a demo and nothing more; do not use it
/// for access control.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    passphrase: Option<String>,
    unlocked: bool,
}

impl AccessGate {
    pub fn new(passphrase: Option<String>) -> Self {
        let unlocked = passphrase.is_none();
        Self { passphrase, unlocked }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Once unlocked the gate stays unlocked.
    pub fn try_unlock(&mut self, attempt: &str) -> bool {
        if self.unlocked {
            return true;
        }
        match &self.passphrase {
            Some(expected) if expected == attempt => {
                tracing::info!("access gate unlocked");
                self.unlocked = true;
            }
            _ => tracing::debug!("access gate rejected a passphrase"),
        }
        self.unlocked
    }
}
