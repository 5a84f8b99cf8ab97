// File: src/runtime.rs
use crate::core::mappings::Mappings;
use crate::core::translator::TranslationEngine;
use crate::core::types::Direction;
use crate::error::{Result, TranslatorError};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BOOTSTRAP_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Phrase pushed through both directions after every load.
const SANITY_PHRASE: &str = "Derisian check 42, ok?";

/// A loaded translator that can serve requests.
pub trait Runtime {
    fn translate(&self, text: &str, direction: Direction) -> Result<String>;
}

/// Produces a [`Runtime`]. Each call to `load` is one bootstrap attempt.
pub trait RuntimeLoader {
    type Runtime: Runtime;

    fn load(&mut self) -> Result<Self::Runtime>;
}

/// The built-in translator, served directly from the symbol tables.
#[derive(Debug, Clone, Default)]
pub struct NativeRuntime {
    engine: TranslationEngine,
}

impl NativeRuntime {
    pub fn new(mappings: Arc<Mappings>) -> Self {
        Self {
            engine: TranslationEngine::new(mappings),
        }
    }
}

impl Runtime for NativeRuntime {
    fn translate(&self, text: &str, direction: Direction) -> Result<String> {
        Ok(self.engine.translate(text, direction))
    }
}

/// Loads a [`NativeRuntime`] from a set of tables.
#[derive(Debug, Clone)]
pub struct NativeLoader {
    mappings: Arc<Mappings>,
}

impl NativeLoader {
    pub fn new() -> Self {
        Self::with_mappings(Mappings::build())
    }

    pub fn with_mappings(mappings: Mappings) -> Self {
        Self {
            mappings: Arc::new(mappings),
        }
    }
}

impl Default for NativeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeLoader for NativeLoader {
    type Runtime = NativeRuntime;

    fn load(&mut self) -> Result<NativeRuntime> {
        tracing::debug!("loading translator tables");
        self.mappings.validate()?;
        let runtime = NativeRuntime::new(Arc::clone(&self.mappings));
        sanity_check(&runtime)?;
        Ok(runtime)
    }
}

/// Round-trips a fixed check phrase through `runtime`.
pub fn sanity_check<R: Runtime>(runtime: &R) -> Result<()> {
    let there = runtime
        .translate(SANITY_PHRASE, Direction::EnglishToDerisian)
        .map_err(|e| TranslatorError::SanityCheck(e.to_string()))?;
    let back = runtime
        .translate(&there, Direction::DerisianToEnglish)
        .map_err(|e| TranslatorError::SanityCheck(e.to_string()))?;
    if back != SANITY_PHRASE {
        return Err(TranslatorError::SanityCheck(format!(
            "check phrase {SANITY_PHRASE:?} came back as {back:?}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_BOOTSTRAP_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Loads a runtime, retrying failed attempts.
///
/// Script and configuration errors are returned at once; anything else is
/// retried up to `policy.attempts` times with `policy.delay` between
/// attempts.
pub fn bootstrap<L: RuntimeLoader>(loader: &mut L, policy: &RetryPolicy) -> Result<L::Runtime> {
    bootstrap_with(loader, policy, std::thread::sleep)
}

/// [`bootstrap`] with the wait between attempts supplied by the caller.
pub fn bootstrap_with<L, F>(loader: &mut L, policy: &RetryPolicy, mut sleep: F) -> Result<L::Runtime>
where
    L: RuntimeLoader,
    F: FnMut(Duration),
{
    let attempts = policy.attempts.max(1);
    let mut last = String::new();

    for attempt in 1..=attempts {
        match loader.load() {
            Ok(runtime) => {
                tracing::info!(attempt, "translator runtime ready");
                return Ok(runtime);
            }
            Err(err) if !err.is_retryable() => {
                tracing::error!(error = %err, "translator script rejected");
                return Err(err);
            }
            Err(err) => {
                tracing::warn!(attempt, attempts, error = %err, "bootstrap attempt failed");
                last = err.to_string();
                if attempt < attempts {
                    sleep(policy.delay);
                }
            }
        }
    }

    Err(TranslatorError::Bootstrap { attempts, last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SymbolMap;

    struct FlakyLoader {
        failures_left: u32,
        calls: u32,
    }

    impl RuntimeLoader for FlakyLoader {
        type Runtime = NativeRuntime;

        fn load(&mut self) -> Result<NativeRuntime> {
            self.calls += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(TranslatorError::SanityCheck("not yet".into()));
            }
            Ok(NativeRuntime::default())
        }
    }

    fn instant() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn native_loader_passes_sanity_check() {
        let runtime = bootstrap(&mut NativeLoader::new(), &instant()).unwrap();
        assert_eq!(
            runtime.translate("abc", Direction::EnglishToDerisian).unwrap(),
            "zyx"
        );
    }

    #[test]
    fn recovers_on_last_attempt() {
        let mut loader = FlakyLoader {
            failures_left: 2,
            calls: 0,
        };
        assert!(bootstrap(&mut loader, &instant()).is_ok());
        assert_eq!(loader.calls, 3);
    }

    #[test]
    fn gives_up_after_three_attempts() {
        let mut loader = FlakyLoader {
            failures_left: 10,
            calls: 0,
        };
        let err = bootstrap(&mut loader, &instant()).unwrap_err();
        assert_eq!(loader.calls, 3);
        match err {
            TranslatorError::Bootstrap { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(last.contains("not yet"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn waits_between_attempts_but_not_after_the_last() {
        let policy = RetryPolicy {
            attempts: 3,
            delay: Duration::from_millis(250),
        };
        let mut waits = Vec::new();
        let mut loader = FlakyLoader {
            failures_left: 10,
            calls: 0,
        };
        assert!(bootstrap_with(&mut loader, &policy, |d| waits.push(d)).is_err());
        assert_eq!(waits, vec![policy.delay; 2]);

        waits.clear();
        let mut loader = FlakyLoader {
            failures_left: 1,
            calls: 0,
        };
        assert!(bootstrap_with(&mut loader, &policy, |d| waits.push(d)).is_ok());
        assert_eq!(waits, vec![policy.delay]);
    }

    #[test]
    fn default_bootstrap_sleeps_the_policy_delay() {
        let policy = RetryPolicy {
            attempts: 3,
            delay: Duration::from_millis(40),
        };
        let mut loader = FlakyLoader {
            failures_left: 10,
            calls: 0,
        };
        let started = std::time::Instant::now();
        assert!(bootstrap(&mut loader, &policy).is_err());
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn invalid_tables_are_not_retried() {
        let broken = Mappings::from_tables(
            SymbolMap::from_pairs([('a', 'q'), ('b', 'q')]),
            SymbolMap::default(),
            SymbolMap::default(),
        );
        let err = bootstrap(&mut NativeLoader::with_mappings(broken), &instant()).unwrap_err();
        assert!(matches!(err, TranslatorError::ScriptInit(_)));
    }

    #[test]
    fn sanity_check_rejects_lossy_runtime() {
        struct Shouting;
        impl Runtime for Shouting {
            fn translate(&self, text: &str, _: Direction) -> Result<String> {
                Ok(text.to_uppercase())
            }
        }
        assert!(matches!(
            sanity_check(&Shouting),
            Err(TranslatorError::SanityCheck(_))
        ));
    }
}
