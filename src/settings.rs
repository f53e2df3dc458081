//! Environment-driven settings.
//!
//! Values come from the process environment, after a `.env` file has been
//! merged in (once per process):
//!
//! | Variable                  | Meaning                                        |
//! |---------------------------|------------------------------------------------|
//! | `COOLPROP_PATH`           | directory with the CoolProp library, or the file |
//! | `REFCALC_INIT_TIMEOUT_MS` | bound on the solver readiness wait (ms)        |

use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

pub const COOLPROP_PATH_VAR: &str = "COOLPROP_PATH";
pub const INIT_TIMEOUT_VAR: &str = "REFCALC_INIT_TIMEOUT_MS";

/// Default bound on the solver readiness wait.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub coolprop_path: Option<PathBuf>,
    pub init_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self { coolprop_path: None, init_timeout: DEFAULT_INIT_TIMEOUT }
    }
}

impl Settings {
    /// Read settings from the environment, loading `.env` first.
    pub fn from_env() -> Self {
        Self::load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let coolprop_path = lookup(COOLPROP_PATH_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let init_timeout = match lookup(INIT_TIMEOUT_VAR) {
            None => DEFAULT_INIT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "invalid {INIT_TIMEOUT_VAR}, using {} ms",
                        DEFAULT_INIT_TIMEOUT.as_millis()
                    );
                    DEFAULT_INIT_TIMEOUT
                }
            },
        };

        Self { coolprop_path, init_timeout }
    }

    pub fn with_coolprop_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.coolprop_path = Some(path.into());
        self
    }

    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    // ── .env loading (once) ──────────────────────────────────────────

    fn load_dotenv() {
        static DOTENV_INIT: Once = Once::new();
        DOTENV_INIT.call_once(|| {
            if dotenvy::dotenv().is_ok() { return; }
            if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
                let p = PathBuf::from(dir).join(".env");
                if p.exists() { let _ = dotenvy::from_path(&p); return; }
            }
            if let Ok(exe) = std::env::current_exe() {
                if let Some(dir) = exe.parent() {
                    let p = dir.join(".env");
                    if p.exists() { let _ = dotenvy::from_path(&p); }
                }
            }
        });
    }
}
