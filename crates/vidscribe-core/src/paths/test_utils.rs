//! Environment isolation for path tests.

use std::env;
use std::sync::Mutex;

/// Serializes tests that touch `VIDSCRIBE_*` variables.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Restores one variable to its prior state when dropped.
pub struct EnvVarGuard {
    key: String,
    previous: Option<String>,
}

impl EnvVarGuard {
    pub fn set(key: &str, value: &str) -> Self {
        Self::replace(key, Some(value))
    }

    pub fn unset(key: &str) -> Self {
        Self::replace(key, None)
    }

    #[allow(unsafe_code)]
    fn replace(key: &str, value: Option<&str>) -> Self {
        let previous = env::var(key).ok();
        // SAFETY: callers hold ENV_LOCK, so no other test reads the environment concurrently.
        unsafe {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvVarGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        // SAFETY: see `replace`.
        unsafe {
            match self.previous.take() {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }
}
