//! Helpers for unit tests that touch process environment variables
//!
//! Credential loading reads `TWILIO_*` variables, and tests run in parallel
//! threads of one process. Tests that modify the environment hold `ENV_LOCK`
//! for their whole body and use `ScopedEnv` so values are restored on drop.

use once_cell::sync::Lazy;
use std::env;

/// Serializes tests that read or write environment variables
pub static ENV_LOCK: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Sets or clears environment variables and restores the previous values on drop
#[derive(Default)]
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` for the lifetime of the guard
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.save(key);
        // SAFETY: callers hold ENV_LOCK, so no other test thread touches the environment
        unsafe {
            env::set_var(key, value);
        }
        self
    }

    /// Unset `key` for the lifetime of the guard
    pub fn unset(&mut self, key: &str) -> &mut Self {
        self.save(key);
        // SAFETY: see `set`
        unsafe {
            env::remove_var(key);
        }
        self
    }

    fn save(&mut self, key: &str) {
        self.saved.push((key.to_string(), env::var(key).ok()));
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: see `set`
            unsafe {
                match previous {
                    Some(value) => env::set_var(&key, value),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}
