//! # Runtime Configuration
//!
//! Coroutine runtime settings read from the environment.
//!
//! ## `GLOBR_STACK_SIZE`
//!
//! Stack size of each request coroutine, in decimal (`32768`) or hex
//! (`0x8000`). Default: `0x8000` (32 KB). Unparseable values fall back to
//! the default.
//!
//! ```rust
//! use globrouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.stack_size > 0);
//! ```

use std::env;

/// Environment variable holding the coroutine stack size.
pub const STACK_SIZE_ENV: &str = "GLOBR_STACK_SIZE";

pub const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Coroutine stack size in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = env::var(STACK_SIZE_ENV)
            .ok()
            .and_then(|val| parse_stack_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        Self { stack_size }
    }

    /// Configure the `may` scheduler. Call before starting the server.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
        tracing::debug!(stack_size = self.stack_size, "Coroutine runtime configured");
    }
}

fn parse_stack_size(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
    .filter(|&size| size > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stack_size() {
        assert_eq!(parse_stack_size("0x4000"), Some(0x4000));
        assert_eq!(parse_stack_size("32768"), Some(32768));
        assert_eq!(parse_stack_size(" 0X10 "), Some(16));
        assert_eq!(parse_stack_size("lots"), None);
        assert_eq!(parse_stack_size("0"), None);
    }
}
