//! Environment configuration loading from .env files
//!
//! Loads configuration values from .env or environment variables.
//! Drivers build their typed configs on top of [`env_or`] / [`lookup_or`].

use std::env;
use std::str::FromStr;
use once_cell::sync::Lazy;

// Automatically load .env when config module is accessed
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

/// Ensure environment is loaded
#[inline]
pub fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// Reads `key` from the process environment, falling back to `default`
/// when the variable is missing or does not parse.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    ensure_loaded();
    lookup_or(|k| env::var(k).ok(), key, default)
}

/// Same as [`env_or`] but over an arbitrary key lookup.
pub fn lookup_or<T, F>(lookup: F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
