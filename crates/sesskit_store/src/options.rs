//! Session start options and allow-list validation.

use crate::error::{StoreError, StoreResult};
use std::collections::BTreeMap;

/// Option keys a store accepts at start time.
///
/// Stores forward most of these to whatever transport or persistence layer
/// backs them; [`MemoryStore`](crate::MemoryStore) only interprets `name`.
/// Validation rejects anything not on this list so that a typo fails loudly
/// at start instead of being silently ignored.
pub const VALID_START_OPTIONS: &[&str] = &[
    "cache_expire",
    "cache_limiter",
    "cookie_domain",
    "cookie_httponly",
    "cookie_lifetime",
    "cookie_path",
    "cookie_samesite",
    "cookie_secure",
    "gc_divisor",
    "gc_maxlifetime",
    "gc_probability",
    "lazy_write",
    "name",
    "read_and_close",
    "referer_check",
    "save_handler",
    "save_path",
    "serialize_handler",
    "sid_bits_per_character",
    "sid_length",
    "trans_sid_hosts",
    "trans_sid_tags",
    "use_cookies",
    "use_only_cookies",
    "use_strict_mode",
    "use_trans_sid",
];

/// Configuration passed to [`SessionStore::start`](crate::SessionStore::start).
///
/// A flat string-keyed map. Keys are validated against
/// [`VALID_START_OPTIONS`]; values are opaque to this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
    entries: BTreeMap<String, String>,
}

impl StartOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Sets an option in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true if no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the option entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Checks every key in `options` against [`VALID_START_OPTIONS`].
///
/// # Errors
///
/// Returns [`StoreError::InvalidOption`] naming the first unknown key.
pub fn validate_options(options: &StartOptions) -> StoreResult<()> {
    for (key, _) in options.iter() {
        if !VALID_START_OPTIONS.contains(&key) {
            return Err(StoreError::invalid_option(key));
        }
    }
    Ok(())
}
