//! Flash-data rotation and the current/next flash operations.
//!
//! Flash data models "write now, read exactly once, on the next logical
//! request". Each [`Segment`] instance is one request's view:
//!
//! - the **next** flash lives in the store, under the namespace's
//!   [`FLASH_KEY`] entry, and is what future instances will see;
//! - the **current** flash is an instance-local snapshot taken at
//!   construction, when rotation moves the stored next flash into the new
//!   instance and resets the stored slot to empty.

use super::{Segment, FLASH_KEY};
use serde_json::Value;
use sesskit_store::Attributes;
use tracing::debug;

/// Which flash bucket(s) [`Segment::remove_from_flash`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashScope {
    /// Only the instance-local current flash.
    Current,
    /// Only the stored next-request flash.
    Next,
    /// Both buckets.
    Both,
}

impl FlashScope {
    fn includes_current(self) -> bool {
        matches!(self, Self::Current | Self::Both)
    }

    fn includes_next(self) -> bool {
        matches!(self, Self::Next | Self::Both)
    }
}

impl Segment {
    /// Moves the stored next-request flash into this instance's current
    /// flash and resets the stored slot to an empty mapping.
    ///
    /// Runs exactly once, from the constructor, after the namespace guard.
    /// A missing or non-mapping [`FLASH_KEY`] entry (external tampering)
    /// counts as empty; the reset-to-empty write still happens so the
    /// namespace invariant holds afterwards.
    pub(crate) fn rotate_flash(&mut self) {
        let Some(mut namespace) = self.namespace() else {
            return;
        };

        self.current_flash = match namespace.remove(FLASH_KEY) {
            Some(Value::Object(map)) => map,
            _ => Attributes::new(),
        };
        namespace.insert(FLASH_KEY.to_owned(), Value::Object(Attributes::new()));
        self.write_namespace(namespace);

        debug!(
            segment = %self.segment_name,
            carried = self.current_flash.len(),
            "rotated flash data"
        );
    }

    /// Returns a copy of the stored next-request flash, when the store is
    /// started and the namespace holds a mapping under [`FLASH_KEY`].
    fn next_flash(&self) -> Option<Attributes> {
        match self.namespace()?.remove(FLASH_KEY) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Sets a value in this instance's current flash.
    ///
    /// Never touches the store: the value is visible to this instance only,
    /// for its whole lifetime, and is gone when the instance is dropped.
    pub fn set_in_current_flash(&mut self, key: impl Into<String>, value: Value) {
        self.current_flash.insert(key.into(), value);
    }

    /// Returns whether `key` exists in the current flash.
    #[must_use]
    pub fn has_in_current_flash(&self, key: &str) -> bool {
        self.current_flash.contains_key(key)
    }

    /// Returns a copy of a current-flash value, if present.
    #[must_use]
    pub fn get_from_current_flash(&self, key: &str) -> Option<Value> {
        self.current_flash.get(key).cloned()
    }

    /// Returns a copy of the whole current flash.
    #[must_use]
    pub fn all_from_current_flash(&self) -> Attributes {
        self.current_flash.clone()
    }

    /// Sets a value in the stored next-request flash.
    ///
    /// The value becomes the current flash of the next segment instance
    /// constructed with the same name and store. No-op when the store is
    /// stopped or the flash slot is missing.
    pub fn set_in_next_flash(&self, key: impl Into<String>, value: Value) {
        let Some(mut namespace) = self.namespace() else {
            return;
        };
        let Some(Value::Object(mut flash)) = namespace.remove(FLASH_KEY) else {
            return;
        };
        flash.insert(key.into(), value);
        namespace.insert(FLASH_KEY.to_owned(), Value::Object(flash));
        self.write_namespace(namespace);
    }

    /// Returns whether `key` exists in the stored next-request flash.
    /// `false` when the store is stopped or the flash slot is missing.
    #[must_use]
    pub fn has_in_next_flash(&self, key: &str) -> bool {
        self.next_flash().is_some_and(|flash| flash.contains_key(key))
    }

    /// Returns a copy of a next-flash value, if present.
    #[must_use]
    pub fn get_from_next_flash(&self, key: &str) -> Option<Value> {
        self.next_flash().and_then(|mut flash| flash.remove(key))
    }

    /// Returns a copy of the whole stored next-request flash, empty when
    /// the store is stopped or the flash slot is missing.
    #[must_use]
    pub fn all_from_next_flash(&self) -> Attributes {
        self.next_flash().unwrap_or_default()
    }

    /// Removes `key` from the selected flash bucket(s).
    pub fn remove_from_flash(&mut self, key: &str, scope: FlashScope) {
        if scope.includes_current() {
            self.current_flash.remove(key);
        }

        if scope.includes_next() {
            let Some(mut namespace) = self.namespace() else {
                return;
            };
            let Some(Value::Object(mut flash)) = namespace.remove(FLASH_KEY) else {
                return;
            };
            if flash.remove(key).is_some() {
                namespace.insert(FLASH_KEY.to_owned(), Value::Object(flash));
                self.write_namespace(namespace);
            }
        }
    }
}
