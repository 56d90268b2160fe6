//! Session segments: namespaced views over a shared store.

mod flash;

pub use flash::FlashScope;

use crate::error::{SegmentError, SegmentResult};
use serde_json::Value;
use sesskit_store::{Attributes, MemoryStore, SessionStore, StartOptions};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reserved key inside each segment namespace holding next-request flash data.
///
/// The entry is visible through [`Segment::all`] like any other attribute,
/// but the named accessors (`get`, `has`, ...) are meant for application
/// keys; flash data has its own operations.
pub const FLASH_KEY: &str = "__flash";

/// A namespaced view over a [`SessionStore`], plus a flash-data layer.
///
/// All of a segment's attributes live under one top-level store entry keyed
/// by the segment name, so independent consumers can share a store without
/// key collisions. On top of that namespace sits **flash data**: values
/// written during one request that are visible during exactly the next
/// request and then vanish.
///
/// One `Segment` instance represents one logical request's view. Building
/// the instance starts the store if needed, creates the namespace if absent,
/// and rotates flash data exactly once (see [`FLASH_KEY`]).
///
/// # Example
///
/// ```rust
/// use sesskit_core::Segment;
///
/// let segment = Segment::new("my_app").unwrap();
/// segment.set("user", "alice".into());
/// assert_eq!(segment.get("user"), Some("alice".into()));
///
/// segment.set_in_next_flash("notice", "saved".into());
/// assert!(!segment.has_in_current_flash("notice"));
/// ```
pub struct Segment {
    /// Underlying store; shared when injected, exclusive when defaulted.
    store: Arc<dyn SessionStore>,
    /// Top-level store key under which all of this segment's data lives.
    segment_name: String,
    /// Flash data for the current request. Instance-local, never persisted.
    current_flash: Attributes,
}

impl std::fmt::Debug for Segment {
    // The store field is a trait object; report the segment's own state.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segment")
            .field("segment_name", &self.segment_name)
            .field("current_flash", &self.current_flash)
            .finish_non_exhaustive()
    }
}

impl Segment {
    /// Builds a segment over a fresh, exclusively-owned [`MemoryStore`].
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::EmptySegmentName`] if `segment_name` is empty.
    pub fn new(segment_name: impl Into<String>) -> SegmentResult<Self> {
        Self::with_options(segment_name, Arc::new(MemoryStore::new()), &StartOptions::new())
    }

    /// Builds a segment over an injected store, starting it with default
    /// options if it is not already running.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Segment::with_options`].
    pub fn with_store(
        segment_name: impl Into<String>,
        store: Arc<dyn SessionStore>,
    ) -> SegmentResult<Self> {
        Self::with_options(segment_name, store, &StartOptions::new())
    }

    /// Builds a segment over an injected store, starting it with `options`
    /// if it is not already running.
    ///
    /// Construction order: name check, store start, namespace guard, flash
    /// rotation. A failed construction never leaves a partially-initialized
    /// segment behind; the namespace guard and rotation only run once the
    /// store is confirmed started.
    ///
    /// # Errors
    ///
    /// - [`SegmentError::EmptySegmentName`] if `segment_name` is empty.
    ///   Checked before any store interaction.
    /// - [`SegmentError::Store`] if the store rejects the start attempt,
    ///   e.g. an option key off the allow-list.
    /// - [`SegmentError::NotStarted`] if the start attempt was accepted but
    ///   the store still reports itself stopped.
    pub fn with_options(
        segment_name: impl Into<String>,
        store: Arc<dyn SessionStore>,
        options: &StartOptions,
    ) -> SegmentResult<Self> {
        let segment_name = segment_name.into();
        if segment_name.is_empty() {
            return Err(SegmentError::EmptySegmentName);
        }

        if !store.is_started() {
            store.start(options)?;
        }
        if !store.is_started() {
            return Err(SegmentError::not_started(segment_name));
        }

        let mut segment = Self {
            store,
            segment_name,
            current_flash: Attributes::new(),
        };
        segment.ensure_namespace();
        segment.rotate_flash();

        debug!(segment = %segment.segment_name, "segment ready");
        Ok(segment)
    }

    /// Returns a copy of this segment's namespace entry, when the store is
    /// started and the entry holds a mapping.
    pub(crate) fn namespace(&self) -> Option<Attributes> {
        match self.store.get(&self.segment_name) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Writes the namespace entry back as a whole.
    ///
    /// Callers guard on `is_started`, so a rejected write means the store
    /// stopped underneath us; it is logged and dropped rather than surfaced.
    pub(crate) fn write_namespace(&self, namespace: Attributes) {
        if let Err(err) = self.store.set(&self.segment_name, Value::Object(namespace)) {
            warn!(segment = %self.segment_name, error = %err, "store rejected namespace write");
        }
    }

    /// Initializes the namespace entry to `{ "__flash": {} }` when it is
    /// absent or unusable. Idempotent.
    fn ensure_namespace(&self) {
        if self.store.is_started() && self.namespace().is_none() {
            let mut namespace = Attributes::new();
            namespace.insert(FLASH_KEY.to_owned(), Value::Object(Attributes::new()));
            self.write_namespace(namespace);
        }
    }

    /// Returns a copy of every attribute in the namespace.
    ///
    /// This includes the reserved [`FLASH_KEY`] entry. That is intentional
    /// transparency: `all` answers "everything stored under this segment",
    /// reserved bookkeeping included.
    #[must_use]
    pub fn all(&self) -> Attributes {
        self.namespace().unwrap_or_default()
    }

    /// Returns whether an attribute exists in the namespace.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.namespace().is_some_and(|ns| ns.contains_key(name))
    }

    /// Returns a copy of an attribute's value, or `None` when it is absent
    /// or the store is stopped.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.namespace().and_then(|mut ns| ns.remove(name))
    }

    /// Sets an attribute in the namespace. No-op when the store is stopped.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        let Some(mut namespace) = self.namespace() else {
            return;
        };
        namespace.insert(name.into(), value);
        self.write_namespace(namespace);
    }

    /// Merges `data` into the namespace, overwriting on key collision and
    /// leaving untouched keys (including [`FLASH_KEY`]) alone.
    pub fn replace(&self, data: Attributes) {
        let Some(mut namespace) = self.namespace() else {
            return;
        };
        for (key, value) in data {
            namespace.insert(key, value);
        }
        self.write_namespace(namespace);
    }

    /// Removes an attribute and returns its previous value, if any.
    pub fn pull(&self, name: &str) -> Option<Value> {
        let mut namespace = self.namespace()?;
        let value = namespace.remove(name);
        if value.is_some() {
            self.write_namespace(namespace);
        }
        value
    }

    /// Removes an attribute from the namespace. No-op when absent.
    pub fn remove(&self, name: &str) {
        let Some(mut namespace) = self.namespace() else {
            return;
        };
        if namespace.remove(name).is_some() {
            self.write_namespace(namespace);
        }
    }

    /// Resets the namespace to `{ "__flash": {} }` and empties the current
    /// flash.
    ///
    /// Top-level store entries outside this namespace are untouched; other
    /// segments and direct store users keep their data.
    pub fn clear(&mut self) {
        if !self.store.is_started() {
            return;
        }
        let mut namespace = Attributes::new();
        namespace.insert(FLASH_KEY.to_owned(), Value::Object(Attributes::new()));
        self.write_namespace(namespace);
        self.current_flash = Attributes::new();
    }

    /// Clears the segment (see [`Segment::clear`]). The store itself stays
    /// up; destroying a segment never tears down the session.
    pub fn destroy(&mut self) -> bool {
        self.clear();
        true
    }

    /// Starts the store if it is stopped, re-creating the namespace on
    /// success. Returns whether the store is started after the call.
    ///
    /// Useful after the store was destroyed externally. Flash data is only
    /// rotated at construction, never here.
    ///
    /// # Errors
    ///
    /// Propagates the store's start failure unchanged.
    pub fn start(&self, options: &StartOptions) -> SegmentResult<bool> {
        if self.store.is_started() {
            return Ok(true);
        }
        let started = self.store.start(options)?;
        if started {
            self.ensure_namespace();
        }
        Ok(started)
    }

    /// Returns whether the underlying store is started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.store.is_started()
    }

    /// Returns the session id of the underlying store.
    #[must_use]
    pub fn id(&self) -> String {
        self.store.id()
    }

    /// Forwards a session id to the store if it has not started yet.
    ///
    /// Construction already starts the store, so this is only effective on
    /// a segment whose store was destroyed afterwards; otherwise it is a
    /// no-op.
    pub fn set_id(&self, session_id: &str) {
        if !self.store.is_started() {
            if let Err(err) = self.store.set_id(session_id) {
                warn!(segment = %self.segment_name, error = %err, "store rejected set_id");
            }
        }
    }

    /// Replaces the session id with a newly generated one. Returns `false`
    /// when the store is stopped.
    pub fn regenerate_id(&self, delete_old: bool) -> bool {
        self.store.is_started() && self.store.regenerate_id(delete_old).unwrap_or(false)
    }

    /// Returns the session name of the underlying store.
    #[must_use]
    pub fn name(&self) -> String {
        self.store.name()
    }

    /// Forwards a session name to the store if it has not started yet.
    ///
    /// Same effectiveness caveat as [`Segment::set_id`].
    pub fn set_name(&self, name: &str) {
        if !self.store.is_started() {
            if let Err(err) = self.store.set_name(name) {
                warn!(segment = %self.segment_name, error = %err, "store rejected set_name");
            }
        }
    }

    /// Returns this segment's name.
    #[must_use]
    pub fn segment_name(&self) -> &str {
        &self.segment_name
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}
