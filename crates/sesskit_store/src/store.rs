//! Session store trait definition.

use crate::error::StoreResult;
use crate::options::StartOptions;
use serde_json::Value;

/// A string-keyed attribute mapping, as stored in a session.
pub type Attributes = serde_json::Map<String, Value>;

/// A request-scoped key/value session store.
///
/// Stores are **flat mappings**: string keys, arbitrary JSON values. They own
/// a session identity (id, name) and a started/stopped state, nothing more.
/// Namespacing and flash data are layered on top by `sesskit_core` and are
/// invisible at this level.
///
/// # Invariants
///
/// - Reads (`all`, `has`, `get`, `id`, `name`, `is_started`) never fail;
///   on a stopped store they return empty/`false`/`None`.
/// - Mutators (`set`, `replace`, `pull`, `remove`, `clear`, `destroy`,
///   `regenerate_id`) fail with `NotStarted` on a stopped store.
/// - `set_id` / `set_name` fail with `AlreadyStarted` on a running store.
/// - Implementations must be `Send + Sync` so one store can be shared
///   across segments via `Arc<dyn SessionStore>`.
///
/// # Implementors
///
/// - [`super::MemoryStore`] - Process-local store, also used in tests.
pub trait SessionStore: Send + Sync {
    /// Starts or resumes the session.
    ///
    /// Option keys are validated against
    /// [`VALID_START_OPTIONS`](crate::VALID_START_OPTIONS). Returns whether
    /// the store is started after the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is already started or an option key is
    /// not on the allow-list.
    fn start(&self, options: &StartOptions) -> StoreResult<bool>;

    /// Returns whether the session is started.
    fn is_started(&self) -> bool;

    /// Returns a copy of all attributes, empty when stopped.
    fn all(&self) -> Attributes;

    /// Returns whether an attribute exists.
    fn has(&self, name: &str) -> bool;

    /// Returns a copy of an attribute's value, if present.
    fn get(&self, name: &str) -> Option<Value>;

    /// Sets an attribute by name.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` on a stopped store.
    fn set(&self, name: &str, value: Value) -> StoreResult<()>;

    /// Merges several attributes at once, overwriting on collision.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` on a stopped store.
    fn replace(&self, data: Attributes) -> StoreResult<()>;

    /// Removes an attribute and returns its previous value, if any.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` on a stopped store.
    fn pull(&self, name: &str) -> StoreResult<Option<Value>>;

    /// Removes an attribute by name.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` on a stopped store.
    fn remove(&self, name: &str) -> StoreResult<()>;

    /// Removes all attributes, keeping the session running.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` on a stopped store.
    fn clear(&self) -> StoreResult<()>;

    /// Returns the session id, empty when none was generated yet.
    fn id(&self) -> String;

    /// Sets the session id ahead of the next start.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyStarted` on a running store.
    fn set_id(&self, session_id: &str) -> StoreResult<()>;

    /// Replaces the session id with a newly generated one.
    ///
    /// `delete_old` asks the store to drop any copy of the session kept
    /// under the old id.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` on a stopped store.
    fn regenerate_id(&self, delete_old: bool) -> StoreResult<bool>;

    /// Returns the session name.
    fn name(&self) -> String;

    /// Sets the session name ahead of the next start.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyStarted` on a running store.
    fn set_name(&self, name: &str) -> StoreResult<()>;

    /// Destroys the session: drops all attributes and stops the store.
    ///
    /// A later `start` begins a fresh session.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` on a stopped store.
    fn destroy(&self) -> StoreResult<bool>;
}
