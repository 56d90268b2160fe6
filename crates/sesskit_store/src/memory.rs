//! In-memory session store.

use crate::error::{StoreError, StoreResult};
use crate::options::{validate_options, StartOptions};
use crate::store::{Attributes, SessionStore};
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

/// Session name used when no `name` option or `set_name` call provided one.
pub const DEFAULT_SESSION_NAME: &str = "SESSKITID";

/// A process-local, in-memory session store.
///
/// This store keeps all attributes in memory and is suitable for:
/// - Unit and integration tests
/// - Single-process applications that don't need persistence
/// - Serving as the default store a `Segment` creates when none is injected
///
/// # Thread Safety
///
/// Interior state sits behind a [`parking_lot::RwLock`], so a `MemoryStore`
/// can be shared across threads via `Arc`.
///
/// # Example
///
/// ```rust
/// use sesskit_store::{MemoryStore, SessionStore, StartOptions};
///
/// let store = MemoryStore::new();
/// store.start(&StartOptions::new()).unwrap();
/// store.set("user", "alice".into()).unwrap();
/// assert_eq!(store.get("user"), Some("alice".into()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    started: bool,
    id: String,
    name: String,
    attributes: Attributes,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            started: false,
            id: String::new(),
            name: DEFAULT_SESSION_NAME.to_owned(),
            attributes: Attributes::new(),
        }
    }
}

impl MemoryStore {
    /// Creates a new stopped store with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn start(&self, options: &StartOptions) -> StoreResult<bool> {
        let mut inner = self.inner.write();

        if inner.started {
            return Err(StoreError::already_started("start"));
        }
        validate_options(options)?;

        if let Some(name) = options.get("name") {
            inner.name = name.to_owned();
        }
        if inner.id.is_empty() {
            inner.id = Uuid::new_v4().simple().to_string();
        }
        inner.started = true;

        Ok(true)
    }

    fn is_started(&self) -> bool {
        self.inner.read().started
    }

    fn all(&self) -> Attributes {
        let inner = self.inner.read();
        if inner.started {
            inner.attributes.clone()
        } else {
            Attributes::new()
        }
    }

    fn has(&self, name: &str) -> bool {
        let inner = self.inner.read();
        inner.started && inner.attributes.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<Value> {
        let inner = self.inner.read();
        if inner.started {
            inner.attributes.get(name).cloned()
        } else {
            None
        }
    }

    fn set(&self, name: &str, value: Value) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.started {
            return Err(StoreError::not_started("set"));
        }
        inner.attributes.insert(name.to_owned(), value);
        Ok(())
    }

    fn replace(&self, data: Attributes) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.started {
            return Err(StoreError::not_started("replace"));
        }
        for (key, value) in data {
            inner.attributes.insert(key, value);
        }
        Ok(())
    }

    fn pull(&self, name: &str) -> StoreResult<Option<Value>> {
        let mut inner = self.inner.write();
        if !inner.started {
            return Err(StoreError::not_started("pull"));
        }
        Ok(inner.attributes.remove(name))
    }

    fn remove(&self, name: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.started {
            return Err(StoreError::not_started("remove"));
        }
        inner.attributes.remove(name);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.started {
            return Err(StoreError::not_started("clear"));
        }
        inner.attributes.clear();
        Ok(())
    }

    fn id(&self) -> String {
        self.inner.read().id.clone()
    }

    fn set_id(&self, session_id: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.started {
            return Err(StoreError::already_started("set_id"));
        }
        inner.id = session_id.to_owned();
        Ok(())
    }

    fn regenerate_id(&self, _delete_old: bool) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        if !inner.started {
            return Err(StoreError::not_started("regenerate_id"));
        }
        // Nothing is kept under the old id, so delete_old has no extra work.
        inner.id = Uuid::new_v4().simple().to_string();
        Ok(true)
    }

    fn name(&self) -> String {
        self.inner.read().name.clone()
    }

    fn set_name(&self, name: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.started {
            return Err(StoreError::already_started("set_name"));
        }
        inner.name = name.to_owned();
        Ok(())
    }

    fn destroy(&self) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        if !inner.started {
            return Err(StoreError::not_started("destroy"));
        }
        inner.attributes.clear();
        inner.started = false;
        inner.id = String::new();
        Ok(true)
    }
}
