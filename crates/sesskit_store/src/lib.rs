//! # sesskit Store
//!
//! Session store trait and in-memory implementation for sesskit.
//!
//! This crate provides the lowest-level session abstraction: a flat
//! string-keyed mapping with a start/stop lifecycle and a session identity
//! (id, name). Stores know nothing about segments or flash data - that
//! layering lives in `sesskit_core`.
//!
//! ## Design Principles
//!
//! - Stores are explicitly constructed objects, never hidden globals
//! - Reads never fail; mutators fail on a stopped store
//! - Start options are validated against a fixed allow-list
//! - Must be `Send + Sync` so one store can back several segments
//!
//! ## Example
//!
//! ```rust
//! use sesskit_store::{MemoryStore, SessionStore, StartOptions};
//!
//! let store = MemoryStore::new();
//! store.start(&StartOptions::new().with("name", "APPSESSID")).unwrap();
//! store.set("visits", 1.into()).unwrap();
//! assert_eq!(store.get("visits"), Some(1.into()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod options;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, DEFAULT_SESSION_NAME};
pub use options::{validate_options, StartOptions, VALID_START_OPTIONS};
pub use store::{Attributes, SessionStore};
