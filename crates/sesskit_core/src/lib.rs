//! # sesskit Core
//!
//! Namespaced session segments with flash data.
//!
//! This crate provides [`Segment`], a view over a
//! [`SessionStore`](sesskit_store::SessionStore) that:
//! - confines all attribute operations to one named sub-namespace, so
//!   independent consumers can share a store without key collisions;
//! - layers **flash data** on top: values written during one request that
//!   are visible during exactly the next request and then vanish.
//!
//! One `Segment` instance represents one logical request's view. Flash data
//! rotates at construction time: the stored next-request flash becomes the
//! new instance's current flash, and the stored slot resets to empty.
//!
//! ## Example
//!
//! ```rust
//! use sesskit_core::Segment;
//! use sesskit_store::{MemoryStore, SessionStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
//!
//! // Request N: leave a note for the next request.
//! let first = Segment::with_store("checkout", Arc::clone(&store)).unwrap();
//! first.set_in_next_flash("notice", "order placed".into());
//!
//! // Request N + 1: the note arrived, and is already gone from the store.
//! let second = Segment::with_store("checkout", Arc::clone(&store)).unwrap();
//! assert_eq!(second.get_from_current_flash("notice"), Some("order placed".into()));
//! assert!(second.all_from_next_flash().is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod segment;

pub use error::{SegmentError, SegmentResult};
pub use segment::{FlashScope, Segment, FLASH_KEY};

// Store-side types most segment users need.
pub use sesskit_store::{Attributes, MemoryStore, SessionStore, StartOptions, StoreError};
