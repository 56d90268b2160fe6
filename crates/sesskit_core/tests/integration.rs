//! Integration tests: segments sharing one store, namespace isolation,
//! flash handoff across logical requests.

use proptest::prelude::*;
use serde_json::{json, Value};
use sesskit_core::{Segment, SegmentError, FLASH_KEY};
use sesskit_store::{
    Attributes, MemoryStore, SessionStore, StartOptions, StoreError, StoreResult,
};
use std::sync::Arc;

/// A store that accepts a start attempt but never comes up.
///
/// Models stores whose own restrictions (transport refusals, double-start
/// rules) keep them stopped even though `start` did not error.
struct RefusingStore;

impl SessionStore for RefusingStore {
    fn start(&self, _options: &StartOptions) -> StoreResult<bool> {
        Ok(false)
    }

    fn is_started(&self) -> bool {
        false
    }

    fn all(&self) -> Attributes {
        Attributes::new()
    }

    fn has(&self, _name: &str) -> bool {
        false
    }

    fn get(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set(&self, _name: &str, _value: Value) -> StoreResult<()> {
        Err(StoreError::not_started("set"))
    }

    fn replace(&self, _data: Attributes) -> StoreResult<()> {
        Err(StoreError::not_started("replace"))
    }

    fn pull(&self, _name: &str) -> StoreResult<Option<Value>> {
        Err(StoreError::not_started("pull"))
    }

    fn remove(&self, _name: &str) -> StoreResult<()> {
        Err(StoreError::not_started("remove"))
    }

    fn clear(&self) -> StoreResult<()> {
        Err(StoreError::not_started("clear"))
    }

    fn id(&self) -> String {
        String::new()
    }

    fn set_id(&self, _session_id: &str) -> StoreResult<()> {
        Ok(())
    }

    fn regenerate_id(&self, _delete_old: bool) -> StoreResult<bool> {
        Err(StoreError::not_started("regenerate_id"))
    }

    fn name(&self) -> String {
        String::new()
    }

    fn set_name(&self, _name: &str) -> StoreResult<()> {
        Ok(())
    }

    fn destroy(&self) -> StoreResult<bool> {
        Err(StoreError::not_started("destroy"))
    }
}

fn shared_store() -> Arc<dyn SessionStore> {
    Arc::new(MemoryStore::new())
}

#[test]
fn store_that_refuses_to_start_fails_construction() {
    let err = Segment::with_store("app", Arc::new(RefusingStore)).unwrap_err();
    assert!(matches!(err, SegmentError::NotStarted { segment_name } if segment_name == "app"));
}

#[test]
fn segment_attributes_never_leak_into_store_top_level() {
    let store = shared_store();
    let segment = Segment::with_store("app", Arc::clone(&store)).unwrap();

    segment.set("foo", json!("bar"));

    assert!(!store.has("foo"));
    assert!(store.has("app"));
    let namespace = store.get("app").unwrap();
    assert_eq!(namespace.get("foo"), Some(&json!("bar")));
}

#[test]
fn store_top_level_attributes_never_show_through_a_segment() {
    let store = shared_store();
    store.start(&StartOptions::new()).unwrap();
    store.set("outside", json!("value")).unwrap();

    let segment = Segment::with_store("app", Arc::clone(&store)).unwrap();
    assert!(!segment.has("outside"));
    assert_eq!(segment.get("outside"), None);
    assert!(!segment.all().contains_key("outside"));
}

#[test]
fn segments_with_different_names_are_isolated() {
    let store = shared_store();
    let orders = Segment::with_store("orders", Arc::clone(&store)).unwrap();
    let auth = Segment::with_store("auth", Arc::clone(&store)).unwrap();

    orders.set("user", json!("alice"));
    auth.set("user", json!("bob"));

    assert_eq!(orders.get("user"), Some(json!("alice")));
    assert_eq!(auth.get("user"), Some(json!("bob")));

    orders.set_in_next_flash("note", json!(1));
    assert!(!auth.has_in_next_flash("note"));
}

#[test]
fn clear_preserves_data_outside_the_segment() {
    let store = shared_store();
    store.start(&StartOptions::new()).unwrap();
    store.set("outside", json!("kept")).unwrap();

    let mut segment = Segment::with_store("app", Arc::clone(&store)).unwrap();
    segment.set("inside", json!("gone"));
    segment.clear();

    assert_eq!(store.get("outside"), Some(json!("kept")));
    assert!(!segment.has("inside"));
    assert_eq!(segment.all().get(FLASH_KEY), Some(&json!({})));
}

#[test]
fn clear_preserves_other_segments() {
    let store = shared_store();
    let mut orders = Segment::with_store("orders", Arc::clone(&store)).unwrap();
    let auth = Segment::with_store("auth", Arc::clone(&store)).unwrap();

    orders.set("k", json!(1));
    auth.set("k", json!(2));
    orders.clear();

    assert!(!orders.has("k"));
    assert_eq!(auth.get("k"), Some(json!(2)));
}

#[test]
fn flash_handoff_scenario() {
    let store = shared_store();

    let s1 = Segment::with_store("s1", Arc::clone(&store)).unwrap();
    s1.set_in_next_flash("x", json!("y"));

    let s2 = Segment::with_store("s1", Arc::clone(&store)).unwrap();
    assert_eq!(s2.get_from_current_flash("x"), Some(json!("y")));
    assert!(s2.all_from_next_flash().is_empty());
}

#[test]
fn same_name_instances_share_namespace_but_not_current_flash() {
    let store = shared_store();

    let first = Segment::with_store("app", Arc::clone(&store)).unwrap();
    let mut second = Segment::with_store("app", Arc::clone(&store)).unwrap();

    // Shared namespace data.
    first.set("k", json!("v"));
    assert_eq!(second.get("k"), Some(json!("v")));

    // Independent current-flash snapshots.
    second.set_in_current_flash("private", json!(1));
    assert!(!first.has_in_current_flash("private"));
    assert_eq!(first.get_from_next_flash("private"), None);
}

#[test]
fn construction_never_leaves_namespace_without_flash_entry() {
    let store = shared_store();
    for name in ["a", "b", "long.segment.name", "with spaces", "日本語"] {
        Segment::with_store(name, Arc::clone(&store)).unwrap();
        let namespace = store.get(name).unwrap();
        assert_eq!(namespace.get(FLASH_KEY), Some(&json!({})), "segment {name}");
    }
}

#[test]
fn shared_store_started_once_serves_later_segments_without_restart() {
    let store = shared_store();
    let first = Segment::with_store("a", Arc::clone(&store)).unwrap();
    let id = first.id();

    // Store is already started; the second construction must not restart it
    // (a restart attempt would fail with AlreadyStarted).
    let second = Segment::with_store("b", Arc::clone(&store)).unwrap();
    assert_eq!(second.id(), id);
}

#[test]
fn start_options_reach_the_store() {
    let store = shared_store();
    let options = StartOptions::new().with("name", "CARTSESSID");
    let segment = Segment::with_options("cart", Arc::clone(&store), &options).unwrap();
    assert_eq!(segment.name(), "CARTSESSID");
    assert_eq!(store.name(), "CARTSESSID");
}

proptest! {
    /// Rotation law: whatever one instance writes to the next flash is
    /// exactly what the following instance finds in its current flash, and
    /// the instance after that finds nothing.
    #[test]
    fn rotation_hands_off_exactly_the_written_set(
        entries in proptest::collection::btree_map("[a-z]{1,8}", 0i64..1000, 0..8)
    ) {
        let store = shared_store();

        let writer = Segment::with_store("app", Arc::clone(&store)).unwrap();
        for (key, value) in &entries {
            writer.set_in_next_flash(key.clone(), json!(value));
        }

        let reader = Segment::with_store("app", Arc::clone(&store)).unwrap();
        let current = reader.all_from_current_flash();
        prop_assert_eq!(current.len(), entries.len());
        for (key, value) in &entries {
            prop_assert_eq!(reader.get_from_current_flash(key), Some(json!(value)));
        }
        prop_assert!(reader.all_from_next_flash().is_empty());

        let latecomer = Segment::with_store("app", Arc::clone(&store)).unwrap();
        prop_assert!(latecomer.all_from_current_flash().is_empty());
    }

    /// Isolation law: current-flash writes on one instance are invisible to
    /// every other instance, through either flash accessor.
    #[test]
    fn current_flash_never_crosses_instances(
        key in "[a-z]{1,8}",
        value in 0i64..1000,
    ) {
        let store = shared_store();

        let mut writer = Segment::with_store("app", Arc::clone(&store)).unwrap();
        writer.set_in_current_flash(key.clone(), json!(value));

        let sibling = Segment::with_store("app", Arc::clone(&store)).unwrap();
        prop_assert_eq!(sibling.get_from_current_flash(&key), None);
        prop_assert_eq!(sibling.get_from_next_flash(&key), None);
        prop_assert_eq!(writer.get_from_next_flash(&key), None);
    }
}
