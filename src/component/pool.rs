//! Component recycle pool.
//!
//! Unmounted instances are filed here keyed by constructor name. A later
//! mount of the same constructor harvests the stored `next_base` - the
//! detached live subtree - so remounts start from the old markup instead of
//! an empty node. Behavior objects are never resurrected: every mount
//! constructs a fresh one, so no custom fields leak across generations.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{ComponentType, InstanceRef};
use crate::dom::NodeId;

thread_local! {
    static POOL: RefCell<HashMap<String, Vec<InstanceRef>>> = RefCell::new(HashMap::new());
}

/// File an unmounted instance for later base-node reuse.
pub(crate) fn collect(instance: &InstanceRef) {
    let name = instance.borrow().kind.name().to_string();
    POOL.with(|pool| {
        pool.borrow_mut()
            .entry(name)
            .or_default()
            .push(instance.clone());
    });
}

/// Pull the retained base subtree of the most recently pooled instance of
/// exactly this constructor, consuming the pool entry. Same-named but
/// distinct constructors never match.
pub(crate) fn harvest(kind: &ComponentType) -> Option<NodeId> {
    POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        let list = pool.get_mut(kind.name())?;
        let position = list
            .iter()
            .rposition(|entry| entry.borrow().kind.same(kind))?;
        let entry = list.remove(position);
        let next_base = entry.borrow().next_base;
        next_base
    })
}

/// Number of pooled instances for a constructor name (for testing).
pub fn pooled(name: &str) -> usize {
    POOL.with(|pool| pool.borrow().get(name).map_or(0, Vec::len))
}

/// Drop all pooled instances (for testing).
pub fn reset_pool() {
    POOL.with(|pool| pool.borrow_mut().clear());
}
