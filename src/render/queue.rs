//! Render scheduler: coalesces pending component re-renders into one
//! deferred batch.
//!
//! `enqueue` marks an instance dirty and records it; the first enqueue of a
//! batch schedules exactly one flush through the configured deferral
//! strategy. The flush drains in reverse-insertion order and skips anything
//! a prior render in the same flush already cleaned (a parent render that
//! re-rendered a queued descendant un-dirties it).

use std::cell::RefCell;

use super::lifecycle;
use crate::component::{InstanceRef, StatusFlags};
use crate::options;
use crate::types::RenderMode;

thread_local! {
    static ITEMS: RefCell<Vec<InstanceRef>> = RefCell::new(Vec::new());
}

/// Mark dirty and schedule. Idempotent while the instance is already dirty:
/// repeated calls before the flush collapse into one render.
pub fn enqueue(instance: &InstanceRef) {
    let newly_dirty = {
        let mut b = instance.borrow_mut();
        if b.flags.contains(StatusFlags::DIRTY) {
            false
        } else {
            b.flags.insert(StatusFlags::DIRTY);
            true
        }
    };
    if !newly_dirty {
        return;
    }
    let first = ITEMS.with(|items| {
        let mut items = items.borrow_mut();
        items.push(instance.clone());
        items.len() == 1
    });
    if first {
        options::debounce(Box::new(flush));
    }
}

/// Render everything queued. Instances cleaned by an earlier render in this
/// flush are skipped. A panicking render hook unwinds out of here and
/// abandons the rest of the batch.
pub fn flush() {
    let mut list = ITEMS.with(|items| items.take());
    while let Some(instance) = list.pop() {
        if instance.borrow().flags.contains(StatusFlags::DIRTY) {
            lifecycle::render_component(&instance, RenderMode::Async, false, false, None);
        }
    }
}

/// Number of instances waiting for the next flush (for testing).
pub fn pending() -> usize {
    ITEMS.with(|items| items.borrow().len())
}

/// Drop all queued instances without rendering (for testing).
pub fn reset_queue() {
    ITEMS.with(|items| items.borrow_mut().clear());
}
