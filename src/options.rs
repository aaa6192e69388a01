//! Global engine configuration and the deferral substrate.
//!
//! Options are engine-wide knobs plus observer hooks fired at named points
//! of the component lifecycle. They live in thread-local state: the engine
//! is single-threaded and every root on the same thread shares one
//! configuration.
//!
//! Rust has no ambient microtask queue, so batching needs an explicit
//! deferral substrate: scheduled flushes land in a thread-local queue that
//! the host drains via [`run_deferred`] (its "microtask checkpoint"). The
//! `debounce_rendering` override replaces that strategy wholesale.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::component::InstanceRef;
use crate::types::Event;
use crate::vnode::VNode;

/// Deferred unit of work.
pub type Deferred = Box<dyn FnOnce()>;

/// Replacement deferral strategy for batched renders.
pub type DebounceFn = Rc<dyn Fn(Deferred)>;

/// Transforms every event before it reaches a component handler.
pub type EventInterceptor = Rc<dyn Fn(Event) -> Event>;

/// Observer invoked with each freshly constructed descriptor.
pub type ElementObserver = Rc<dyn Fn(&VNode)>;

/// Observer invoked with a component instance at a lifecycle point.
pub type ComponentObserver = Rc<dyn Fn(&InstanceRef)>;

#[derive(Default)]
struct Options {
    /// When true (the default), prop-driven updates render synchronously
    /// instead of going through the batch queue.
    sync_component_updates: bool,
    debounce_rendering: Option<DebounceFn>,
    event: Option<EventInterceptor>,
    on_element_created: Option<ElementObserver>,
    after_mount: Option<ComponentObserver>,
    after_update: Option<ComponentObserver>,
    before_unmount: Option<ComponentObserver>,
}

thread_local! {
    static OPTIONS: RefCell<Options> = RefCell::new(Options {
        sync_component_updates: true,
        ..Options::default()
    });

    static DEFERRED: RefCell<VecDeque<Deferred>> = RefCell::new(VecDeque::new());
}

// =============================================================================
// Setters
// =============================================================================

pub fn set_sync_component_updates(enabled: bool) {
    OPTIONS.with(|o| o.borrow_mut().sync_component_updates = enabled);
}

pub fn sync_component_updates() -> bool {
    OPTIONS.with(|o| o.borrow().sync_component_updates)
}

pub fn set_debounce_rendering(strategy: Option<DebounceFn>) {
    OPTIONS.with(|o| o.borrow_mut().debounce_rendering = strategy);
}

pub fn set_event_interceptor(interceptor: Option<EventInterceptor>) {
    OPTIONS.with(|o| o.borrow_mut().event = interceptor);
}

pub fn set_on_element_created(observer: Option<ElementObserver>) {
    OPTIONS.with(|o| o.borrow_mut().on_element_created = observer);
}

pub fn set_after_mount(observer: Option<ComponentObserver>) {
    OPTIONS.with(|o| o.borrow_mut().after_mount = observer);
}

pub fn set_after_update(observer: Option<ComponentObserver>) {
    OPTIONS.with(|o| o.borrow_mut().after_update = observer);
}

pub fn set_before_unmount(observer: Option<ComponentObserver>) {
    OPTIONS.with(|o| o.borrow_mut().before_unmount = observer);
}

/// Restore defaults and drop all observers (for testing).
pub fn reset_options() {
    OPTIONS.with(|o| {
        *o.borrow_mut() = Options {
            sync_component_updates: true,
            ..Options::default()
        }
    });
    DEFERRED.with(|d| d.borrow_mut().clear());
}

// =============================================================================
// Notification (engine-internal)
// =============================================================================

// Observers are cloned out before invocation so a hook can reconfigure
// options without re-entering the borrow.

pub(crate) fn notify_element_created(vnode: &VNode) {
    let observer = OPTIONS.with(|o| o.borrow().on_element_created.clone());
    if let Some(observer) = observer {
        observer(vnode);
    }
}

pub(crate) fn notify_after_mount(instance: &InstanceRef) {
    let observer = OPTIONS.with(|o| o.borrow().after_mount.clone());
    if let Some(observer) = observer {
        observer(instance);
    }
}

pub(crate) fn notify_after_update(instance: &InstanceRef) {
    let observer = OPTIONS.with(|o| o.borrow().after_update.clone());
    if let Some(observer) = observer {
        observer(instance);
    }
}

pub(crate) fn notify_before_unmount(instance: &InstanceRef) {
    let observer = OPTIONS.with(|o| o.borrow().before_unmount.clone());
    if let Some(observer) = observer {
        observer(instance);
    }
}

pub(crate) fn intercept_event(event: Event) -> Event {
    let interceptor = OPTIONS.with(|o| o.borrow().event.clone());
    match interceptor {
        Some(f) => f(event),
        None => event,
    }
}

// =============================================================================
// Deferral
// =============================================================================

/// Schedule `work` through the configured debounce strategy.
pub(crate) fn debounce(work: Deferred) {
    let strategy = OPTIONS.with(|o| o.borrow().debounce_rendering.clone());
    match strategy {
        Some(f) => f(work),
        None => defer(work),
    }
}

/// Push work onto the deferred queue (the default debounce strategy).
pub fn defer(work: Deferred) {
    DEFERRED.with(|d| d.borrow_mut().push_back(work));
}

/// Drain the deferred queue to exhaustion, running callbacks in order.
/// Work scheduled while draining runs in the same checkpoint.
pub fn run_deferred() {
    loop {
        let next = DEFERRED.with(|d| d.borrow_mut().pop_front());
        match next {
            Some(work) => work(),
            None => break,
        }
    }
}

/// Number of callbacks currently waiting for the next checkpoint.
pub fn pending_deferred() -> usize {
    DEFERRED.with(|d| d.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn deferred_queue_runs_in_order() {
        reset_options();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            defer(Box::new(move || log.borrow_mut().push(i)));
        }
        assert_eq!(pending_deferred(), 3);
        run_deferred();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert_eq!(pending_deferred(), 0);
    }

    #[test]
    fn deferred_work_scheduled_while_draining_runs_too() {
        reset_options();
        let hit = Rc::new(Cell::new(false));
        let hit2 = hit.clone();
        defer(Box::new(move || {
            let hit3 = hit2.clone();
            defer(Box::new(move || hit3.set(true)));
        }));
        run_deferred();
        assert!(hit.get());
    }

    #[test]
    fn debounce_override_takes_over_scheduling() {
        reset_options();
        let captured = Rc::new(RefCell::new(Vec::new()));
        let captured2 = captured.clone();
        set_debounce_rendering(Some(Rc::new(move |work| {
            captured2.borrow_mut().push(work);
        })));
        debounce(Box::new(|| {}));
        assert_eq!(captured.borrow().len(), 1);
        assert_eq!(pending_deferred(), 0);
        reset_options();
    }
}
