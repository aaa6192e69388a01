//! Components: user-defined stateful units of UI.
//!
//! A [`Component`] implementation supplies the render hook and optional
//! lifecycle hooks; the engine wraps each mounted occurrence in a
//! [`ComponentInstance`] record that owns its props/state/context, its base
//! live node, and the bookkeeping the lifecycle controller drives
//! (dirty/disabled flags, previous-value snapshots, high-order links).

pub mod pool;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bitflags::bitflags;

use crate::dom::NodeId;
use crate::render::lifecycle;
use crate::render::queue;
use crate::types::{Key, Props, RefCallback, RenderMode};
use crate::vnode::VNode;

// =============================================================================
// Component Trait
// =============================================================================

/// The contract user components implement.
///
/// `render` is required; every other hook defaults to a no-op. Hooks run on
/// the engine's single thread and may re-enter the engine through an
/// [`Updater`] (state merges are applied immediately, renders are batched).
pub trait Component: 'static {
    /// Produce the desired output for the current props/state/context.
    /// `None` renders as an empty text node.
    fn render(&mut self, props: &Props, state: &Props, context: &Props) -> Option<VNode>;

    /// Starting state for a fresh mount of this behavior.
    fn initial_state(&self, _props: &Props) -> Props {
        Props::new()
    }

    /// Called once after construction with the instance's update handle.
    /// Store it to call `set_state`/`force_update` from event closures.
    fn attach(&mut self, _updater: Updater) {}

    fn will_mount(&mut self) {}
    fn did_mount(&mut self) {}
    fn will_unmount(&mut self) {}

    /// Incoming props/context, invoked before they are committed.
    fn will_receive_props(&mut self, _next_props: &Props, _next_context: &Props) {}

    /// Gate for update renders. Returning `false` skips the render body but
    /// still commits the new props/state snapshot. Ignored on forced renders.
    fn should_update(&mut self, _next_props: &Props, _next_state: &Props, _next_context: &Props) -> bool {
        true
    }

    fn will_update(&mut self, _next_props: &Props, _next_state: &Props, _next_context: &Props) {}
    fn did_update(&mut self, _prev_props: &Props, _prev_state: &Props, _prev_context: &Props) {}

    /// Extra context merged into what this component's descendants receive.
    fn child_context(&self) -> Option<Props> {
        None
    }
}

// =============================================================================
// Component Type - Constructor Handle
// =============================================================================

struct TypeInner {
    name: String,
    make: Box<dyn Fn() -> Box<dyn Component>>,
    default_props: Option<Props>,
}

/// Cloneable constructor reference with pointer identity.
///
/// This is the "component reference" side of a descriptor name: the
/// reconciler matches live nodes to descriptors by comparing these handles,
/// and the recycle pool is keyed by them.
#[derive(Clone)]
pub struct ComponentType {
    inner: Rc<TypeInner>,
}

impl ComponentType {
    /// Constructor for a `Default`-constructible component struct.
    pub fn of<C: Component + Default>(name: &str) -> Self {
        Self::with_factory(name, || Box::new(C::default()))
    }

    /// Constructor with an explicit behavior factory.
    pub fn with_factory(
        name: &str,
        make: impl Fn() -> Box<dyn Component> + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(TypeInner {
                name: name.to_string(),
                make: Box::new(make),
                default_props: None,
            }),
        }
    }

    /// A stateless functional component: render is the function itself,
    /// called with props and context.
    pub fn functional(
        name: &str,
        f: impl Fn(&Props, &Props) -> Option<VNode> + 'static,
    ) -> Self {
        let f = Rc::new(f);
        Self::with_factory(name, move || {
            Box::new(FunctionalBehavior { f: f.clone() })
        })
    }

    /// Attach default props: unset keys are filled from these when a
    /// descriptor of this type is materialized.
    pub fn with_default_props(
        name: &str,
        make: impl Fn() -> Box<dyn Component> + 'static,
        defaults: Props,
    ) -> Self {
        Self {
            inner: Rc::new(TypeInner {
                name: name.to_string(),
                make: Box::new(make),
                default_props: Some(defaults),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Constructor identity: two handles are the same type only if they
    /// share the same allocation.
    pub fn same(&self, other: &ComponentType) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Component> {
        (self.inner.make)()
    }

    pub(crate) fn default_props(&self) -> Option<&Props> {
        self.inner.default_props.as_ref()
    }
}

struct FunctionalBehavior {
    f: Rc<dyn Fn(&Props, &Props) -> Option<VNode>>,
}

impl Component for FunctionalBehavior {
    fn render(&mut self, props: &Props, _state: &Props, context: &Props) -> Option<VNode> {
        (self.f)(props, context)
    }
}

// =============================================================================
// Instance Record
// =============================================================================

bitflags! {
    /// Instance status bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        /// A render is pending for this instance.
        const DIRTY = 1 << 0;
        /// Reentrancy guard: prop application is in progress.
        const DISABLED = 1 << 1;
    }
}

/// Shared handle to a mounted component instance.
pub type InstanceRef = Rc<RefCell<ComponentInstance>>;

/// Per-instance lifecycle record.
///
/// `prev_*` snapshots are populated when a change is requested and cleared
/// at the start of the render that applies it; between renders they are
/// `None`.
pub struct ComponentInstance {
    pub(crate) behavior: Option<Box<dyn Component>>,
    pub(crate) kind: ComponentType,

    pub(crate) props: Props,
    pub(crate) state: Props,
    pub(crate) context: Props,
    pub(crate) prev_props: Option<Props>,
    pub(crate) prev_state: Option<Props>,
    pub(crate) prev_context: Option<Props>,

    pub(crate) base: Option<NodeId>,
    /// Detached subtree hint: reused as the starting node on the next render.
    pub(crate) next_base: Option<NodeId>,

    pub(crate) flags: StatusFlags,
    pub(crate) key: Option<Key>,
    pub(crate) ref_cb: Option<RefCallback>,

    /// High-order link: the instance our render output delegated to.
    pub(crate) child: Option<InstanceRef>,
    /// Back-reference up the high-order chain.
    pub(crate) parent: Weak<RefCell<ComponentInstance>>,

    /// One-shot callbacks from `set_state`/`force_update`, drained LIFO
    /// after the next render settles.
    pub(crate) render_callbacks: Vec<Box<dyn FnOnce()>>,
}

impl ComponentInstance {
    pub(crate) fn new(kind: ComponentType, props: Props, context: Props) -> Self {
        Self {
            behavior: None,
            kind,
            props,
            state: Props::new(),
            context,
            prev_props: None,
            prev_state: None,
            prev_context: None,
            base: None,
            next_base: None,
            // fresh instances start dirty, matching a pending first render
            flags: StatusFlags::DIRTY,
            key: None,
            ref_cb: None,
            child: None,
            parent: Weak::new(),
            render_callbacks: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ComponentType {
        &self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn state(&self) -> &Props {
        &self.state
    }

    pub fn context(&self) -> &Props {
        &self.context
    }

    /// Root of this instance's rendered subtree, if mounted.
    pub fn base(&self) -> Option<NodeId> {
        self.base
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.flags.contains(StatusFlags::DIRTY)
    }
}

/// Run a closure against an instance's behavior without holding the
/// instance borrow, so the hook can re-enter the engine. Returns `None`
/// when the behavior is already checked out by an enclosing call.
pub(crate) fn with_behavior<R>(
    instance: &InstanceRef,
    f: impl FnOnce(&mut Box<dyn Component>) -> R,
) -> Option<R> {
    let behavior = instance.borrow_mut().behavior.take();
    let mut behavior = behavior?;
    let out = f(&mut behavior);
    instance.borrow_mut().behavior = Some(behavior);
    Some(out)
}

// =============================================================================
// State Updates
// =============================================================================

/// Requested state change: a partial map to shallow-merge, or an updater
/// function of the current state and props.
pub enum StateUpdate {
    Merge(Props),
    With(Box<dyn FnOnce(&Props, &Props) -> Props>),
}

impl From<Props> for StateUpdate {
    fn from(value: Props) -> Self {
        StateUpdate::Merge(value)
    }
}

/// Merge a state change into an instance and enqueue it for a batched
/// render. The previous state is snapshotted once per batch; the merge
/// itself is applied immediately.
pub fn set_state(
    instance: &InstanceRef,
    update: impl Into<StateUpdate>,
    callback: Option<Box<dyn FnOnce()>>,
) {
    let update = update.into();
    let partial = match update {
        StateUpdate::Merge(p) => p,
        StateUpdate::With(f) => {
            // run the updater outside the borrow so it can read the instance
            let (state, props) = {
                let b = instance.borrow();
                (b.state.clone(), b.props.clone())
            };
            f(&state, &props)
        }
    };
    {
        let mut b = instance.borrow_mut();
        if b.prev_state.is_none() {
            b.prev_state = Some(b.state.clone());
        }
        b.state.merge(partial);
        if let Some(cb) = callback {
            b.render_callbacks.push(cb);
        }
    }
    queue::enqueue(instance);
}

/// Immediately re-render an instance, bypassing both the batch queue and
/// the should-update predicate.
pub fn force_update(instance: &InstanceRef, callback: Option<Box<dyn FnOnce()>>) {
    if let Some(cb) = callback {
        instance.borrow_mut().render_callbacks.push(cb);
    }
    lifecycle::render_component(instance, RenderMode::Force, false, false, None);
}

// =============================================================================
// Updater Handle
// =============================================================================

/// Weak handle through which user code requests updates.
///
/// Handed to the behavior via [`Component::attach`]; cheap to clone into
/// event closures. All methods no-op once the instance is unmounted and
/// dropped.
#[derive(Clone, Default)]
pub struct Updater {
    inner: Weak<RefCell<ComponentInstance>>,
}

impl Updater {
    pub(crate) fn new(instance: &InstanceRef) -> Self {
        Self {
            inner: Rc::downgrade(instance),
        }
    }

    pub fn set_state(&self, partial: Props) {
        if let Some(instance) = self.inner.upgrade() {
            set_state(&instance, StateUpdate::Merge(partial), None);
        }
    }

    pub fn set_state_with_callback(&self, partial: Props, callback: Box<dyn FnOnce()>) {
        if let Some(instance) = self.inner.upgrade() {
            set_state(&instance, StateUpdate::Merge(partial), Some(callback));
        }
    }

    pub fn set_state_with(&self, f: impl FnOnce(&Props, &Props) -> Props + 'static) {
        if let Some(instance) = self.inner.upgrade() {
            set_state(&instance, StateUpdate::With(Box::new(f)), None);
        }
    }

    pub fn force_update(&self) {
        if let Some(instance) = self.inner.upgrade() {
            force_update(&instance, None);
        }
    }

    pub fn instance(&self) -> Option<InstanceRef> {
        self.inner.upgrade()
    }
}
