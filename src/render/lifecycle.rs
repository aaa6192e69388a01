//! Component lifecycle controller.
//!
//! Drives the component half of reconciliation: committing incoming props,
//! gating and running renders, wiring high-order chains (a component whose
//! output is another component), swapping rendered bases into the live tree
//! and tearing instances down. The element half lives in the parent module;
//! the two recurse into each other through [`super::diff`] and
//! [`build_component_from_vnode`].

use std::rc::Rc;

use super::{RenderPass, diff, flush_mounts, recollect_node_tree, remove_children};
use crate::component::{
    ComponentInstance, ComponentType, InstanceRef, StatusFlags, Updater, pool, with_behavior,
};
use crate::dom::{self, NodeId};
use crate::options;
use crate::render::queue;
use crate::types::{Props, RefTarget, RenderMode, Value};
use crate::vnode::{VChild, VNode};

// =============================================================================
// Instance Construction
// =============================================================================

/// Build a fresh instance for `kind`: behavior constructed, initial state
/// computed, updater attached, and a pooled base subtree adopted if the
/// recycle pool has one for this constructor.
pub(crate) fn create_component(kind: &ComponentType, props: Props, context: Props) -> InstanceRef {
    let mut behavior = kind.instantiate();
    let instance: InstanceRef = Rc::new(
        std::cell::RefCell::new(ComponentInstance::new(kind.clone(), props.clone(), context)),
    );
    let initial = behavior.initial_state(&props);
    behavior.attach(Updater::new(&instance));
    {
        let mut b = instance.borrow_mut();
        b.state = initial;
        b.behavior = Some(behavior);
        b.next_base = pool::harvest(kind);
    }
    instance
}

/// Materialize a component descriptor's props: attributes plus forwarded
/// children, with unset keys filled from the constructor's default props.
pub(crate) fn get_node_props(vnode: &VNode) -> Props {
    let mut props = vnode.attributes.clone().unwrap_or_default();
    props.insert("children", Value::Children(vnode.children.clone()));
    if let Some(kind) = vnode.name.component() {
        if let Some(defaults) = kind.default_props() {
            for (name, value) in defaults.iter() {
                if !props.contains(name) {
                    props.insert(name, value.clone());
                }
            }
        }
    }
    props
}

// =============================================================================
// Prop Commit
// =============================================================================

/// Commit incoming props (and optionally context) to an instance, then
/// render per `mode`. `ref` and `key` are peeled off into instance fields
/// before the commit. Re-entrant calls while a commit is in progress no-op.
pub(crate) fn set_component_props(
    instance: &InstanceRef,
    mut props: Props,
    mode: RenderMode,
    context: Option<Props>,
    mount_all: bool,
    pass: Option<&mut RenderPass>,
) {
    if instance.borrow().flags.contains(StatusFlags::DISABLED) {
        return;
    }
    instance.borrow_mut().flags.insert(StatusFlags::DISABLED);

    let ref_cb = match props.remove("ref") {
        Some(Value::Ref(cb)) => Some(cb),
        _ => None,
    };
    let key = props.remove("key").and_then(|v| v.to_key());
    {
        let mut b = instance.borrow_mut();
        b.ref_cb = ref_cb;
        b.key = key;
    }

    if instance.borrow().base.is_none() || mount_all {
        with_behavior(instance, |c| c.will_mount());
    } else {
        let next_context = context
            .clone()
            .unwrap_or_else(|| instance.borrow().context.clone());
        with_behavior(instance, |c| c.will_receive_props(&props, &next_context));
    }

    if let Some(context) = context {
        let mut b = instance.borrow_mut();
        if context != b.context {
            if b.prev_context.is_none() {
                b.prev_context = Some(b.context.clone());
            }
            b.context = context;
        }
    }
    {
        let mut b = instance.borrow_mut();
        if b.prev_props.is_none() {
            b.prev_props = Some(b.props.clone());
        }
        b.props = props;
        b.flags.remove(StatusFlags::DISABLED);
    }

    if mode != RenderMode::No {
        if mode == RenderMode::Sync
            || options::sync_component_updates()
            || instance.borrow().base.is_none()
        {
            render_component(instance, RenderMode::Sync, mount_all, false, pass);
        } else {
            queue::enqueue(instance);
        }
    }

    let ref_cb = instance.borrow().ref_cb.clone();
    if let Some(cb) = ref_cb {
        cb(RefTarget::Component(instance.clone()));
    }
}

// =============================================================================
// Render
// =============================================================================

/// Render an instance into its base subtree.
///
/// With `pass: None` this opens its own pass frame and, unless rendering as
/// a high-order child, flushes mount hooks when done; inside an enclosing
/// diff the caller's frame is used and mounts flush at its root.
pub(crate) fn render_component(
    instance: &InstanceRef,
    mode: RenderMode,
    mount_all: bool,
    is_child: bool,
    pass: Option<&mut RenderPass>,
) {
    match pass {
        Some(pass) => render_component_in(instance, mode, mount_all, is_child, pass),
        None => {
            let mut pass = RenderPass::default();
            render_component_in(instance, mode, mount_all, is_child, &mut pass);
            if !is_child {
                flush_mounts(&mut pass);
            }
        }
    }
}

fn render_component_in(
    instance: &InstanceRef,
    mode: RenderMode,
    mount_all: bool,
    is_child: bool,
    pass: &mut RenderPass,
) {
    if instance.borrow().flags.contains(StatusFlags::DISABLED) {
        return;
    }

    let (props, state, context, previous_props, previous_state, previous_context);
    let (existing_base, next_base, initial_child);
    {
        let b = instance.borrow();
        props = b.props.clone();
        state = b.state.clone();
        context = b.context.clone();
        previous_props = b.prev_props.clone().unwrap_or_else(|| b.props.clone());
        previous_state = b.prev_state.clone().unwrap_or_else(|| b.state.clone());
        previous_context = b.prev_context.clone().unwrap_or_else(|| b.context.clone());
        existing_base = b.base;
        next_base = b.next_base;
        initial_child = b.child.clone();
    }
    let is_update = existing_base.is_some();
    let initial_base = existing_base.or(next_base);

    let mut skip = false;
    if is_update {
        // update hooks observe the previous snapshot as current state and
        // the incoming values as arguments
        {
            let mut b = instance.borrow_mut();
            b.props = previous_props.clone();
            b.state = previous_state.clone();
            b.context = previous_context.clone();
        }
        let should = mode == RenderMode::Force
            || with_behavior(instance, |c| c.should_update(&props, &state, &context))
                .unwrap_or(true);
        if should {
            with_behavior(instance, |c| c.will_update(&props, &state, &context));
        } else {
            skip = true;
        }
        let mut b = instance.borrow_mut();
        b.props = props.clone();
        b.state = state.clone();
        b.context = context.clone();
    }

    {
        let mut b = instance.borrow_mut();
        b.prev_props = None;
        b.prev_state = None;
        b.prev_context = None;
        b.next_base = None;
        b.flags.remove(StatusFlags::DIRTY);
    }

    if !skip {
        let rendered = with_behavior(instance, |c| c.render(&props, &state, &context)).flatten();
        let mut context = context;
        if let Some(extra) = with_behavior(instance, |c| c.child_context()).flatten() {
            context = context.merged(extra);
        }

        let mut inst: Option<InstanceRef> = None;
        let mut to_unmount: Option<InstanceRef> = None;
        let base;

        let child_kind = rendered.as_ref().and_then(|r| r.name.component().cloned());
        if let (Some(rendered), Some(child_kind)) = (&rendered, &child_kind) {
            // high-order: our output is another component
            let child_props = get_node_props(rendered);
            let reusable = initial_child
                .as_ref()
                .filter(|c| {
                    let cb = c.borrow();
                    cb.kind.same(child_kind) && child_props.key() == cb.key
                })
                .cloned();
            let child = if let Some(child) = reusable {
                set_component_props(
                    &child,
                    child_props,
                    RenderMode::Sync,
                    Some(context.clone()),
                    false,
                    Some(&mut *pass),
                );
                child
            } else {
                to_unmount = initial_child.clone();
                let child = create_component(child_kind, child_props.clone(), context.clone());
                {
                    let mut cb = child.borrow_mut();
                    if cb.next_base.is_none() {
                        cb.next_base = next_base;
                    }
                    cb.parent = Rc::downgrade(instance);
                }
                instance.borrow_mut().child = Some(child.clone());
                set_component_props(
                    &child,
                    child_props,
                    RenderMode::No,
                    Some(context.clone()),
                    false,
                    Some(&mut *pass),
                );
                render_component_in(&child, RenderMode::Sync, mount_all, true, pass);
                child
            };
            base = child.borrow().base;
            inst = Some(child);
        } else {
            let mut cbase = initial_base;
            to_unmount = initial_child.clone();
            if to_unmount.is_some() {
                cbase = None;
                instance.borrow_mut().child = None;
            }
            if initial_base.is_some() || mode == RenderMode::Sync {
                if let Some(c) = cbase {
                    dom::set_component(c, None);
                }
                let rendered_child = rendered.map(VChild::Element);
                base = Some(diff(
                    cbase,
                    rendered_child.as_ref(),
                    &context,
                    mount_all || !is_update,
                    initial_base.and_then(dom::parent),
                    true,
                    pass,
                ));
            } else {
                base = None;
            }
        }

        // swap the fresh base in where the old one sat
        if let (Some(initial), Some(new_base)) = (initial_base, base) {
            let inst_changed = match (&inst, &initial_child) {
                (None, None) => false,
                (Some(a), Some(b)) => !Rc::ptr_eq(a, b),
                _ => true,
            };
            if new_base != initial && inst_changed {
                if let Some(base_parent) = dom::parent(initial) {
                    if new_base != base_parent {
                        dom::replace_child(base_parent, new_base, initial);
                        if to_unmount.is_none() {
                            dom::set_component(initial, None);
                            recollect_node_tree(initial, false);
                        }
                    }
                }
            }
        }

        if let Some(old) = &to_unmount {
            unmount_component(old);
        }

        instance.borrow_mut().base = base;
        if let Some(base) = base {
            if !is_child {
                // propagate the base up the high-order chain; the chain root
                // owns the node's component back-pointer
                let mut root = instance.clone();
                loop {
                    let up = root.borrow().parent.upgrade();
                    match up {
                        Some(p) => {
                            p.borrow_mut().base = Some(base);
                            root = p;
                        }
                        None => break,
                    }
                }
                let kind = root.borrow().kind.clone();
                dom::set_component(base, Some(root));
                dom::set_component_type(base, Some(kind));
            }
        }
    }

    if !is_update || mount_all {
        pass.mounts.insert(0, instance.clone());
    } else if !skip {
        with_behavior(instance, |c| {
            c.did_update(&previous_props, &previous_state, &previous_context)
        });
        options::notify_after_update(instance);
    }

    // one-shot callbacks run newest-first, even for skipped renders
    loop {
        let cb = instance.borrow_mut().render_callbacks.pop();
        match cb {
            Some(cb) => cb(),
            None => break,
        }
    }
}

// =============================================================================
// Descriptor → Component
// =============================================================================

/// Reconcile a component descriptor against a live node: reuse the owning
/// instance when the constructor matches, otherwise unmount what was there
/// and mount a fresh instance, donating the old node as its starting base.
pub(crate) fn build_component_from_vnode(
    dom: Option<NodeId>,
    kind: &ComponentType,
    vnode: &VNode,
    context: &Props,
    mount_all: bool,
    pass: &mut RenderPass,
) -> NodeId {
    let original = dom.and_then(dom::component);
    let is_direct_owner = dom
        .and_then(dom::component_type)
        .is_some_and(|t| t.same(kind));
    let mut owner = original.clone();
    let mut is_owner = is_direct_owner;
    while let Some(current) = owner.clone() {
        if is_owner {
            break;
        }
        let up = current.borrow().parent.upgrade();
        match up {
            Some(p) => {
                is_owner = p.borrow().kind.same(kind);
                owner = Some(p);
            }
            None => break,
        }
    }

    let props = get_node_props(vnode);
    match owner {
        Some(instance) if is_owner && (!mount_all || instance.borrow().child.is_some()) => {
            set_component_props(
                &instance,
                props,
                RenderMode::Async,
                Some(context.clone()),
                mount_all,
                Some(pass),
            );
            let base = instance.borrow().base;
            // a committed render always leaves a base
            base.unwrap_or_else(|| dom::create_text_node(""))
        }
        _ => {
            let mut old_dom = dom;
            let mut donor = dom;
            if let Some(original) = &original {
                if !is_direct_owner {
                    unmount_component(original);
                    old_dom = None;
                    donor = None;
                }
            }
            let instance = create_component(kind, props.clone(), context.clone());
            {
                let mut b = instance.borrow_mut();
                if let (Some(d), None) = (donor, b.next_base) {
                    b.next_base = Some(d);
                    old_dom = None;
                }
            }
            set_component_props(
                &instance,
                props,
                RenderMode::Sync,
                Some(context.clone()),
                mount_all,
                Some(pass),
            );
            let base = instance.borrow().base;
            if let (Some(old), Some(base)) = (old_dom, base) {
                if base != old {
                    dom::set_component(old, None);
                    recollect_node_tree(old, false);
                }
            }
            base.unwrap_or_else(|| dom::create_text_node(""))
        }
    }
}

// =============================================================================
// Unmount
// =============================================================================

/// Tear an instance down: unmount hook, base detached and donated to the
/// recycle pool, element refs in the subtree released, children unmounted.
/// The instance stays disabled afterwards so stray renders no-op.
pub(crate) fn unmount_component(instance: &InstanceRef) {
    options::notify_before_unmount(instance);

    let base = instance.borrow().base;
    instance.borrow_mut().flags.insert(StatusFlags::DISABLED);
    with_behavior(instance, |c| c.will_unmount());
    instance.borrow_mut().base = None;

    let inner = instance.borrow().child.clone();
    if let Some(inner) = inner {
        unmount_component(&inner);
    } else if let Some(base) = base {
        if let Some(cache) = dom::attr_cache(base) {
            if let Some(Value::Ref(cb)) = cache.get("ref") {
                cb(RefTarget::Detached);
            }
        }
        instance.borrow_mut().next_base = Some(base);
        dom::remove(base);
        pool::collect(instance);
        remove_children(base);
    }

    let ref_cb = instance.borrow().ref_cb.clone();
    if let Some(cb) = ref_cb {
        cb(RefTarget::Detached);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::dom::to_html;
    use crate::render::{render, render_into};
    use crate::types::Event;
    use crate::vnode::{ChildArg, create_element};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Leaf;
    impl Component for Leaf {
        fn render(&mut self, _: &Props, _: &Props, _: &Props) -> Option<VNode> {
            Some(create_element("span", None, []))
        }
    }

    fn setup() -> NodeId {
        dom::reset_arena();
        pool::reset_pool();
        queue::reset_queue();
        options::reset_options();
        dom::create_element_node("body", false)
    }

    type Log = Rc<RefCell<Vec<String>>>;

    /// Component that logs every lifecycle hook it sees.
    struct Probe {
        tag: &'static str,
        log: Log,
    }

    impl Probe {
        fn kind(tag: &'static str, log: &Log) -> ComponentType {
            let log = log.clone();
            ComponentType::with_factory(tag, move || {
                Box::new(Probe {
                    tag,
                    log: log.clone(),
                })
            })
        }

        fn note(&self, hook: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.tag, hook));
        }
    }

    impl Component for Probe {
        fn render(&mut self, props: &Props, _: &Props, _: &Props) -> Option<VNode> {
            self.note("render");
            let label = props
                .get("label")
                .map(Value::to_attr_string)
                .unwrap_or_default();
            Some(create_element("p", None, vec![ChildArg::Text(label)]))
        }
        fn will_mount(&mut self) {
            self.note("will_mount");
        }
        fn did_mount(&mut self) {
            self.note("did_mount");
        }
        fn will_unmount(&mut self) {
            self.note("will_unmount");
        }
        fn will_receive_props(&mut self, _: &Props, _: &Props) {
            self.note("will_receive_props");
        }
        fn will_update(&mut self, _: &Props, _: &Props, _: &Props) {
            self.note("will_update");
        }
        fn did_update(&mut self, _: &Props, _: &Props, _: &Props) {
            self.note("did_update");
        }
    }

    /// Counter driven through its updater; counts render-body executions.
    struct Counter {
        handle: Rc<RefCell<Option<Updater>>>,
        renders: Rc<std::cell::Cell<u32>>,
        gate_open: bool,
    }

    impl Counter {
        fn kind(
            name: &'static str,
            handle: &Rc<RefCell<Option<Updater>>>,
            renders: &Rc<std::cell::Cell<u32>>,
            gate_open: bool,
        ) -> ComponentType {
            let handle = handle.clone();
            let renders = renders.clone();
            ComponentType::with_factory(name, move || {
                Box::new(Counter {
                    handle: handle.clone(),
                    renders: renders.clone(),
                    gate_open,
                })
            })
        }
    }

    impl Component for Counter {
        fn render(&mut self, _: &Props, state: &Props, _: &Props) -> Option<VNode> {
            self.renders.set(self.renders.get() + 1);
            let n = state.get("n").and_then(Value::as_int).unwrap_or(0);
            Some(create_element("div", None, vec![ChildArg::Text(n.to_string())]))
        }
        fn initial_state(&self, _: &Props) -> Props {
            Props::new().with("n", 0)
        }
        fn attach(&mut self, updater: Updater) {
            *self.handle.borrow_mut() = Some(updater);
        }
        fn should_update(&mut self, _: &Props, _: &Props, _: &Props) -> bool {
            self.gate_open
        }
    }

    #[test]
    fn mount_runs_hooks_in_order() {
        let root = setup();
        let log: Log = Rc::default();
        let kind = Probe::kind("a", &log);
        let base = render(
            create_element(&kind, Some(Props::new().with("label", "hi")), vec![]),
            root,
        );
        assert_eq!(to_html(base), "<p>hi</p>");
        assert_eq!(
            *log.borrow(),
            vec!["a:will_mount", "a:render", "a:did_mount"]
        );
    }

    #[test]
    fn prop_update_runs_update_hooks_and_reuses_instance() {
        let root = setup();
        let log: Log = Rc::default();
        let kind = Probe::kind("a", &log);
        let base = render(
            create_element(&kind, Some(Props::new().with("label", "one")), vec![]),
            root,
        );
        let instance = dom::component(base).unwrap();
        log.borrow_mut().clear();

        let again = render_into(
            create_element(&kind, Some(Props::new().with("label", "two")), vec![]),
            root,
            base,
        );
        assert_eq!(again, base);
        assert!(Rc::ptr_eq(&instance, &dom::component(base).unwrap()));
        assert_eq!(to_html(base), "<p>two</p>");
        assert_eq!(
            *log.borrow(),
            vec![
                "a:will_receive_props",
                "a:will_update",
                "a:render",
                "a:did_update"
            ]
        );
    }

    #[test]
    fn set_state_batches_into_one_render() {
        let root = setup();
        let handle = Rc::new(RefCell::new(None));
        let renders = Rc::new(std::cell::Cell::new(0));
        let kind = Counter::kind("Counter", &handle, &renders, true);
        let base = render(create_element(&kind, None, vec![]), root);
        assert_eq!(renders.get(), 1);

        let updater = handle.borrow().clone().unwrap();
        updater.set_state(Props::new().with("n", 1));
        updater.set_state(Props::new().with("n", 2));
        updater.set_state(Props::new().with("n", 3));

        // state is committed immediately, the render waits for the checkpoint
        assert_eq!(renders.get(), 1);
        assert_eq!(queue::pending(), 1);
        assert_eq!(to_html(base), "<div>0</div>");

        options::run_deferred();
        assert_eq!(renders.get(), 2);
        assert_eq!(queue::pending(), 0);
        assert_eq!(to_html(base), "<div>3</div>");
    }

    #[test]
    fn closed_gate_skips_render_but_commits_state() {
        let root = setup();
        let handle = Rc::new(RefCell::new(None));
        let renders = Rc::new(std::cell::Cell::new(0));
        let kind = Counter::kind("Gated", &handle, &renders, false);
        let base = render(create_element(&kind, None, vec![]), root);
        assert_eq!(renders.get(), 1);

        let updater = handle.borrow().clone().unwrap();
        updater.set_state(Props::new().with("n", 9));
        options::run_deferred();

        assert_eq!(renders.get(), 1);
        assert_eq!(to_html(base), "<div>0</div>");
        let instance = dom::component(base).unwrap();
        assert_eq!(instance.borrow().state().get("n"), Some(&Value::Int(9)));
        assert!(!instance.borrow().is_dirty());
    }

    #[test]
    fn force_update_bypasses_the_gate() {
        let root = setup();
        let handle = Rc::new(RefCell::new(None));
        let renders = Rc::new(std::cell::Cell::new(0));
        let kind = Counter::kind("Gated", &handle, &renders, false);
        let base = render(create_element(&kind, None, vec![]), root);

        let updater = handle.borrow().clone().unwrap();
        updater.set_state(Props::new().with("n", 4));
        options::run_deferred();
        assert_eq!(renders.get(), 1);

        updater.force_update();
        assert_eq!(renders.get(), 2);
        assert_eq!(to_html(base), "<div>4</div>");
    }

    #[test]
    fn state_render_callback_fires_after_the_render() {
        let root = setup();
        let handle = Rc::new(RefCell::new(None));
        let renders = Rc::new(std::cell::Cell::new(0));
        let kind = Counter::kind("Counter", &handle, &renders, true);
        render(create_element(&kind, None, vec![]), root);

        let updater = handle.borrow().clone().unwrap();
        let instance = updater.instance().unwrap();
        let seen = Rc::new(std::cell::Cell::new(0));
        let seen2 = seen.clone();
        let renders2 = renders.clone();
        crate::component::set_state(
            &instance,
            Props::new().with("n", 1),
            Some(Box::new(move || seen2.set(renders2.get()))),
        );
        options::run_deferred();
        // callback observed the post-render world
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn high_order_chain_shares_one_base() {
        let root = setup();
        let log: Log = Rc::default();
        let inner = Probe::kind("inner", &log);
        let inner_for_outer = inner.clone();
        let outer = ComponentType::functional("outer", move |props, _| {
            Some(create_element(
                &inner_for_outer,
                Some(Props::new().with("label", props.get("label").cloned().unwrap_or(Value::Null))),
                vec![],
            ))
        });

        let base = render(
            create_element(&outer, Some(Props::new().with("label", "x")), vec![]),
            root,
        );
        assert_eq!(to_html(base), "<p>x</p>");

        // the chain root owns the node; its child link is the inner instance
        let owner = dom::component(base).unwrap();
        assert_eq!(owner.borrow().kind().name(), "outer");
        let child = owner.borrow().child.clone().unwrap();
        assert_eq!(child.borrow().kind().name(), "inner");
        assert_eq!(owner.borrow().base(), Some(base));
        assert_eq!(child.borrow().base(), Some(base));

        // updating through the outer component reaches the inner render
        render_into(
            create_element(&outer, Some(Props::new().with("label", "y")), vec![]),
            root,
            base,
        );
        assert_eq!(to_html(base), "<p>y</p>");
        assert!(Rc::ptr_eq(&child, &owner.borrow().child.clone().unwrap()));
    }

    #[test]
    fn nested_mounts_report_before_their_parent() {
        let root = setup();
        let log: Log = Rc::default();
        let inner = Probe::kind("inner", &log);

        struct Wrapper {
            log: Log,
            inner: ComponentType,
        }
        impl Component for Wrapper {
            fn render(&mut self, _: &Props, _: &Props, _: &Props) -> Option<VNode> {
                Some(create_element(
                    "div",
                    None,
                    vec![create_element(&self.inner, None, vec![]).into()],
                ))
            }
            fn did_mount(&mut self) {
                self.log.borrow_mut().push("outer:did_mount".into());
            }
        }

        let wrapper_log = log.clone();
        let wrapper_inner = inner.clone();
        let outer = ComponentType::with_factory("outer", move || {
            Box::new(Wrapper {
                log: wrapper_log.clone(),
                inner: wrapper_inner.clone(),
            })
        });
        render(create_element(&outer, None, vec![]), root);

        let log = log.borrow();
        let inner_mount = log.iter().position(|e| e == "inner:did_mount").unwrap();
        let outer_mount = log.iter().position(|e| e == "outer:did_mount").unwrap();
        assert!(inner_mount < outer_mount);
    }

    #[test]
    fn removing_a_child_component_unmounts_and_pools_it() {
        let root = setup();
        let log: Log = Rc::default();
        let kind = Probe::kind("a", &log);
        let with_child = create_element(
            "div",
            None,
            vec![create_element(&kind, None, vec![]).into()],
        );
        let base = render(with_child, root);
        let child_base = dom::child_at(base, 0).unwrap();
        log.borrow_mut().clear();

        render_into(create_element("div", None, vec![]), root, base);
        assert_eq!(dom::child_count(base), 0);
        assert!(dom::parent(child_base).is_none());
        assert_eq!(*log.borrow(), vec!["a:will_unmount"]);
        assert_eq!(pool::pooled("a"), 1);
    }

    #[test]
    fn remount_harvests_the_pooled_base() {
        let root = setup();
        let log: Log = Rc::default();
        let kind = Probe::kind("a", &log);
        let child = |k: &ComponentType| {
            create_element("div", None, vec![create_element(k, None, vec![]).into()])
        };
        let base = render(child(&kind), root);
        let first_base = dom::child_at(base, 0).unwrap();

        render_into(create_element("div", None, vec![]), root, base);
        assert_eq!(pool::pooled("a"), 1);

        render_into(child(&kind), root, base);
        assert_eq!(pool::pooled("a"), 0);
        // the detached subtree was adopted instead of rebuilt
        assert_eq!(dom::child_at(base, 0), Some(first_base));
    }

    #[test]
    fn unmount_runs_outer_hook_before_inner() {
        let root = setup();
        let log: Log = Rc::default();
        let inner = Probe::kind("inner", &log);

        struct Outer {
            log: Log,
            inner: ComponentType,
        }
        impl Component for Outer {
            fn render(&mut self, _: &Props, _: &Props, _: &Props) -> Option<VNode> {
                Some(create_element(
                    "section",
                    None,
                    vec![create_element(&self.inner, None, vec![]).into()],
                ))
            }
            fn will_unmount(&mut self) {
                self.log.borrow_mut().push("outer:will_unmount".into());
            }
        }

        let outer_log = log.clone();
        let outer_inner = inner.clone();
        let outer = ComponentType::with_factory("outer", move || {
            Box::new(Outer {
                log: outer_log.clone(),
                inner: outer_inner.clone(),
            })
        });

        let base = render(
            create_element("div", None, vec![create_element(&outer, None, vec![]).into()]),
            root,
        );
        log.borrow_mut().clear();

        render_into(create_element("div", None, vec![]), root, base);
        let unmounts: Vec<_> = log
            .borrow()
            .iter()
            .filter(|e| e.ends_with("will_unmount"))
            .cloned()
            .collect();
        assert_eq!(unmounts, vec!["outer:will_unmount", "inner:will_unmount"]);
    }

    #[test]
    fn swapping_component_type_unmounts_the_old_instance() {
        let root = setup();
        let log: Log = Rc::default();
        let a = Probe::kind("a", &log);
        let b = Probe::kind("b", &log);
        let wrap = |k: &ComponentType| {
            create_element("div", None, vec![create_element(k, None, vec![]).into()])
        };
        let base = render(wrap(&a), root);
        log.borrow_mut().clear();

        render_into(wrap(&b), root, base);
        let log = log.borrow();
        assert!(log.contains(&"a:will_unmount".to_string()));
        assert!(log.contains(&"b:did_mount".to_string()));
    }

    #[test]
    fn component_ref_reports_attach_and_detach() {
        let root = setup();
        let log: Log = Rc::default();
        let kind = Probe::kind("a", &log);
        let events = Rc::new(RefCell::new(Vec::new()));
        let events2 = events.clone();
        let ref_cb: crate::types::RefCallback = Rc::new(move |target| {
            events2.borrow_mut().push(match target {
                RefTarget::Component(_) => "component",
                RefTarget::Node(_) => "node",
                RefTarget::Detached => "detached",
            });
        });
        let wrap = |k: &ComponentType| {
            let attrs = Some(Props::new().with("ref", Value::Ref(ref_cb.clone())));
            create_element("div", None, vec![create_element(k, attrs, vec![]).into()])
        };
        let base = render(wrap(&kind), root);
        assert_eq!(*events.borrow(), vec!["component"]);

        render_into(create_element("div", None, vec![]), root, base);
        assert_eq!(events.borrow().last(), Some(&"detached"));
    }

    #[test]
    fn event_handler_drives_state_through_the_updater() {
        let root = setup();
        let handle: Rc<RefCell<Option<Updater>>> = Rc::new(RefCell::new(None));

        struct Button {
            handle: Rc<RefCell<Option<Updater>>>,
            updater: Updater,
        }
        impl Component for Button {
            fn render(&mut self, _: &Props, state: &Props, _: &Props) -> Option<VNode> {
                let n = state.get("n").and_then(Value::as_int).unwrap_or(0);
                let u = self.updater.clone();
                let on_click: crate::types::EventHandler = Rc::new(move |_| {
                    u.set_state_with(|state, _| {
                        let n = state.get("n").and_then(Value::as_int).unwrap_or(0);
                        Props::new().with("n", n + 1)
                    });
                });
                Some(create_element(
                    "button",
                    Some(Props::new().with("onClick", on_click)),
                    vec![ChildArg::Text(n.to_string())],
                ))
            }
            fn attach(&mut self, updater: Updater) {
                self.updater = updater.clone();
                *self.handle.borrow_mut() = Some(updater);
            }
        }

        let h2 = handle.clone();
        let kind = ComponentType::with_factory("Button", move || {
            Box::new(Button {
                handle: h2.clone(),
                updater: Updater::default(),
            })
        });
        let base = render(create_element(&kind, None, vec![]), root);
        assert_eq!(to_html(base), "<button>0</button>");
        assert_eq!(dom::listener_count(base), 1);

        assert!(dom::emit(Event::new("click", base)));
        options::run_deferred();
        assert_eq!(to_html(base), "<button>1</button>");
        // re-render swapped the callback without re-registering the proxy
        assert_eq!(dom::listener_count(base), 1);

        assert!(dom::emit(Event::new("click", base)));
        options::run_deferred();
        assert_eq!(to_html(base), "<button>2</button>");
    }

    #[test]
    fn child_context_layers_onto_descendant_context() {
        let root = setup();
        let seen = Rc::new(RefCell::new(Props::new()));

        struct Provider;
        impl Component for Provider {
            fn render(&mut self, props: &Props, _: &Props, _: &Props) -> Option<VNode> {
                let children = match props.get("children") {
                    Some(Value::Children(c)) => c.clone(),
                    _ => Vec::new(),
                };
                let children: Vec<ChildArg> = children
                    .into_iter()
                    .map(|c| match c {
                        VChild::Element(v) => ChildArg::Node(v),
                        VChild::Text(t) => ChildArg::Text(t),
                    })
                    .collect();
                Some(create_element("div", None, children))
            }
            fn child_context(&self) -> Option<Props> {
                Some(Props::new().with("theme", "dark"))
            }
        }

        let seen2 = seen.clone();
        let consumer = ComponentType::functional("Consumer", move |_, context| {
            *seen2.borrow_mut() = context.clone();
            Some(create_element("span", None, vec![]))
        });
        let provider = ComponentType::with_factory("Provider", || Box::new(Provider));

        render(
            create_element(
                &provider,
                None,
                vec![create_element(&consumer, None, vec![]).into()],
            ),
            root,
        );
        assert_eq!(seen.borrow().get("theme"), Some(&Value::Str("dark".into())));
    }

    #[test]
    fn node_props_carry_children_and_defaults() {
        let kind = ComponentType::with_default_props(
            "Leaf",
            || Box::new(Leaf),
            Props::new().with("size", 3),
        );
        let vnode = create_element(
            &kind,
            Some(Props::new().with("size", 5).with("id", "a")),
            ["x".into()],
        );
        let props = get_node_props(&vnode);
        assert_eq!(props.get("size"), Some(&Value::Int(5)));
        assert_eq!(props.get("id"), Some(&Value::Str("a".into())));
        assert!(matches!(props.get("children"), Some(Value::Children(c)) if c.len() == 1));

        let bare = create_element(&kind, None, []);
        assert_eq!(get_node_props(&bare).get("size"), Some(&Value::Int(3)));
    }

    #[test]
    fn create_component_runs_initial_state_and_pool_harvest() {
        crate::dom::reset_arena();
        pool::reset_pool();

        struct Counter;
        impl Component for Counter {
            fn render(&mut self, _: &Props, _: &Props, _: &Props) -> Option<VNode> {
                None
            }
            fn initial_state(&self, props: &Props) -> Props {
                Props::new().with("n", props.get("start").cloned().unwrap_or(Value::Int(0)))
            }
        }

        let kind = ComponentType::with_factory("Counter", || Box::new(Counter));
        let instance = create_component(&kind, Props::new().with("start", 7), Props::new());
        assert_eq!(instance.borrow().state().get("n"), Some(&Value::Int(7)));
        assert!(instance.borrow().is_dirty());
        assert!(instance.borrow().next_base.is_none());
    }
}
