//! Tree reconciler.
//!
//! Diffs a descriptor tree against a live subtree and mutates the live tree
//! in place: nodes of matching type are edited, keyed siblings are matched
//! by identity, everything else is replaced. Reconciliation state that spans
//! one pass (svg context, hydration, pending mount hooks) travels in an
//! explicit [`RenderPass`] frame threaded through the recursion; the
//! outermost frame owner runs the mount hooks when it unwinds.

pub(crate) mod attributes;
pub(crate) mod lifecycle;
pub mod queue;

use std::collections::HashMap;

use crate::component::{InstanceRef, with_behavior};
use crate::dom::{self, NodeId};
use crate::options;
use crate::types::{Key, Props, RefTarget, Value};
use crate::vnode::{NodeName, VChild, VNode};

/// Per-pass reconciliation state.
///
/// `depth` counts nested `diff` frames; svg/hydration context is computed
/// when the first frame opens and mount hooks flush when it closes.
#[derive(Default)]
pub(crate) struct RenderPass {
    depth: usize,
    svg: bool,
    hydrating: bool,
    /// Instances awaiting `did_mount`, outermost first; flushed by popping
    /// so children mount before their parents.
    pub(crate) mounts: Vec<InstanceRef>,
}

// =============================================================================
// Public Entry Points
// =============================================================================

/// Render a descriptor tree into `parent`, appending the produced subtree.
/// Returns the root of that subtree.
pub fn render(vnode: VNode, parent: NodeId) -> NodeId {
    let mut pass = RenderPass::default();
    let child = VChild::Element(vnode);
    diff(
        None,
        Some(&child),
        &Props::new(),
        false,
        Some(parent),
        false,
        &mut pass,
    )
}

/// Render a descriptor tree over an existing subtree of `parent`, updating
/// it in place. A host-built subtree (one the engine has never touched) is
/// hydrated: its nodes are claimed rather than rebuilt.
pub fn render_into(vnode: VNode, parent: NodeId, merge: NodeId) -> NodeId {
    let mut pass = RenderPass::default();
    let child = VChild::Element(vnode);
    diff(
        Some(merge),
        Some(&child),
        &Props::new(),
        false,
        Some(parent),
        false,
        &mut pass,
    )
}

// =============================================================================
// Diff
// =============================================================================

/// Reconcile `vnode` against `dom`, attach the result under `parent` if it
/// is not already there, and return it.
pub(crate) fn diff(
    dom: Option<NodeId>,
    vnode: Option<&VChild>,
    context: &Props,
    mount_all: bool,
    parent: Option<NodeId>,
    component_root: bool,
    pass: &mut RenderPass,
) -> NodeId {
    if pass.depth == 0 {
        // entering a fresh pass: detect svg context and host-built targets
        pass.svg = parent.is_some_and(dom::is_svg);
        pass.hydrating = dom.is_some_and(|d| dom::attr_cache(d).is_none());
    }
    pass.depth += 1;

    let ret = idiff(dom, vnode, context, mount_all, component_root, pass);

    if let Some(parent) = parent {
        if dom::parent(ret) != Some(parent) {
            dom::append_child(parent, ret);
        }
    }

    pass.depth -= 1;
    if pass.depth == 0 {
        pass.hydrating = false;
        // invoked from a component render the component flushes instead
        if !component_root {
            flush_mounts(pass);
        }
    }
    ret
}

fn idiff(
    dom: Option<NodeId>,
    vnode: Option<&VChild>,
    context: &Props,
    mount_all: bool,
    component_root: bool,
    pass: &mut RenderPass,
) -> NodeId {
    let vnode = match vnode {
        Some(VChild::Element(v)) => v,
        Some(VChild::Text(text)) => return idiff_text(dom, text, component_root),
        None => return idiff_text(dom, "", component_root),
    };

    let tag = match &vnode.name {
        NodeName::Component(kind) => {
            return lifecycle::build_component_from_vnode(
                dom, kind, vnode, context, mount_all, pass,
            );
        }
        NodeName::Tag(tag) => tag,
    };

    let prev_svg = pass.svg;
    pass.svg = match tag.as_str() {
        "svg" => true,
        "foreignObject" => false,
        _ => pass.svg,
    };

    let out = match dom {
        Some(d) if is_named_node(d, tag) => d,
        _ => {
            let created = dom::create_element_node(tag, pass.svg);
            dom::set_cached_name(created, tag);
            if let Some(d) = dom {
                // move existing children over, then take the old node's place
                for child in dom::child_nodes(d) {
                    dom::append_child(created, child);
                }
                if let Some(p) = dom::parent(d) {
                    dom::replace_child(p, created, d);
                }
                recollect_node_tree(d, true);
            }
            created
        }
    };

    let first = dom::first_child(out);
    let old_props = match dom::attr_cache(out) {
        Some(cache) => cache,
        None => {
            // first touch of a host-built node: seed the cache from its markup
            let seeded: Props = dom::attributes(out)
                .into_iter()
                .map(|(name, value)| (name, Value::Str(value)))
                .collect();
            dom::set_attr_cache(out, seeded.clone());
            seeded
        }
    };

    let vchildren = &vnode.children;
    let sole_text = !pass.hydrating
        && vchildren.len() == 1
        && matches!(vchildren[0], VChild::Text(_))
        && first.is_some_and(dom::is_text)
        && first.and_then(dom::next_sibling).is_none();
    if sole_text {
        if let (Some(first), VChild::Text(text)) = (first, &vchildren[0]) {
            dom::set_text(first, text);
        }
    } else if !vchildren.is_empty() || first.is_some() {
        let keep_raw = pass.hydrating || old_props.contains("dangerouslySetInnerHTML");
        inner_diff_node(out, vchildren, context, mount_all, keep_raw, pass);
    }

    attributes::diff_attributes(out, vnode.attributes.as_ref(), pass.svg);

    pass.svg = prev_svg;
    out
}

/// Text reconciliation: edit a reusable text node in place, otherwise mint
/// a fresh one and take the old node's position.
fn idiff_text(dom: Option<NodeId>, text: &str, component_root: bool) -> NodeId {
    if let Some(d) = dom {
        let reusable = dom::is_text(d)
            && dom::parent(d).is_some()
            && (dom::component(d).is_none() || component_root);
        if reusable {
            dom::set_text(d, text);
            dom::mark_diffed(d);
            return d;
        }
    }
    let out = dom::create_text_node(text);
    dom::mark_diffed(out);
    if let Some(d) = dom {
        if let Some(p) = dom::parent(d) {
            dom::replace_child(p, out, d);
        }
        recollect_node_tree(d, true);
    }
    out
}

// =============================================================================
// Child Reconciliation
// =============================================================================

/// Reconcile the ordered child list of `parent` against `vchildren`.
///
/// Existing children are split into a keyed map and an unkeyed pool; each
/// descriptor claims its keyed match or the first type-compatible unkeyed
/// node, diffs into it, and is moved to its index. Unclaimed leftovers are
/// collected at the end.
fn inner_diff_node(
    parent: NodeId,
    vchildren: &[VChild],
    context: &Props,
    mount_all: bool,
    is_hydrating: bool,
    pass: &mut RenderPass,
) {
    let original = dom::child_nodes(parent);
    let mut keyed: HashMap<Key, NodeId> = HashMap::new();
    let mut children: Vec<Option<NodeId>> = Vec::new();

    for &child in &original {
        let cache = dom::attr_cache(child);
        let key = if !vchildren.is_empty() && cache.is_some() {
            match dom::component(child) {
                Some(instance) => instance.borrow().key().cloned(),
                None => cache.as_ref().and_then(Props::key),
            }
        } else {
            None
        };
        if let Some(key) = key {
            keyed.insert(key, child);
        } else {
            // unmanaged nodes only participate while hydrating; whitespace
            // text runs are skipped even then
            let admit = cache.is_some()
                || if dom::is_text(child) {
                    !is_hydrating
                        || dom::text_value(child).is_some_and(|t| !t.trim().is_empty())
                } else {
                    is_hydrating
                };
            if admit {
                children.push(Some(child));
            }
        }
    }

    let mut children_len = children.len();
    let mut min = 0usize;

    for (i, vchild) in vchildren.iter().enumerate() {
        let mut matched: Option<NodeId> = None;
        if let Some(key) = vchild.key() {
            if let Some(node) = keyed.remove(key) {
                matched = Some(node);
            }
        } else if min < children_len {
            for j in min..children_len {
                if let Some(c) = children[j] {
                    if is_same_node_type(c, vchild, is_hydrating) {
                        matched = Some(c);
                        children[j] = None;
                        if j == children_len - 1 {
                            children_len -= 1;
                        }
                        if j == min {
                            min += 1;
                        }
                        break;
                    }
                }
            }
        }

        let child = idiff(matched, Some(vchild), context, mount_all, false, pass);

        // the child list is live: read the node currently holding index i
        let at_index = dom::child_at(parent, i);
        if child != parent && Some(child) != at_index {
            match at_index {
                None => dom::append_child(parent, child),
                Some(displaced) => {
                    if Some(child) == dom::next_sibling(displaced) {
                        dom::remove(displaced);
                    } else {
                        dom::insert_before(parent, child, displaced);
                    }
                }
            }
        }
    }

    // unclaimed leftovers are gone from the new tree
    for (_, node) in keyed {
        recollect_node_tree(node, false);
    }
    for node in children.into_iter().flatten() {
        recollect_node_tree(node, false);
    }
}

// =============================================================================
// Teardown
// =============================================================================

/// Release a node and its subtree: component-owned nodes unmount through
/// their instance; plain nodes fire their element ref and are detached
/// (unless `unmount_only`), then their children are released in turn.
pub(crate) fn recollect_node_tree(node: NodeId, unmount_only: bool) {
    match dom::component(node) {
        Some(instance) => lifecycle::unmount_component(&instance),
        None => {
            let cache = dom::attr_cache(node);
            if let Some(cache) = &cache {
                if let Some(Value::Ref(cb)) = cache.get("ref") {
                    cb(RefTarget::Detached);
                }
            }
            if !unmount_only || cache.is_none() {
                dom::remove(node);
            }
            remove_children(node);
        }
    }
}

/// Release all children of `node`, last to first.
pub(crate) fn remove_children(node: NodeId) {
    for child in dom::child_nodes(node).into_iter().rev() {
        recollect_node_tree(child, true);
    }
}

/// Run pending mount hooks, innermost child first.
pub(crate) fn flush_mounts(pass: &mut RenderPass) {
    while let Some(instance) = pass.mounts.pop() {
        options::notify_after_mount(&instance);
        with_behavior(&instance, |c| c.did_mount());
    }
}

// =============================================================================
// Matching
// =============================================================================

/// Can `node` be edited in place into what `vchild` describes?
fn is_same_node_type(node: NodeId, vchild: &VChild, hydrating: bool) -> bool {
    match vchild {
        VChild::Text(_) => dom::is_text(node),
        VChild::Element(v) => match &v.name {
            NodeName::Tag(tag) => dom::component_type(node).is_none() && is_named_node(node, tag),
            NodeName::Component(kind) => {
                hydrating || dom::component_type(node).is_some_and(|t| t.same(kind))
            }
        },
    }
}

fn is_named_node(node: NodeId, tag: &str) -> bool {
    match dom::cached_name(node) {
        Some(name) => name == tag,
        None => dom::tag_name(node).is_some_and(|t| t.eq_ignore_ascii_case(tag)),
    }
}
