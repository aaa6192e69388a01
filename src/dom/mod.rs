//! Host live tree - the mutable render target.
//!
//! The reconciler converges this tree to match a descriptor tree. Nodes are
//! indices into a thread-local slab with a free-index pool for O(1) reuse,
//! and every piece of engine metadata (attribute cache, owning component,
//! cached tag name, event callbacks) lives out-of-band on the node record:
//! a side table keyed by [`NodeId`], never hidden fields on a host object.
//!
//! Every observable mutation (structure, text, attributes, properties,
//! style, listeners) bumps a counter readable via [`mutations`], which is
//! how "the second identical render touches nothing" is verified.

mod html;

pub use html::to_html;

use std::cell::{Cell, RefCell};
use std::fmt;

use indexmap::IndexMap;

use crate::component::{ComponentType, InstanceRef};
use crate::options;
use crate::types::{Event, EventHandler, Props, Value};

/// XLink namespace, the one namespaced-attribute case the engine special-cases.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

// =============================================================================
// Node Identity & Records
// =============================================================================

/// Opaque handle to a live node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

enum NodeKind {
    Element { tag: String, svg: bool },
    Text { value: String },
}

struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,

    // Markup surface
    attributes: IndexMap<String, String>,
    properties: IndexMap<String, Value>,
    style: IndexMap<String, String>,
    style_text: Option<String>,
    raw_html: Option<String>,

    // Event surface: proxy registrations and the actual callback cache.
    listeners: Vec<(String, bool)>,
    events: IndexMap<String, EventHandler>,

    // Engine metadata (the side table of the design notes)
    attr_cache: Option<Props>,
    component: Option<InstanceRef>,
    component_type: Option<ComponentType>,
    cached_name: Option<String>,
}

impl NodeRecord {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
            properties: IndexMap::new(),
            style: IndexMap::new(),
            style_text: None,
            raw_html: None,
            listeners: Vec::new(),
            events: IndexMap::new(),
            attr_cache: None,
            component: None,
            component_type: None,
            cached_name: None,
        }
    }
}

thread_local! {
    static NODES: RefCell<Vec<Option<NodeRecord>>> = RefCell::new(Vec::new());
    static FREE: RefCell<Vec<usize>> = RefCell::new(Vec::new());
    static MUTATIONS: Cell<u64> = const { Cell::new(0) };
}

fn bump() {
    MUTATIONS.with(|m| m.set(m.get() + 1));
}

fn with_node<R>(id: NodeId, f: impl FnOnce(&NodeRecord) -> R) -> Option<R> {
    NODES.with(|nodes| nodes.borrow().get(id.0).and_then(|n| n.as_ref()).map(f))
}

fn with_node_mut<R>(id: NodeId, f: impl FnOnce(&mut NodeRecord) -> R) -> Option<R> {
    NODES.with(|nodes| {
        nodes
            .borrow_mut()
            .get_mut(id.0)
            .and_then(|n| n.as_mut())
            .map(f)
    })
}

fn allocate(record: NodeRecord) -> NodeId {
    let index = FREE.with(|free| free.borrow_mut().pop());
    let index = match index {
        Some(i) => {
            NODES.with(|nodes| nodes.borrow_mut()[i] = Some(record));
            i
        }
        None => NODES.with(|nodes| {
            let mut nodes = nodes.borrow_mut();
            nodes.push(Some(record));
            nodes.len() - 1
        }),
    };
    bump();
    NodeId(index)
}

// =============================================================================
// Creation & Identity
// =============================================================================

/// Create an element node; `svg` selects the SVG namespace.
pub fn create_element_node(tag: &str, svg: bool) -> NodeId {
    allocate(NodeRecord::new(NodeKind::Element {
        tag: tag.to_string(),
        svg,
    }))
}

/// Create a text node.
pub fn create_text_node(value: &str) -> NodeId {
    allocate(NodeRecord::new(NodeKind::Text {
        value: value.to_string(),
    }))
}

pub fn exists(id: NodeId) -> bool {
    with_node(id, |_| ()).is_some()
}

pub fn is_text(id: NodeId) -> bool {
    with_node(id, |n| matches!(n.kind, NodeKind::Text { .. })).unwrap_or(false)
}

pub fn is_element(id: NodeId) -> bool {
    with_node(id, |n| matches!(n.kind, NodeKind::Element { .. })).unwrap_or(false)
}

pub fn is_svg(id: NodeId) -> bool {
    with_node(id, |n| matches!(n.kind, NodeKind::Element { svg: true, .. })).unwrap_or(false)
}

pub fn tag_name(id: NodeId) -> Option<String> {
    with_node(id, |n| match &n.kind {
        NodeKind::Element { tag, .. } => Some(tag.clone()),
        NodeKind::Text { .. } => None,
    })
    .flatten()
}

pub fn text_value(id: NodeId) -> Option<String> {
    with_node(id, |n| match &n.kind {
        NodeKind::Text { value } => Some(value.clone()),
        NodeKind::Element { .. } => None,
    })
    .flatten()
}

/// Update a text node's value. No-op (and no mutation) when unchanged.
pub fn set_text(id: NodeId, value: &str) {
    let changed = with_node_mut(id, |n| match &mut n.kind {
        NodeKind::Text { value: v } if v != value => {
            *v = value.to_string();
            true
        }
        _ => false,
    })
    .unwrap_or(false);
    if changed {
        bump();
    }
}

// =============================================================================
// Tree Structure
// =============================================================================

pub fn parent(id: NodeId) -> Option<NodeId> {
    with_node(id, |n| n.parent).flatten()
}

pub fn child_nodes(id: NodeId) -> Vec<NodeId> {
    with_node(id, |n| n.children.clone()).unwrap_or_default()
}

pub fn child_count(id: NodeId) -> usize {
    with_node(id, |n| n.children.len()).unwrap_or(0)
}

pub fn child_at(id: NodeId, index: usize) -> Option<NodeId> {
    with_node(id, |n| n.children.get(index).copied()).flatten()
}

pub fn first_child(id: NodeId) -> Option<NodeId> {
    with_node(id, |n| n.children.first().copied()).flatten()
}

pub fn last_child(id: NodeId) -> Option<NodeId> {
    with_node(id, |n| n.children.last().copied()).flatten()
}

pub fn next_sibling(id: NodeId) -> Option<NodeId> {
    let p = parent(id)?;
    with_node(p, |n| {
        let i = n.children.iter().position(|&c| c == id)?;
        n.children.get(i + 1).copied()
    })
    .flatten()
}

fn detach(id: NodeId) -> bool {
    let Some(p) = parent(id) else { return false };
    with_node_mut(p, |n| n.children.retain(|&c| c != id));
    with_node_mut(id, |n| n.parent = None);
    true
}

/// Detach `id` from its current parent, if any.
pub fn remove(id: NodeId) {
    if detach(id) {
        bump();
    }
}

/// Append `child` as the last child of `parent_id`, detaching it first.
pub fn append_child(parent_id: NodeId, child: NodeId) {
    if !exists(parent_id) || !exists(child) {
        return;
    }
    detach(child);
    with_node_mut(parent_id, |n| n.children.push(child));
    with_node_mut(child, |n| n.parent = Some(parent_id));
    bump();
}

/// Insert `child` immediately before `reference`. Appends when `reference`
/// is not a child of `parent_id`.
pub fn insert_before(parent_id: NodeId, child: NodeId, reference: NodeId) {
    if !exists(parent_id) || !exists(child) {
        return;
    }
    detach(child);
    let inserted = with_node_mut(parent_id, |n| {
        match n.children.iter().position(|&c| c == reference) {
            Some(i) => {
                n.children.insert(i, child);
                true
            }
            None => {
                n.children.push(child);
                true
            }
        }
    })
    .unwrap_or(false);
    if inserted {
        with_node_mut(child, |n| n.parent = Some(parent_id));
        bump();
    }
}

/// Replace `old` with `new` in `parent_id`'s child list.
pub fn replace_child(parent_id: NodeId, new: NodeId, old: NodeId) {
    if !exists(parent_id) || !exists(new) {
        return;
    }
    detach(new);
    let replaced = with_node_mut(parent_id, |n| {
        match n.children.iter().position(|&c| c == old) {
            Some(i) => {
                n.children[i] = new;
                true
            }
            None => false,
        }
    })
    .unwrap_or(false);
    if replaced {
        with_node_mut(old, |n| n.parent = None);
        with_node_mut(new, |n| n.parent = Some(parent_id));
        bump();
    }
}

// =============================================================================
// Attributes (markup surface)
// =============================================================================

pub fn set_attribute(id: NodeId, name: &str, value: &str) {
    let changed = with_node_mut(id, |n| {
        if n.attributes.get(name).map(String::as_str) == Some(value) {
            false
        } else {
            n.attributes.insert(name.to_string(), value.to_string());
            true
        }
    })
    .unwrap_or(false);
    if changed {
        bump();
    }
}

pub fn remove_attribute(id: NodeId, name: &str) {
    let changed =
        with_node_mut(id, |n| n.attributes.shift_remove(name).is_some()).unwrap_or(false);
    if changed {
        bump();
    }
}

/// Namespace-aware attribute write. Only the XLink namespace is mapped to a
/// prefixed name; other namespaces fall through to the plain name.
pub fn set_attribute_ns(id: NodeId, ns: &str, name: &str, value: &str) {
    if ns == XLINK_NS {
        set_attribute(id, &format!("xlink:{name}"), value);
    } else {
        set_attribute(id, name, value);
    }
}

pub fn remove_attribute_ns(id: NodeId, ns: &str, name: &str) {
    if ns == XLINK_NS {
        remove_attribute(id, &format!("xlink:{name}"));
    } else {
        remove_attribute(id, name);
    }
}

pub fn attribute(id: NodeId, name: &str) -> Option<String> {
    with_node(id, |n| n.attributes.get(name).cloned()).flatten()
}

/// Snapshot of the node's markup attributes in insertion order.
pub fn attributes(id: NodeId) -> Vec<(String, String)> {
    with_node(id, |n| {
        n.attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    })
    .unwrap_or_default()
}

// =============================================================================
// Live Properties
// =============================================================================

/// Error for a rejected live-property write. The attribute synchronizer
/// swallows these: property legality is host-dependent, not a render fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    NotAnElement,
    UnknownProperty,
    InvalidValue,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::NotAnElement => write!(f, "node is not an element"),
            PropertyError::UnknownProperty => write!(f, "property does not exist on this node"),
            PropertyError::InvalidValue => write!(f, "value cannot be written as a property"),
        }
    }
}

impl std::error::Error for PropertyError {}

/// Writable properties the host tree exposes directly on element nodes.
/// Everything else goes through the attribute surface.
const KNOWN_PROPERTIES: &[&str] = &[
    "id",
    "title",
    "lang",
    "dir",
    "hidden",
    "tabIndex",
    "name",
    "value",
    "checked",
    "selected",
    "disabled",
    "readOnly",
    "required",
    "multiple",
    "placeholder",
    "href",
    "src",
    "alt",
    "open",
    "muted",
    "loop",
    "autoplay",
    "controls",
    "draggable",
    "spellcheck",
    "contentEditable",
];

/// The `name in node` probe: does a direct property slot exist here?
pub fn has_property(id: NodeId, name: &str) -> bool {
    is_element(id) && KNOWN_PROPERTIES.contains(&name)
}

/// Write a live property. Callbacks and non-element targets are rejected.
///
/// Known properties are reflected: the write lands in the property store
/// AND in the markup attribute map (removed there when the value reads as
/// unset), so `attribute` and serialization observe property writes the way
/// `getAttribute` observes reflected IDL attributes.
pub fn set_property(id: NodeId, name: &str, value: Value) -> Result<(), PropertyError> {
    if !is_element(id) {
        return Err(PropertyError::NotAnElement);
    }
    if !KNOWN_PROPERTIES.contains(&name) {
        return Err(PropertyError::UnknownProperty);
    }
    if value.is_callback() {
        return Err(PropertyError::InvalidValue);
    }
    let changed = with_node_mut(id, |n| {
        if n.properties.get(name) == Some(&value) {
            false
        } else {
            if value.is_unset() {
                n.attributes.shift_remove(name);
            } else {
                n.attributes.insert(name.to_string(), value.to_attr_string());
            }
            n.properties.insert(name.to_string(), value);
            true
        }
    })
    .unwrap_or(false);
    if changed {
        bump();
    }
    Ok(())
}

/// Current live value of a property. This is what user interaction mutates
/// out from under the engine, so `value`/`checked` deltas compare against
/// this rather than the attribute cache.
pub fn property(id: NodeId, name: &str) -> Option<Value> {
    with_node(id, |n| n.properties.get(name).cloned()).flatten()
}

// =============================================================================
// Style
// =============================================================================

/// Replace the node's style text wholesale, clearing per-property state.
pub fn set_style_text(id: NodeId, css: &str) {
    let changed = with_node_mut(id, |n| {
        let next = if css.is_empty() { None } else { Some(css.to_string()) };
        if n.style_text == next && n.style.is_empty() {
            false
        } else {
            n.style.clear();
            n.style_text = next;
            true
        }
    })
    .unwrap_or(false);
    if changed {
        bump();
    }
}

pub fn set_style_property(id: NodeId, property: &str, value: &str) {
    let changed = with_node_mut(id, |n| {
        if n.style_text.is_none() && n.style.get(property).map(String::as_str) == Some(value) {
            false
        } else {
            n.style_text = None;
            n.style.insert(property.to_string(), value.to_string());
            true
        }
    })
    .unwrap_or(false);
    if changed {
        bump();
    }
}

pub fn remove_style_property(id: NodeId, property: &str) {
    let changed =
        with_node_mut(id, |n| n.style.shift_remove(property).is_some()).unwrap_or(false);
    if changed {
        bump();
    }
}

pub fn style_property(id: NodeId, property: &str) -> Option<String> {
    with_node(id, |n| n.style.get(property).cloned()).flatten()
}

/// Render the node's current style as CSS text.
pub fn style_text(id: NodeId) -> String {
    with_node(id, |n| {
        if let Some(text) = &n.style_text {
            return text.clone();
        }
        let mut out = String::new();
        for (k, v) in &n.style {
            if !out.is_empty() {
                out.push_str("; ");
            }
            out.push_str(k);
            out.push_str(": ");
            out.push_str(v);
        }
        out
    })
    .unwrap_or_default()
}

// =============================================================================
// Raw Markup Injection
// =============================================================================

/// Replace the node's entire content with a raw markup string.
pub fn set_raw_html(id: NodeId, markup: &str) {
    let changed = with_node_mut(id, |n| {
        if n.raw_html.as_deref() == Some(markup) {
            false
        } else {
            n.children.clear();
            n.raw_html = Some(markup.to_string());
            true
        }
    })
    .unwrap_or(false);
    if changed {
        bump();
    }
}

pub fn raw_html(id: NodeId) -> Option<String> {
    with_node(id, |n| n.raw_html.clone()).flatten()
}

// =============================================================================
// Events
// =============================================================================

/// Register the shared dispatch proxy for an event type/phase. The user
/// callback is NOT registered here; it lives in the callback cache, so
/// swapping callbacks never touches the registration.
pub fn add_listener(id: NodeId, kind: &str, capture: bool) {
    let added = with_node_mut(id, |n| {
        let entry = (kind.to_string(), capture);
        if n.listeners.contains(&entry) {
            false
        } else {
            n.listeners.push(entry);
            true
        }
    })
    .unwrap_or(false);
    if added {
        bump();
    }
}

pub fn remove_listener(id: NodeId, kind: &str, capture: bool) {
    let removed = with_node_mut(id, |n| {
        let before = n.listeners.len();
        n.listeners.retain(|(k, c)| !(k == kind && *c == capture));
        n.listeners.len() != before
    })
    .unwrap_or(false);
    if removed {
        bump();
    }
}

/// Number of proxy registrations on the node (all event types, both phases).
pub fn listener_count(id: NodeId) -> usize {
    with_node(id, |n| n.listeners.len()).unwrap_or(0)
}

pub fn set_event_callback(id: NodeId, kind: &str, handler: EventHandler) {
    with_node_mut(id, |n| {
        n.events.insert(kind.to_string(), handler);
    });
}

pub fn remove_event_callback(id: NodeId, kind: &str) {
    with_node_mut(id, |n| {
        n.events.shift_remove(kind);
    });
}

/// Dispatch an event: if a proxy is registered for its type on the target,
/// run the event through the global interceptor and invoke the cached
/// callback. Returns whether a handler ran.
pub fn emit(event: Event) -> bool {
    let Some(target) = event.target else {
        return false;
    };
    let registered = with_node(target, |n| {
        n.listeners.iter().any(|(k, _)| k == &event.kind)
    })
    .unwrap_or(false);
    if !registered {
        return false;
    }
    let event = options::intercept_event(event);
    let handler = with_node(target, |n| n.events.get(&event.kind).cloned()).flatten();
    match handler {
        Some(handler) => {
            handler(&event);
            true
        }
        None => false,
    }
}

// =============================================================================
// Engine Metadata (side table)
// =============================================================================

/// Last-applied attribute cache. `None` means the node has never been
/// through a diff, which is the hydration signal.
pub fn attr_cache(id: NodeId) -> Option<Props> {
    with_node(id, |n| n.attr_cache.clone()).flatten()
}

pub(crate) fn set_attr_cache(id: NodeId, cache: Props) {
    with_node_mut(id, |n| n.attr_cache = Some(cache));
}

/// Stamp an empty cache if none exists: marks text nodes as "has been
/// diffed" without giving them real attributes.
pub(crate) fn mark_diffed(id: NodeId) {
    with_node_mut(id, |n| {
        if n.attr_cache.is_none() {
            n.attr_cache = Some(Props::new());
        }
    });
}

pub fn component(id: NodeId) -> Option<InstanceRef> {
    with_node(id, |n| n.component.clone()).flatten()
}

pub(crate) fn set_component(id: NodeId, instance: Option<InstanceRef>) {
    with_node_mut(id, |n| n.component = instance);
}

pub fn component_type(id: NodeId) -> Option<ComponentType> {
    with_node(id, |n| n.component_type.clone()).flatten()
}

pub(crate) fn set_component_type(id: NodeId, kind: Option<ComponentType>) {
    with_node_mut(id, |n| n.component_type = kind);
}

/// Tag-name cache for namespace-insensitive matching of engine-created nodes.
pub(crate) fn cached_name(id: NodeId) -> Option<String> {
    with_node(id, |n| n.cached_name.clone()).flatten()
}

pub(crate) fn set_cached_name(id: NodeId, name: &str) {
    with_node_mut(id, |n| n.cached_name = Some(name.to_string()));
}

// =============================================================================
// Accounting & Reset
// =============================================================================

/// Total count of observable mutations since the arena was last reset.
pub fn mutations() -> u64 {
    MUTATIONS.with(|m| m.get())
}

/// Free a detached node and all of its descendants, returning their slots
/// to the pool. The reconciler itself never frees: detached subtrees may be
/// resurrected through the recycle pool, so reclamation is the host's call.
pub fn free_subtree(id: NodeId) {
    let children = child_nodes(id);
    for child in children {
        free_subtree(child);
    }
    detach(id);
    let existed = NODES.with(|nodes| {
        let mut nodes = nodes.borrow_mut();
        match nodes.get_mut(id.0) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    });
    if existed {
        FREE.with(|free| free.borrow_mut().push(id.0));
    }
}

/// Drop every node and reset the mutation counter (for testing).
pub fn reset_arena() {
    NODES.with(|nodes| nodes.borrow_mut().clear());
    FREE.with(|free| free.borrow_mut().clear());
    MUTATIONS.with(|m| m.set(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn tree_structure_ops() {
        reset_arena();
        let root = create_element_node("div", false);
        let a = create_element_node("span", false);
        let b = create_text_node("x");
        let c = create_element_node("em", false);

        append_child(root, a);
        append_child(root, b);
        insert_before(root, c, b);
        assert_eq!(child_nodes(root), vec![a, c, b]);
        assert_eq!(next_sibling(a), Some(c));
        assert_eq!(parent(b), Some(root));

        let d = create_element_node("i", false);
        replace_child(root, d, c);
        assert_eq!(child_nodes(root), vec![a, d, b]);
        assert_eq!(parent(c), None);

        remove(a);
        assert_eq!(child_nodes(root), vec![d, b]);
        assert_eq!(parent(a), None);
    }

    #[test]
    fn reappending_moves_rather_than_duplicates() {
        reset_arena();
        let root = create_element_node("div", false);
        let other = create_element_node("div", false);
        let n = create_element_node("span", false);
        append_child(root, n);
        append_child(other, n);
        assert_eq!(child_nodes(root), vec![]);
        assert_eq!(child_nodes(other), vec![n]);
    }

    #[test]
    fn attribute_writes_are_change_detected() {
        reset_arena();
        let n = create_element_node("div", false);
        let before = mutations();
        set_attribute(n, "id", "a");
        assert_eq!(mutations(), before + 1);
        set_attribute(n, "id", "a");
        assert_eq!(mutations(), before + 1);
        remove_attribute(n, "id");
        assert_eq!(mutations(), before + 2);
        remove_attribute(n, "id");
        assert_eq!(mutations(), before + 2);
    }

    #[test]
    fn xlink_attributes_are_prefixed() {
        reset_arena();
        let n = create_element_node("use", true);
        set_attribute_ns(n, XLINK_NS, "href", "#icon");
        assert_eq!(attribute(n, "xlink:href"), Some("#icon".to_string()));
        remove_attribute_ns(n, XLINK_NS, "href");
        assert_eq!(attribute(n, "xlink:href"), None);
    }

    #[test]
    fn property_writes_validate() {
        reset_arena();
        let n = create_element_node("input", false);
        let t = create_text_node("x");
        assert!(set_property(n, "value", Value::from("abc")).is_ok());
        assert_eq!(property(n, "value"), Some(Value::from("abc")));
        assert_eq!(
            set_property(t, "value", Value::from("abc")),
            Err(PropertyError::NotAnElement)
        );
        assert_eq!(
            set_property(n, "bogus", Value::from("abc")),
            Err(PropertyError::UnknownProperty)
        );
    }

    #[test]
    fn property_writes_reflect_into_markup() {
        reset_arena();
        let n = create_element_node("div", false);
        assert!(set_property(n, "id", Value::from("app")).is_ok());
        assert_eq!(attribute(n, "id"), Some("app".to_string()));
        assert_eq!(to_html(n), "<div id=\"app\"></div>");

        assert!(set_property(n, "id", Value::from("other")).is_ok());
        assert_eq!(attribute(n, "id"), Some("other".to_string()));

        // unset values strip the reflected attribute
        assert!(set_property(n, "id", Value::Null).is_ok());
        assert_eq!(attribute(n, "id"), None);
        assert_eq!(to_html(n), "<div></div>");
    }

    #[test]
    fn emit_routes_through_callback_cache() {
        reset_arena();
        let n = create_element_node("button", false);
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        add_listener(n, "click", false);
        set_event_callback(n, "click", Rc::new(move |_| hits2.set(hits2.get() + 1)));
        assert!(emit(Event::new("click", n)));
        assert_eq!(hits.get(), 1);
        assert!(!emit(Event::new("keydown", n)));
    }

    #[test]
    fn free_subtree_recycles_slots() {
        reset_arena();
        let root = create_element_node("div", false);
        let child = create_element_node("span", false);
        append_child(root, child);
        free_subtree(root);
        assert!(!exists(root));
        assert!(!exists(child));
        // freed slots are reused
        let again = create_element_node("p", false);
        assert!(exists(again));
    }

    #[test]
    fn style_text_replaces_map_wholesale() {
        reset_arena();
        let n = create_element_node("div", false);
        set_style_property(n, "color", "red");
        assert_eq!(style_property(n, "color"), Some("red".to_string()));
        set_style_text(n, "background: blue");
        assert_eq!(style_property(n, "color"), None);
        assert_eq!(style_text(n), "background: blue");
    }
}
