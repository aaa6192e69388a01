//! Core value types for sprig-dom.
//!
//! These types define the vocabulary that flows through the engine: attribute
//! values, ordered prop maps, stable child keys, event payloads and the
//! callback types shared between descriptors and live nodes.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::component::InstanceRef;
use crate::dom::NodeId;
use crate::vnode::VChild;

// =============================================================================
// Key
// =============================================================================

/// Stable identity hint for reconciling siblings.
///
/// Keys are declared through the `key` attribute and let the reconciler
/// match a live node to its descriptor across reorders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Int(i64),
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

// =============================================================================
// Callback Types
// =============================================================================

/// Event callback type (Rc for shared ownership in closures).
///
/// Using Rc<dyn Fn> instead of Box<dyn Fn> allows cloning callbacks into
/// closures without ownership issues, and gives the attribute synchronizer
/// pointer identity for change detection.
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// Target handed to a ref callback.
///
/// Element refs receive the live node, component refs receive the instance.
/// `Detached` is fired when the previously referenced target is torn down.
#[derive(Clone)]
pub enum RefTarget {
    Node(NodeId),
    Component(InstanceRef),
    Detached,
}

impl RefTarget {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            RefTarget::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, RefTarget::Detached)
    }
}

/// Ref callback, invoked when a node or component instance is (un)attached.
pub type RefCallback = Rc<dyn Fn(RefTarget)>;

// =============================================================================
// Events
// =============================================================================

/// An event routed through the live tree's dispatch proxy.
///
/// The engine does not interpret events itself: hosts construct them and
/// `dom::emit` routes them to whatever handler the attribute synchronizer
/// registered for the event type.
#[derive(Clone)]
pub struct Event {
    /// Lower-cased event type, e.g. `"click"` or `"input"`.
    pub kind: String,
    /// Node the event is dispatched on.
    pub target: Option<NodeId>,
    /// Host-defined payload (an input's value, a key name, ...).
    pub payload: Value,
}

impl Event {
    pub fn new(kind: &str, target: NodeId) -> Self {
        Self {
            kind: kind.to_string(),
            target: Some(target),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }
}

// =============================================================================
// Style Values
// =============================================================================

/// Style attribute payload: either precomputed CSS text or a property map.
///
/// Map mode is reconciled property-by-property; text mode replaces the
/// node's style text wholesale.
#[derive(Clone, PartialEq)]
pub enum StyleValue {
    Css(String),
    Map(IndexMap<String, Value>),
}

impl StyleValue {
    pub fn map() -> Self {
        StyleValue::Map(IndexMap::new())
    }

    pub fn with(self, property: &str, value: impl Into<Value>) -> Self {
        match self {
            StyleValue::Map(mut m) => {
                m.insert(property.to_string(), value.into());
                StyleValue::Map(m)
            }
            css => css,
        }
    }
}

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Css(s) => write!(f, "Css({s:?})"),
            StyleValue::Map(m) => f.debug_map().entries(m.iter()).finish(),
        }
    }
}

// =============================================================================
// Value - Attribute/Property Union
// =============================================================================

/// Closed union of everything an attribute or prop can hold.
///
/// Callbacks compare by `Rc` pointer identity: swapping in a new closure is
/// a change, re-passing the same `Rc` is not.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Style(StyleValue),
    Handler(EventHandler),
    Ref(RefCallback),
    /// Raw markup payload for the HTML-injection attribute.
    Html(String),
    /// Descriptor children forwarded to a component as a prop.
    Children(Vec<VChild>),
}

impl Value {
    /// True for `Null` and `Bool(false)`: values the synchronizer treats as
    /// "remove this attribute".
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Value::Handler(_) | Value::Ref(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Markup rendition used by `setAttribute`-style writes.
    pub fn to_attr_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::Html(s) => s.clone(),
            Value::Style(StyleValue::Css(s)) => s.clone(),
            Value::Style(StyleValue::Map(m)) => {
                let mut out = String::new();
                for (k, v) in m {
                    if !out.is_empty() {
                        out.push_str("; ");
                    }
                    out.push_str(k);
                    out.push_str(": ");
                    out.push_str(&v.to_attr_string());
                }
                out
            }
            Value::Handler(_) | Value::Ref(_) => String::new(),
            Value::Children(_) => String::new(),
        }
    }

    /// Key rendition of a value, for the `key` pseudo-attribute.
    pub fn to_key(&self) -> Option<Key> {
        match self {
            Value::Str(s) => Some(Key::Str(s.clone())),
            Value::Int(n) => Some(Key::Int(*n)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Html(a), Value::Html(b)) => a == b,
            (Value::Style(a), Value::Style(b)) => a == b,
            (Value::Handler(a), Value::Handler(b)) => Rc::ptr_eq(a, b),
            (Value::Ref(a), Value::Ref(b)) => Rc::ptr_eq(a, b),
            (Value::Children(a), Value::Children(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Style(s) => write!(f, "Style({s:?})"),
            Value::Handler(_) => write!(f, "Handler(..)"),
            Value::Ref(_) => write!(f, "Ref(..)"),
            Value::Html(s) => write!(f, "Html({s:?})"),
            Value::Children(c) => write!(f, "Children({} entries)", c.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<StyleValue> for Value {
    fn from(value: StyleValue) -> Self {
        Value::Style(value)
    }
}

impl From<EventHandler> for Value {
    fn from(value: EventHandler) -> Self {
        Value::Handler(value)
    }
}

// =============================================================================
// Props - Ordered Attribute Map
// =============================================================================

/// Insertion-ordered string → [`Value`] map.
///
/// Used for descriptor attributes, component props/state/context and the
/// per-node attribute cache. Order is preserved so attribute application and
/// serialization are deterministic.
#[derive(Clone, Default, PartialEq)]
pub struct Props(IndexMap<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert, mainly for constructing descriptor attributes.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.to_string(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow merge: every entry of `other` overwrites the same key here.
    pub fn merge(&mut self, other: Props) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }

    /// Non-destructive shallow merge, used for child-context layering.
    pub fn merged(&self, other: Props) -> Props {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Read the `key` attribute as a [`Key`], if one is declared.
    pub fn key(&self) -> Option<Key> {
        self.0.get("key").and_then(Value::to_key)
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl FromIterator<(String, Value)> for Props {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Props(iter.into_iter().collect())
    }
}

// =============================================================================
// Render Modes
// =============================================================================

/// How a prop/state change should be turned into a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Commit props without rendering; the caller drives the render itself.
    No,
    /// Render synchronously, immediately.
    Sync,
    /// Render synchronously and skip the should-update predicate.
    Force,
    /// Enqueue on the render scheduler for the next batched flush.
    Async,
}
