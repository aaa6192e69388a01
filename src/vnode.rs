//! Element descriptors.
//!
//! A [`VNode`] is an immutable value describing one desired UI node: a tag
//! name or component reference, optional attributes, and ordered children.
//! Descriptors are built fresh on every render and never mutated afterwards;
//! the reconciler consumes them read-only.

use crate::component::ComponentType;
use crate::options;
use crate::types::{Key, Props};

// =============================================================================
// Node Name - Tag or Component Reference
// =============================================================================

/// What a descriptor renders as: a markup tag or a component constructor.
///
/// The variant is decided at construction time; the reconciler never
/// inspects anything beyond this tag to pick a branch.
#[derive(Clone)]
pub enum NodeName {
    Tag(String),
    Component(ComponentType),
}

impl NodeName {
    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeName::Tag(t) => Some(t),
            NodeName::Component(_) => None,
        }
    }

    pub fn component(&self) -> Option<&ComponentType> {
        match self {
            NodeName::Component(c) => Some(c),
            NodeName::Tag(_) => None,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, NodeName::Component(_))
    }
}

impl PartialEq for NodeName {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeName::Tag(a), NodeName::Tag(b)) => a == b,
            (NodeName::Component(a), NodeName::Component(b)) => a.same(b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeName::Tag(t) => write!(f, "Tag({t:?})"),
            NodeName::Component(c) => write!(f, "Component({})", c.name()),
        }
    }
}

impl From<&str> for NodeName {
    fn from(value: &str) -> Self {
        NodeName::Tag(value.to_string())
    }
}

impl From<String> for NodeName {
    fn from(value: String) -> Self {
        NodeName::Tag(value)
    }
}

impl From<ComponentType> for NodeName {
    fn from(value: ComponentType) -> Self {
        NodeName::Component(value)
    }
}

impl From<&ComponentType> for NodeName {
    fn from(value: &ComponentType) -> Self {
        NodeName::Component(value.clone())
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// A descriptor child: either a nested descriptor or a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum VChild {
    Element(VNode),
    Text(String),
}

impl VChild {
    /// The declared key, for keyed sibling matching. Text runs are unkeyed.
    pub fn key(&self) -> Option<&Key> {
        match self {
            VChild::Element(v) => v.key.as_ref(),
            VChild::Text(_) => None,
        }
    }
}

/// Immutable element descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
    pub name: NodeName,
    pub children: Vec<VChild>,
    pub attributes: Option<Props>,
    /// Mirror of `attributes["key"]`, extracted at construction.
    pub key: Option<Key>,
}

// =============================================================================
// createElement
// =============================================================================

/// Input union accepted as a child argument by [`create_element`].
///
/// Nested lists are flattened; empties and booleans are stripped; numbers
/// are rendered as text.
#[derive(Debug, Clone)]
pub enum ChildArg {
    Empty,
    Bool(bool),
    Text(String),
    Node(VNode),
    List(Vec<ChildArg>),
}

impl From<&str> for ChildArg {
    fn from(value: &str) -> Self {
        ChildArg::Text(value.to_string())
    }
}

impl From<String> for ChildArg {
    fn from(value: String) -> Self {
        ChildArg::Text(value)
    }
}

impl From<i64> for ChildArg {
    fn from(value: i64) -> Self {
        ChildArg::Text(value.to_string())
    }
}

impl From<i32> for ChildArg {
    fn from(value: i32) -> Self {
        ChildArg::Text(value.to_string())
    }
}

impl From<f64> for ChildArg {
    fn from(value: f64) -> Self {
        ChildArg::Text(value.to_string())
    }
}

impl From<bool> for ChildArg {
    fn from(value: bool) -> Self {
        ChildArg::Bool(value)
    }
}

impl From<VNode> for ChildArg {
    fn from(value: VNode) -> Self {
        ChildArg::Node(value)
    }
}

impl From<Vec<ChildArg>> for ChildArg {
    fn from(value: Vec<ChildArg>) -> Self {
        ChildArg::List(value)
    }
}

impl From<Option<VNode>> for ChildArg {
    fn from(value: Option<VNode>) -> Self {
        match value {
            Some(v) => ChildArg::Node(v),
            None => ChildArg::Empty,
        }
    }
}

/// Build an element descriptor.
///
/// Child arguments are flattened with an explicit work stack; boolean and
/// empty children are stripped, and when the target is a plain tag adjacent
/// text runs (including stringified numbers) are merged into one. The
/// configured element-created observer is invoked on the result.
pub fn create_element(
    name: impl Into<NodeName>,
    attributes: Option<Props>,
    children: impl IntoIterator<Item = ChildArg>,
) -> VNode {
    let name = name.into();
    let simple_target = !name.is_component();

    let mut stack: Vec<ChildArg> = children.into_iter().collect();
    stack.reverse();

    let mut out: Vec<VChild> = Vec::new();
    let mut last_text = false;
    while let Some(child) = stack.pop() {
        match child {
            ChildArg::List(items) => {
                for item in items.into_iter().rev() {
                    stack.push(item);
                }
            }
            ChildArg::Empty | ChildArg::Bool(_) => {}
            ChildArg::Text(text) => {
                if simple_target && last_text {
                    if let Some(VChild::Text(prev)) = out.last_mut() {
                        prev.push_str(&text);
                        continue;
                    }
                }
                out.push(VChild::Text(text));
                last_text = true;
            }
            ChildArg::Node(node) => {
                out.push(VChild::Element(node));
                last_text = false;
            }
        }
    }

    let key = attributes.as_ref().and_then(Props::key);
    let vnode = VNode {
        name,
        children: out,
        attributes,
        key,
    };
    options::notify_element_created(&vnode);
    vnode
}

/// Shallow-merge override attributes onto a descriptor; replace its children
/// if any override children are given.
pub fn clone_element(
    element: &VNode,
    attributes: Option<Props>,
    children: Vec<ChildArg>,
) -> VNode {
    let merged = match (&element.attributes, attributes) {
        (Some(base), Some(over)) => Some(base.merged(over)),
        (Some(base), None) => Some(base.clone()),
        (None, over) => over,
    };
    let children = if children.is_empty() {
        element
            .children
            .iter()
            .cloned()
            .map(|c| match c {
                VChild::Element(v) => ChildArg::Node(v),
                VChild::Text(t) => ChildArg::Text(t),
            })
            .collect()
    } else {
        children
    };
    create_element(element.name.clone(), merged, children)
}
