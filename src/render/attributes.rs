//! Attribute/property synchronizer.
//!
//! Applies the delta between a node's last-applied attribute cache and a
//! descriptor's attribute map: stale keys are removed first, then every
//! changed key is written through [`set_accessor`], which picks the right
//! surface per attribute (class, style, refs, events, live properties,
//! namespaced markup attributes). The cache is updated in place and stored
//! back on the node.

use crate::dom::{self, NodeId, XLINK_NS};
use crate::types::{Props, RefTarget, StyleValue, Value};

/// Reconcile `attrs` against the node's attribute cache.
///
/// `value` and `checked` are compared against the node's current live
/// property, not the cache: user interaction can change them out from under
/// the engine, and the cache would report a stale match.
pub(crate) fn diff_attributes(node: NodeId, attrs: Option<&Props>, svg: bool) {
    let mut old = dom::attr_cache(node).unwrap_or_default();

    // remove attributes no longer present (or now null) on the descriptor
    let stale: Vec<String> = old
        .iter()
        .filter(|(name, cached)| {
            let incoming = attrs
                .and_then(|a| a.get(name))
                .map(|v| !matches!(v, Value::Null))
                .unwrap_or(false);
            !incoming && !matches!(cached, Value::Null)
        })
        .map(|(name, _)| name.clone())
        .collect();
    for name in stale {
        let prev = old.remove(&name);
        set_accessor(node, &name, prev, None, svg);
    }

    // add new and update changed attributes
    if let Some(attrs) = attrs {
        for (name, value) in attrs.iter() {
            if name == "children" || name == "innerHTML" {
                continue;
            }
            let in_old = old.contains(name);
            let differs = if name == "value" || name == "checked" {
                dom::property(node, name).as_ref() != Some(value)
            } else {
                old.get(name) != Some(value)
            };
            if !in_old || differs {
                let prev = old.insert(name, value.clone());
                set_accessor(node, name, prev, Some(value), svg);
            }
        }
    }

    dom::set_attr_cache(node, old);
}

/// Write one attribute to the node, dispatching on its name.
pub(crate) fn set_accessor(
    node: NodeId,
    name: &str,
    old: Option<Value>,
    value: Option<&Value>,
    svg: bool,
) {
    let name = if name == "className" { "class" } else { name };

    if name == "key" {
        // inert: keys steer reconciliation, they never touch the node
    } else if name == "ref" {
        if let Some(Value::Ref(cb)) = &old {
            cb(RefTarget::Detached);
        }
        if let Some(Value::Ref(cb)) = value {
            cb(RefTarget::Node(node));
        }
    } else if name == "class" && !svg {
        let class = value
            .filter(|v| !v.is_unset())
            .map(Value::to_attr_string)
            .unwrap_or_default();
        dom::set_attribute(node, "class", &class);
    } else if name == "style" {
        apply_style(node, &old, value);
    } else if name == "dangerouslySetInnerHTML" {
        match value {
            Some(Value::Html(markup)) => dom::set_raw_html(node, markup),
            Some(Value::Str(markup)) => dom::set_raw_html(node, markup),
            _ => {}
        }
    } else if name.len() > 2 && name.starts_with("on") {
        apply_event(node, name, &old, value);
    } else if name != "list" && name != "type" && !svg && dom::has_property(node, name) {
        // direct property slot: write it, swallowing host rejection, and
        // strip the markup attribute when the value reads as unset
        let prop_value = match value {
            Some(v) if !matches!(v, Value::Null) => v.clone(),
            _ => Value::Str(String::new()),
        };
        let _ = dom::set_property(node, name, prop_value);
        if value.is_none_or(Value::is_unset) {
            dom::remove_attribute(node, name);
        }
    } else {
        let xlink = svg && name.starts_with("xlink");
        let local = name
            .strip_prefix("xlink:")
            .or_else(|| name.strip_prefix("xlink"))
            .unwrap_or(name)
            .to_ascii_lowercase();
        match value {
            None => remove_markup_attr(node, name, &local, xlink),
            Some(v) if v.is_unset() => remove_markup_attr(node, name, &local, xlink),
            Some(v) if v.is_callback() => {
                // function values are never written as plain attributes
            }
            Some(v) => {
                if xlink {
                    dom::set_attribute_ns(node, XLINK_NS, &local, &v.to_attr_string());
                } else {
                    dom::set_attribute(node, name, &v.to_attr_string());
                }
            }
        }
    }
}

fn remove_markup_attr(node: NodeId, name: &str, local: &str, xlink: bool) {
    if xlink {
        dom::remove_attribute_ns(node, XLINK_NS, local);
    } else {
        dom::remove_attribute(node, name);
    }
}

// =============================================================================
// Style
// =============================================================================

fn apply_style(node: NodeId, old: &Option<Value>, value: Option<&Value>) {
    let old_was_text = matches!(
        old,
        Some(Value::Str(_)) | Some(Value::Style(StyleValue::Css(_)))
    );
    match value {
        Some(Value::Str(css)) => dom::set_style_text(node, css),
        Some(Value::Style(StyleValue::Css(css))) => dom::set_style_text(node, css),
        Some(Value::Style(StyleValue::Map(map))) => {
            if old_was_text {
                dom::set_style_text(node, "");
            } else if let Some(Value::Style(StyleValue::Map(old_map))) = old {
                for property in old_map.keys() {
                    if !map.contains_key(property) {
                        dom::remove_style_property(node, property);
                    }
                }
            }
            for (property, v) in map {
                dom::set_style_property(node, property, &style_property_string(property, v));
            }
        }
        _ => dom::set_style_text(node, ""),
    }
}

/// Bare numeric style values get a pixel unit, unless the property is one
/// of the documented non-dimensional ones.
fn style_property_string(property: &str, value: &Value) -> String {
    match value {
        Value::Int(_) | Value::Float(_) if !is_non_dimensional(property) => {
            format!("{}px", value.to_attr_string())
        }
        other => other.to_attr_string(),
    }
}

/// Equivalent of the classic non-dimensional-property pattern
/// `acit|ex(s|g|n|p|$)|rph|ows|mnc|ntw|ine[ch]|zoo|^ord`, hand-rolled so no
/// regex engine is needed. Matches e.g. opacity, flex*, order, lineHeight,
/// columnCount, fontWeight, zoom, widows, orphans.
fn is_non_dimensional(property: &str) -> bool {
    let p = property.to_ascii_lowercase();
    if p.starts_with("ord")
        || p.contains("acit")
        || p.contains("rph")
        || p.contains("ows")
        || p.contains("mnc")
        || p.contains("ntw")
        || p.contains("inec")
        || p.contains("ineh")
        || p.contains("zoo")
    {
        return true;
    }
    // "ex" followed by s, g, n, p, or end of the name
    let bytes = p.as_bytes();
    let mut start = 0;
    while let Some(i) = p[start..].find("ex") {
        let after = start + i + 2;
        match bytes.get(after) {
            None => return true,
            Some(b's') | Some(b'g') | Some(b'n') | Some(b'p') => return true,
            _ => start += i + 1,
        }
    }
    false
}

// =============================================================================
// Events
// =============================================================================

fn apply_event(node: NodeId, name: &str, old: &Option<Value>, value: Option<&Value>) {
    let (base, capture) = match name.strip_suffix("Capture") {
        Some(stripped) => (stripped, true),
        None => (name, false),
    };
    let kind = base[2..].to_ascii_lowercase();
    match value {
        Some(Value::Handler(handler)) => {
            // only the shared proxy is registered, and only once; swapping
            // the callback just replaces the cache entry
            if old.is_none() {
                dom::add_listener(node, &kind, capture);
            }
            dom::set_event_callback(node, &kind, handler.clone());
        }
        _ => {
            dom::remove_listener(node, &kind, capture);
            dom::remove_event_callback(node, &kind);
        }
    }
}
