//! Markup serialization of a live subtree, for tests and debugging.

use super::{NodeId, attributes, child_nodes, raw_html, style_text, tag_name, text_value};

fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn write_node(id: NodeId, out: &mut String) {
    match tag_name(id) {
        Some(tag) => {
            out.push('<');
            out.push_str(&tag);
            for (name, value) in attributes(id) {
                out.push(' ');
                out.push_str(&name);
                out.push_str("=\"");
                escape_attr(&value, out);
                out.push('"');
            }
            let style = style_text(id);
            if !style.is_empty() {
                out.push_str(" style=\"");
                escape_attr(&style, out);
                out.push('"');
            }
            out.push('>');
            match raw_html(id) {
                Some(markup) => out.push_str(&markup),
                None => {
                    for child in child_nodes(id) {
                        write_node(child, out);
                    }
                }
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
        None => {
            if let Some(text) = text_value(id) {
                escape_text(&text, out);
            }
        }
    }
}

/// Serialize a subtree as markup: attributes in insertion order, text
/// escaped, raw-HTML content emitted verbatim.
pub fn to_html(id: NodeId) -> String {
    let mut out = String::new();
    write_node(id, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn serializes_structure_attributes_and_text() {
        reset_arena();
        let root = create_element_node("div", false);
        set_attribute(root, "id", "app");
        let p = create_element_node("p", false);
        append_child(root, p);
        let t = create_text_node("a < b");
        append_child(p, t);
        assert_eq!(to_html(root), "<div id=\"app\"><p>a &lt; b</p></div>");
    }

    #[test]
    fn raw_html_is_emitted_verbatim() {
        reset_arena();
        let n = create_element_node("div", false);
        set_raw_html(n, "<b>hi</b>");
        assert_eq!(to_html(n), "<div><b>hi</b></div>");
    }
}
