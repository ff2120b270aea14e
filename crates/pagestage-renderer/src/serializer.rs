//! Serialization of tree fragments back to storage form.
//!
//! Used for the raw pass-through of `<span>` fragments, which are emitted as
//! their original markup rather than being transformed.

use std::fmt::Write;

use crate::tree::PageNode;

/// Serialize `node` back to storage markup, excluding its tail.
///
/// Text is re-escaped on the way out, so a well-formed fragment round-trips
/// to the form it had in the source.
pub(crate) fn serialize_fragment(node: &PageNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);
    for (name, value) in &node.attrs {
        write!(out, r#" {name}="{}""#, escape_attr(value)).unwrap();
    }

    if node.children.is_empty() && node.text.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    out.push_str(&escape_text(&node.text));
    for child in &node.children {
        serialize_fragment(child, out);
        out.push_str(&escape_text(&child.tail));
    }
    write!(out, "</{}>", node.tag).unwrap();
}

/// Escape text content for storage markup (`&`, `<`, `>`).
pub(crate) fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

/// Escape an attribute value (text escapes plus quotes).
fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}
