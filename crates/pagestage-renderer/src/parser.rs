//! Page-storage markup parser.
//!
//! A storage file is a bare sequence of sibling fragments using the `ac:`
//! macro vocabulary, so the raw text is wrapped in a synthetic root element
//! that binds the Confluence namespaces before being handed to quick-xml.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;
use crate::tree::{AC_NAMESPACE, PageNode, RI_NAMESPACE};

/// Parse raw page-storage markup into a tree.
///
/// The returned node is the synthetic root; the document's top-level
/// fragments are its children, in document order.
///
/// # Errors
///
/// Returns [`ParseError`] if the markup is not well-formed XML.
pub fn parse(fragments: &str) -> Result<PageNode, ParseError> {
    let wrapped = format!(
        r#"<root xmlns:ac="{AC_NAMESPACE}" xmlns:ri="{RI_NAMESPACE}">{fragments}</root>"#
    );

    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut root = loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => break PageNode::new(decode_name(&reader, e.name().as_ref())),
            // Unreachable with the synthetic wrapper, but cheap to handle.
            Event::Eof => return Ok(PageNode::new("root")),
            _ => {}
        }
        buf.clear();
    };

    parse_into(&mut reader, &mut root)?;
    Ok(root)
}

/// Parse events into `node` until its end tag (or end of input).
fn parse_into<R: BufRead>(reader: &mut Reader<R>, node: &mut PageNode) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let mut child = PageNode::new(decode_name(reader, e.name().as_ref()));
                child.attrs = decode_attrs(reader, &e)?;
                parse_into(reader, &mut child)?;
                node.children.push(child);
            }
            Event::Empty(e) => {
                // Self-closing element.
                let mut child = PageNode::new(decode_name(reader, e.name().as_ref()));
                child.attrs = decode_attrs(reader, &e)?;
                node.children.push(child);
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?.into_owned();
                append_text(node, &text);
            }
            Event::GeneralRef(e) => {
                // Entity references (&lt; &gt; &amp; &#…;) arrive as their
                // own events; decode them to characters.
                let entity = reader.decoder().decode(&e)?.into_owned();
                append_text(node, &decode_entity(&entity));
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_text(node, &text);
            }
            Event::End(_) | Event::Eof => return Ok(()),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }
}

/// Decode an element or attribute name, falling back to lossy UTF-8.
fn decode_name<R: BufRead>(reader: &Reader<R>, name: &[u8]) -> String {
    reader.decoder().decode(name).map_or_else(
        |_| String::from_utf8_lossy(name).into_owned(),
        std::borrow::Cow::into_owned,
    )
}

/// Decode attributes in document order, skipping namespace declarations.
fn decode_attrs<R: BufRead>(
    reader: &Reader<R>,
    e: &BytesStart,
) -> Result<Vec<(String, String)>, ParseError> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let name = decode_name(reader, attr.key.as_ref());
        if name.starts_with("xmlns") {
            continue;
        }
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.push((name, value));
    }
    Ok(attrs)
}

/// Append text to the node's leading text or the last child's tail,
/// preserving the document-order interleaving.
fn append_text(node: &mut PageNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Decode an XML entity reference to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        // Numeric character references
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_simple_element() {
        let tree = parse("<p>Hello</p>").unwrap();

        assert_eq!(tree.children.len(), 1);
        let p = &tree.children[0];
        assert_eq!(p.tag, "p");
        assert_eq!(p.text, "Hello");
    }

    #[test]
    fn test_parse_sibling_fragments() {
        let tree = parse("<h1>Title</h1><p>Body</p>").unwrap();

        let tags: Vec<_> = tree.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["h1", "p"]);
    }

    #[test]
    fn test_parse_nested_elements() {
        let tree = parse("<p>Hello <code>world</code></p>").unwrap();

        let p = &tree.children[0];
        assert_eq!(p.text, "Hello ");
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.children[0].tag, "code");
        assert_eq!(p.children[0].text, "world");
    }

    #[test]
    fn test_parse_tail_text() {
        let tree = parse("<p><strong>Bold</strong> text</p>").unwrap();

        let strong = &tree.children[0].children[0];
        assert_eq!(strong.text, "Bold");
        assert_eq!(strong.tail, " text");
    }

    #[test]
    fn test_parse_self_closing() {
        let tree = parse("<p>Before<br />After</p>").unwrap();

        let p = &tree.children[0];
        assert_eq!(p.text, "Before");
        assert_eq!(p.children[0].tag, "br");
        assert_eq!(p.children[0].tail, "After");
    }

    #[test]
    fn test_parse_entities_decoded() {
        let tree = parse("<p>a &lt; b &amp; c</p>").unwrap();

        assert_eq!(tree.children[0].text, "a < b & c");
    }

    #[test]
    fn test_parse_numeric_entity() {
        let tree = parse("<p>&#x41;&#66;</p>").unwrap();

        assert_eq!(tree.children[0].text, "AB");
    }

    #[test]
    fn test_parse_namespaced_macro() {
        let markup = r#"<ac:structured-macro ac:name="plantuml" ac:schema-version="1"><ac:parameter /><ac:plain-text-body>Alice -> Bob</ac:plain-text-body></ac:structured-macro>"#;
        let tree = parse(markup).unwrap();

        let macro_node = &tree.children[0];
        assert_eq!(macro_node.tag, "ac:structured-macro");
        assert_eq!(macro_node.attr("name"), Some("plantuml"));
        assert_eq!(macro_node.children.len(), 2);
        assert_eq!(macro_node.children[1].value(), "Alice -> Bob");
    }

    #[test]
    fn test_parse_cdata_body() {
        let markup =
            "<ac:plain-text-body><![CDATA[if (a < b) { run(); }]]></ac:plain-text-body>";
        let tree = parse(markup).unwrap();

        assert_eq!(tree.children[0].text, "if (a < b) { run(); }");
    }

    #[test]
    fn test_parse_attribute_order_preserved() {
        let tree = parse(r#"<span style="a" class="b" data-x="c" />"#).unwrap();

        let names: Vec<_> = tree.children[0]
            .attrs
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["style", "class", "data-x"]);
    }

    #[test]
    fn test_parse_malformed_markup_fails() {
        assert!(parse("<p>unclosed").is_err());
        assert!(parse("<p></q>").is_err());
    }
}
