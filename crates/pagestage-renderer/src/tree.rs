//! Tree representation of parsed page-storage markup.

/// Confluence `ac:` namespace URI, bound on the synthetic root element.
pub const AC_NAMESPACE: &str = "http://www.atlassian.com/schema/confluence/4/ac/";

/// Confluence `ri:` namespace URI, bound on the synthetic root element.
pub const RI_NAMESPACE: &str = "http://www.atlassian.com/schema/confluence/4/ri/";

/// One element in a parsed page-storage tree.
///
/// Text is stored lxml-style: `text` is the content before the first child
/// element, and each child's `tail` is the content between that child and
/// the next sibling. This encodes the full ordered interleaving of element
/// and text children without a separate leaf type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageNode {
    /// Element tag name, with any namespace prefix preserved (`ac:…`).
    pub tag: String,
    /// Text before the first child element.
    pub text: String,
    /// Text after this element, inside its parent.
    pub tail: String,
    /// Attributes in document order; names are unique.
    pub attrs: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<PageNode>,
}

impl PageNode {
    /// Create a node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Append an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<PageNode>) -> Self {
        self.children = children;
        self
    }

    /// Tag name without its namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_part(&self.tag)
    }

    /// Look up an attribute by local name, ignoring any namespace prefix
    /// (`ac:name` and `name` both match `"name"`).
    #[must_use]
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| local_part(name) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this element and all descendants, in document
    /// order. The element's own tail is not part of its value.
    #[must_use]
    pub fn value(&self) -> String {
        let mut out = String::new();
        self.collect_value(&mut out);
        out
    }

    fn collect_value(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_value(out);
            out.push_str(&child.tail);
        }
    }
}

/// Local part of a possibly prefixed XML name.
fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}
