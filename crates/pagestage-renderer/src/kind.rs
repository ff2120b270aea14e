//! Closed classification of markup node kinds.
//!
//! Page-storage input is restricted to a fixed vocabulary; classification is
//! total over that set and an error for everything else, so the renderer
//! never guesses at unknown constructs.

use crate::error::RenderError;
use crate::tree::PageNode;

/// Block-level tags rendered as `<tag>` … `</tag>` around their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// `<h1>`
    H1,
    /// `<h2>`
    H2,
    /// `<h3>`
    H3,
    /// `<p>`
    P,
    /// `<ul>`
    Ul,
    /// `<br>`
    Br,
}

impl BlockTag {
    /// The HTML tag name (identical to the storage tag name).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::P => "p",
            Self::Ul => "ul",
            Self::Br => "br",
        }
    }

    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "p" => Some(Self::P),
            "ul" => Some(Self::Ul),
            "br" => Some(Self::Br),
            _ => None,
        }
    }
}

/// Rendering dispatch kind for one markup node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Container emitted with its own tag name.
    Block(BlockTag),
    /// Inline `<code>` run, emitted as a monospace span.
    InlineCode,
    /// `<span>` fragment, emitted as its original storage markup.
    RawFragment,
    /// `<li>` item.
    ListItem,
    /// `ac:inline-comment-marker`, text emitted verbatim.
    CommentMarker,
    /// `ac:structured-macro`, dispatched by its `name` attribute.
    Macro,
}

impl NodeKind {
    /// Classify a node by the local name of its tag.
    ///
    /// # Errors
    ///
    /// [`RenderError::UnknownKind`] for any tag outside the closed set.
    pub fn classify(node: &PageNode) -> Result<Self, RenderError> {
        let local = node.local_name();
        if let Some(block) = BlockTag::parse(local) {
            return Ok(Self::Block(block));
        }
        match local {
            "code" => Ok(Self::InlineCode),
            "span" => Ok(Self::RawFragment),
            "li" => Ok(Self::ListItem),
            "inline-comment-marker" => Ok(Self::CommentMarker),
            "structured-macro" => Ok(Self::Macro),
            other => Err(RenderError::UnknownKind {
                tag: other.to_owned(),
            }),
        }
    }
}

/// Supported `structured-macro` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroName {
    /// Table-of-contents placeholder block.
    TocZone,
    /// Fixed talk icon.
    Talk,
    /// PlantUML diagram, rendered to an inline PNG.
    PlantUml,
    /// Literal code block.
    Code,
}

impl MacroName {
    /// Parse a macro name; `None` for anything outside the closed set.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "toc-zone" => Some(Self::TocZone),
            "talk" => Some(Self::Talk),
            "plantuml" => Some(Self::PlantUml),
            "code" => Some(Self::Code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_blocks() {
        for (tag, expected) in [
            ("h1", BlockTag::H1),
            ("h2", BlockTag::H2),
            ("h3", BlockTag::H3),
            ("p", BlockTag::P),
            ("ul", BlockTag::Ul),
            ("br", BlockTag::Br),
        ] {
            let kind = NodeKind::classify(&PageNode::new(tag)).unwrap();
            assert_eq!(kind, NodeKind::Block(expected));
            assert_eq!(expected.as_str(), tag);
        }
    }

    #[test]
    fn test_classify_namespaced_tags() {
        let marker = PageNode::new("ac:inline-comment-marker");
        assert_eq!(
            NodeKind::classify(&marker).unwrap(),
            NodeKind::CommentMarker
        );

        let macro_node = PageNode::new("ac:structured-macro");
        assert_eq!(NodeKind::classify(&macro_node).unwrap(), NodeKind::Macro);
    }

    #[test]
    fn test_classify_unknown_tag_fails() {
        let err = NodeKind::classify(&PageNode::new("table")).unwrap_err();
        assert!(err.to_string().contains("unknown markup node kind"));
        assert!(err.to_string().contains("table"));
    }

    #[test]
    fn test_macro_name_closed_set() {
        assert_eq!(MacroName::parse("toc-zone"), Some(MacroName::TocZone));
        assert_eq!(MacroName::parse("talk"), Some(MacroName::Talk));
        assert_eq!(MacroName::parse("plantuml"), Some(MacroName::PlantUml));
        assert_eq!(MacroName::parse("code"), Some(MacroName::Code));
        assert_eq!(MacroName::parse("expand"), None);
        assert_eq!(MacroName::parse("PLANTUML"), None);
    }
}
