//! Recursive HTML rendering of page-storage trees.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use pagestage_diagrams::DiagramCache;

use crate::error::RenderError;
use crate::html::escape_html;
use crate::kind::{MacroName, NodeKind};
use crate::serializer::{escape_text, serialize_fragment};
use crate::tree::PageNode;

/// Icon emitted for the `talk` macro, embedded so the output document stands
/// alone.
const TALK_ICON: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAABAAAAAQCAYAAAAf8/9hAAAACXBIWXMAAA7DAAAOwwHHb6hkAAABaUlEQVR4nGP5//8/AylAyLRMWlxMYP/LVx9UE4LMA1lI1KwpLS6wVcncVHFrgiGDSVDXeoIGADXxAikpSTH+FhcrdYuVE5JkEmaeYxCXEALLs9RM2BI+bemhFbgMAGp8r68uzViZ7iagoyYJF//2B0KzgDSfWVfGoCgjjKEZZNOMFENBGP/H3/9IBkDYYC8IiQoxfPyJPTCRNSGD7zAXgIiPv3DHBC4DUFzw8RdO/UADsIt/o9QFcC/Y2BtG+/tXLYVJ+CaHwxVtmbeKYTMQO9rpvvPzNRPS01HA9MKmnshlDAwgDI7z/5Ge+gziXIwMEkC8ee5KkDDH/oOX1G/cepL/+cv36LlzitkxvIAPvDvd9RNIXQLiZKAFmekZE+/YBnnJogQiNqDjWAmiUAIAaNgvoCH6QJe9BWJGaw+bSJwGQDMZhjzQkPdAignGx+sFoOJ/+OQxDNA21PCICqnaAWKrK0vuIaQZBABhs5JVIUSzNQAAAABJRU5ErkJggg==";

/// Renderer from a parsed page-storage tree to HTML fragments.
///
/// Borrows the process-wide [`DiagramCache`] so diagram macros across
/// generation cycles share one memoized render per source.
pub struct PageRenderer<'a> {
    diagrams: &'a DiagramCache,
}

impl<'a> PageRenderer<'a> {
    /// Create a renderer backed by `diagrams`.
    #[must_use]
    pub fn new(diagrams: &'a DiagramCache) -> Self {
        Self { diagrams }
    }

    /// Render one node (and its subtree) to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Fails on an unknown node kind, an unknown or malformed macro, or a
    /// failed diagram render. Any error aborts the whole document.
    pub fn render(&self, node: &PageNode) -> Result<String, RenderError> {
        let mut out = String::new();
        self.render_node(node, &mut out)?;
        Ok(out)
    }

    fn render_node(&self, node: &PageNode, out: &mut String) -> Result<(), RenderError> {
        match NodeKind::classify(node)? {
            NodeKind::Block(tag) => {
                write!(out, "<{}>", tag.as_str()).unwrap();
                self.render_children(node, out)?;
                write!(out, "</{}>", tag.as_str()).unwrap();
            }
            NodeKind::InlineCode => {
                out.push_str(r#"<span style="font: Courier">"#);
                self.render_children(node, out)?;
                out.push_str("</span>");
            }
            NodeKind::RawFragment => serialize_fragment(node, out),
            NodeKind::ListItem => {
                out.push_str("<li>");
                self.render_children(node, out)?;
                out.push_str("</li>");
            }
            NodeKind::CommentMarker => out.push_str(&node.value()),
            NodeKind::Macro => self.render_macro(node, out)?,
        }
        Ok(())
    }

    /// Render a container's text and children in document order. Text leaves
    /// are emitted in their storage-escaped form (see DESIGN.md).
    fn render_children(&self, node: &PageNode, out: &mut String) -> Result<(), RenderError> {
        out.push_str(&escape_text(&node.text));
        for child in &node.children {
            self.render_node(child, out)?;
            out.push_str(&escape_text(&child.tail));
        }
        Ok(())
    }

    fn render_macro(&self, node: &PageNode, out: &mut String) -> Result<(), RenderError> {
        let name = node.attr("name").ok_or(RenderError::MissingMacroName)?;

        match MacroName::parse(name) {
            Some(MacroName::TocZone) => {
                out.push_str(r#"<div class="toc-zone">toc-zone</div>"#);
            }
            Some(MacroName::Talk) => {
                write!(out, r#"<img src="{TALK_ICON}">"#).unwrap();
            }
            Some(MacroName::PlantUml) => {
                let body = macro_child(node, name, 1)?;
                let bytes = self.diagrams.render_cached(&body.value())?;
                let encoded = BASE64.encode(&bytes);
                write!(out, r#"<img src="data:image/png;base64,{encoded}" alt="diagram">"#)
                    .unwrap();
            }
            Some(MacroName::Code) => {
                let body = macro_child(node, name, 2)?;
                write!(out, "<pre>{}</pre>", escape_html(&body.value())).unwrap();
            }
            None => {
                return Err(RenderError::UnknownMacro {
                    name: name.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// The macro child element at a fixed position, or a structural error naming
/// the 1-based position the macro's shape requires.
fn macro_child<'n>(
    node: &'n PageNode,
    name: &str,
    index: usize,
) -> Result<&'n PageNode, RenderError> {
    node.children.get(index).ok_or_else(|| RenderError::MacroShape {
        name: name.to_owned(),
        position: index + 1,
    })
}
