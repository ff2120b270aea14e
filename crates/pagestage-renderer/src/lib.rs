//! Page-storage markup to HTML rendering for pagestage.
//!
//! The input dialect is a restricted subset of the Confluence storage
//! format: a bare sequence of XML fragments over a closed vocabulary of
//! node kinds (headings, paragraphs, lists, inline code, raw spans, comment
//! markers, and `ac:structured-macro` blocks). Anything outside that set is
//! a hard error, never a silent pass-through.
//!
//! # Architecture
//!
//! - [`tree`]: parsed tree model ([`PageNode`])
//! - [`parser`]: quick-xml parser over a synthetic namespaced root
//! - [`kind`]: closed node-kind and macro-name classification
//! - [`renderer`]: recursive HTML rendering, diagram macros via
//!   [`pagestage_diagrams::DiagramCache`]
//! - [`document`]: whole-document shell (style block + body)

mod document;
mod error;
mod html;
mod kind;
mod parser;
mod renderer;
mod serializer;
mod tree;

pub use document::generate;
pub use error::{DocumentError, ParseError, RenderError};
pub use html::escape_html;
pub use kind::{BlockTag, MacroName, NodeKind};
pub use parser::parse;
pub use renderer::PageRenderer;
pub use tree::{AC_NAMESPACE, PageNode, RI_NAMESPACE};
