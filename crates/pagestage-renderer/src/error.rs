//! Error types for parsing and rendering page-storage markup.

use pagestage_diagrams::DiagramError;

/// Error while parsing page-storage markup into a tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Malformed XML.
    #[error("malformed page storage markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed element attribute.
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Text could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}

/// Error while rendering a parsed tree to HTML.
///
/// All variants abort the current document render; nothing reaches the
/// destination file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Node tag outside the supported closed set.
    #[error("unknown markup node kind: <{tag}>")]
    UnknownKind {
        /// Offending tag, namespace prefix stripped.
        tag: String,
    },

    /// `structured-macro` with an unsupported name.
    #[error("unknown macro name: {name}")]
    UnknownMacro {
        /// Offending macro name.
        name: String,
    },

    /// `structured-macro` without its required `name` attribute.
    #[error("structured-macro is missing its name attribute")]
    MissingMacroName,

    /// Macro body not found at its fixed child position.
    #[error("macro '{name}' has no child element at position {position}")]
    MacroShape {
        /// Macro name.
        name: String,
        /// Expected 1-based child element position.
        position: usize,
    },

    /// Diagram rendering failed.
    #[error("{0}")]
    Diagram(#[from] DiagramError),
}

/// Error for one whole document generation.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The input markup did not parse.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// A node failed to render.
    #[error("{0}")]
    Render(#[from] RenderError),
}
