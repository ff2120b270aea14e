//! Whole-document generation.
//!
//! Parses one snapshot of page-storage markup and wraps the rendered
//! fragments in the document shell (style block + body).

use pagestage_diagrams::DiagramCache;

use crate::error::DocumentError;
use crate::parser;
use crate::renderer::PageRenderer;

/// Style block emitted at the top of every generated document, approximating
/// the Confluence page typography.
const CSS: &str = r#"
body {
    color: #172b4d;
    font-family: -apple-system,BlinkMacSystemFont,"Segoe UI","Roboto","Oxygen","Ubuntu","Fira Sans","Droid Sans","Helvetica Neue",sans-serif;
    font-size: 14px;
    font-weight: 400;
    line-height: 1.42857143;
    letter-spacing: 0;
}

h1 {
    font-size: 24px;
    font-weight: normal;
    line-height: 1.25;
    margin: 30px 0 0 0;
}

h2 {
    font-size: 20px;
    font-weight: normal;
    line-height: 1.5;
    margin: 30px 0 0 0;
}

.toc-zone {
    background-color: #f0f0f0;
    border: 1px solid #ddd;
    margin: 0 2px;
    min-height: 24px;
    padding: 10px;
}
"#;

/// Generate a complete standalone HTML document from raw page-storage
/// markup.
///
/// Top-level fragments are rendered in document order between the style
/// block and the body tags. The result is a full replacement document; the
/// caller decides where (and whether) to write it.
///
/// # Errors
///
/// Fails on malformed markup or on any render error; no partial document is
/// returned.
pub fn generate(raw: &str, diagrams: &DiagramCache) -> Result<String, DocumentError> {
    let root = parser::parse(raw)?;
    tracing::debug!(fragments = root.children.len(), "parsed storage snapshot");
    let renderer = PageRenderer::new(diagrams);

    let mut html = String::with_capacity(raw.len() * 2);
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("\n</style>\n<body>\n");
    for fragment in &root.children {
        html.push_str(&renderer.render(fragment)?);
        html.push('\n');
    }
    html.push_str("</body>\n");
    Ok(html)
}
