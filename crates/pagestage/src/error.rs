//! CLI error types.

use std::path::PathBuf;

use pagestage_renderer::DocumentError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
