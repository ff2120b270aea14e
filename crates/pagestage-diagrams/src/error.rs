//! Error types for diagram rendering.

use std::process::ExitStatus;
use std::time::Duration;

/// Error from an external diagram render.
///
/// Every variant is fatal for the generation cycle that triggered the render.
/// None of them is cached: a later render of the same source retries the
/// subprocess from scratch.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DiagramError {
    /// The renderer executable could not be started.
    #[error("external renderer failed: could not start '{command}': {source}")]
    Spawn {
        /// Invoked command name.
        command: String,
        /// Underlying spawn error (typically "not found").
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited with a failure status.
    #[error("external renderer failed: '{command}' exited with {status}: {stderr}")]
    Failed {
        /// Invoked command name.
        command: String,
        /// Child exit status.
        status: ExitStatus,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// The renderer exited successfully but produced no image bytes.
    #[error("external renderer failed: no image data produced")]
    EmptyOutput,

    /// The renderer did not finish within the bounded wait.
    #[error("external renderer failed: timed out after {timeout:?}")]
    Timeout {
        /// Configured bounded wait.
        timeout: Duration,
    },

    /// Pipe or process I/O failed.
    #[error("external renderer failed: {0}")]
    Io(#[from] std::io::Error),
}
