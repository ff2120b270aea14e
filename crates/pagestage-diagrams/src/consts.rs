//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default PlantUML executable name, resolved via `PATH`.
pub const DEFAULT_COMMAND: &str = "plantuml";

/// Flag that switches PlantUML into piped mode (diagram text on stdin,
/// PNG image on stdout).
pub(crate) const PIPE_FLAG: &str = "-p";

/// Default bounded wait for one external render (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between child exit checks while waiting on the deadline.
pub(crate) const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(25);
