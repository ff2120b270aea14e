//! PlantUML subprocess renderer.
//!
//! Runs the external PlantUML tool in piped mode: the diagram source is
//! written to the child's stdin, stdin is closed, and stdout is drained to
//! end-of-stream as the PNG image. The wait for child exit is bounded; a
//! hung tool is killed instead of hanging the generation cycle.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::consts::{DEFAULT_COMMAND, DEFAULT_TIMEOUT, EXIT_POLL_INTERVAL, PIPE_FLAG};
use crate::error::DiagramError;

/// A renderer from diagram source text to image bytes.
///
/// Implementations must be pure modulo failure: for a fixed source, a
/// successful render returns equivalent bytes on every call. [`Send`] and
/// [`Sync`] are required because the [`DiagramCache`](crate::DiagramCache)
/// may be shared across concurrent generation cycles.
pub trait DiagramRenderer: Send + Sync {
    /// Render `source` to image bytes.
    fn render(&self, source: &str) -> Result<Vec<u8>, DiagramError>;
}

/// PlantUML invoked as a subprocess in piped mode.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use pagestage_diagrams::PlantUml;
///
/// let renderer = PlantUml::new("plantuml").timeout(Duration::from_secs(60));
/// ```
pub struct PlantUml {
    /// Executable name or path.
    command: String,
    /// Arguments; `["-p"]` for a standard PlantUML install.
    args: Vec<String>,
    /// Bounded wait for one render.
    timeout: Duration,
}

impl PlantUml {
    /// Create a renderer invoking `command` with the standard pipe flag.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_invocation(command, vec![PIPE_FLAG.to_owned()])
    }

    /// Create a renderer with a custom argument list, for installs that are
    /// not a plain `plantuml` wrapper (e.g. `java -jar plantuml.jar -p`).
    /// The invocation must still read diagram text on stdin and write a PNG
    /// to stdout.
    #[must_use]
    pub fn with_invocation(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the bounded wait for one render.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Poll the child for exit until the deadline, killing it on expiry.
    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus, DiagramError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DiagramError::Timeout {
                    timeout: self.timeout,
                });
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }
    }
}

impl Default for PlantUml {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl DiagramRenderer for PlantUml {
    fn render(&self, source: &str) -> Result<Vec<u8>, DiagramError> {
        tracing::info!(command = %self.command, "rendering diagram");

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DiagramError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // Stdin is fed from its own thread and both output pipes are drained
        // concurrently; a child that interleaves reads and writes cannot
        // deadlock against us on a full pipe buffer.
        let writer = child.stdin.take().map(|mut stdin| {
            let source = source.to_owned();
            thread::spawn(move || stdin.write_all(source.as_bytes()))
        });
        let image_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let status = self.wait_with_deadline(&mut child)?;

        if let Some(handle) = writer {
            // A child that exited without consuming stdin surfaces as a
            // broken pipe here; the exit status is the authoritative signal.
            let _ = handle.join();
        }
        let image = match image_reader {
            Some(handle) => join_pipe(handle)?,
            None => Vec::new(),
        };
        let stderr = stderr_reader.map_or_else(Vec::new, |handle| {
            join_pipe(handle).unwrap_or_default()
        });

        if !status.success() {
            return Err(DiagramError::Failed {
                command: self.command.clone(),
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
            });
        }
        if image.is_empty() {
            return Err(DiagramError::EmptyOutput);
        }

        tracing::debug!(bytes = image.len(), "diagram rendered");
        Ok(image)
    }
}

/// Drain a child pipe to end-of-stream on a dedicated thread.
fn drain<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Join a pipe-draining thread, mapping a panicked thread to an I/O error.
fn join_pipe(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> std::io::Result<Vec<u8>> {
    handle
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("pipe reader thread panicked")))
}
