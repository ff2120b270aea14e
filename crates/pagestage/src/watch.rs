//! Content-polling watch loop and the generation cycle.
//!
//! The watcher re-reads the input file on an interval and compares its
//! *content* (not its modification time) against the last seen snapshot; an
//! editor touching the file without changing it triggers nothing. Each
//! detected change runs one generation cycle to completion. A failed cycle
//! is reported and leaves the previous output untouched; the next change
//! starts over from scratch.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use pagestage_diagrams::DiagramCache;
use tempfile::NamedTempFile;

use crate::error::CliError;
use crate::output::Output;

/// Watches one page-storage file and regenerates its HTML preview.
pub(crate) struct Watcher {
    input: PathBuf,
    poll_interval: Duration,
    diagrams: DiagramCache,
}

impl Watcher {
    pub(crate) fn new(input: PathBuf, poll_interval: Duration, diagrams: DiagramCache) -> Self {
        Self {
            input,
            poll_interval,
            diagrams,
        }
    }

    /// Poll forever. The initial snapshot is empty, so a non-empty file is
    /// rendered once on startup.
    pub(crate) fn run(&self, output: &Output) -> Result<(), CliError> {
        if !self.input.is_file() {
            return Err(CliError::InputNotFound(self.input.clone()));
        }

        output.info(&format!("Watching {}", self.input.display()));

        let mut last_seen = String::new();
        loop {
            match fs::read_to_string(&self.input) {
                Ok(content) => {
                    if content != last_seen {
                        output.info("Change detected");
                        if let Err(err) = self.generate_cycle(&content, output) {
                            output.error(&err.to_string());
                            tracing::warn!("generation cycle failed: {err}");
                        }
                        last_seen = content;
                    }
                }
                // Fatal for this cycle only; the file may reappear.
                Err(err) => {
                    output.error(&format!("Failed to read {}: {err}", self.input.display()));
                }
            }
            thread::sleep(self.poll_interval);
        }
    }

    /// One generation cycle: render the snapshot and atomically replace the
    /// output file. Nothing is written unless the whole document rendered.
    fn generate_cycle(&self, content: &str, output: &Output) -> Result<(), CliError> {
        output.info("Generating HTML");
        let started = Instant::now();

        let html = pagestage_renderer::generate(content, &self.diagrams)?;
        let destination = output_path(&self.input);
        write_replace(&destination, &html)?;

        output.success(&format!(
            "Wrote {} in {:.0?}",
            destination.display(),
            started.elapsed()
        ));
        Ok(())
    }
}

/// Destination path: `<input>.html` alongside the input file.
fn output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".html");
    PathBuf::from(name)
}

/// Replace `path` with `contents` as a single unit: write a temp file in the
/// destination directory, then rename it over the target. A crash mid-write
/// can never leave a partial document at `path`.
fn write_replace(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut file = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    file.write_all(contents.as_bytes())?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_output_path_appends_html() {
        assert_eq!(
            output_path(Path::new("notes/page.xml")),
            PathBuf::from("notes/page.xml.html")
        );
        assert_eq!(output_path(Path::new("page")), PathBuf::from("page.html"));
    }

    #[test]
    fn test_write_replace_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");

        write_replace(&path, "<body>hello</body>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<body>hello</body>");
    }

    #[test]
    fn test_write_replace_overwrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");

        write_replace(&path, "a much longer first document").unwrap();
        write_replace(&path, "short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_write_replace_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");

        write_replace(&path, "content").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("out.html")]);
    }
}
