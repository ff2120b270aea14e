//! pagestage CLI - live HTML preview for page-storage markup files.
//!
//! Watches a Confluence page-storage file and rewrites `<file>.html` on
//! every content change, rendering `plantuml` macros through a memoized
//! external-process cache.

mod error;
mod output;
mod watch;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pagestage_diagrams::{DEFAULT_COMMAND, DiagramCache, PlantUml};
use tracing_subscriber::EnvFilter;

use output::Output;
use watch::Watcher;

/// Live HTML preview for Confluence page-storage markup files.
#[derive(Parser)]
#[command(name = "pagestage", version, about)]
struct Cli {
    /// Page-storage markup file to watch.
    file: PathBuf,

    /// PlantUML executable used for diagram macros.
    #[arg(long, env = "PAGESTAGE_PLANTUML", default_value = DEFAULT_COMMAND)]
    plantuml: String,

    /// Poll interval for detecting content changes, in milliseconds.
    #[arg(long, default_value_t = 300)]
    poll_interval_ms: u64,

    /// Bounded wait for one diagram render, in seconds.
    #[arg(long, default_value_t = 30)]
    render_timeout_secs: u64,

    /// Enable verbose output (per-cycle and per-diagram logs).
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let renderer =
        PlantUml::new(cli.plantuml).timeout(Duration::from_secs(cli.render_timeout_secs));
    let diagrams = DiagramCache::new(Box::new(renderer));

    let watcher = Watcher::new(
        cli.file,
        Duration::from_millis(cli.poll_interval_ms),
        diagrams,
    );
    if let Err(err) = watcher.run(&output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
