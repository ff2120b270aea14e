//! Diagram rendering for pagestage.
//!
//! Turns PlantUML diagram source text into PNG bytes by piping it through an
//! external `plantuml` process, and memoizes the result per distinct source
//! string so an unchanged diagram is never rendered twice within a process:
//!
//! - [`DiagramRenderer`]: trait for text-in/image-out renderers
//! - [`PlantUml`]: subprocess implementation with a bounded wait
//! - [`DiagramCache`]: at-most-once-per-key memoization layer
//!
//! # Example
//!
//! ```ignore
//! use pagestage_diagrams::{DiagramCache, PlantUml};
//!
//! let cache = DiagramCache::new(Box::new(PlantUml::default()));
//! let png = cache.render_cached("Alice -> Bob")?;
//! // A second call with the same source returns the memoized bytes.
//! let again = cache.render_cached("Alice -> Bob")?;
//! assert!(std::sync::Arc::ptr_eq(&png, &again));
//! ```

mod cache;
mod consts;
mod error;
mod plantuml;

pub use cache::DiagramCache;
pub use consts::{DEFAULT_COMMAND, DEFAULT_TIMEOUT};
pub use error::DiagramError;
pub use plantuml::{DiagramRenderer, PlantUml};
