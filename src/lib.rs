//! Layered Python requirement files
//!
//! Regenerates the `base`, `production`, `development`, `testing` and `all`
//! requirement files of a project with an external resolver, then rewrites
//! the derived files so that packages pinned by a parent file are pulled in
//! with an `-r` include instead of being pinned twice.

pub mod domain;
pub use domain::{Config, Identifier, Layout, Requirements, Tier};

/// Deduplication of the generated files.
pub mod dedup;
pub use dedup::{DedupError, Summary, deduplicate};

pub mod resolver;
pub use resolver::{ResolveError, Runner, SystemRunner, resolve};

pub mod pipeline;
pub use pipeline::{RunError, run};

/// Filesystem formats.
pub mod storage;
