//! The full regeneration: resolve every tier, then deduplicate.

use crate::{
    dedup::{self, DedupError, Summary},
    domain::Layout,
    resolver::{self, ResolveError, Runner},
};

/// Regenerates every requirements file with `runner`, then deduplicates them.
///
/// Deduplication starts only once every resolver command has succeeded.
///
/// # Errors
///
/// Returns the first resolver failure, in which case no file is
/// deduplicated, or the first deduplication failure.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run<R: Runner>(layout: &Layout, runner: &mut R) -> Result<Summary, RunError> {
    resolver::resolve(layout, runner)?;
    Ok(dedup::deduplicate(layout)?)
}

/// Regeneration stopped part-way.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A resolver command failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A generated file could not be deduplicated.
    #[error(transparent)]
    Dedup(#[from] DedupError),
}
