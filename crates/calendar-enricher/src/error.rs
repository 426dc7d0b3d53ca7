//! Error types for the enrichment pipeline.

use thiserror::Error;

/// Errors surfaced by the pipeline's own components.
///
/// Most failures are contained inside the poll loop and only logged; this
/// type covers the pieces callers drive directly (roster I/O, refresh runs).
#[derive(Debug, Error)]
pub enum EnricherError {
    /// Reading or writing the roster file failed.
    #[error("roster I/O error: {0}")]
    Roster(#[from] std::io::Error),

    /// The conferencing directory could not be queried.
    #[error("directory error: {0}")]
    Directory(#[from] cms_client::CmsError),
}
