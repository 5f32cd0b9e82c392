use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for archive extraction, dataset loading, and rendering
/// failures.
///
/// A missing input file is not an error: loaders substitute a synthetic
/// placeholder and report it through
/// [`LoadResult::Substituted`](crate::load::LoadResult). Errors here are
/// the fatal conditions that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The top-level archive, or a zip nested inside it, is corrupt or
    /// unreadable. `path` names the offending container.
    #[error("archive {path:?} could not be extracted: {source}")]
    Archive {
        /// Path of the container that failed to extract.
        path: PathBuf,
        /// Underlying zip failure.
        #[source]
        source: zip::result::ZipError,
    },
    /// A dataset file was found but its shape is not usable: a missing
    /// sheet, a missing required column, or unparseable content. Finding
    /// a malformed file never triggers placeholder substitution.
    #[error("dataset '{file}' has an unusable schema: {detail}")]
    Schema {
        /// Name of the offending dataset file.
        file: String,
        /// What was missing or malformed.
        detail: String,
    },
    /// Geometry reprojection or image drawing/writing failed.
    #[error("map rendering failed: {0}")]
    Render(String),
    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
