//! Dataset location and parsing.
//!
//! Each loader checks for its expected file in the extracted working
//! directory. A file that is present but malformed is a fatal
//! [`Schema`](crate::PipelineError::Schema) error; a file that is absent
//! is substituted with a small synthetic placeholder of the same shape
//! (when the configuration allows it), so the pipeline can still run end
//! to end on partial input. Callers can always distinguish the two
//! outcomes through [`LoadResult`].

use std::fmt;

mod geo_document;
mod spreadsheet;
mod synthetic;
mod tabular;

pub use geo_document::load_geo_document;
pub use spreadsheet::load_spreadsheet;
pub use synthetic::{synthetic_features, synthetic_practices, synthetic_suppliers};
pub use tabular::load_tabular;

/// Which of the three expected datasets a notice refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum DatasetKind {
    /// The practice-to-network spreadsheet.
    Spreadsheet,
    /// The per-practice supplier extract.
    Tabular,
    /// The network-boundary feature collection.
    GeoDocument,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Spreadsheet => "spreadsheet",
            DatasetKind::Tabular => "tabular",
            DatasetKind::GeoDocument => "geo document",
        };
        f.write_str(name)
    }
}

/// Outcome of loading one dataset: the real file, or a synthetic
/// placeholder substituted because the file was absent.
///
/// The substitution branch is a recognized condition, not an error; it is
/// logged when it happens and surfaced again in the run metadata.
#[derive(Clone, Debug)]
pub enum LoadResult<T> {
    /// The expected file was found and parsed.
    Loaded(T),
    /// The expected file was absent; `data` is a synthetic stand-in.
    Substituted {
        /// Placeholder dataset with the same shape as the real one.
        data: T,
        /// Human-readable explanation of why substitution happened.
        reason: String,
    },
}

impl<T> LoadResult<T> {
    /// Borrow the dataset, real or substituted.
    pub fn data(&self) -> &T {
        match self {
            LoadResult::Loaded(data) => data,
            LoadResult::Substituted { data, .. } => data,
        }
    }

    /// Take ownership of the dataset, real or substituted.
    pub fn into_data(self) -> T {
        match self {
            LoadResult::Loaded(data) => data,
            LoadResult::Substituted { data, .. } => data,
        }
    }

    /// Returns `true` when the dataset is a synthetic placeholder.
    pub fn is_substituted(&self) -> bool {
        matches!(self, LoadResult::Substituted { .. })
    }

    /// The substitution reason, when there is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            LoadResult::Loaded(_) => None,
            LoadResult::Substituted { reason, .. } => Some(reason),
        }
    }
}
