//! Recursive archive extraction.
//!
//! The publication archive may contain further zips (the boundary document
//! ships inside a secondary archive in some periods), so after the first
//! extraction the working directory is walked repeatedly and every archive
//! found is expanded in place, until no unexpanded archive remains.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::constants::dataset;
use crate::errors::PipelineError;

/// Classification of a file found in the extracted working directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractedKind {
    /// An `.xlsx` spreadsheet.
    Spreadsheet,
    /// A `.csv` tabular extract.
    Tabular,
    /// A `.json`/`.geojson` feature-collection document.
    GeoDocument,
    /// A nested archive (already expanded in place by extraction).
    Archive,
    /// Anything else.
    Other,
}

/// One file in the extracted working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Classification by file extension.
    pub kind: ExtractedKind,
}

/// Extract `archive_path` fully into `dest_dir`, expanding nested archives
/// in place at arbitrary depth, and return the resulting file inventory
/// sorted by path.
///
/// A corrupt top-level or nested archive aborts with
/// [`PipelineError::Archive`] naming the offending container; nested
/// failures are never skipped silently.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<Vec<ExtractedFile>, PipelineError> {
    fs::create_dir_all(dest_dir)?;
    unpack(archive_path, dest_dir)?;

    // Expand nested archives until a full walk finds none we have not
    // already expanded. Expanded containers stay on disk, so the guard set
    // keys on path.
    let mut expanded: HashSet<PathBuf> = HashSet::new();
    loop {
        let pending: Vec<PathBuf> = WalkDir::new(dest_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path().to_path_buf())
            .filter(|path| is_archive(path) && !expanded.contains(path))
            .collect();
        if pending.is_empty() {
            break;
        }
        for path in pending {
            let parent = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dest_dir.to_path_buf());
            debug!(nested = ?path, "expanding nested archive in place");
            unpack(&path, &parent)?;
            expanded.insert(path);
        }
    }

    let inventory = inventory(dest_dir);
    info!(
        archive = ?archive_path,
        files = inventory.len(),
        nested = expanded.len(),
        "archive extracted"
    );
    Ok(inventory)
}

/// Walk `dest_dir` and classify every file, sorted by path so the
/// inventory is deterministic across platforms.
pub fn inventory(dest_dir: &Path) -> Vec<ExtractedFile> {
    let mut files: Vec<ExtractedFile> = WalkDir::new(dest_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let path = entry.path().to_path_buf();
            let kind = classify(&path);
            ExtractedFile { path, kind }
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn unpack(path: &Path, dest: &Path) -> Result<(), PipelineError> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|source| PipelineError::Archive {
        path: path.to_path_buf(),
        source,
    })?;
    archive.extract(dest).map_err(|source| PipelineError::Archive {
        path: path.to_path_buf(),
        source,
    })
}

fn is_archive(path: &Path) -> bool {
    has_extension(path, dataset::ARCHIVE_EXTENSION)
}

fn classify(path: &Path) -> ExtractedKind {
    if is_archive(path) {
        ExtractedKind::Archive
    } else if has_extension(path, "xlsx") {
        ExtractedKind::Spreadsheet
    } else if has_extension(path, dataset::TABULAR_EXTENSION) {
        ExtractedKind::Tabular
    } else if has_extension(path, "json") || has_extension(path, "geojson") {
        ExtractedKind::GeoDocument
    } else {
        ExtractedKind::Other
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}
