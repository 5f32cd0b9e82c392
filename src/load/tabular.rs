use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{synthetic_suppliers, LoadResult};
use crate::config::PipelineConfig;
use crate::constants::dataset;
use crate::errors::PipelineError;
use crate::table::Table;

/// Load the per-practice supplier extract from `dir`.
///
/// The file is located by prefix match (`POMI*.csv` by default). Candidate
/// names are sorted before the first is taken, so the choice is
/// deterministic even when several periods' extracts are present.
pub fn load_tabular(
    dir: &Path,
    config: &PipelineConfig,
) -> Result<LoadResult<Table>, PipelineError> {
    let Some(path) = find_by_prefix(dir, &config.tabular_prefix)? else {
        if !config.allow_fallback {
            return Err(PipelineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "no {}*.{} file under {dir:?} and fallback is disabled",
                    config.tabular_prefix,
                    dataset::TABULAR_EXTENSION
                ),
            )));
        }
        let reason = format!(
            "no {}*.{} file found",
            config.tabular_prefix,
            dataset::TABULAR_EXTENSION
        );
        warn!(%reason, "substituting synthetic supplier data");
        return Ok(LoadResult::Substituted {
            data: synthetic_suppliers(),
            reason,
        });
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("tabular")
        .to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(|err| PipelineError::Schema {
            file: file_name.clone(),
            detail: format!("could not open CSV: {err}"),
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| PipelineError::Schema {
            file: file_name.clone(),
            detail: format!("unreadable header row: {err}"),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(|err| PipelineError::Schema {
            file: file_name.clone(),
            detail: format!("unreadable row: {err}"),
        })?;
        table.push_row(record.iter().map(str::to_string).collect());
    }
    info!(file = %file_name, rows = table.len(), "loaded tabular extract");
    Ok(LoadResult::Loaded(table))
}

/// First `<prefix>*.csv` file in `dir` after a name sort, if any.
fn find_by_prefix(dir: &Path, prefix: &str) -> Result<Option<PathBuf>, PipelineError> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(prefix))
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(dataset::TABULAR_EXTENSION))
        })
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}
