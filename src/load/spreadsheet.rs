use std::io;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::{info, warn};

use super::{synthetic_practices, LoadResult};
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::table::Table;

/// Load the practice-to-network spreadsheet from `dir`.
///
/// The configured sheet's first row is taken as headers and every cell is
/// coerced to its string form; interpretation is left to the normalizer.
/// A present file with a missing sheet is a schema error, never a
/// fallback.
pub fn load_spreadsheet(
    dir: &Path,
    config: &PipelineConfig,
) -> Result<LoadResult<Table>, PipelineError> {
    let path = dir.join(&config.spreadsheet_file);
    if !path.is_file() {
        if !config.allow_fallback {
            return Err(PipelineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("spreadsheet {path:?} not found and fallback is disabled"),
            )));
        }
        let reason = format!("spreadsheet {:?} not found", config.spreadsheet_file);
        warn!(%reason, "substituting synthetic practice data");
        return Ok(LoadResult::Substituted {
            data: synthetic_practices(),
            reason,
        });
    }

    let mut workbook: Xlsx<_> = open_workbook(&path).map_err(|err| PipelineError::Schema {
        file: config.spreadsheet_file.clone(),
        detail: format!("could not open workbook: {err}"),
    })?;
    let range = workbook
        .worksheet_range(&config.spreadsheet_sheet)
        .map_err(|err| PipelineError::Schema {
            file: config.spreadsheet_file.clone(),
            detail: format!("sheet '{}' unavailable: {err}", config.spreadsheet_sheet),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .ok_or_else(|| PipelineError::Schema {
            file: config.spreadsheet_file.clone(),
            detail: format!("sheet '{}' is empty", config.spreadsheet_sheet),
        })?;

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_to_string).collect());
    }
    info!(
        file = %config.spreadsheet_file,
        rows = table.len(),
        "loaded spreadsheet"
    );
    Ok(LoadResult::Loaded(table))
}

/// Coerce one cell to its string form. Whole-number floats lose their
/// fractional point so codes survive numeric inference in the source file.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) if value.fract() == 0.0 => format!("{}", *value as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_substitutes_synthetic_practices() {
        let temp = tempdir().unwrap();
        let config = PipelineConfig::default();
        let result = load_spreadsheet(temp.path(), &config).unwrap();
        assert!(result.is_substituted());
        assert_eq!(result.data().len(), 5);
        assert_eq!(result.data().headers(), ["practice_code", "pcn_code", "ICB"]);
    }

    #[test]
    fn missing_file_with_fallback_disabled_is_an_error() {
        let temp = tempdir().unwrap();
        let config = PipelineConfig {
            allow_fallback: false,
            ..PipelineConfig::default()
        };
        let err = load_spreadsheet(temp.path(), &config).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn present_but_unreadable_file_is_a_schema_error_not_a_fallback() {
        let temp = tempdir().unwrap();
        let config = PipelineConfig::default();
        std::fs::write(temp.path().join(&config.spreadsheet_file), b"not an xlsx").unwrap();
        let err = load_spreadsheet(temp.path(), &config).unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }));
    }

    #[test]
    fn cell_coercion_keeps_codes_intact() {
        assert_eq!(cell_to_string(&Data::String("P81001".to_string())), "P81001");
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
