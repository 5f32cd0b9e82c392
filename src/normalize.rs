//! Canonical record shapes and the positional supplier selection rule.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{SpreadsheetColumns, TabularColumns};
use crate::constants::columns;
use crate::errors::PipelineError;
use crate::table::Table;
use crate::types::{PcnCode, PracticeCode, RegionCode, SupplierName};

/// One practice-to-network membership fact from the spreadsheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeRecord {
    /// Practice identifier.
    pub practice_code: PracticeCode,
    /// Network the practice belongs to.
    pub pcn_code: PcnCode,
    /// Region the practice's network sits in.
    pub region_code: RegionCode,
    /// Original row position in the source table. Tie-breaks downstream
    /// (first-seen region per network) are defined over this order.
    pub row_index: usize,
}

/// One supplier observation for a practice from the tabular extract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupplierObservation {
    /// Practice identifier.
    pub practice_code: PracticeCode,
    /// Clinical system supplier reported for the practice.
    pub supplier: SupplierName,
    /// Original row position in the source table; the selection rule
    /// keeps the observation with the greatest index per practice.
    pub row_index: usize,
}

/// Rename spreadsheet columns into [`PracticeRecord`]s.
///
/// A mapped column that cannot be resolved (neither the raw header nor
/// its canonical name is present) is a schema error. Rows with any empty
/// required field after renaming are dropped.
pub fn normalize_practices(
    table: &Table,
    mapping: &SpreadsheetColumns,
) -> Result<Vec<PracticeRecord>, PipelineError> {
    let practice = resolve_column(table, &mapping.practice_code, columns::PRACTICE_CODE)?;
    let pcn = resolve_column(table, &mapping.pcn_code, columns::PCN_CODE)?;
    let region = resolve_column(table, &mapping.region_code, columns::REGION_CODE)?;

    let mut records = Vec::with_capacity(table.len());
    let mut dropped = 0usize;
    for (row_index, row) in table.rows().iter().enumerate() {
        let practice_code = row[practice].trim();
        let pcn_code = row[pcn].trim();
        let region_code = row[region].trim();
        if practice_code.is_empty() || pcn_code.is_empty() || region_code.is_empty() {
            dropped += 1;
            continue;
        }
        records.push(PracticeRecord {
            practice_code: practice_code.to_string(),
            pcn_code: pcn_code.to_string(),
            region_code: region_code.to_string(),
            row_index,
        });
    }
    if dropped > 0 {
        debug!(dropped, "dropped practice rows with missing required fields");
    }
    Ok(records)
}

/// Rename tabular-extract columns into [`SupplierObservation`]s, keeping
/// the source row order as an explicit index.
pub fn normalize_suppliers(
    table: &Table,
    mapping: &TabularColumns,
) -> Result<Vec<SupplierObservation>, PipelineError> {
    let practice = resolve_column(table, &mapping.practice_code, columns::PRACTICE_CODE)?;
    let supplier = resolve_column(table, &mapping.supplier, columns::SUPPLIER)?;

    let mut observations = Vec::with_capacity(table.len());
    for (row_index, row) in table.rows().iter().enumerate() {
        let practice_code = row[practice].trim();
        let supplier_name = row[supplier].trim();
        if practice_code.is_empty() || supplier_name.is_empty() {
            continue;
        }
        observations.push(SupplierObservation {
            practice_code: practice_code.to_string(),
            supplier: supplier_name.to_string(),
            row_index,
        });
    }
    Ok(observations)
}

/// Resolve repeated observations to one per practice: the **last** row in
/// the original file order wins.
///
/// This is a deliberate positional recency heuristic — there is no
/// timestamp comparison. The returned map preserves first-seen practice
/// order.
pub fn select_latest_per_practice(
    observations: Vec<SupplierObservation>,
) -> IndexMap<PracticeCode, SupplierObservation> {
    let mut latest: IndexMap<PracticeCode, SupplierObservation> = IndexMap::new();
    for observation in observations {
        // IndexMap keeps the first insertion position on overwrite, so
        // practice order stays stable while the value advances.
        latest.insert(observation.practice_code.clone(), observation);
    }
    latest
}

/// Look a column up by its configured raw header, falling back to the
/// canonical field name so pre-normalized tables (placeholders included)
/// resolve without a mapping change.
fn resolve_column(table: &Table, raw: &str, canonical: &str) -> Result<usize, PipelineError> {
    table
        .column_index(raw)
        .or_else(|| table.column_index(canonical))
        .ok_or_else(|| PipelineError::Schema {
            file: "normalized input".to_string(),
            detail: format!("no column matching '{}' or '{canonical}'", raw.escape_debug()),
        })
}
