//! End-to-end pipeline orchestration.
//!
//! A run is a single linear batch: extract, load, normalize, aggregate,
//! emit the table, render the map. Each stage fully materializes its
//! output before the next starts, and no stage mutates data it did not
//! produce.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::aggregate::aggregate;
use crate::archive;
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::load::{
    load_geo_document, load_spreadsheet, load_tabular, DatasetKind, LoadResult,
};
use crate::normalize::{normalize_practices, normalize_suppliers, select_latest_per_practice};
use crate::output;
use crate::render;
use crate::types::SupplierName;

/// A dataset that was substituted with a synthetic placeholder during a
/// run, and why.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FallbackNotice {
    /// Which dataset was substituted.
    pub dataset: DatasetKind,
    /// Why the substitution happened.
    pub reason: String,
}

/// Metadata describing one completed pipeline run.
///
/// `fallbacks` lists every dataset that was substituted with placeholder
/// data, so consumers of the outputs can tell a demo run from a real one.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Files present in the working directory after extraction.
    pub extracted_files: usize,
    /// Practice records after normalization.
    pub practice_count: usize,
    /// Supplier observations before per-practice selection.
    pub observation_count: usize,
    /// Distinct networks in the aggregated output.
    pub network_count: usize,
    /// Supplier columns of the aggregated table, in output order.
    pub supplier_columns: Vec<SupplierName>,
    /// Total practices counted for the configured supplier A.
    pub total_supplier_a: u32,
    /// Total practices counted for the configured supplier B.
    pub total_supplier_b: u32,
    /// Datasets substituted with synthetic placeholders, if any.
    pub fallbacks: Vec<FallbackNotice>,
    /// Where the aggregated table was written.
    pub table_path: PathBuf,
    /// Where the map image was written.
    pub image_path: PathBuf,
}

impl RunReport {
    /// Returns `true` when any dataset was substituted with placeholder
    /// data during the run.
    pub fn used_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// Run the full pipeline over the archive at `archive_path`.
///
/// Fatal failures abort with an error before any further output is
/// written; dataset substitutions do not fail the run and are reported in
/// the returned [`RunReport`].
pub fn run(config: &PipelineConfig, archive_path: &Path) -> Result<RunReport, PipelineError> {
    let started_at = Utc::now();
    info!(archive = ?archive_path, work_dir = ?config.work_dir, "pipeline run starting");

    let extracted = archive::extract(archive_path, &config.work_dir)?;

    let mut fallbacks = Vec::new();
    let spreadsheet = load_spreadsheet(&config.work_dir, config)?;
    note_fallback(&mut fallbacks, DatasetKind::Spreadsheet, &spreadsheet);
    let tabular = load_tabular(&config.work_dir, config)?;
    note_fallback(&mut fallbacks, DatasetKind::Tabular, &tabular);
    let geo = load_geo_document(&config.work_dir, config)?;
    note_fallback(&mut fallbacks, DatasetKind::GeoDocument, &geo);

    let practices = normalize_practices(spreadsheet.data(), &config.spreadsheet_columns)?;
    let observations = normalize_suppliers(tabular.data(), &config.tabular_columns)?;
    let observation_count = observations.len();
    let supplier_by_practice = select_latest_per_practice(observations);

    let aggregated = aggregate(&practices, &supplier_by_practice, config);

    output::write_table(&aggregated, &config.output_table_path)?;
    render::render(&aggregated, geo.into_data(), config)?;

    let finished_at = Utc::now();
    let report = RunReport {
        started_at,
        finished_at,
        extracted_files: extracted.len(),
        practice_count: practices.len(),
        observation_count,
        network_count: aggregated.networks.len(),
        supplier_columns: aggregated.suppliers.clone(),
        total_supplier_a: aggregated.total_supplier_a,
        total_supplier_b: aggregated.total_supplier_b,
        fallbacks,
        table_path: config.output_table_path.clone(),
        image_path: config.output_image_path.clone(),
    };
    info!(
        networks = report.network_count,
        used_fallback = report.used_fallback(),
        elapsed_ms = (finished_at - started_at).num_milliseconds(),
        "pipeline run finished"
    );
    Ok(report)
}

fn note_fallback<T>(
    fallbacks: &mut Vec<FallbackNotice>,
    dataset: DatasetKind,
    result: &LoadResult<T>,
) {
    if let Some(reason) = result.reason() {
        fallbacks.push(FallbackNotice {
            dataset,
            reason: reason.to_string(),
        });
    }
}
