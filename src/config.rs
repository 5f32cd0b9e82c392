use std::path::PathBuf;

use crate::color::DivergingScale;
use crate::constants::{columns, crs, dataset, render};
use crate::types::{RawHeader, SupplierName};

/// Raw spreadsheet headers mapped onto the canonical practice record
/// fields.
///
/// A header is looked up verbatim first; when absent, the canonical field
/// name itself is tried, so datasets that already carry canonical headers
/// (including the synthetic placeholders) load without a mapping change.
#[derive(Clone, Debug)]
pub struct SpreadsheetColumns {
    /// Header of the column holding the practice code.
    pub practice_code: RawHeader,
    /// Header of the column holding the network code.
    pub pcn_code: RawHeader,
    /// Header of the column holding the region code.
    pub region_code: RawHeader,
}

impl Default for SpreadsheetColumns {
    fn default() -> Self {
        Self {
            practice_code: columns::RAW_PRACTICE.to_string(),
            pcn_code: columns::RAW_PCN.to_string(),
            region_code: columns::RAW_REGION.to_string(),
        }
    }
}

/// Raw tabular-extract headers mapped onto the canonical supplier
/// observation fields. Same fallback-to-canonical lookup as
/// [`SpreadsheetColumns`].
#[derive(Clone, Debug)]
pub struct TabularColumns {
    /// Header of the column holding the practice code.
    pub practice_code: RawHeader,
    /// Header of the column holding the supplier name.
    pub supplier: RawHeader,
}

impl Default for TabularColumns {
    fn default() -> Self {
        Self {
            practice_code: columns::PRACTICE_CODE.to_string(),
            supplier: columns::SUPPLIER.to_string(),
        }
    }
}

/// Top-level pipeline configuration.
///
/// Defaults reproduce the published NHS dataset layout: `ePCN.xlsx` with
/// the "PCN Core Partner Details" sheet, a `POMI*.csv` supplier extract,
/// `pcn_map.json` boundaries in WGS84 reprojected to British National
/// Grid, and EMIS/TPP as the two suppliers the map contrasts.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Directory the archive is extracted into.
    pub work_dir: PathBuf,
    /// Expected spreadsheet file name inside the extracted tree.
    pub spreadsheet_file: String,
    /// Sheet holding the practice/network/region rows.
    pub spreadsheet_sheet: String,
    /// Raw-to-canonical column mapping for the spreadsheet.
    pub spreadsheet_columns: SpreadsheetColumns,
    /// Filename prefix used to locate the tabular supplier extract.
    pub tabular_prefix: String,
    /// Raw-to-canonical column mapping for the tabular extract.
    pub tabular_columns: TabularColumns,
    /// Expected feature-collection file name.
    pub geo_file: String,
    /// When `true`, a missing dataset file is replaced by a synthetic
    /// placeholder instead of failing the run. The substitution is
    /// reported in the run metadata either way.
    pub allow_fallback: bool,
    /// Proj string of the CRS the input geometries are expressed in.
    pub source_crs: String,
    /// Proj string of the projected CRS the map is drawn in.
    pub target_crs: String,
    /// Supplier whose share drives the colour fraction (numerator).
    pub supplier_a: SupplierName,
    /// Supplier forming the other half of the contrast (denominator
    /// partner).
    pub supplier_b: SupplierName,
    /// Diverging colour scale applied to the supplier fraction.
    pub scale: DivergingScale,
    /// Path the aggregated count table is written to.
    pub output_table_path: PathBuf,
    /// Path the rendered map image is written to.
    pub output_image_path: PathBuf,
    /// Rendered image width in pixels.
    pub image_width: u32,
    /// Rendered image height in pixels.
    pub image_height: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("extracted"),
            spreadsheet_file: dataset::SPREADSHEET_FILE.to_string(),
            spreadsheet_sheet: dataset::SPREADSHEET_SHEET.to_string(),
            spreadsheet_columns: SpreadsheetColumns::default(),
            tabular_prefix: dataset::TABULAR_PREFIX.to_string(),
            tabular_columns: TabularColumns::default(),
            geo_file: dataset::GEO_FILE.to_string(),
            allow_fallback: true,
            source_crs: crs::WGS84.to_string(),
            target_crs: crs::BRITISH_NATIONAL_GRID.to_string(),
            supplier_a: "EMIS".to_string(),
            supplier_b: "TPP".to_string(),
            scale: DivergingScale::default(),
            output_table_path: PathBuf::from("output/pcn_system_supplier_counts_with_icb.csv"),
            output_image_path: PathBuf::from("output/pcn_map.png"),
            image_width: render::IMAGE_WIDTH,
            image_height: render::IMAGE_HEIGHT,
        }
    }
}
