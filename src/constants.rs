/// Constants describing the expected layout of the extracted archive.
pub mod dataset {
    /// File name of the practice-to-network spreadsheet.
    pub const SPREADSHEET_FILE: &str = "ePCN.xlsx";
    /// Sheet holding the practice/network/region mapping rows.
    pub const SPREADSHEET_SHEET: &str = "PCN Core Partner Details";
    /// Filename prefix matched when locating the supplier extract.
    pub const TABULAR_PREFIX: &str = "POMI";
    /// Extension matched alongside [`TABULAR_PREFIX`].
    pub const TABULAR_EXTENSION: &str = "csv";
    /// File name of the network-boundary feature collection.
    pub const GEO_FILE: &str = "pcn_map.json";
    /// Extension identifying archives during nested extraction.
    pub const ARCHIVE_EXTENSION: &str = "zip";
}

/// Raw headers and canonical field names used by column renaming.
pub mod columns {
    /// Raw spreadsheet header for the practice code.
    pub const RAW_PRACTICE: &str = "Partner\nOrganisation\nCode";
    /// Raw spreadsheet header for the network code.
    pub const RAW_PCN: &str = "PCN Code";
    /// Raw spreadsheet header for the region code.
    pub const RAW_REGION: &str = "Practice\nParent\nSub ICB Loc Code";
    /// Canonical practice code field, also the tabular extract's header.
    pub const PRACTICE_CODE: &str = "practice_code";
    /// Canonical network code field.
    pub const PCN_CODE: &str = "pcn_code";
    /// Canonical region code field.
    pub const REGION_CODE: &str = "ICB";
    /// Canonical supplier field, also the tabular extract's header.
    pub const SUPPLIER: &str = "system_supplier";
}

/// Constants for the synthetic placeholder datasets substituted when an
/// expected file is absent from the extracted archive.
pub mod synthetic {
    /// Number of placeholder practices, networks, and point geometries.
    pub const COUNT: usize = 5;
    /// Longitude of the first placeholder point (central London).
    pub const BASE_LON: f64 = -0.1278;
    /// Latitude of the first placeholder point.
    pub const BASE_LAT: f64 = 51.5074;
    /// Per-feature coordinate step applied to both axes.
    pub const COORD_STEP: f64 = 0.1;
}

/// Proj strings for the coordinate reference systems used by rendering.
pub mod crs {
    /// WGS84 geographic coordinates, the CRS of the input geometries.
    pub const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";
    /// British National Grid (EPSG:27700), the projected CRS the map is
    /// drawn in.
    pub const BRITISH_NATIONAL_GRID: &str = "+proj=tmerc +lat_0=49 +lon_0=-2 \
         +k=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy \
         +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 \
         +units=m +no_defs";
}

/// Layout constants for the rendered map image.
pub mod render {
    /// Default image width in pixels.
    pub const IMAGE_WIDTH: u32 = 1500;
    /// Default image height in pixels.
    pub const IMAGE_HEIGHT: u32 = 1500;
    /// Margin kept clear around the map area, in pixels.
    pub const MARGIN: i32 = 60;
    /// Width of the legend colour bar, in pixels.
    pub const LEGEND_WIDTH: i32 = 30;
    /// Horizontal gap between the map area and the legend bar.
    pub const LEGEND_GAP: i32 = 40;
    /// Radius used when a network geometry is a point rather than a polygon.
    pub const POINT_RADIUS: i32 = 6;
    /// Font size of the totals annotation lines.
    pub const ANNOTATION_FONT_SIZE: u32 = 28;
    /// Font size of the legend caption and tick labels.
    pub const LEGEND_FONT_SIZE: u32 = 20;
}
