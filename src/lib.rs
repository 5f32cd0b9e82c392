#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Per-network aggregation: join, wide pivot, region attachment.
pub mod aggregate;
/// Recursive archive extraction.
pub mod archive;
/// Diverging colour scale used by the renderer.
pub mod color;
/// Pipeline configuration types.
pub mod config;
/// Default file names, column headers, CRS strings, and layout constants.
pub mod constants;
/// Network boundary geometries and reprojection.
pub mod geo;
/// Dataset location, parsing, and placeholder substitution.
pub mod load;
/// Canonical record shapes and the positional supplier selection rule.
pub mod normalize;
/// Aggregated-table CSV emission.
pub mod output;
/// End-to-end run orchestration.
pub mod pipeline;
/// Choropleth map rendering.
pub mod render;
/// In-memory table shared by loaders and the normalizer.
pub mod table;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregate::{aggregate as aggregate_networks, AggregateOutput, AggregatedNetwork};
pub use archive::{extract, ExtractedFile, ExtractedKind};
pub use color::{DivergingScale, Rgb};
pub use config::{PipelineConfig, SpreadsheetColumns, TabularColumns};
pub use errors::PipelineError;
pub use geo::{FeatureSet, GeoFeature, Reprojector};
pub use load::{DatasetKind, LoadResult};
pub use normalize::{PracticeRecord, SupplierObservation};
pub use pipeline::{run, FallbackNotice, RunReport};
pub use table::Table;
