use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use super::{synthetic_features, LoadResult};
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::geo::FeatureSet;

/// Load the network-boundary feature collection from `dir`.
///
/// A present document that is not valid GeoJSON is a schema error;
/// only an absent file triggers the synthetic point-feature placeholder.
pub fn load_geo_document(
    dir: &Path,
    config: &PipelineConfig,
) -> Result<LoadResult<FeatureSet>, PipelineError> {
    let path = dir.join(&config.geo_file);
    if !path.is_file() {
        if !config.allow_fallback {
            return Err(PipelineError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("geo document {path:?} not found and fallback is disabled"),
            )));
        }
        let reason = format!("geo document {:?} not found", config.geo_file);
        warn!(%reason, "substituting synthetic point geometries");
        return Ok(LoadResult::Substituted {
            data: synthetic_features(),
            reason,
        });
    }

    let text = fs::read_to_string(&path)?;
    let features = FeatureSet::from_geojson_str(&text, &config.geo_file)?;
    info!(file = %config.geo_file, features = features.len(), "loaded geo document");
    Ok(LoadResult::Loaded(features))
}
