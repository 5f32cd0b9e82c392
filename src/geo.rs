//! Network boundary geometries and coordinate reprojection.

use geojson::{FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use proj4rs::transform::transform;
use proj4rs::Proj;
use tracing::warn;

use crate::errors::PipelineError;
use crate::types::PcnCode;

/// One network's boundary: the feature `code` property, its geometry, and
/// the remaining properties.
#[derive(Clone, Debug)]
pub struct GeoFeature {
    /// Network code matched against aggregated `pcn_code` values.
    pub code: PcnCode,
    /// Point, polygon, or multipolygon geometry.
    pub geometry: Geometry,
    /// All properties carried by the source feature.
    pub properties: JsonObject,
}

/// An owned set of network boundary features in a single CRS.
#[derive(Clone, Debug, Default)]
pub struct FeatureSet {
    features: Vec<GeoFeature>,
}

impl FeatureSet {
    /// Build a set from already-constructed features.
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    /// Parse a GeoJSON feature-collection document.
    ///
    /// Features without a geometry or without a string `code` property are
    /// skipped with a warning; they could never join to an aggregated
    /// network. `file` is only used in error text.
    pub fn from_geojson_str(text: &str, file: &str) -> Result<Self, PipelineError> {
        let geojson: GeoJson = text.parse().map_err(|err: geojson::Error| {
            PipelineError::Schema {
                file: file.to_string(),
                detail: format!("not valid GeoJSON: {err}"),
            }
        })?;
        let collection =
            FeatureCollection::try_from(geojson).map_err(|err| PipelineError::Schema {
                file: file.to_string(),
                detail: format!("not a feature collection: {err}"),
            })?;

        let mut features = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let code = feature
                .property("code")
                .and_then(|value| value.as_str())
                .map(str::to_string);
            let (Some(code), Some(geometry)) = (code, feature.geometry) else {
                warn!(file, "skipping feature without code property or geometry");
                continue;
            };
            features.push(GeoFeature {
                code,
                geometry,
                properties: feature.properties.unwrap_or_default(),
            });
        }
        Ok(Self { features })
    }

    /// Features in document order.
    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` when the set holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Reproject every coordinate in place.
    pub fn reproject(&mut self, projector: &Reprojector) -> Result<(), PipelineError> {
        for feature in &mut self.features {
            transform_value(&mut feature.geometry.value, projector)?;
        }
        Ok(())
    }

    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)` over every
    /// coordinate in the set, or `None` when the set has no coordinates.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for feature in &self.features {
            each_position(&feature.geometry.value, &mut |x, y| {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((min_x, min_y, max_x, max_y)) => {
                        (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                    }
                });
            });
        }
        bounds
    }
}

/// A reusable projection between two configured CRS proj strings.
///
/// Angular coordinates cross the proj boundary in radians; this wrapper
/// converts from and to degrees whenever the respective CRS is geographic,
/// so callers always work in the conventional units of each CRS.
pub struct Reprojector {
    source: Proj,
    target: Proj,
}

impl Reprojector {
    /// Build a projection from two proj strings.
    pub fn new(source_crs: &str, target_crs: &str) -> Result<Self, PipelineError> {
        let source = Proj::from_proj_string(source_crs)
            .map_err(|err| PipelineError::Render(format!("invalid source CRS: {err}")))?;
        let target = Proj::from_proj_string(target_crs)
            .map_err(|err| PipelineError::Render(format!("invalid target CRS: {err}")))?;
        Ok(Self { source, target })
    }

    /// Project a single `(x, y)` position from the source CRS to the
    /// target CRS.
    pub fn project(&self, x: f64, y: f64) -> Result<(f64, f64), PipelineError> {
        let mut point = if self.source.is_latlong() {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };
        transform(&self.source, &self.target, &mut point)
            .map_err(|err| PipelineError::Render(format!("reprojection failed: {err}")))?;
        if self.target.is_latlong() {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok((point.0, point.1))
        }
    }
}

fn transform_value(value: &mut Value, projector: &Reprojector) -> Result<(), PipelineError> {
    match value {
        Value::Point(position) => transform_position(position, projector),
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            for position in positions {
                transform_position(position, projector)?;
            }
            Ok(())
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            for line in lines {
                for position in line {
                    transform_position(position, projector)?;
                }
            }
            Ok(())
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                for ring in polygon {
                    for position in ring {
                        transform_position(position, projector)?;
                    }
                }
            }
            Ok(())
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                transform_value(&mut geometry.value, projector)?;
            }
            Ok(())
        }
    }
}

fn transform_position(position: &mut [f64], projector: &Reprojector) -> Result<(), PipelineError> {
    if position.len() < 2 {
        return Err(PipelineError::Render(
            "geometry position with fewer than two coordinates".to_string(),
        ));
    }
    let (x, y) = projector.project(position[0], position[1])?;
    position[0] = x;
    position[1] = y;
    Ok(())
}

/// Visit every `(x, y)` position of a geometry value.
pub fn each_position(value: &Value, visit: &mut impl FnMut(f64, f64)) {
    match value {
        Value::Point(position) => {
            if position.len() >= 2 {
                visit(position[0], position[1]);
            }
        }
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            for position in positions {
                if position.len() >= 2 {
                    visit(position[0], position[1]);
                }
            }
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            for line in lines {
                for position in line {
                    if position.len() >= 2 {
                        visit(position[0], position[1]);
                    }
                }
            }
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                for ring in polygon {
                    for position in ring {
                        if position.len() >= 2 {
                            visit(position[0], position[1]);
                        }
                    }
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                each_position(&geometry.value, visit);
            }
        }
    }
}
