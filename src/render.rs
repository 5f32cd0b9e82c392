//! Choropleth map rendering.
//!
//! Joins aggregated networks onto reprojected boundary geometries, fills
//! each network with its diverging-scale colour, and writes a PNG with a
//! legend bar and the two supplier-total annotation lines. The image is
//! written to a temporary path and moved into place on success.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use geojson::Value;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::aggregate::{AggregateOutput, AggregatedNetwork};
use crate::color::Rgb;
use crate::config::PipelineConfig;
use crate::constants::render as layout;
use crate::errors::PipelineError;
use crate::geo::{FeatureSet, GeoFeature, Reprojector};

/// Render the map for `output` over `features` and write it to the
/// configured image path.
///
/// Features without a matching aggregated network are dropped from the
/// render; networks without a geometry are omitted from the map only (the
/// table writer still emits them).
pub fn render(
    output: &AggregateOutput,
    mut features: FeatureSet,
    config: &PipelineConfig,
) -> Result<(), PipelineError> {
    let projector = Reprojector::new(&config.source_crs, &config.target_crs)?;
    features.reproject(&projector)?;

    let by_code: HashMap<&str, &AggregatedNetwork> = output
        .networks
        .iter()
        .map(|network| (network.pcn_code.as_str(), network))
        .collect();
    let joined: Vec<(&GeoFeature, &AggregatedNetwork)> = features
        .features()
        .iter()
        .filter_map(|feature| {
            let network = by_code.get(feature.code.as_str()).copied();
            if network.is_none() {
                debug!(code = %feature.code, "feature has no aggregated network; dropped");
            }
            network.map(|network| (feature, network))
        })
        .collect();

    let joined_set = FeatureSet::new(joined.iter().map(|(f, _)| (*f).clone()).collect());
    let bounds = joined_set.bounds().unwrap_or((0.0, 0.0, 1.0, 1.0));
    let mapper = PixelMapper::new(bounds, config.image_width, config.image_height);

    let parent = match config.output_image_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .suffix(".png")
        .tempfile_in(parent)?;

    {
        let root = BitMapBackend::new(temp.path(), (config.image_width, config.image_height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        for (feature, network) in &joined {
            let color = config
                .scale
                .color_for(network.supplier_fraction(&config.supplier_a, &config.supplier_b));
            draw_geometry(&root, &feature.geometry.value, &mapper, color)?;
        }

        draw_legend(&root, config)?;
        draw_annotations(&root, output, config)?;
        root.present().map_err(draw_err)?;
    }

    temp.persist(&config.output_image_path)
        .map_err(|err| PipelineError::Io(err.error))?;
    info!(
        image = ?config.output_image_path,
        rendered = joined.len(),
        dropped_features = features.len() - joined.len(),
        "wrote choropleth map"
    );
    Ok(())
}

/// Scales projected coordinates into the map area, preserving aspect
/// ratio and flipping the y axis into screen orientation.
struct PixelMapper {
    min_x: f64,
    min_y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    bottom: f64,
}

impl PixelMapper {
    fn new(bounds: (f64, f64, f64, f64), width: u32, height: u32) -> Self {
        let (min_x, min_y, max_x, max_y) = bounds;
        let avail_w = f64::from(
            width as i32 - 2 * layout::MARGIN - layout::LEGEND_WIDTH - layout::LEGEND_GAP,
        )
        .max(1.0);
        let avail_h = f64::from(height as i32 - 2 * layout::MARGIN).max(1.0);
        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let scale = (avail_w / span_x).min(avail_h / span_y);
        // Center the drawing inside the available area.
        let offset_x = f64::from(layout::MARGIN) + (avail_w - span_x * scale) / 2.0;
        let offset_y = f64::from(layout::MARGIN) + (avail_h - span_y * scale) / 2.0;
        Self {
            min_x,
            min_y,
            scale,
            offset_x,
            offset_y,
            bottom: span_y * scale,
        }
    }

    fn to_pixel(&self, x: f64, y: f64) -> (i32, i32) {
        let px = self.offset_x + (x - self.min_x) * self.scale;
        let py = self.offset_y + (self.bottom - (y - self.min_y) * self.scale);
        (px.round() as i32, py.round() as i32)
    }
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn draw_geometry(
    root: &Root<'_>,
    value: &Value,
    mapper: &PixelMapper,
    color: Rgb,
) -> Result<(), PipelineError> {
    let fill = to_rgb_color(color);
    match value {
        Value::Point(position) => {
            if position.len() >= 2 {
                let center = mapper.to_pixel(position[0], position[1]);
                root.draw(&Circle::new(center, layout::POINT_RADIUS, fill.filled()))
                    .map_err(draw_err)?;
            }
        }
        Value::Polygon(rings) => {
            draw_polygon_rings(root, rings, mapper, fill)?;
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                draw_polygon_rings(root, rings, mapper, fill)?;
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                draw_geometry(root, &geometry.value, mapper, color)?;
            }
        }
        // Line geometries do not occur in boundary documents; draw them
        // as their path so they at least remain visible.
        Value::LineString(positions) => {
            let points: Vec<(i32, i32)> = positions
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| mapper.to_pixel(p[0], p[1]))
                .collect();
            root.draw(&PathElement::new(points, fill.stroke_width(1)))
                .map_err(draw_err)?;
        }
        Value::MultiPoint(positions) => {
            for position in positions {
                if position.len() >= 2 {
                    let center = mapper.to_pixel(position[0], position[1]);
                    root.draw(&Circle::new(center, layout::POINT_RADIUS, fill.filled()))
                        .map_err(draw_err)?;
                }
            }
        }
        Value::MultiLineString(lines) => {
            for positions in lines {
                let points: Vec<(i32, i32)> = positions
                    .iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| mapper.to_pixel(p[0], p[1]))
                    .collect();
                root.draw(&PathElement::new(points, fill.stroke_width(1)))
                    .map_err(draw_err)?;
            }
        }
    }
    Ok(())
}

/// Fill a polygon's exterior ring. Interior rings (holes) are not punched
/// out; network boundaries in the source data do not carry them.
fn draw_polygon_rings(
    root: &Root<'_>,
    rings: &[Vec<Vec<f64>>],
    mapper: &PixelMapper,
    fill: RGBColor,
) -> Result<(), PipelineError> {
    let Some(exterior) = rings.first() else {
        return Ok(());
    };
    let points: Vec<(i32, i32)> = exterior
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| mapper.to_pixel(p[0], p[1]))
        .collect();
    if points.len() >= 3 {
        root.draw(&Polygon::new(points, fill.filled()))
            .map_err(draw_err)?;
    }
    Ok(())
}

fn draw_legend(root: &Root<'_>, config: &PipelineConfig) -> Result<(), PipelineError> {
    let width = config.image_width as i32;
    let height = config.image_height as i32;
    let x0 = width - layout::MARGIN - layout::LEGEND_WIDTH;
    let x1 = width - layout::MARGIN;
    let y0 = layout::MARGIN;
    let y1 = height - layout::MARGIN;

    // Gradient bar: fraction 1 at the top, 0 at the bottom.
    for y in y0..y1 {
        let fraction = 1.0 - f64::from(y - y0) / f64::from(y1 - y0);
        let color = to_rgb_color(config.scale.color_at(fraction));
        root.draw(&Rectangle::new([(x0, y), (x1, y + 1)], color.filled()))
            .map_err(draw_err)?;
    }
    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))
        .map_err(draw_err)?;

    let tick_style = ("sans-serif", layout::LEGEND_FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (fraction, label) in [(1.0, "1.0"), (0.5, "0.5"), (0.0, "0.0")] {
        let y = y1 - ((f64::from(y1 - y0) * fraction).round() as i32);
        root.draw(&Text::new(label, (x0 - 6, y), tick_style.clone()))
            .map_err(draw_err)?;
    }

    let caption = format!(
        "Proportion of {} (blue) to {} (red)",
        config.supplier_a, config.supplier_b
    );
    let caption_style = ("sans-serif", layout::LEGEND_FONT_SIZE)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);
    root.draw(&Text::new(caption, (x1 + 4, y0), caption_style))
        .map_err(draw_err)?;
    Ok(())
}

fn draw_annotations(
    root: &Root<'_>,
    output: &AggregateOutput,
    config: &PipelineConfig,
) -> Result<(), PipelineError> {
    let style = ("sans-serif", layout::ANNOTATION_FONT_SIZE)
        .into_font()
        .color(&BLACK);
    let lines = [
        format!(
            "Total {} Practices: {}",
            config.supplier_b, output.total_supplier_b
        ),
        format!(
            "Total {} Practices: {}",
            config.supplier_a, output.total_supplier_a
        ),
    ];
    for (idx, line) in lines.iter().enumerate() {
        let y = layout::MARGIN + idx as i32 * (layout::ANNOTATION_FONT_SIZE as i32 + 10);
        root.draw(&Text::new(line.clone(), (layout::MARGIN, y), style.clone()))
            .map_err(draw_err)?;
    }
    Ok(())
}

fn to_rgb_color(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn draw_err<E: std::fmt::Display>(err: E) -> PipelineError {
    PipelineError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{synthetic_features, synthetic_practices, synthetic_suppliers};
    use crate::normalize::{normalize_practices, normalize_suppliers, select_latest_per_practice};
    use tempfile::tempdir;

    fn synthetic_output(config: &PipelineConfig) -> AggregateOutput {
        let practices =
            normalize_practices(&synthetic_practices(), &config.spreadsheet_columns).unwrap();
        let observations =
            normalize_suppliers(&synthetic_suppliers(), &config.tabular_columns).unwrap();
        let latest = select_latest_per_practice(observations);
        crate::aggregate::aggregate(&practices, &latest, config)
    }

    #[test]
    fn renders_synthetic_point_map_to_a_png() {
        let temp = tempdir().unwrap();
        let config = PipelineConfig {
            output_image_path: temp.path().join("map.png"),
            image_width: 400,
            image_height: 400,
            ..PipelineConfig::default()
        };
        let output = synthetic_output(&config);
        render(&output, synthetic_features(), &config).unwrap();

        let bytes = fs::read(&config.output_image_path).unwrap();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[1..4], b"PNG".as_slice());
    }

    #[test]
    fn pixel_mapper_flips_y_and_preserves_order() {
        let mapper = PixelMapper::new((0.0, 0.0, 10.0, 10.0), 400, 400);
        let (_, low_y) = mapper.to_pixel(0.0, 0.0);
        let (_, high_y) = mapper.to_pixel(0.0, 10.0);
        assert!(high_y < low_y, "larger northing must be higher on screen");
        let (left_x, _) = mapper.to_pixel(0.0, 0.0);
        let (right_x, _) = mapper.to_pixel(10.0, 0.0);
        assert!(right_x > left_x);
    }

    #[test]
    fn networks_without_geometry_are_omitted_from_the_map_without_error() {
        let temp = tempdir().unwrap();
        let config = PipelineConfig {
            output_image_path: temp.path().join("map.png"),
            image_width: 300,
            image_height: 300,
            ..PipelineConfig::default()
        };
        let output = synthetic_output(&config);
        // Empty feature set: every network is table-only.
        render(&output, FeatureSet::default(), &config).unwrap();
        assert!(config.output_image_path.is_file());
    }
}
