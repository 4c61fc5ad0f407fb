//! Landmass outlines from GeoJSON
//!
//! Accepts a FeatureCollection, a Feature or a bare geometry. Lines,
//! polygons (every ring) and their multi forms become polylines on the
//! sphere; points are ignored.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{GlobeError, GlobeResult};
use crate::math::{lat_lon_to_vec3, Vec3};

/// Lift above the surface so the outline never z-fights the sphere
const OUTLINE_LIFT: f64 = 1.002;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Outline {
    pub lines: Vec<Vec<Vec3>>,
}

impl Outline {
    pub fn from_geojson(raw: &str, radius: f64) -> GlobeResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let mut outline = Self::default();
        collect(&value, radius * OUTLINE_LIFT, &mut outline.lines)?;
        Ok(outline)
    }

    pub fn point_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

/// Read and parse an outline file
#[instrument]
pub async fn load_outline(path: &Path, radius: f64) -> GlobeResult<Outline> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| GlobeError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let outline = Outline::from_geojson(&raw, radius)?;
    debug!(
        lines = outline.lines.len(),
        points = outline.point_count(),
        "Outline loaded"
    );
    Ok(outline)
}

fn collect(value: &Value, radius: f64, out: &mut Vec<Vec<Vec3>>) -> GlobeResult<()> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GlobeError::GeoJson("object without a type".to_string()))?;

    match kind {
        "FeatureCollection" => {
            for feature in array(value, "features")? {
                collect(feature, radius, out)?;
            }
        }
        "Feature" => match value.get("geometry") {
            Some(Value::Null) | None => {}
            Some(geometry) => collect(geometry, radius, out)?,
        },
        "GeometryCollection" => {
            for geometry in array(value, "geometries")? {
                collect(geometry, radius, out)?;
            }
        }
        "LineString" => out.push(line(coordinates(value)?, radius)?),
        "MultiLineString" | "Polygon" => {
            for ring in nested(coordinates(value)?)? {
                out.push(line(ring, radius)?);
            }
        }
        "MultiPolygon" => {
            for polygon in nested(coordinates(value)?)? {
                for ring in nested(polygon)? {
                    out.push(line(ring, radius)?);
                }
            }
        }
        "Point" | "MultiPoint" => {}
        other => return Err(GlobeError::GeoJson(format!("unsupported type: {other}"))),
    }
    Ok(())
}

fn array<'v>(value: &'v Value, key: &str) -> GlobeResult<&'v Vec<Value>> {
    value
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| GlobeError::GeoJson(format!("missing array: {key}")))
}

fn coordinates(value: &Value) -> GlobeResult<&Value> {
    value
        .get("coordinates")
        .ok_or_else(|| GlobeError::GeoJson("geometry without coordinates".to_string()))
}

fn nested(value: &Value) -> GlobeResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| GlobeError::GeoJson("expected a coordinate array".to_string()))
}

/// `[[lon, lat], ...]` onto the sphere
fn line(value: &Value, radius: f64) -> GlobeResult<Vec<Vec3>> {
    nested(value)?
        .iter()
        .map(|position| {
            let pair = position.as_array().filter(|p| p.len() >= 2);
            let lon = pair.and_then(|p| p[0].as_f64());
            let lat = pair.and_then(|p| p[1].as_f64());
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok(lat_lon_to_vec3(lat, lon, radius)),
                _ => Err(GlobeError::GeoJson(format!("bad position: {position}"))),
            }
        })
        .collect()
}
