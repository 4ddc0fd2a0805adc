use super::model::Geometry;
use serde_json::Value;
use std::f64::consts::PI;
use thiserror::Error;

/// CRS name fragments identifying Web Mercator (EPSG:3857).
const WEB_MERCATOR_MARKERS: [&str; 2] = ["EPSG:3857", "EPSG::3857"];

const EARTH_RADIUS_M: f64 = 6_378_137.0;

pub fn is_web_mercator(crs_name: &str) -> bool {
    WEB_MERCATOR_MARKERS.iter().any(|m| crs_name.contains(m))
}

#[derive(Debug, Error, PartialEq)]
pub enum ReprojectError {
    #[error("reprojector '{0}' is not available")]
    Unavailable(String),
    #[error("malformed coordinates: {0}")]
    Malformed(String),
}

/// Converts projected `(x, y)` positions to geographic `(lon, lat)`.
pub trait Reprojector: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), ReprojectError>;
}

/// Spherical Web Mercator (EPSG:3857) to WGS84 (EPSG:4326), lon/lat order.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercatorToWgs84;

impl Reprojector for WebMercatorToWgs84 {
    fn name(&self) -> &str {
        "EPSG:3857->EPSG:4326"
    }

    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), ReprojectError> {
        let lon = (x / EARTH_RADIUS_M).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
        Ok((lon, lat))
    }
}

/// Used when reprojection is disabled; projected files get skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReprojection;

impl Reprojector for NoReprojection {
    fn name(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn transform(&self, _x: f64, _y: f64) -> Result<(f64, f64), ReprojectError> {
        Err(ReprojectError::Unavailable(self.name().to_string()))
    }
}

/// Reproject every position of `geometry`, keeping its nesting intact.
///
/// Positions with fewer than two ordinates are dropped and any altitude is
/// discarded, so each output position is exactly `[lon, lat]`.
pub fn reproject_geometry(
    geometry: &Geometry,
    reprojector: &dyn Reprojector,
) -> Result<Geometry, ReprojectError> {
    let coordinates = match &geometry.coordinates {
        Value::Array(_) => transform_node(&geometry.coordinates, reprojector)?
            .unwrap_or_else(|| Value::Array(Vec::new())),
        Value::Null => Value::Array(Vec::new()),
        other => {
            return Err(ReprojectError::Malformed(format!(
                "expected coordinate array, found {other}"
            )));
        }
    };
    Ok(Geometry::new(geometry.kind.clone(), coordinates))
}

fn is_position(items: &[Value]) -> bool {
    items.first().is_some_and(Value::is_number)
}

fn transform_node(
    node: &Value,
    reprojector: &dyn Reprojector,
) -> Result<Option<Value>, ReprojectError> {
    let Value::Array(items) = node else {
        return Err(ReprojectError::Malformed(format!(
            "expected array, found {node}"
        )));
    };

    if is_position(items) {
        if items.len() < 2 {
            return Ok(None);
        }
        let (Some(x), Some(y)) = (items[0].as_f64(), items[1].as_f64()) else {
            return Err(ReprojectError::Malformed(format!(
                "non-numeric position {node}"
            )));
        };
        let (lon, lat) = reprojector.transform(x, y)?;
        return Ok(Some(Value::from(vec![lon, lat])));
    }

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(value) = transform_node(item, reprojector)? {
            out.push(value);
        }
    }
    Ok(Some(Value::Array(out)))
}
