//! Route source: turns plain waypoint lists into route points with leg data.

use crate::models::{GeoPos, RouteKind, RoutePoint};
use crate::spatial::{distance_nm, normalize_course, rhumb_course};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("failed to read route file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid route JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("waypoint {index} has invalid coordinates {lon},{lat}")]
    InvalidCoordinate { index: usize, lon: f64, lat: f64 },
    #[error("route has no waypoints")]
    Empty,
}

/// A waypoint as entered by the user or read from a flight plan file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointSpec {
    #[serde(default)]
    pub ident: String,
    #[serde(default)]
    pub kind: RouteKind,
    pub lon: f64,
    pub lat: f64,
    /// Magnetic variation, east positive
    #[serde(default)]
    pub magvar: f64,
    /// Start a new route part here: no leg from the previous waypoint
    #[serde(default)]
    pub new_part: bool,
}

impl WaypointSpec {
    pub fn new(ident: impl Into<String>, kind: RouteKind, lon: f64, lat: f64) -> Self {
        Self {
            ident: ident.into(),
            kind,
            lon,
            lat,
            magvar: 0.0,
            new_part: false,
        }
    }
}

/// On-disk route file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteFile {
    #[serde(default)]
    pub name: Option<String>,
    pub waypoints: Vec<WaypointSpec>,
}

/// Compute leg distance and rhumb courses for each waypoint.
///
/// Distances are great circle, courses are rhumb line. Magnetic course uses
/// the variation of the waypoint ending the leg.
pub fn build_route(waypoints: &[WaypointSpec]) -> Result<Vec<RoutePoint>, RouteError> {
    if waypoints.is_empty() {
        return Err(RouteError::Empty);
    }

    let mut points: Vec<RoutePoint> = Vec::with_capacity(waypoints.len());
    for (index, wp) in waypoints.iter().enumerate() {
        let position = GeoPos::new(wp.lon, wp.lat);
        if !position.is_valid() {
            return Err(RouteError::InvalidCoordinate {
                index,
                lon: wp.lon,
                lat: wp.lat,
            });
        }

        let mut point = RoutePoint::new(wp.ident.clone(), wp.kind, position);
        point.magvar = wp.magvar;

        if let Some(prev) = points.last() {
            if !wp.new_part {
                let course_true = rhumb_course(prev.position, position);
                let course_mag = normalize_course(course_true - wp.magvar);
                point = point.with_leg(distance_nm(prev.position, position), course_mag, course_true);
            }
        }
        points.push(point);
    }
    Ok(points)
}

/// Parse a route file from JSON text.
pub fn parse_route(json: &str) -> Result<Vec<RoutePoint>, RouteError> {
    let file: RouteFile = serde_json::from_str(json)?;
    let points = build_route(&file.waypoints)?;
    tracing::debug!(
        "Parsed route {} with {} waypoints",
        file.name.as_deref().unwrap_or("<unnamed>"),
        points.len()
    );
    Ok(points)
}

/// Load a route file from disk.
pub fn load_route(path: impl AsRef<Path>) -> Result<Vec<RoutePoint>, RouteError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| RouteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_route(&text)
}
