//! Core data models for route map annotation.

use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPos {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// True if both coordinates are finite and inside the usual ranges.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// Screen position in pixels. The y axis grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a route point refers to. Renderers pick the glyph by this tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Point that could not be resolved against the navaid database
    #[default]
    Invalid,
    /// User defined position
    User,
    Airport,
    Vor,
    Ndb,
    Waypoint,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Invalid => "invalid",
            RouteKind::User => "user",
            RouteKind::Airport => "airport",
            RouteKind::Vor => "vor",
            RouteKind::Ndb => "ndb",
            RouteKind::Waypoint => "waypoint",
        }
    }
}

/// One entry of a flight route, origin first.
///
/// The leg fields describe the leg that ends at this point. They are
/// supplied by the route source and shown as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub position: GeoPos,
    #[serde(default)]
    pub kind: RouteKind,
    #[serde(default)]
    pub ident: String,
    /// False for the departure point and for points starting a new route part
    #[serde(default)]
    pub has_predecessor: bool,
    /// Leg distance in nautical miles
    #[serde(default)]
    pub distance_to_nm: f64,
    /// Rhumb line course of the leg, magnetic
    #[serde(default)]
    pub course_rhumb_mag: f64,
    /// Rhumb line course of the leg, true
    #[serde(default)]
    pub course_rhumb_true: f64,
    /// Magnetic variation at this point, east positive
    #[serde(default)]
    pub magvar: f64,
}

impl RoutePoint {
    /// Create a point without leg information.
    pub fn new(ident: impl Into<String>, kind: RouteKind, position: GeoPos) -> Self {
        Self {
            position,
            kind,
            ident: ident.into(),
            has_predecessor: false,
            distance_to_nm: 0.0,
            course_rhumb_mag: 0.0,
            course_rhumb_true: 0.0,
            magvar: 0.0,
        }
    }

    /// Attach leg data for the leg ending at this point.
    pub fn with_leg(mut self, distance_to_nm: f64, course_rhumb_mag: f64, course_rhumb_true: f64) -> Self {
        self.has_predecessor = true;
        self.distance_to_nm = distance_to_nm;
        self.course_rhumb_mag = course_rhumb_mag;
        self.course_rhumb_true = course_rhumb_true;
        self
    }
}

/// Side of a label text that is cut when it does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElideSide {
    Left,
    Right,
}

/// Distance and course text for one leg, centered on the leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLabel {
    pub from_index: usize,
    pub to_index: usize,
    /// Projected great circle midpoint of the leg
    pub midpoint: ScreenPoint,
    pub text: String,
    /// Clockwise rotation in degrees
    pub rotation_deg: f64,
    pub elide: ElideSide,
}

/// A projected route point to draw a symbol for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPlacement {
    pub index: usize,
    pub kind: RouteKind,
    pub point: ScreenPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Maximal run of connected, projected route points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineRun {
    /// Route index of the first point in the run
    pub first_index: usize,
    pub points: Vec<ScreenPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseDirection {
    /// Course leaving the point at the start of a leg
    Outbound,
    /// Course arriving at the point at the end of a leg
    Inbound,
}

/// Short course text drawn next to a waypoint along its leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseLabel {
    pub point_index: usize,
    pub direction: CourseDirection,
    pub anchor: ScreenPoint,
    pub text: String,
    pub rotation_deg: f64,
}

/// Everything a renderer needs to annotate a route for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub polyline: Vec<PolylineRun>,
    pub segment_labels: Vec<SegmentLabel>,
    pub symbol_placements: Vec<SymbolPlacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub course_labels: Vec<CourseLabel>,
}

impl LayoutPlan {
    pub fn is_empty(&self) -> bool {
        self.polyline.is_empty()
            && self.segment_labels.is_empty()
            && self.symbol_placements.is_empty()
            && self.course_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_point_deserializes_with_defaults() {
        let point: RoutePoint = serde_json::from_str(
            r#"{"position": {"lon": 8.5, "lat": 50.0}, "kind": "vor", "ident": "FFM"}"#,
        )
        .unwrap();
        assert_eq!(point.kind, RouteKind::Vor);
        assert!(!point.has_predecessor);
        assert_eq!(point.distance_to_nm, 0.0);
    }

    #[test]
    fn geo_pos_validity() {
        assert!(GeoPos::new(-117.8, 33.6).is_valid());
        assert!(!GeoPos::new(181.0, 0.0).is_valid());
        assert!(!GeoPos::new(0.0, f64::NAN).is_valid());
    }
}
