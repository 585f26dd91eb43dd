//! Route annotation layout for flight planning maps.
//!
//! Computes where a map renderer should draw route polylines, leg
//! distance/course labels and waypoint symbols for the current viewport.

pub mod format;
pub mod layout;
pub mod models;
pub mod options;
pub mod projection;
pub mod route;
pub mod spatial;

pub use format::{course_text, elide, leg_text, CourseDisplayMode, FixedWidthMetrics, TextMetrics};
pub use layout::{compute_layout, compute_layout_with_threshold, LEADING_MARKER, TRAILING_MARKER};
pub use models::{
    CourseDirection, CourseLabel, ElideSide, GeoPos, LayoutPlan, PolylineRun, RouteKind,
    RoutePoint, ScreenPoint, SegmentLabel, SymbolPlacement,
};
pub use options::LayoutOptions;
pub use projection::{
    mercator_lat, mercator_y_deg, Projection, ProjectionKind, Viewport, ViewportError,
    ViewportProjection, MERCATOR_MAX_LAT,
};
pub use route::{build_route, load_route, parse_route, RouteError, RouteFile, WaypointSpec};
pub use spatial::haversine_distance;
