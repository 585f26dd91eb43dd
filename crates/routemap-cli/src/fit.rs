//! Viewport fitting for routes shown without an explicit map view.

use routemap_core::{
    mercator_lat, mercator_y_deg, GeoPos, ProjectionKind, RoutePoint, Viewport, ViewportError,
    MERCATOR_MAX_LAT,
};

/// Scale used when the route has no extent, e.g. a single waypoint.
const DEFAULT_PX_PER_DEG: f64 = 100.0;
/// Share of the screen the route may cover.
const FILL: f64 = 0.9;

/// Vertical map coordinate of a latitude in degree units for `kind`.
///
/// Mercator stretches latitudes away from the equator, so the fit has to
/// measure in northing. The other projections are close enough to linear.
fn northing(kind: ProjectionKind, lat: f64) -> f64 {
    match kind {
        ProjectionKind::Mercator => mercator_y_deg(lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT)),
        ProjectionKind::Equirectangular | ProjectionKind::Orthographic => lat,
    }
}

fn latitude(kind: ProjectionKind, northing: f64) -> f64 {
    match kind {
        ProjectionKind::Mercator => mercator_lat(northing),
        ProjectionKind::Equirectangular | ProjectionKind::Orthographic => northing,
    }
}

/// Center the route and scale it to fill the screen under `kind`.
///
/// Explicit `center` or `px_per_deg` values win over the fitted ones. A
/// fitted scale keeps every point on screen around whichever center is used.
pub fn fit_viewport(
    points: &[RoutePoint],
    kind: ProjectionKind,
    width_px: f64,
    height_px: f64,
    center: Option<GeoPos>,
    px_per_deg: Option<f64>,
) -> Result<Viewport, ViewportError> {
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for point in points {
        let y = northing(kind, point.position.lat);
        min_lon = min_lon.min(point.position.lon);
        max_lon = max_lon.max(point.position.lon);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let center = match center {
        Some(center) => center,
        None if points.is_empty() => GeoPos::new(0.0, 0.0),
        None => GeoPos::new(
            (min_lon + max_lon) / 2.0,
            latitude(kind, (min_y + max_y) / 2.0),
        ),
    };
    if points.is_empty() {
        return Viewport::new(center, width_px, height_px, px_per_deg.unwrap_or(DEFAULT_PX_PER_DEG));
    }

    // Twice the larger distance from the center, so both ends fit
    let center_y = northing(kind, center.lat);
    let span_lon = 2.0 * (max_lon - center.lon).abs().max((center.lon - min_lon).abs());
    let span_y = 2.0 * (max_y - center_y).abs().max((center_y - min_y).abs());
    let fitted_scale = if span_lon <= f64::EPSILON && span_y <= f64::EPSILON {
        DEFAULT_PX_PER_DEG
    } else {
        let sx = if span_lon > f64::EPSILON {
            width_px * FILL / span_lon
        } else {
            f64::INFINITY
        };
        let sy = if span_y > f64::EPSILON {
            height_px * FILL / span_y
        } else {
            f64::INFINITY
        };
        sx.min(sy)
    };

    Viewport::new(center, width_px, height_px, px_per_deg.unwrap_or(fitted_scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use routemap_core::{Projection, RouteKind, ViewportProjection};

    fn point(lon: f64, lat: f64) -> RoutePoint {
        RoutePoint::new("P", RouteKind::Waypoint, GeoPos::new(lon, lat))
    }

    #[test]
    fn fits_route_extent() {
        let vp = fit_viewport(
            &[point(0.0, 0.0), point(10.0, 2.0)],
            ProjectionKind::Equirectangular,
            1000.0,
            500.0,
            None,
            None,
        )
        .unwrap();
        assert_eq!(vp.center, GeoPos::new(5.0, 1.0));
        assert!((vp.px_per_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn mercator_fit_keeps_high_latitude_route_on_screen() {
        let points = [point(10.0, 55.0), point(10.0, 65.0)];
        let vp = fit_viewport(&points, ProjectionKind::Mercator, 1024.0, 768.0, None, None).unwrap();
        // Centered on the northing midpoint, north of the plain latitude midpoint
        assert!(vp.center.lat > 60.0 && vp.center.lat < 61.0, "{}", vp.center.lat);

        let proj = ViewportProjection::new(ProjectionKind::Mercator, vp);
        for p in &points {
            let screen = proj.project(p.position);
            assert!(screen.is_some(), "{:?} off screen", p.position);
        }
    }

    #[test]
    fn explicit_center_still_fits_both_ends() {
        let points = [point(0.0, 0.0), point(10.0, 2.0)];
        let vp = fit_viewport(
            &points,
            ProjectionKind::Equirectangular,
            1000.0,
            500.0,
            Some(GeoPos::new(0.0, 0.0)),
            None,
        )
        .unwrap();
        assert!((vp.px_per_deg - 45.0).abs() < 1e-9);
        let proj = ViewportProjection::new(ProjectionKind::Equirectangular, vp);
        assert!(points.iter().all(|p| proj.project(p.position).is_some()));
    }

    #[test]
    fn single_point_uses_default_scale() {
        let vp = fit_viewport(&[point(3.0, 4.0)], ProjectionKind::Mercator, 800.0, 600.0, None, None).unwrap();
        assert_eq!(vp.px_per_deg, DEFAULT_PX_PER_DEG);
        assert!((vp.center.lon - 3.0).abs() < 1e-9 && (vp.center.lat - 4.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_values_win() {
        let vp = fit_viewport(
            &[point(0.0, 0.0), point(10.0, 2.0)],
            ProjectionKind::Mercator,
            1000.0,
            500.0,
            Some(GeoPos::new(1.0, 1.0)),
            Some(12.0),
        )
        .unwrap();
        assert_eq!(vp.center, GeoPos::new(1.0, 1.0));
        assert_eq!(vp.px_per_deg, 12.0);
    }

    #[test]
    fn invalid_size_is_reported() {
        assert!(fit_viewport(&[point(0.0, 0.0)], ProjectionKind::Mercator, 0.0, 500.0, None, None).is_err());
    }
}
