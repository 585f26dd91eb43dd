//! Route annotation layout.
//!
//! Turns a route and a projection into a [`LayoutPlan`] for one repaint:
//! polyline runs, leg labels and symbol positions. Nothing here fails; points
//! or labels that cannot be placed are left out.

use crate::format::{course_text, elide, elide_chars, leg_text, FixedWidthMetrics, TextMetrics};
use crate::models::{
    CourseDirection, CourseLabel, ElideSide, LayoutPlan, PolylineRun, RoutePoint, ScreenPoint,
    SegmentLabel, SymbolPlacement,
};
use crate::options::LayoutOptions;
use crate::projection::Projection;
use crate::spatial::{
    final_bearing, initial_bearing, interpolate, mean_course, normalize_course, screen_angle,
    screen_distance,
};

/// Put in front of labels on westbound legs.
pub const LEADING_MARKER: &str = "« ";
/// Appended to labels on eastbound legs.
pub const TRAILING_MARKER: &str = " »";

/// Compute the annotation layout of a route.
///
/// `points` is in flight order. The projection is called once per point and
/// once per leg midpoint, plus twice per leg when endpoint course labels are
/// enabled.
pub fn compute_layout<P, M>(
    points: &[RoutePoint],
    projection: &P,
    metrics: &M,
    options: &LayoutOptions,
) -> LayoutPlan
where
    P: Projection + ?Sized,
    M: TextMetrics + ?Sized,
{
    if points.is_empty() {
        return LayoutPlan::default();
    }

    let screen: Vec<Option<ScreenPoint>> = points
        .iter()
        .map(|point| projection.project(point.position))
        .collect();

    let polyline = build_polyline(points, &screen);

    let segment_labels: Vec<SegmentLabel> = (0..points.len() - 1)
        .filter_map(|from| segment_label(points, &screen, from, projection, metrics, options))
        .collect();

    let symbol_placements = build_symbols(points, &screen, options);

    let course_labels = if options.endpoint_course_labels {
        (0..points.len() - 1)
            .flat_map(|from| course_labels(points, &screen, from, projection, metrics, options))
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        "Route layout: {} points, {} projected, {} runs, {} leg labels, {} course labels",
        points.len(),
        symbol_placements.len(),
        polyline.len(),
        segment_labels.len(),
        course_labels.len()
    );

    LayoutPlan {
        polyline,
        segment_labels,
        symbol_placements,
        course_labels,
    }
}

/// [`compute_layout`] with default options, fixed width text and the given
/// label threshold.
pub fn compute_layout_with_threshold<P>(
    points: &[RoutePoint],
    projection: &P,
    min_segment_px: f64,
) -> LayoutPlan
where
    P: Projection + ?Sized,
{
    let options = LayoutOptions::default().with_min_segment_px(min_segment_px);
    compute_layout(points, projection, &FixedWidthMetrics::default(), &options)
}

/// Split the projected points into connected runs.
///
/// A run ends at a point that did not project and before a point without a
/// predecessor. Runs of a single point draw nothing and are dropped.
fn build_polyline(points: &[RoutePoint], screen: &[Option<ScreenPoint>]) -> Vec<PolylineRun> {
    let mut runs = Vec::new();
    let mut current: Option<PolylineRun> = None;

    for (index, (point, projected)) in points.iter().zip(screen).enumerate() {
        let Some(pt) = projected else {
            flush_run(&mut runs, current.take());
            continue;
        };

        if point.has_predecessor {
            if let Some(run) = current.as_mut() {
                run.points.push(*pt);
                continue;
            }
        }
        flush_run(&mut runs, current.take());
        current = Some(PolylineRun {
            first_index: index,
            points: vec![*pt],
        });
    }
    flush_run(&mut runs, current);
    runs
}

fn flush_run(runs: &mut Vec<PolylineRun>, run: Option<PolylineRun>) {
    if let Some(run) = run.filter(|run| run.points.len() >= 2) {
        runs.push(run);
    }
}

/// Label for the leg from `from` to `from + 1`.
fn segment_label<P, M>(
    points: &[RoutePoint],
    screen: &[Option<ScreenPoint>],
    from: usize,
    projection: &P,
    metrics: &M,
    options: &LayoutOptions,
) -> Option<SegmentLabel>
where
    P: Projection + ?Sized,
    M: TextMetrics + ?Sized,
{
    let to = from + 1;
    let (start, end) = (&points[from], &points[to]);
    if !end.has_predecessor {
        return None;
    }

    // Great circle geometry keeps the label on the drawn curve
    let bearing = mean_course(
        initial_bearing(start.position, end.position),
        final_bearing(start.position, end.position),
    );
    let Some(midpoint) = projection.project(interpolate(start.position, end.position, 0.5)) else {
        tracing::trace!("Leg {}-{}: midpoint not projected, no label", from, to);
        return None;
    };

    let (Some(p1), Some(p2)) = (screen[from], screen[to]) else {
        tracing::trace!("Leg {}-{}: endpoint not projected, no label", from, to);
        return None;
    };

    let length = screen_distance(p1, p2);
    if length < options.min_segment_px {
        tracing::trace!("Leg {}-{}: {:.1}px too short for a label", from, to, length);
        return None;
    }

    // The shown course is the supplied rhumb course, not the placement bearing
    let body = leg_text(
        end.distance_to_nm,
        end.course_rhumb_mag,
        end.course_rhumb_true,
        options.course_display,
    );

    let (text, side, rotation_deg) = upright(&body, bearing);

    Some(SegmentLabel {
        from_index: from,
        to_index: to,
        midpoint,
        text: elide(&text, side, length, metrics),
        rotation_deg,
        elide: side,
    })
}

fn build_symbols(
    points: &[RoutePoint],
    screen: &[Option<ScreenPoint>],
    options: &LayoutOptions,
) -> Vec<SymbolPlacement> {
    points
        .iter()
        .zip(screen)
        .enumerate()
        .filter_map(|(index, (point, projected))| {
            let Some(pt) = projected else {
                tracing::trace!("Point {} ({}) not projected, no symbol", index, point.ident);
                return None;
            };
            Some(SymbolPlacement {
                index,
                kind: point.kind,
                point: *pt,
                label: (!point.ident.is_empty())
                    .then(|| elide_chars(&point.ident, options.max_ident_chars)),
            })
        })
        .collect()
}

/// Outbound course text after `from` and inbound course text before
/// `from + 1`.
///
/// The placed texts, markers included, have to fit together into
/// `endpoint_fill_ratio` of the leg, otherwise neither is placed. Each text
/// is oriented by the screen direction of its end of the leg.
fn course_labels<P, M>(
    points: &[RoutePoint],
    screen: &[Option<ScreenPoint>],
    from: usize,
    projection: &P,
    metrics: &M,
    options: &LayoutOptions,
) -> Vec<CourseLabel>
where
    P: Projection + ?Sized,
    M: TextMetrics + ?Sized,
{
    let to = from + 1;
    let (start, end) = (&points[from], &points[to]);
    let mut labels = Vec::new();

    if !end.has_predecessor {
        return labels;
    }
    let (Some(p1), Some(p2)) = (screen[from], screen[to]) else {
        return labels;
    };
    let length = screen_distance(p1, p2);
    if length <= f64::EPSILON {
        return labels;
    }

    let outbound_true = initial_bearing(start.position, end.position);
    let inbound_true = final_bearing(start.position, end.position);
    let outbound = course_text(
        normalize_course(outbound_true - start.magvar),
        outbound_true,
        options.course_display,
    );
    let inbound = course_text(
        normalize_course(inbound_true - end.magvar),
        inbound_true,
        options.course_display,
    );
    let (has_outbound, has_inbound) = (!outbound.is_empty(), !inbound.is_empty());
    if !has_outbound && !has_inbound {
        return labels;
    }

    // Direction of the leg right at its ends; differs from p1->p2 on curved legs
    let fraction = (options.endpoint_offset_px / length).min(0.5);
    let first2 = projection.project(interpolate(start.position, end.position, fraction));
    let last2 = projection.project(interpolate(start.position, end.position, 1.0 - fraction));

    // Screen bearing of each end, north up, so both texts stay upright
    let outbound = first2
        .filter(|_| has_outbound)
        .map(|f2| (f2, upright(&outbound, screen_bearing(p1, f2))));
    let inbound = last2
        .filter(|_| has_inbound)
        .map(|l2| (l2, upright(&inbound, screen_bearing(l2, p2))));
    let width = |label: &Option<(ScreenPoint, (String, ElideSide, f64))>| {
        label
            .as_ref()
            .map_or(0.0, |(_, (text, _, _))| metrics.text_width(text))
    };
    let (outbound_width, inbound_width) = (width(&outbound), width(&inbound));
    if outbound_width + inbound_width >= length * options.endpoint_fill_ratio {
        return labels;
    }

    if let Some((f2, (text, _, rotation_deg))) = outbound {
        labels.push(CourseLabel {
            point_index: from,
            direction: CourseDirection::Outbound,
            anchor: along(p1, f2, (outbound_width + options.endpoint_offset_px) / 2.0),
            text,
            rotation_deg,
        });
    }
    if let Some((l2, (text, _, rotation_deg))) = inbound {
        labels.push(CourseLabel {
            point_index: to,
            direction: CourseDirection::Inbound,
            anchor: along(p2, l2, (inbound_width + options.endpoint_offset_px) / 2.0),
            text,
            rotation_deg,
        });
    }
    labels
}

/// Add the direction marker and pick the rotation that keeps `body` readable
/// for a line with the given compass bearing.
///
/// Westbound lines (bearing above 180) lead with the marker and cut the
/// right end of long text; everything else trails it and cuts the left end.
fn upright(body: &str, bearing: f64) -> (String, ElideSide, f64) {
    if bearing > 180.0 {
        (format!("{LEADING_MARKER}{body}"), ElideSide::Right, bearing + 90.0)
    } else {
        (format!("{body}{TRAILING_MARKER}"), ElideSide::Left, bearing - 90.0)
    }
}

/// Compass bearing of the screen line from `p1` to `p2`, screen up is north.
fn screen_bearing(p1: ScreenPoint, p2: ScreenPoint) -> f64 {
    normalize_course(screen_angle(p1, p2) + 90.0)
}

/// Point `distance` pixels from `origin` in the direction of `towards`.
fn along(origin: ScreenPoint, towards: ScreenPoint, distance: f64) -> ScreenPoint {
    let len = screen_distance(origin, towards);
    if len <= f64::EPSILON {
        return origin;
    }
    ScreenPoint::new(
        origin.x + (towards.x - origin.x) / len * distance,
        origin.y + (towards.y - origin.y) / len * distance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPos, RouteKind};

    /// 100 px per degree, no clipping.
    fn flat(pos: GeoPos) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(pos.lon * 100.0, -pos.lat * 100.0))
    }

    fn leg_point(ident: &str, lon: f64, lat: f64, dist: f64, course: f64) -> RoutePoint {
        RoutePoint::new(ident, RouteKind::Waypoint, GeoPos::new(lon, lat)).with_leg(dist, course, course)
    }

    #[test]
    fn polyline_breaks_at_unprojected_point() {
        let points = vec![
            RoutePoint::new("A", RouteKind::Airport, GeoPos::new(0.0, 0.0)),
            leg_point("B", 1.0, 0.0, 60.0, 90.0),
            leg_point("C", 2.0, 0.0, 60.0, 90.0),
            leg_point("D", 3.0, 0.0, 60.0, 90.0),
            leg_point("E", 4.0, 0.0, 60.0, 90.0),
        ];
        let proj = |pos: GeoPos| (pos.lon != 2.0).then(|| ScreenPoint::new(pos.lon * 100.0, 0.0));
        let plan = compute_layout(&points, &proj, &FixedWidthMetrics::default(), &LayoutOptions::default());

        assert_eq!(plan.polyline.len(), 2);
        assert_eq!(plan.polyline[0].first_index, 0);
        assert_eq!(plan.polyline[0].points.len(), 2);
        assert_eq!(plan.polyline[1].first_index, 3);
        assert_eq!(plan.symbol_placements.len(), 4);
        // Legs B-C and C-D lose their labels
        let legs: Vec<usize> = plan.segment_labels.iter().map(|l| l.from_index).collect();
        assert_eq!(legs, vec![0, 3]);
    }

    #[test]
    fn polyline_breaks_before_point_without_predecessor() {
        let points = vec![
            RoutePoint::new("A", RouteKind::Airport, GeoPos::new(0.0, 0.0)),
            leg_point("B", 1.0, 0.0, 60.0, 90.0),
            RoutePoint::new("C", RouteKind::Airport, GeoPos::new(2.0, 0.0)),
            leg_point("D", 3.0, 0.0, 60.0, 90.0),
        ];
        let plan = compute_layout(&points, &flat, &FixedWidthMetrics::default(), &LayoutOptions::default());
        assert_eq!(plan.polyline.len(), 2);
        assert_eq!(plan.polyline[1].first_index, 2);
        let legs: Vec<usize> = plan.segment_labels.iter().map(|l| l.from_index).collect();
        assert_eq!(legs, vec![0, 2]);
    }

    #[test]
    fn westbound_label_leads_with_marker() {
        let points = vec![
            RoutePoint::new("A", RouteKind::Vor, GeoPos::new(2.0, 0.0)),
            leg_point("B", 0.0, 0.0, 120.0, 270.0),
        ];
        let plan = compute_layout(&points, &flat, &FixedWidthMetrics::default(), &LayoutOptions::default());
        let label = &plan.segment_labels[0];
        assert_eq!(label.text, "« 120 nm / 270°M");
        assert_eq!(label.elide, ElideSide::Right);
        assert!((label.rotation_deg - 360.0).abs() < 1e-6);
    }

    #[test]
    fn long_text_is_elided_on_marker_side() {
        let points = vec![
            RoutePoint::new("A", RouteKind::Vor, GeoPos::new(0.0, 0.0)),
            leg_point("B", 0.5, 0.0, 30.0, 90.0),
        ];
        // 50 px leg, 10 px characters: five characters fit
        let plan = compute_layout(&points, &flat, &FixedWidthMetrics::new(10.0), &LayoutOptions::default());
        let label = &plan.segment_labels[0];
        assert_eq!(label.elide, ElideSide::Left);
        assert_eq!(label.text, "…°M »");
    }

    #[test]
    fn symbol_labels_use_elided_idents() {
        let mut options = LayoutOptions::default();
        options.max_ident_chars = 4;
        let points = vec![
            RoutePoint::new("LONGNAME", RouteKind::User, GeoPos::new(0.0, 0.0)),
            RoutePoint::new("", RouteKind::Invalid, GeoPos::new(1.0, 0.0)),
        ];
        let plan = compute_layout(&points, &flat, &FixedWidthMetrics::default(), &options);
        assert_eq!(plan.symbol_placements[0].label.as_deref(), Some("LON…"));
        assert_eq!(plan.symbol_placements[0].kind, RouteKind::User);
        assert_eq!(plan.symbol_placements[1].label, None);
        assert_eq!(plan.symbol_placements[1].kind, RouteKind::Invalid);
    }

    #[test]
    fn endpoint_course_labels_on_long_leg() {
        let mut options = LayoutOptions::default();
        options.endpoint_course_labels = true;
        let mut end = leg_point("B", 5.0, 0.0, 300.0, 90.0);
        end.magvar = 10.0;
        let points = vec![RoutePoint::new("A", RouteKind::Vor, GeoPos::new(0.0, 0.0)), end];

        let plan = compute_layout(&points, &flat, &FixedWidthMetrics::default(), &options);
        assert_eq!(plan.course_labels.len(), 2);

        let outbound = &plan.course_labels[0];
        assert_eq!(outbound.direction, CourseDirection::Outbound);
        assert_eq!(outbound.point_index, 0);
        assert_eq!(outbound.text, "90°M »");
        assert!(outbound.rotation_deg.abs() < 1e-6);
        assert!(outbound.anchor.x > 0.0 && outbound.anchor.x < 100.0);

        let inbound = &plan.course_labels[1];
        assert_eq!(inbound.direction, CourseDirection::Inbound);
        assert_eq!(inbound.point_index, 1);
        assert_eq!(inbound.text, "80°M »");
        assert!(inbound.rotation_deg.abs() < 1e-6);
        assert!(inbound.anchor.x < 500.0 && inbound.anchor.x > 400.0);
    }

    #[test]
    fn endpoint_course_labels_stay_upright_westbound() {
        let mut options = LayoutOptions::default();
        options.endpoint_course_labels = true;
        let points = vec![
            RoutePoint::new("A", RouteKind::Vor, GeoPos::new(5.0, 0.0)),
            leg_point("B", 0.0, 0.0, 300.0, 270.0),
        ];

        let plan = compute_layout(&points, &flat, &FixedWidthMetrics::default(), &options);
        assert_eq!(plan.course_labels.len(), 2);
        for label in &plan.course_labels {
            assert_eq!(label.text, "« 270°M");
            assert!((label.rotation_deg - 360.0).abs() < 1e-6, "{}", label.rotation_deg);
        }
        // Same orientation as the leg label
        assert_eq!(plan.segment_labels[0].text, "« 300 nm / 270°M");
        assert!((plan.segment_labels[0].rotation_deg - 360.0).abs() < 1e-6);

        let outbound = &plan.course_labels[0];
        assert!(outbound.anchor.x < 500.0 && outbound.anchor.x > 400.0);
        let inbound = &plan.course_labels[1];
        assert!(inbound.anchor.x > 0.0 && inbound.anchor.x < 100.0);
    }

    #[test]
    fn endpoint_course_labels_skip_short_legs() {
        let mut options = LayoutOptions::default();
        options.endpoint_course_labels = true;
        let points = vec![
            RoutePoint::new("A", RouteKind::Vor, GeoPos::new(0.0, 0.0)),
            leg_point("B", 0.8, 0.0, 48.0, 90.0),
        ];
        let plan = compute_layout(&points, &flat, &FixedWidthMetrics::default(), &options);
        assert!(plan.course_labels.is_empty());
        assert_eq!(plan.segment_labels.len(), 1);
    }

    #[test]
    fn threshold_convenience_uses_defaults() {
        let points = vec![
            RoutePoint::new("A", RouteKind::Airport, GeoPos::new(0.0, 0.0)),
            leg_point("B", 0.3, 0.0, 18.0, 90.0),
        ];
        assert_eq!(compute_layout_with_threshold(&points, &flat, 40.0).segment_labels.len(), 0);
        assert_eq!(compute_layout_with_threshold(&points, &flat, 30.0).segment_labels.len(), 1);
    }
}
