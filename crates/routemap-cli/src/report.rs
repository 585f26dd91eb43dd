//! Plain text rendering of a layout plan.

use routemap_core::{LayoutPlan, RoutePoint, ScreenPoint};

fn ident(points: &[RoutePoint], index: usize) -> &str {
    points
        .get(index)
        .map(|p| p.ident.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("?")
}

fn xy(p: ScreenPoint) -> String {
    format!("({:.1}, {:.1})", p.x, p.y)
}

/// Human readable summary, one line per plan entry.
pub fn render_report(points: &[RoutePoint], plan: &LayoutPlan) -> String {
    let mut lines = vec![
        format!(
            "Route: {} points, {} on screen",
            points.len(),
            plan.symbol_placements.len()
        ),
        format!("Polyline runs: {}", plan.polyline.len()),
    ];
    lines.extend(plan.polyline.iter().map(|run| {
        format!(
            "  from {} ({}): {} points",
            run.first_index,
            ident(points, run.first_index),
            run.points.len()
        )
    }));

    lines.push(format!("Leg labels: {}", plan.segment_labels.len()));
    lines.extend(plan.segment_labels.iter().map(|label| {
        format!(
            "  {}->{} \"{}\" at {} rotated {:.1}°",
            ident(points, label.from_index),
            ident(points, label.to_index),
            label.text,
            xy(label.midpoint),
            label.rotation_deg
        )
    }));

    lines.push(format!("Symbols: {}", plan.symbol_placements.len()));
    lines.extend(plan.symbol_placements.iter().map(|symbol| {
        format!(
            "  {} {} {} at {}",
            symbol.index,
            symbol.kind.as_str(),
            symbol.label.as_deref().unwrap_or(""),
            xy(symbol.point)
        )
    }));

    if !plan.course_labels.is_empty() {
        lines.push(format!("Course labels: {}", plan.course_labels.len()));
        lines.extend(plan.course_labels.iter().map(|label| {
            format!(
                "  {} {:?} \"{}\" at {} rotated {:.1}°",
                ident(points, label.point_index),
                label.direction,
                label.text,
                xy(label.anchor),
                label.rotation_deg
            )
        }));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use routemap_core::{compute_layout_with_threshold, GeoPos, RouteKind};

    #[test]
    fn report_lists_legs_and_symbols() {
        let points = vec![
            RoutePoint::new("EDDF", RouteKind::Airport, GeoPos::new(0.0, 0.0)),
            RoutePoint::new("FFM", RouteKind::Vor, GeoPos::new(1.0, 0.0)).with_leg(60.0, 90.0, 90.0),
        ];
        let proj = |pos: GeoPos| Some(ScreenPoint::new(pos.lon * 200.0, 100.0));
        let plan = compute_layout_with_threshold(&points, &proj, 40.0);
        let report = render_report(&points, &plan);

        assert!(report.contains("Route: 2 points, 2 on screen"));
        assert!(report.contains("EDDF->FFM \"60 nm / 90°M »\""));
        assert!(report.contains("1 vor FFM at (200.0, 100.0)"));
        assert!(!report.contains("Course labels"));
        assert!(report.ends_with('\n'));
        assert_eq!(report.lines().count(), 8);
    }
}
