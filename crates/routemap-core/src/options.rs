//! Layout options passed into every layout call.

use crate::format::CourseDisplayMode;
use serde::{Deserialize, Serialize};

/// Configuration for route annotation layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Legs shorter than this on screen get no distance/course label (pixels)
    pub min_segment_px: f64,
    /// Course values shown in labels
    pub course_display: CourseDisplayMode,
    /// Maximum characters of a waypoint ident next to its symbol
    pub max_ident_chars: usize,
    /// Draw outbound/inbound course texts at both ends of each leg
    pub endpoint_course_labels: bool,
    /// Distance of the course texts from the waypoint (pixels)
    pub endpoint_offset_px: f64,
    /// Course texts are only drawn if both fit into this share of the leg
    pub endpoint_fill_ratio: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            min_segment_px: 40.0,
            course_display: CourseDisplayMode::MagneticOnly,
            max_ident_chars: 10,
            endpoint_course_labels: false,
            endpoint_offset_px: 20.0,
            endpoint_fill_ratio: 0.5,
        }
    }
}

impl LayoutOptions {
    pub fn with_min_segment_px(mut self, min_segment_px: f64) -> Self {
        self.min_segment_px = min_segment_px;
        self
    }

    pub fn with_course_display(mut self, mode: CourseDisplayMode) -> Self {
        self.course_display = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{"min_segment_px": 60, "course_display": "both"}"#).unwrap();
        assert_eq!(options.min_segment_px, 60.0);
        assert_eq!(options.course_display, CourseDisplayMode::Both);
        assert_eq!(options.max_ident_chars, 10);
        assert!(!options.endpoint_course_labels);
    }
}
