//! Label text formatting and elision.

use crate::models::ElideSide;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const ELLIPSIS: &str = "…";

/// Which course values appear in leg and course labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseDisplayMode {
    #[default]
    MagneticOnly,
    TrueOnly,
    /// Magnetic and true, collapsed to `°M/T` when they round the same
    Both,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown course display mode '{0}', expected magnetic, true or both")]
pub struct ParseCourseModeError(String);

impl FromStr for CourseDisplayMode {
    type Err = ParseCourseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "magnetic" | "mag" | "magnetic_only" => Ok(Self::MagneticOnly),
            "true" | "true_only" => Ok(Self::TrueOnly),
            "both" => Ok(Self::Both),
            other => Err(ParseCourseModeError(other.to_string())),
        }
    }
}

fn course_number(course: f64) -> String {
    format!("{course:.0}")
}

/// Course text such as `45°M`, `47°T`, `45°M 47°T` or `45°M/T`.
///
/// Non-finite values count as missing. Returns an empty string if nothing
/// is left to show.
pub fn course_text(mag_course: f64, true_course: f64, mode: CourseDisplayMode) -> String {
    let mag = (mode != CourseDisplayMode::TrueOnly && mag_course.is_finite())
        .then(|| course_number(mag_course));
    let tru = (mode != CourseDisplayMode::MagneticOnly && true_course.is_finite())
        .then(|| course_number(true_course));

    match (mag, tru) {
        (Some(m), Some(t)) if m == t => format!("{m}°M/T"),
        (Some(m), Some(t)) => format!("{m}°M {t}°T"),
        (Some(m), None) => format!("{m}°M"),
        (None, Some(t)) => format!("{t}°T"),
        (None, None) => String::new(),
    }
}

/// Leg label body, e.g. `100 nm / 45°M`.
///
/// The distance is printed as given, negative values included.
pub fn leg_text(distance_nm: f64, mag_course: f64, true_course: f64, mode: CourseDisplayMode) -> String {
    let course = course_text(mag_course, true_course, mode);
    if course.is_empty() {
        format!("{distance_nm:.0} nm")
    } else {
        format!("{distance_nm:.0} nm / {course}")
    }
}

/// Text width measurement supplied by the renderer.
pub trait TextMetrics {
    /// Width of `text` in pixels.
    fn text_width(&self, text: &str) -> f64;
}

/// Every character has the same advance. Good enough for monospace fonts and
/// for hosts that only know an average character width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedWidthMetrics {
    pub char_width_px: f64,
}

impl FixedWidthMetrics {
    pub fn new(char_width_px: f64) -> Self {
        Self { char_width_px }
    }
}

impl Default for FixedWidthMetrics {
    fn default() -> Self {
        Self { char_width_px: 7.0 }
    }
}

impl TextMetrics for FixedWidthMetrics {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width_px
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn text_width(&self, text: &str) -> f64 {
        (**self).text_width(text)
    }
}

/// Cut `text` to fit `max_width` pixels.
///
/// Right elision keeps the head, left elision keeps the tail. Text that
/// fits is returned unchanged; if not even the ellipsis fits the result is
/// empty.
pub fn elide<M: TextMetrics + ?Sized>(text: &str, side: ElideSide, max_width: f64, metrics: &M) -> String {
    if metrics.text_width(text) <= max_width {
        return text.to_string();
    }
    if metrics.text_width(ELLIPSIS) > max_width {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    for keep in (0..chars.len()).rev() {
        let candidate = match side {
            ElideSide::Right => {
                let head: String = chars[..keep].iter().collect();
                format!("{head}{ELLIPSIS}")
            }
            ElideSide::Left => {
                let tail: String = chars[chars.len() - keep..].iter().collect();
                format!("{ELLIPSIS}{tail}")
            }
        };
        if metrics.text_width(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

/// Character based elision for short ident text.
pub fn elide_chars(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let head: String = text.chars().take(max_chars - 1).collect();
    format!("{head}{ELLIPSIS}")
}
