//! CLI configuration from environment and option files.

use anyhow::{Context, Result};
use routemap_core::LayoutOptions;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "report" => Ok(Self::Text),
            other => anyhow::bail!("unknown output format '{other}', expected json or text"),
        }
    }
}

/// Settings that may come from the environment when not given as arguments.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// JSON file with [`LayoutOptions`]
    pub options_path: Option<PathBuf>,
    /// Average character advance used for label elision
    pub char_width_px: f64,
    pub output: OutputFormat,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            options_path: env::var("ROUTEMAP_OPTIONS").ok().map(PathBuf::from),
            char_width_px: env::var("ROUTEMAP_CHAR_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|w: &f64| *w > 0.0)
                .unwrap_or(7.0),
            output: env::var("ROUTEMAP_OUTPUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(OutputFormat::Json),
        }
    }
}

/// Read layout options from a JSON file. Missing fields keep their defaults.
pub fn load_options(path: &Path) -> Result<LayoutOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    parse_options(&text).with_context(|| format!("invalid options file {}", path.display()))
}

pub fn parse_options(json: &str) -> Result<LayoutOptions> {
    let options: LayoutOptions = serde_json::from_str(json)?;
    if !is_positive_px(options.min_segment_px) {
        anyhow::bail!("min_segment_px must be a positive number of pixels, got {}", options.min_segment_px);
    }
    Ok(options)
}

fn is_positive_px(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Parse a pixel length that has to be positive, for clap value parsers.
pub fn parse_positive_px(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if !is_positive_px(value) {
        return Err(format!("must be a positive number of pixels, got {value}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routemap_core::CourseDisplayMode;

    #[test]
    fn parses_partial_options() {
        let options = parse_options(r#"{"course_display": "true_only", "endpoint_course_labels": true}"#).unwrap();
        assert_eq!(options.course_display, CourseDisplayMode::TrueOnly);
        assert!(options.endpoint_course_labels);
        assert_eq!(options.min_segment_px, 40.0);
    }

    #[test]
    fn rejects_bad_options() {
        assert!(parse_options(r#"{"min_segment_px": "wide"}"#).is_err());
        assert!(load_options(Path::new("/nonexistent/options.json")).is_err());
    }

    #[test]
    fn min_segment_px_must_be_positive() {
        assert_eq!(parse_positive_px("25"), Ok(25.0));
        assert_eq!(parse_positive_px("0.5"), Ok(0.5));
        assert!(parse_positive_px("0").is_err());
        assert!(parse_positive_px("-10").is_err());
        assert!(parse_positive_px("NaN").is_err());
        assert!(parse_positive_px("inf").is_err());
        assert!(parse_positive_px("wide").is_err());

        assert!(parse_options(r#"{"min_segment_px": 0}"#).is_err());
        assert!(parse_options(r#"{"min_segment_px": -5}"#).is_err());
    }

    #[test]
    fn output_format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("report".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
