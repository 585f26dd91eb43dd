//! Route map CLI - command line tools around the route layout engine.
//!
//! This crate provides the `route_layout` binary and the pieces it is built
//! from:
//! - config: environment and options file handling
//! - fit: viewport fitting for a route
//! - report: text output of a layout plan

pub mod config;
pub mod fit;
pub mod report;

pub use config::{load_options, parse_positive_px, CliConfig, OutputFormat};
pub use fit::fit_viewport;
pub use report::render_report;
