//! Lay out the annotations of a route file and print the plan.

use anyhow::{Context, Result};
use clap::Parser;
use routemap_cli::{
    fit_viewport, load_options, parse_positive_px, render_report, CliConfig, OutputFormat,
};
use routemap_core::{
    compute_layout, load_route, CourseDisplayMode, FixedWidthMetrics, GeoPos, LayoutOptions,
    ProjectionKind, ViewportProjection,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Route file (JSON with a "waypoints" array)
    route: PathBuf,

    /// Map projection: equirectangular, mercator or orthographic
    #[arg(long, default_value = "mercator")]
    projection: ProjectionKind,

    /// Screen width in pixels
    #[arg(long, default_value_t = 1024.0)]
    width: f64,

    /// Screen height in pixels
    #[arg(long, default_value_t = 768.0)]
    height: f64,

    /// Longitude of the screen center (default: center of the route)
    #[arg(long, requires = "center_lat", allow_hyphen_values = true)]
    center_lon: Option<f64>,

    /// Latitude of the screen center (default: center of the route)
    #[arg(long, requires = "center_lon", allow_hyphen_values = true)]
    center_lat: Option<f64>,

    /// Map scale (default: fit the route to the screen)
    #[arg(long)]
    px_per_deg: Option<f64>,

    /// Off-screen band in pixels that still counts as visible
    #[arg(long, default_value_t = 0.0)]
    margin: f64,

    /// Layout options file (overrides ROUTEMAP_OPTIONS)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Minimum leg length on screen for a label
    #[arg(long, value_parser = parse_positive_px)]
    min_segment_px: Option<f64>,

    /// Course display: magnetic, true or both
    #[arg(long)]
    course: Option<CourseDisplayMode>,

    /// Add outbound/inbound course labels at leg ends
    #[arg(long)]
    course_labels: bool,

    /// Output format: json or text (overrides ROUTEMAP_OUTPUT)
    #[arg(long)]
    output: Option<OutputFormat>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("routemap_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = CliConfig::from_env();

    let mut options = match args.options.as_ref().or(config.options_path.as_ref()) {
        Some(path) => load_options(path)?,
        None => LayoutOptions::default(),
    };
    if let Some(min) = args.min_segment_px {
        options = options.with_min_segment_px(min);
    }
    if let Some(mode) = args.course {
        options = options.with_course_display(mode);
    }
    if args.course_labels {
        options.endpoint_course_labels = true;
    }

    let points = load_route(&args.route)
        .with_context(|| format!("cannot load route {}", args.route.display()))?;
    tracing::info!("Loaded {} waypoints from {}", points.len(), args.route.display());

    let center = args
        .center_lon
        .zip(args.center_lat)
        .map(|(lon, lat)| GeoPos::new(lon, lat));
    let viewport = fit_viewport(
        &points,
        args.projection,
        args.width,
        args.height,
        center,
        args.px_per_deg,
    )?
    .with_margin(args.margin);
    tracing::debug!(
        "Viewport {:?} centered {:.4},{:.4} at {:.2} px/deg",
        args.projection,
        viewport.center.lon,
        viewport.center.lat,
        viewport.px_per_deg
    );

    let projection = ViewportProjection::new(args.projection, viewport);
    let metrics = FixedWidthMetrics::new(config.char_width_px);
    let plan = compute_layout(&points, &projection, &metrics, &options);

    match args.output.unwrap_or(config.output) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => print!("{}", render_report(&points, &plan)),
    }

    Ok(())
}
