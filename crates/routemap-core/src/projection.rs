//! Geographic to screen projections.
//!
//! The layout engine only needs the [`Projection`] trait. Hosts that own a
//! map widget usually pass a closure around their widget's transform; the
//! [`ViewportProjection`] type covers command line use and tests.

use crate::models::{GeoPos, ScreenPoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::str::FromStr;
use thiserror::Error;

/// Mercator cannot show the poles. This is the usual web map cut-off.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Maps a geographic position to screen pixels.
///
/// Returns `None` when the position is off screen or cannot be projected,
/// e.g. on the far side of a globe.
pub trait Projection {
    fn project(&self, pos: GeoPos) -> Option<ScreenPoint>;
}

impl<F> Projection for F
where
    F: Fn(GeoPos) -> Option<ScreenPoint>,
{
    fn project(&self, pos: GeoPos) -> Option<ScreenPoint> {
        self(pos)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ViewportError {
    #[error("viewport size must be positive, got {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("pixels per degree must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("viewport center {lon},{lat} is not a valid position")]
    InvalidCenter { lon: f64, lat: f64 },
    #[error("unknown projection '{0}', expected equirectangular, mercator or orthographic")]
    UnknownProjection(String),
}

/// Visible map area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Geographic position shown at the screen center
    pub center: GeoPos,
    pub width_px: f64,
    pub height_px: f64,
    /// Map scale at the center along the equator direction
    pub px_per_deg: f64,
    /// Extra band around the screen that still counts as visible
    pub margin_px: f64,
}

impl Viewport {
    pub fn new(
        center: GeoPos,
        width_px: f64,
        height_px: f64,
        px_per_deg: f64,
    ) -> Result<Self, ViewportError> {
        if !(width_px > 0.0 && height_px > 0.0 && width_px.is_finite() && height_px.is_finite()) {
            return Err(ViewportError::InvalidSize {
                width: width_px,
                height: height_px,
            });
        }
        if !(px_per_deg > 0.0 && px_per_deg.is_finite()) {
            return Err(ViewportError::InvalidScale(px_per_deg));
        }
        if !center.is_valid() {
            return Err(ViewportError::InvalidCenter {
                lon: center.lon,
                lat: center.lat,
            });
        }
        Ok(Self {
            center,
            width_px,
            height_px,
            px_per_deg,
            margin_px: 0.0,
        })
    }

    pub fn with_margin(mut self, margin_px: f64) -> Self {
        self.margin_px = margin_px.max(0.0);
        self
    }

    /// Translate offsets from the screen center and clip to the visible area.
    fn place(&self, dx: f64, dy: f64) -> Option<ScreenPoint> {
        let x = self.width_px / 2.0 + dx;
        let y = self.height_px / 2.0 + dy;
        let m = self.margin_px;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        if x < -m || x > self.width_px + m || y < -m || y > self.height_px + m {
            return None;
        }
        Some(ScreenPoint::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// Plate carrée
    Equirectangular,
    #[default]
    Mercator,
    /// Globe seen from space, far hemisphere hidden
    Orthographic,
}

impl FromStr for ProjectionKind {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equirectangular" | "plate-carree" => Ok(Self::Equirectangular),
            "mercator" => Ok(Self::Mercator),
            "orthographic" | "globe" => Ok(Self::Orthographic),
            other => Err(ViewportError::UnknownProjection(other.to_string())),
        }
    }
}

/// A projection of one of the supported kinds over a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportProjection {
    pub kind: ProjectionKind,
    pub viewport: Viewport,
}

impl ViewportProjection {
    pub fn new(kind: ProjectionKind, viewport: Viewport) -> Self {
        Self { kind, viewport }
    }

    fn equirectangular(&self, pos: GeoPos) -> Option<ScreenPoint> {
        let vp = &self.viewport;
        let dx = wrap_lon(pos.lon - vp.center.lon) * vp.px_per_deg;
        let dy = -(pos.lat - vp.center.lat) * vp.px_per_deg;
        vp.place(dx, dy)
    }

    fn mercator(&self, pos: GeoPos) -> Option<ScreenPoint> {
        if pos.lat.abs() > MERCATOR_MAX_LAT {
            return None;
        }
        let vp = &self.viewport;
        let center_lat = vp.center.lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
        let dx = wrap_lon(pos.lon - vp.center.lon) * vp.px_per_deg;
        let dy = -(mercator_y_deg(pos.lat) - mercator_y_deg(center_lat)) * vp.px_per_deg;
        vp.place(dx, dy)
    }

    fn orthographic(&self, pos: GeoPos) -> Option<ScreenPoint> {
        let vp = &self.viewport;
        // Globe radius giving px_per_deg at the center
        let radius_px = vp.px_per_deg * 180.0 / PI;

        let phi0 = vp.center.lat.to_radians();
        let phi = pos.lat.to_radians();
        let dlambda = (pos.lon - vp.center.lon).to_radians();

        let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * dlambda.cos();
        if cos_c < 0.0 {
            return None;
        }

        let dx = radius_px * phi.cos() * dlambda.sin();
        let dy = -radius_px * (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * dlambda.cos());
        vp.place(dx, dy)
    }
}

impl Projection for ViewportProjection {
    fn project(&self, pos: GeoPos) -> Option<ScreenPoint> {
        if !pos.lon.is_finite() || !pos.lat.is_finite() {
            return None;
        }
        match self.kind {
            ProjectionKind::Equirectangular => self.equirectangular(pos),
            ProjectionKind::Mercator => self.mercator(pos),
            ProjectionKind::Orthographic => self.orthographic(pos),
        }
    }
}

/// Wrap a longitude difference to `[-180, 180)`.
fn wrap_lon(dlon: f64) -> f64 {
    (dlon + 180.0).rem_euclid(360.0) - 180.0
}

/// Mercator northing in degree units so it scales like longitude.
pub fn mercator_y_deg(lat: f64) -> f64 {
    (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln().to_degrees()
}

/// Latitude of a Mercator northing given in degree units.
pub fn mercator_lat(y_deg: f64) -> f64 {
    (2.0 * y_deg.to_radians().exp().atan() - FRAC_PI_2).to_degrees()
}
