use geo::{Geometry, Rect};
use serde::Serialize;

use crate::error::EngineError;
use crate::geom::geometry_bounds;

pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 10.0;
/// Web-mercator latitude limit.
pub const MAX_LAT: f64 = 85.0511287798;
pub const MIN_LAT: f64 = -MAX_LAT;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Extra zoom added after a drill-down fit so detail layers stay legible.
/// Tunables; the fit itself is the correctness property.
const DETAIL_ZOOM_BIAS: f64 = 0.5;
const DETAIL_MIN_ZOOM: f64 = 4.5;

/// Duration of the drill-down camera flight.
pub const FIT_TRANSITION_MS: u64 = 1000;

/// How a viewport change animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionMode {
    /// Smooth fly-to interpolation.
    FlyTo,
    /// No animation; duration is ignored.
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub duration_ms: u64,
    pub mode: TransitionMode,
}

impl Transition {
    pub const fn instant() -> Self {
        Self { duration_ms: 0, mode: TransitionMode::Instant }
    }

    pub const fn fly_to(duration_ms: u64) -> Self {
        Self { duration_ms, mode: TransitionMode::FlyTo }
    }
}

/// Camera parameters for the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub transition: Transition,
}

impl Viewport {
    /// The national default view: continental center at overview zoom.
    pub const fn national() -> Self {
        Self {
            longitude: -98.5795,
            latitude: 39.8283,
            zoom: 3.0,
            pitch: 0.0,
            bearing: 0.0,
            transition: Transition::instant(),
        }
    }

    /// Clamp zoom, latitude and longitude into their valid ranges. Applied
    /// after every interaction delta, before the viewport is stored.
    pub fn clamped(mut self) -> Self {
        self.zoom = self.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.latitude = self.latitude.clamp(MIN_LAT, MAX_LAT);
        self.longitude = self.longitude.clamp(MIN_LON, MAX_LON);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::national()
    }
}

/// Camera parameters that bring the whole bounding box into view: centered on
/// the box, zoomed to the tighter of the two angular spans, then biased
/// upward so detail layers stay readable, then clamped.
pub fn fit_to_bounds(bounds: Rect<f64>) -> Viewport {
    let center = bounds.center();

    let lon_span = bounds.width().max(1e-6);
    let lat_span = bounds.height().max(1e-6);
    let raw = (360.0 / lon_span).log2().min((180.0 / lat_span).log2());

    let zoom = (raw + DETAIL_ZOOM_BIAS).max(DETAIL_MIN_ZOOM);

    Viewport {
        longitude: center.x,
        latitude: center.y,
        zoom,
        pitch: 0.0,
        bearing: 0.0,
        transition: Transition::fly_to(FIT_TRANSITION_MS),
    }
    .clamped()
}

/// Fit the camera to a region boundary. Empty or unsupported geometry aborts
/// with a `GeometryError` for the caller to report; navigation must not fall
/// back to a silent default.
pub fn fit_to_geometry(geometry: &Geometry<f64>) -> Result<Viewport, EngineError> {
    Ok(fit_to_bounds(geometry_bounds(geometry)?))
}
