use std::sync::Arc;

use ahash::AHashMap;

use crate::camera::Viewport;
use crate::metrics::{DetailPoint, MetricSample, MetricSeries, PredictionOverlay, SubregionRow};
use crate::playback::TimerCommand;

/// Discrete inputs the engine reacts to: user interaction, timer ticks, and
/// network completions. Handlers never block; anything slow is requested as
/// an [`Effect`] and fed back in as an event when it finishes.
#[derive(Debug, Clone)]
pub enum Event {
    /// A top-level region was picked on the map.
    RegionClicked { name: Arc<str> },
    /// A finer-granularity cell was picked (ignored while drilled in).
    SubregionClicked { name: Arc<str> },
    /// Explicit "back" action out of region detail.
    Back,
    /// The camera moved. `zoom_gesture` marks an active zoom (not a pan) and
    /// triggers the zoom-out-to-reset rule.
    ViewportChanged { viewport: Viewport, zoom_gesture: bool },
    /// Pointer moved over a region (or off the map).
    Hover { region: Option<Arc<str>> },
    Play,
    Pause,
    /// One playback timer tick.
    Tick,
    /// Direct manipulation of the date cursor.
    Scrub { index: usize },
    /// A prediction period was chosen; its overlay replaces historical colors.
    OverlaySelected { overlay: PredictionOverlay },
    OverlayCleared,
    /// A fetch requested by an earlier effect finished.
    FetchCompleted { generation: u64, payload: FetchPayload },
    /// A fetch failed; prior data stays in place.
    FetchFailed { generation: u64, message: String },
}

/// Completed fetch payloads, already decoded.
#[derive(Debug, Clone)]
pub enum FetchPayload {
    Latest(AHashMap<Arc<str>, MetricSample>),
    History(AHashMap<Arc<str>, MetricSeries>),
    Subregions { region: Arc<str>, rows: Vec<SubregionRow> },
    Detail { region: Arc<str>, points: Vec<DetailPoint> },
}

/// A metrics API request the host should run asynchronously, tagged with the
/// generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Latest,
    History,
    Subregions { region: Arc<str> },
    Detail { region: Arc<str> },
}

/// Side effects the engine asks its owner to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { generation: u64, request: FetchRequest },
    Timer(TimerCommand),
}
