#![doc = "Interactive choropleth map engine: inset repositioning, metric color mapping, drill-down navigation, playback, and proximity tessellation."]
mod camera;
mod color;
mod engine;
mod error;
mod geom;
mod metrics;
mod playback;
mod render;
mod types;

#[doc(inline)]
pub use camera::{fit_to_bounds, fit_to_geometry, Transition, TransitionMode, Viewport, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM};

#[doc(inline)]
pub use color::{category_value, color_for, subregion_color, ColorSnapshot, LinearScale, Rgba};

#[doc(inline)]
pub use engine::{derive_layers, DrillState, Effect, Event, FetchPayload, FetchRequest, LayerDescriptor, LayerGeometry, MapEngine};

#[doc(inline)]
pub use error::EngineError;

#[doc(inline)]
pub use geom::{geometry_bounds, inset_boxes, inset_transform, reposition_regions, tessellate, GeometryStore, InsetTransform, Site, VoronoiCell};

#[doc(inline)]
pub use metrics::{DetailPoint, MetricSample, MetricSeries, MetricTable, PredictionOverlay, SubregionRow};
#[cfg(feature = "client")]
#[doc(inline)]
pub use metrics::MetricsClient;

#[doc(inline)]
pub use playback::{Playback, TimerCommand, TICK_INTERVAL_MS};

#[doc(inline)]
pub use render::write_svg;

#[doc(inline)]
pub use types::{Region, RegionId, RegionLevel};
