#[cfg(feature = "client")]
mod client;
mod parse;
mod sample;

#[cfg(feature = "client")]
pub use client::MetricsClient;
pub use parse::{parse_detail, parse_history, parse_latest, parse_predictions, parse_subregions};
pub use sample::{DetailPoint, MetricSample, MetricSeries, MetricTable, PredictionOverlay, SubregionRow};
