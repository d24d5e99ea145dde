use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::EngineError;
use crate::metrics::parse;
use crate::metrics::sample::{DetailPoint, MetricSample, MetricSeries, PredictionOverlay, SubregionRow};

/// Blocking client for the metrics API. Transport and decode failures map to
/// `DataFetch`; the caller keeps its previous data and retries on the next
/// triggering event.
pub struct MetricsClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl MetricsClient {
    pub fn new(base: impl Into<String>) -> Result<Self, EngineError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EngineError::DataFetch(e.to_string()))?;
        Ok(Self { base: base.into().trim_end_matches('/').to_string(), http })
    }

    /// `GET /region/all`
    pub fn latest(&self) -> Result<AHashMap<Arc<str>, MetricSample>, EngineError> {
        parse::parse_latest(&self.get("/region/all")?)
    }

    /// `GET /region/all?history=true`
    pub fn history(&self) -> Result<AHashMap<Arc<str>, MetricSeries>, EngineError> {
        parse::parse_history(&self.get("/region/all?history=true")?)
    }

    /// `GET /region?region=<name>&history=true`
    pub fn region_detail(&self, region: &str) -> Result<Vec<DetailPoint>, EngineError> {
        parse::parse_detail(&self.get(&format!("/region?region={}&history=true", encode(region)))?)
    }

    /// `GET /subregion?region=<name>`
    pub fn subregions(&self, region: &str) -> Result<Vec<SubregionRow>, EngineError> {
        parse::parse_subregions(&self.get(&format!("/subregion?region={}", encode(region)))?)
    }

    /// `GET /predictions`, reduced to the overlay for one future period.
    pub fn predictions(&self, period: u8) -> Result<PredictionOverlay, EngineError> {
        parse::parse_predictions(&self.get("/predictions")?, period)
    }

    fn get(&self, path: &str) -> Result<Value, EngineError> {
        let url = format!("{}{}", self.base, path);
        debug!(%url, "metrics request");

        let response = self
            .http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| EngineError::DataFetch(format!("{url}: {e}")))?;

        response
            .json()
            .map_err(|e| EngineError::DataFetch(format!("{url}: invalid JSON: {e}")))
    }
}

/// Minimal query-string escaping for region names (spaces and reserved marks).
fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
