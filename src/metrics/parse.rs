//! Tolerant decoding of metrics API payloads.
//!
//! The top-level shape of each payload is contractual and violating it is a
//! `DataShape` error; inside an entry, missing or null fields mean "no data"
//! and degrade to absent samples rather than failures.

use std::sync::Arc;

use ahash::AHashMap;
use serde_json::Value;

use crate::error::EngineError;
use crate::metrics::sample::{DetailPoint, MetricSample, MetricSeries, PredictionOverlay, SubregionRow};

/// `GET /region/all`: region name -> latest sample object.
pub fn parse_latest(payload: &Value) -> Result<AHashMap<Arc<str>, MetricSample>, EngineError> {
    let object = payload
        .as_object()
        .ok_or_else(|| EngineError::DataShape("latest payload is not an object".into()))?;

    let mut latest = AHashMap::with_capacity(object.len());
    for (region, entry) in object {
        let region: Arc<str> = Arc::from(region.as_str());
        if let Some(sample) = parse_sample(region.clone(), entry) {
            latest.insert(region, sample);
        }
    }
    Ok(latest)
}

/// `GET /region/all?history=true`: region name -> ordered sample list.
pub fn parse_history(payload: &Value) -> Result<AHashMap<Arc<str>, MetricSeries>, EngineError> {
    let object = payload
        .as_object()
        .ok_or_else(|| EngineError::DataShape("history payload is not an object".into()))?;

    let mut history = AHashMap::with_capacity(object.len());
    for (region, entries) in object {
        let region: Arc<str> = Arc::from(region.as_str());
        let mut samples: Vec<MetricSample> = entries
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|entry| parse_sample(region.clone(), entry))
            .collect();
        // The API promises ascending order; enforce it anyway.
        samples.sort_by(|a, b| a.date.cmp(&b.date));
        history.insert(region.clone(), MetricSeries { region, samples });
    }
    Ok(history)
}

/// `GET /region?region=<name>&history=true`: per-date rows with peer
/// aggregates for the detail graph.
pub fn parse_detail(payload: &Value) -> Result<Vec<DetailPoint>, EngineError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| EngineError::DataShape("detail payload is not an array".into()))?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            Some(DetailPoint {
                date: Arc::from(row["date"].as_str()?),
                value: row["value"].as_f64(),
                national: row["national"].as_f64(),
                regional: row["regional"].as_f64(),
            })
        })
        .collect())
}

/// `GET /subregion?region=<name>`: one category-labelled row per sub-region.
pub fn parse_subregions(payload: &Value) -> Result<Vec<SubregionRow>, EngineError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| EngineError::DataShape("subregion payload is not an array".into()))?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            Some(SubregionRow {
                name: Arc::from(row["name"].as_str()?),
                category: row["category"].as_str().map(Arc::from),
                period: row["period"].as_str().map(Arc::from),
            })
        })
        .collect())
}

/// `GET /predictions`: build the overlay for one future period. Absent or
/// null per-period values are excluded, never coerced to zero.
pub fn parse_predictions(payload: &Value, period: u8) -> Result<PredictionOverlay, EngineError> {
    let entries = payload["predictions"]
        .as_array()
        .ok_or_else(|| EngineError::DataShape("predictions payload has no prediction list".into()))?;

    let key = format!("week_{period}_prediction");
    let mut values = AHashMap::new();
    for entry in entries {
        let Some(region) = entry["region"].as_str() else { continue };
        if let Some(value) = entry[key.as_str()].as_f64() {
            values.insert(Arc::<str>::from(region), value);
        }
    }
    Ok(PredictionOverlay::new(period, values))
}

fn parse_sample(region: Arc<str>, entry: &Value) -> Option<MetricSample> {
    Some(MetricSample {
        region,
        date: Arc::from(entry["date"].as_str()?),
        value: entry["value"].as_f64(),
        category: entry["category"].as_str().map(Arc::from),
    })
}
