use std::sync::Arc;

use ahash::AHashMap;

/// One observation of the metric for one region on one calendar day.
/// Dates are ISO-8601 day strings; lexicographic order is chronological.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub region: Arc<str>,
    pub date: Arc<str>,
    pub value: Option<f64>,
    pub category: Option<Arc<str>>,
}

/// Ordered-by-date history for one region, read-only once fetched.
#[derive(Debug, Clone, Default)]
pub struct MetricSeries {
    pub region: Arc<str>,
    pub samples: Vec<MetricSample>, // ascending by date
}

/// One finer-granularity row: a sub-region reporting only a category label
/// for a reporting period.
#[derive(Debug, Clone, PartialEq)]
pub struct SubregionRow {
    pub name: Arc<str>,
    pub category: Option<Arc<str>>,
    pub period: Option<Arc<str>>,
}

/// One point of a region's detail graph: the region value next to its
/// peer aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPoint {
    pub date: Arc<str>,
    pub value: Option<f64>,
    pub national: Option<f64>,
    pub regional: Option<f64>,
}

/// Region-keyed sample storage: the latest snapshot plus (once the background
/// load lands) full histories.
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    latest: AHashMap<Arc<str>, MetricSample>,
    history: AHashMap<Arc<str>, MetricSeries>,
}

impl MetricTable {
    pub fn set_latest(&mut self, latest: AHashMap<Arc<str>, MetricSample>) {
        self.latest = latest;
    }

    pub fn set_history(&mut self, history: AHashMap<Arc<str>, MetricSeries>) {
        self.history = history;
    }

    #[inline] pub fn has_latest(&self) -> bool { !self.latest.is_empty() }

    #[inline] pub fn has_history(&self) -> bool { !self.history.is_empty() }

    /// Sample for (region, date). `None` as the date selects the latest
    /// sample; a concrete date is looked up in the history.
    pub fn sample_on(&self, region: &str, date: Option<&str>) -> Option<&MetricSample> {
        match date {
            None => self.latest.get(region),
            Some(date) => self
                .history
                .get(region)?
                .samples
                .iter()
                .find(|s| &*s.date == date),
        }
    }

    /// Distinct dates across all histories, ascending. Feeds playback.
    pub fn dates(&self) -> Vec<Arc<str>> {
        let mut dates: Vec<Arc<str>> = Vec::new();
        for series in self.history.values() {
            for sample in &series.samples {
                dates.push(sample.date.clone());
            }
        }
        dates.sort();
        dates.dedup();
        dates
    }

    /// Observed (min, max) of the latest numeric values, for the legend.
    pub fn latest_value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.latest.values().filter_map(|s| s.value).filter(|v| v.is_finite());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Predicted values for one future period, keyed by region. Regions whose
/// prediction was absent or null are simply not present.
#[derive(Debug, Clone, Default)]
pub struct PredictionOverlay {
    period: u8,
    values: AHashMap<Arc<str>, f64>,
}

impl PredictionOverlay {
    pub fn new(period: u8, values: AHashMap<Arc<str>, f64>) -> Self {
        Self { period, values }
    }

    #[inline] pub fn period(&self) -> u8 { self.period }

    #[inline] pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn value(&self, region: &str) -> Option<f64> {
        self.values.get(region).copied()
    }
}
