use std::sync::Arc;

/// Granularity of a mapped area: top-level regions drill down into sub-regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionLevel {
    State,  // Top-level entity, drill-down target
    County, // Nested within a state
}

/// Stable key for a mapped area.
/// Keep the display name (metrics payloads are keyed by it) but avoid repeated
/// owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionId {
    pub level: RegionLevel,
    pub code: u32, // FIPS-style numeric code
    pub name: Arc<str>,
}

impl RegionId {
    pub fn new(level: RegionLevel, code: u32, name: impl Into<Arc<str>>) -> Self {
        Self { level, code, name: name.into() }
    }
}

/// An area with its boundary geometry, immutable once loaded from the
/// geometry store.
///
/// The geometry is kept as a `geo::Geometry` rather than forced into a
/// MultiPolygon so that unsupported kinds survive loading and are rejected
/// at the point of use (camera fitting) with a report instead of a silent
/// default.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: RegionId,
    pub parent: Option<RegionId>, // For counties, the owning state
    pub geometry: geo::Geometry<f64>,
}

impl Region {
    pub fn is_top_level(&self) -> bool {
        self.id.level == RegionLevel::State
    }
}
