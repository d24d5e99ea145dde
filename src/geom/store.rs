use std::sync::Arc;

use ahash::AHashMap;
use anyhow::{Context, Result};
use geo::{Contains, Coord, LineString, Point, Polygon, Rect};
use rstar::{RTree, AABB};
use serde_json::Value;
use tracing::warn;

use crate::geom::{geometry_bounds, reposition_regions, BoundingBox, Site};
use crate::types::{Region, RegionId, RegionLevel};

/// Immutable session-long geometry: top-level regions (already repositioned
/// into the contiguous viewport), their sub-regions, and sub-region centroid
/// points, plus an R-tree over region bounding boxes for hit-testing.
#[derive(Debug, Default)]
pub struct GeometryStore {
    regions: Vec<Region>,
    subregions: Vec<Region>,
    centroids: Vec<Site>,
    index: AHashMap<Arc<str>, usize>, // region name -> index into regions
    rtree: RTree<BoundingBox>,
}

impl GeometryStore {
    /// Load the top-level region collection from GeoJSON bytes, dropping
    /// nameless features and applying the inset repositioning exactly once.
    pub fn from_geojson_regions(bytes: &[u8]) -> Result<Self> {
        let raw = parse_features(bytes, RegionLevel::State, None)?;
        let regions = reposition_regions(raw);

        let index = regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.name.clone(), i))
            .collect();

        let rtree = RTree::bulk_load(
            regions
                .iter()
                .enumerate()
                .filter_map(|(i, region)| match geometry_bounds(&region.geometry) {
                    Ok(bounds) => Some(BoundingBox::new(i, bounds)),
                    Err(err) => {
                        warn!(region = %region.id.name, %err, "excluding region from hit index");
                        None
                    }
                })
                .collect(),
        );

        Ok(Self { regions, subregions: Vec::new(), centroids: Vec::new(), index, rtree })
    }

    /// Attach the sub-region collection. Parents are resolved through each
    /// feature's owning-region code; sub-regions pointing at an unknown parent
    /// are kept without one.
    pub fn load_subregions(&mut self, bytes: &[u8]) -> Result<()> {
        let by_code: AHashMap<u32, RegionId> =
            self.regions.iter().map(|r| (r.id.code, r.id.clone())).collect();
        self.subregions = parse_features(bytes, RegionLevel::County, Some(&by_code))?;
        Ok(())
    }

    /// Attach sub-region centroid points (Point features; all properties ride
    /// along as cell attributes).
    pub fn load_centroids(&mut self, bytes: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(bytes).context("Failed to parse centroid GeoJSON")?;
        let mut sites = Vec::new();

        for feature in value["features"].as_array().into_iter().flatten() {
            let Some(name) = feature_name(feature) else { continue };
            let geometry = &feature["geometry"];
            if geometry["type"].as_str() != Some("Point") {
                continue;
            }
            let Some(coords) = geometry["coordinates"].as_array() else { continue };
            let (Some(x), Some(y)) = (
                coords.first().and_then(Value::as_f64),
                coords.get(1).and_then(Value::as_f64),
            ) else {
                continue;
            };

            let attributes = feature["properties"].as_object().cloned().unwrap_or_default();
            sites.push(Site { name: Arc::from(name), position: Coord { x, y }, attributes });
        }

        self.centroids = sites;
        Ok(())
    }

    #[inline] pub fn regions(&self) -> &[Region] { &self.regions }

    #[inline] pub fn subregions(&self) -> &[Region] { &self.subregions }

    /// Look up a top-level region by name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.index.get(name).map(|&i| &self.regions[i])
    }

    /// Sub-regions whose parent is the named top-level region.
    pub fn subregions_of(&self, name: &str) -> Vec<&Region> {
        self.subregions
            .iter()
            .filter(|r| r.parent.as_ref().is_some_and(|p| &*p.name == name))
            .collect()
    }

    /// Centroid sites whose owning-region attribute matches the named region's
    /// code. Used to seed the tessellation when only point data exists.
    pub fn centroid_sites_of(&self, name: &str) -> Vec<Site> {
        let Some(region) = self.region(name) else { return Vec::new() };
        self.centroids
            .iter()
            .filter(|site| {
                site.attributes
                    .get("STATE")
                    .and_then(numeric_code)
                    .is_some_and(|code| code == region.id.code)
            })
            .cloned()
            .collect()
    }

    /// Top-level region containing the given lon/lat point, if any.
    pub fn region_at(&self, point: Point<f64>) -> Option<&Region> {
        let envelope = AABB::from_point([point.x(), point.y()]);
        self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|bbox| &self.regions[bbox.idx()])
            .find(|region| region.geometry.contains(&point))
    }

    /// Bounding box of a named region's geometry, for tessellation clipping.
    pub fn region_extent(&self, name: &str) -> Option<Rect<f64>> {
        self.region(name).and_then(|r| geometry_bounds(&r.geometry).ok())
    }
}

/// Parse a GeoJSON FeatureCollection into regions, skipping nameless features
/// the way the raw national dataset requires.
fn parse_features(
    bytes: &[u8],
    level: RegionLevel,
    parents: Option<&AHashMap<u32, RegionId>>,
) -> Result<Vec<Region>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse region GeoJSON")?;
    let mut regions = Vec::new();

    for feature in value["features"].as_array().into_iter().flatten() {
        let Some(name) = feature_name(feature) else { continue };

        let properties = &feature["properties"];
        let code_key = match level {
            RegionLevel::State => "STATE",
            RegionLevel::County => "COUNTY",
        };
        let code = properties.get(code_key).and_then(numeric_code).unwrap_or(0);

        let parent = match (level, parents) {
            (RegionLevel::County, Some(by_code)) => properties
                .get("STATE")
                .and_then(numeric_code)
                .and_then(|state_code| by_code.get(&state_code).cloned()),
            _ => None,
        };

        let Some(geometry) = parse_geometry(&feature["geometry"]) else { continue };

        regions.push(Region {
            id: RegionId::new(level, code, name),
            parent,
            geometry,
        });
    }

    Ok(regions)
}

fn feature_name(feature: &Value) -> Option<&str> {
    feature["properties"]["NAME"].as_str().filter(|n| !n.is_empty())
}

/// Region codes arrive as either JSON numbers or zero-padded strings.
fn numeric_code(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|v| v as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a GeoJSON Polygon or MultiPolygon geometry. Other kinds are preserved
/// as points where possible so bounds fitting can reject them with a report.
fn parse_geometry(geometry: &Value) -> Option<geo::Geometry<f64>> {
    let coords = geometry["coordinates"].as_array()?;
    match geometry["type"].as_str()? {
        "Polygon" => Some(geo::Geometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => {
            let polygons: Vec<Polygon<f64>> = coords
                .iter()
                .filter_map(|p| p.as_array().and_then(|rings| parse_polygon(rings)))
                .collect();
            Some(geo::Geometry::MultiPolygon(geo::MultiPolygon(polygons)))
        }
        "Point" => {
            let x = coords.first().and_then(Value::as_f64)?;
            let y = coords.get(1).and_then(Value::as_f64)?;
            Some(geo::Geometry::Point(Point::new(x, y)))
        }
        _ => None,
    }
}

fn parse_polygon(rings: &[Value]) -> Option<Polygon<f64>> {
    let mut parsed = rings.iter().filter_map(|ring| parse_ring(ring.as_array()?));
    let exterior = parsed.next()?;
    let interiors: Vec<LineString<f64>> = parsed.collect();
    Some(Polygon::new(exterior, interiors))
}

fn parse_ring(coords: &[Value]) -> Option<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let pair = pair.as_array()?;
        let x = pair.first().and_then(Value::as_f64)?;
        let y = pair.get(1).and_then(Value::as_f64)?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Some(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states_geojson() -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "NAME": "Texas", "STATE": "48" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-106.0, 26.0], [-93.0, 26.0], [-93.0, 36.5], [-106.0, 36.5], [-106.0, 26.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "STATE": "00" },
                    "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn nameless_features_are_dropped() {
        let store = GeometryStore::from_geojson_regions(&states_geojson()).unwrap();
        assert_eq!(store.regions().len(), 1);
        assert_eq!(&*store.regions()[0].id.name, "Texas");
        assert_eq!(store.regions()[0].id.code, 48);
    }

    #[test]
    fn hit_test_finds_the_containing_region() {
        let store = GeometryStore::from_geojson_regions(&states_geojson()).unwrap();
        let hit = store.region_at(Point::new(-99.0, 31.0)).unwrap();
        assert_eq!(&*hit.id.name, "Texas");
        assert!(store.region_at(Point::new(0.0, 50.0)).is_none());
    }

    #[test]
    fn subregions_resolve_their_parent() {
        let mut store = GeometryStore::from_geojson_regions(&states_geojson()).unwrap();
        let counties = serde_json::to_vec(&serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "NAME": "Travis", "STATE": "48", "COUNTY": "453" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-98.2, 30.0], [-97.4, 30.0], [-97.4, 30.6], [-98.2, 30.0]]]
                }
            }]
        }))
        .unwrap();
        store.load_subregions(&counties).unwrap();

        let of_texas = store.subregions_of("Texas");
        assert_eq!(of_texas.len(), 1);
        assert_eq!(&*of_texas[0].id.name, "Travis");
    }

    #[test]
    fn centroid_sites_filter_by_owning_region() {
        let mut store = GeometryStore::from_geojson_regions(&states_geojson()).unwrap();
        let centroids = serde_json::to_vec(&serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "NAME": "Travis", "STATE": "48" },
                    "geometry": { "type": "Point", "coordinates": [-97.8, 30.3] }
                },
                {
                    "type": "Feature",
                    "properties": { "NAME": "Elsewhere", "STATE": "06" },
                    "geometry": { "type": "Point", "coordinates": [-120.0, 37.0] }
                }
            ]
        }))
        .unwrap();
        store.load_centroids(&centroids).unwrap();

        let sites = store.centroid_sites_of("Texas");
        assert_eq!(sites.len(), 1);
        assert_eq!(&*sites[0].name, "Travis");
    }
}
