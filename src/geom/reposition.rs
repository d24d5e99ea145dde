use geo::{Coord, LineString, MapCoords, Polygon, Rect};

use crate::types::Region;

/// Affine remap applied to a geographically remote region so it lands in an
/// inset box of the primary viewport: `(coord - anchor) * scale + offset`,
/// componentwise in lon/lat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsetTransform {
    pub scale: (f64, f64),  // (lon factor, lat factor)
    pub offset: (f64, f64), // (lon offset, lat offset)
    pub anchor: (f64, f64), // (lon anchor, lat anchor)
}

impl InsetTransform {
    #[inline]
    pub fn apply(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (coord.x - self.anchor.0) * self.scale.0 + self.offset.0,
            y: (coord.y - self.anchor.1) * self.scale.1 + self.offset.1,
        }
    }
}

/// Static table of non-contiguous territories and where their insets live.
const INSET_TABLE: &[(&str, InsetTransform)] = &[
    (
        "Alaska",
        InsetTransform { scale: (0.25, 0.35), offset: (-135.0, 27.5), anchor: (-180.0, 55.0) },
    ),
    (
        "Hawaii",
        InsetTransform { scale: (0.8, 0.8), offset: (-120.0, 25.0), anchor: (-160.0, 19.0) },
    ),
    (
        "Puerto Rico",
        InsetTransform { scale: (0.8, 0.8), offset: (-115.0, 25.0), anchor: (-70.0, 18.0) },
    ),
];

/// Look up the inset transform for a region name, if it has one.
pub fn inset_transform(name: &str) -> Option<&'static InsetTransform> {
    INSET_TABLE.iter().find(|(n, _)| *n == name).map(|(_, t)| t)
}

/// Remap the non-contiguous regions of a national collection into their inset
/// boxes. Regions absent from the table pass through unchanged; ring order and
/// polygon grouping are preserved.
///
/// Pure and deterministic. The caller applies this exactly once per raw load;
/// re-applying to already-transformed data is out of contract.
pub fn reposition_regions(regions: Vec<Region>) -> Vec<Region> {
    regions
        .into_iter()
        .map(|mut region| {
            if let Some(transform) = inset_transform(&region.id.name) {
                region.geometry = region.geometry.map_coords(|c| transform.apply(c));
            }
            region
        })
        .collect()
}

/// Decorative bounding boxes drawn around the relocated territories.
/// Constant data, not derived from the transforms.
pub fn inset_boxes() -> Vec<(&'static str, Polygon<f64>)> {
    vec![
        ("Alaska Box", rect_ring(Rect::new(Coord { x: -125.0, y: 30.0 }, Coord { x: -105.0, y: 50.0 }))),
        ("Hawaii/Puerto Rico Box", rect_ring(Rect::new(Coord { x: -125.0, y: 20.0 }, Coord { x: -105.0, y: 30.0 }))),
    ]
}

fn rect_ring(rect: Rect<f64>) -> Polygon<f64> {
    let (min, max) = (rect.min(), rect.max());
    Polygon::new(
        LineString(vec![
            Coord { x: min.x, y: min.y },
            Coord { x: max.x, y: min.y },
            Coord { x: max.x, y: max.y },
            Coord { x: min.x, y: max.y },
            Coord { x: min.x, y: min.y },
        ]),
        vec![],
    )
}
