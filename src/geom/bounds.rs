use geo::{Coord, Geometry, LineString, Polygon, Rect};

use crate::error::EngineError;

/// Compute the lon/lat bounding box of a region boundary by scanning every
/// coordinate of every ring, treating Polygon and MultiPolygon uniformly.
///
/// Geometry with zero coordinates or any other kind is an error: camera fitting
/// must abort and report rather than navigate to a made-up default.
pub fn geometry_bounds(geometry: &Geometry<f64>) -> Result<Rect<f64>, EngineError> {
    let mut scan = BoundsScan::default();

    match geometry {
        Geometry::Polygon(polygon) => scan.polygon(polygon),
        Geometry::MultiPolygon(mp) => {
            for polygon in mp.0.iter() {
                scan.polygon(polygon);
            }
        }
        other => {
            return Err(EngineError::Geometry(format!(
                "unsupported geometry kind for bounds fitting: {}",
                kind_name(other)
            )))
        }
    }

    scan.finish()
}

fn kind_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Running min/max over scanned coordinates.
#[derive(Debug, Default)]
struct BoundsScan {
    min: Option<Coord<f64>>,
    max: Option<Coord<f64>>,
}

impl BoundsScan {
    fn polygon(&mut self, polygon: &Polygon<f64>) {
        self.ring(polygon.exterior());
        for interior in polygon.interiors() {
            self.ring(interior);
        }
    }

    fn ring(&mut self, ring: &LineString<f64>) {
        for coord in ring.coords() {
            let min = self.min.get_or_insert(*coord);
            min.x = min.x.min(coord.x);
            min.y = min.y.min(coord.y);
            let max = self.max.get_or_insert(*coord);
            max.x = max.x.max(coord.x);
            max.y = max.y.max(coord.y);
        }
    }

    fn finish(self) -> Result<Rect<f64>, EngineError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Ok(Rect::new(min, max)),
            _ => Err(EngineError::Geometry("geometry has no coordinates".into())),
        }
    }
}
