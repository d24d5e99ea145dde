mod bbox;
mod bounds;
mod reposition;
mod store;
mod voronoi;

use bbox::BoundingBox;

pub use bounds::geometry_bounds;
pub use reposition::{inset_boxes, inset_transform, reposition_regions, InsetTransform};
pub use store::GeometryStore;
pub use voronoi::{tessellate, Site, VoronoiCell};
