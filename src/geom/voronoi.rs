use std::sync::Arc;

use geo::{Coord, LineString, Rect};
use serde_json::{Map, Value};

/// A point sample that seeds one tessellation cell: a position plus whatever
/// attributes rode in on the source feature (carried onto the cell verbatim).
#[derive(Debug, Clone)]
pub struct Site {
    pub name: Arc<str>,
    pub position: Coord<f64>,
    pub attributes: Map<String, Value>,
}

/// One bounded proximity cell: the locations inside the clip extent closer to
/// this cell's site than to any other site.
///
/// Cells have no independent geometry source; they are recomputed from the
/// site set and the clip extent whenever either changes, never patched.
#[derive(Debug, Clone)]
pub struct VoronoiCell {
    pub name: Arc<str>,
    pub site: Coord<f64>,
    /// Closed ring: first and last coordinate are equal.
    pub ring: LineString<f64>,
    pub attributes: Map<String, Value>,
}

/// Compute the bounded Voronoi tessellation of `sites` clipped to `extent`.
///
/// Pure function of its inputs. Each cell starts as the clip rectangle and is
/// cut down by the perpendicular-bisector half-plane against every other site.
/// Sites whose cell degenerates to nothing (including exact duplicates of an
/// earlier site) are omitted rather than emitted as empty polygons.
pub fn tessellate(sites: &[Site], extent: Rect<f64>) -> Vec<VoronoiCell> {
    let corners = rect_corners(extent);

    sites
        .iter()
        .enumerate()
        .filter_map(|(i, site)| {
            let mut cell = corners.clone();
            for (j, other) in sites.iter().enumerate() {
                if j == i {
                    continue;
                }
                if other.position == site.position {
                    // Coincident sites would both claim the full extent.
                    // The first occurrence keeps its cell; later ones are dropped.
                    if j < i {
                        return None;
                    }
                    continue;
                }
                cell = clip_halfplane(&cell, site.position, other.position);
                if cell.len() < 3 {
                    return None;
                }
            }

            // Close the ring explicitly.
            let mut ring = cell;
            ring.push(ring[0]);

            Some(VoronoiCell {
                name: site.name.clone(),
                site: site.position,
                ring: LineString(ring),
                attributes: site.attributes.clone(),
            })
        })
        .collect()
}

fn rect_corners(rect: Rect<f64>) -> Vec<Coord<f64>> {
    let (min, max) = (rect.min(), rect.max());
    vec![
        Coord { x: min.x, y: min.y },
        Coord { x: max.x, y: min.y },
        Coord { x: max.x, y: max.y },
        Coord { x: min.x, y: max.y },
    ]
}

/// Sutherland-Hodgman clip of an open convex ring against the half-plane of
/// points closer to `a` than to `b`.
fn clip_halfplane(ring: &[Coord<f64>], a: Coord<f64>, b: Coord<f64>) -> Vec<Coord<f64>> {
    let mid = Coord { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 };
    let dir = Coord { x: b.x - a.x, y: b.y - a.y };
    // Signed distance surrogate: negative on `a`'s side of the bisector.
    let side = |p: &Coord<f64>| (p.x - mid.x) * dir.x + (p.y - mid.y) * dir.y;

    let mut out = Vec::with_capacity(ring.len() + 1);
    for (k, current) in ring.iter().enumerate() {
        let next = &ring[(k + 1) % ring.len()];
        let (fc, fnx) = (side(current), side(next));

        if fc <= 0.0 {
            out.push(*current);
            if fnx > 0.0 {
                out.push(intersect(current, next, fc, fnx));
            }
        } else if fnx <= 0.0 {
            out.push(intersect(current, next, fc, fnx));
        }
    }
    out
}

#[inline]
fn intersect(p: &Coord<f64>, q: &Coord<f64>, fp: f64, fq: f64) -> Coord<f64> {
    let t = fp / (fp - fq);
    Coord { x: p.x + t * (q.x - p.x), y: p.y + t * (q.y - p.y) }
}
