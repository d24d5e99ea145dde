use std::sync::Arc;

use geo::Polygon;

use crate::color::{color_for, subregion_color, Rgba};
use crate::engine::MapEngine;
use crate::geom::{tessellate, VoronoiCell};

const LINE_BLACK: Rgba = Rgba::new(0, 0, 0, 255);

/// Per-frame input to the (out-of-scope) rendering library: a geometry
/// source, parallel per-feature fills, stroke styling, and whether the layer
/// participates in picking. Derived fresh from the engine snapshot on every
/// render pass; the id string is the only persistent identity.
#[derive(Debug, Clone)]
pub struct LayerDescriptor {
    pub id: &'static str,
    pub geometry: LayerGeometry,
    /// One fill per feature, parallel to the geometry source.
    pub fills: Vec<Rgba>,
    pub line_color: Rgba,
    pub line_width: f32,
    pub filled: bool,
    pub pickable: bool,
}

/// What a layer draws.
#[derive(Debug, Clone)]
pub enum LayerGeometry {
    /// Top-level regions from the geometry store, by name, in store order.
    Regions(Vec<Arc<str>>),
    /// Constant decorative polygons.
    Boxes(Vec<Polygon<f64>>),
    /// Tessellation cells for the drilled-into region.
    Cells(Vec<VoronoiCell>),
}

/// Derive the full layer stack for the current engine state. Pure: colors
/// come from the engine's immutable snapshot, never from closures over live
/// view state.
pub fn derive_layers(engine: &MapEngine) -> Vec<LayerDescriptor> {
    let mut layers = vec![inset_box_layer(), region_layer(engine)];
    if let Some(cells) = subregion_layer(engine) {
        layers.push(cells);
    }
    layers
}

fn inset_box_layer() -> LayerDescriptor {
    let boxes = crate::geom::inset_boxes().into_iter().map(|(_, poly)| poly).collect();
    LayerDescriptor {
        id: "inset-boxes",
        geometry: LayerGeometry::Boxes(boxes),
        fills: Vec::new(),
        line_color: LINE_BLACK,
        line_width: 1.0,
        filled: false,
        pickable: false,
    }
}

fn region_layer(engine: &MapEngine) -> LayerDescriptor {
    let snapshot = engine.color_snapshot();
    let names: Vec<Arc<str>> = engine.store().regions().iter().map(|r| r.id.name.clone()).collect();
    let fills = names.iter().map(|name| color_for(name, &snapshot)).collect();

    LayerDescriptor {
        id: "regions",
        geometry: LayerGeometry::Regions(names),
        fills,
        line_color: LINE_BLACK,
        line_width: 2.0,
        filled: true,
        // The dimmed coarse layer stops answering picks while detail is up.
        pickable: engine.drill().is_national(),
    }
}

/// Category-colored proximity cells over the drilled-into region, built from
/// sub-region centroid points clipped to the region's extent.
fn subregion_layer(engine: &MapEngine) -> Option<LayerDescriptor> {
    let region = engine.drill().selected()?;
    let extent = engine.store().region_extent(&region.name)?;
    let sites = engine.store().centroid_sites_of(&region.name);
    if sites.is_empty() {
        return None;
    }

    let cells = tessellate(&sites, extent);
    let fills = cells
        .iter()
        .map(|cell| {
            let category = engine
                .drill()
                .subregions()
                .iter()
                .find(|row| row.name == cell.name)
                .and_then(|row| row.category.as_deref());
            let base = subregion_color(category, engine.scale());
            if engine.hovered() == Some(&*cell.name) { base.emphasized() } else { base }
        })
        .collect();

    Some(LayerDescriptor {
        id: "subregion-cells",
        geometry: LayerGeometry::Cells(cells),
        fills,
        line_color: LINE_BLACK,
        line_width: 1.0,
        filled: true,
        pickable: true,
    })
}
