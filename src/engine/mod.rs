mod drill;
mod event;
#[allow(clippy::module_inception)]
mod engine;
mod layer;

pub use drill::DrillState;
pub use event::{Effect, Event, FetchPayload, FetchRequest};
pub use engine::MapEngine;
pub use layer::{derive_layers, LayerDescriptor, LayerGeometry};
