use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use riskmap::{derive_layers, Effect, Event, FetchPayload, FetchRequest, GeometryStore, LayerGeometry, MapEngine};

use crate::cli::{InspectArgs, RenderArgs, SourceArgs};

pub fn render(args: &RenderArgs) -> Result<()> {
    let engine = build_engine(&args.source)?;
    riskmap::write_svg(&args.output, &engine, args.width, args.margin)?;
    eprintln!("wrote {}", args.output.display());
    Ok(())
}

pub fn inspect(args: &InspectArgs) -> Result<()> {
    let engine = build_engine(&args.source)?;
    println!("{}", serde_json::to_string_pretty(&report(&engine))?);
    Ok(())
}

/// The `inspect` report: viewport, navigation, legend, and per-layer summaries.
fn report(engine: &MapEngine) -> serde_json::Value {
    let layers: Vec<_> = derive_layers(engine)
        .iter()
        .map(|layer| {
            let features = match &layer.geometry {
                LayerGeometry::Regions(names) => names.len(),
                LayerGeometry::Boxes(boxes) => boxes.len(),
                LayerGeometry::Cells(cells) => cells.len(),
            };
            json!({
                "id": layer.id,
                "features": features,
                "fills": layer.fills,
                "line_width": layer.line_width,
                "pickable": layer.pickable,
            })
        })
        .collect();

    let legend: Vec<_> = engine
        .scale()
        .legend_stops()
        .into_iter()
        .map(|(value, color)| json!({ "value": value, "color": color }))
        .collect();

    json!({
        "viewport": engine.viewport(),
        "drilled_into": engine.drill().selected().map(|r| r.name.to_string()),
        "dates": engine.playback().dates().len(),
        "latest_loaded": engine.table().has_latest(),
        "latest_value_range": engine.table().latest_value_range(),
        "legend": legend,
        "layers": layers,
    })
}

/// Load geometry, start the engine, and run its startup (and optional
/// drill-down) effects synchronously against the metrics API.
fn build_engine(source: &SourceArgs) -> Result<MapEngine> {
    let bytes = fs::read(&source.regions)
        .with_context(|| format!("Failed to read {}", source.regions.display()))?;
    let mut store = GeometryStore::from_geojson_regions(&bytes)?;

    if let Some(path) = &source.subregions {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        store.load_subregions(&bytes)?;
    }
    if let Some(path) = &source.centroids {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        store.load_centroids(&bytes)?;
    }

    let (mut engine, effects) = MapEngine::new(store);
    run_effects(&mut engine, source.api.as_deref(), effects);

    if let Some(region) = &source.drill {
        let effects = engine.handle(Event::RegionClicked { name: Arc::from(region.as_str()) });
        run_effects(&mut engine, source.api.as_deref(), effects);
    }

    Ok(engine)
}

/// One-shot host loop: run fetch effects to completion, feeding results back
/// as events. Timer effects are meaningless in a snapshot and are dropped.
fn run_effects(engine: &mut MapEngine, api: Option<&str>, effects: Vec<Effect>) {
    let mut queue = effects;
    while !queue.is_empty() {
        let mut next = Vec::new();
        for effect in queue {
            match effect {
                Effect::Fetch { generation, request } => {
                    match run_fetch(api, &request) {
                        Ok(Some(payload)) => {
                            next.extend(engine.handle(Event::FetchCompleted { generation, payload }));
                        }
                        Ok(None) => {} // no API configured; stay neutral
                        Err(err) => {
                            next.extend(engine.handle(Event::FetchFailed {
                                generation,
                                message: err.to_string(),
                            }));
                        }
                    }
                }
                Effect::Timer(_) => {}
            }
        }
        queue = next;
    }
}

#[cfg(feature = "client")]
fn run_fetch(api: Option<&str>, request: &FetchRequest) -> Result<Option<FetchPayload>> {
    let Some(base) = api else { return Ok(None) };
    let client = riskmap::MetricsClient::new(base)?;
    let payload = match request {
        FetchRequest::Latest => FetchPayload::Latest(client.latest()?),
        FetchRequest::History => FetchPayload::History(client.history()?),
        FetchRequest::Subregions { region } => FetchPayload::Subregions {
            region: region.clone(),
            rows: client.subregions(region)?,
        },
        FetchRequest::Detail { region } => FetchPayload::Detail {
            region: region.clone(),
            points: client.region_detail(region)?,
        },
    };
    Ok(Some(payload))
}

#[cfg(not(feature = "client"))]
fn run_fetch(api: Option<&str>, request: &FetchRequest) -> Result<Option<FetchPayload>> {
    let _ = request;
    if api.is_some() {
        tracing::warn!("built without the `client` feature; --api is ignored");
    }
    Ok(None)
}
