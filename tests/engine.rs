// Integration tests for the drill-down state machine, playback wiring,
// stale-response filtering, and layer derivation.

use std::sync::Arc;

use ahash::AHashMap;
use riskmap::{
    Effect, Event, FetchPayload, FetchRequest, GeometryStore, MapEngine, MetricSample, MetricSeries,
    SubregionRow, TimerCommand, Viewport,
};

fn store() -> GeometryStore {
    let regions = serde_json::to_vec(&serde_json::json!({
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
                "properties": { "NAME": "Oklahoma", "STATE": "40" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-103.0, 33.6], [-94.4, 33.6], [-94.4, 37.0], [-103.0, 37.0], [-103.0, 33.6]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Nowhere", "STATE": "99" },
                "geometry": { "type": "Point", "coordinates": [-98.0, 35.0] }
            }
        ]
    }))
    .unwrap();
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
                "properties": { "NAME": "Harris", "STATE": "48" },
                "geometry": { "type": "Point", "coordinates": [-95.4, 29.8] }
            }
        ]
    }))
    .unwrap();

    let mut store = GeometryStore::from_geojson_regions(&regions).unwrap();
    store.load_centroids(&centroids).unwrap();
    store
}

fn history_payload() -> FetchPayload {
    let sample = |date: &str, value: f64| MetricSample {
        region: "Texas".into(),
        date: date.into(),
        value: Some(value),
        category: None,
    };
    let mut history = AHashMap::new();
    history.insert(
        Arc::<str>::from("Texas"),
        MetricSeries {
            region: "Texas".into(),
            samples: vec![sample("2024-01-01", 1.0), sample("2024-01-08", 2.0)],
        },
    );
    FetchPayload::History(history)
}

fn engine_with_history() -> MapEngine {
    let (mut engine, effects) = MapEngine::new(store());
    assert_eq!(
        effects,
        vec![
            Effect::Fetch { generation: 0, request: FetchRequest::Latest },
            Effect::Fetch { generation: 0, request: FetchRequest::History },
        ]
    );
    engine.handle(Event::FetchCompleted { generation: 0, payload: history_payload() });
    engine
}

fn subregion_fetch_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::Fetch { generation, request: FetchRequest::Subregions { .. } } => Some(*generation),
            _ => None,
        })
        .expect("drill-down must request sub-region data")
}

#[test]
fn selecting_a_region_drills_down_and_forces_the_latest_date() {
    let mut engine = engine_with_history();
    engine.handle(Event::Scrub { index: 0 });
    assert_eq!(engine.active_date(), Some("2024-01-01"));

    let effects = engine.handle(Event::RegionClicked { name: "Texas".into() });

    // Child-data requests come first, in order.
    assert!(matches!(
        &effects[0],
        Effect::Fetch { request: FetchRequest::Subregions { region }, .. } if &**region == "Texas"
    ));
    assert!(matches!(
        &effects[1],
        Effect::Fetch { request: FetchRequest::Detail { region }, .. } if &**region == "Texas"
    ));

    assert_eq!(engine.drill().selected().map(|r| &*r.name), Some("Texas"));
    assert_eq!(engine.active_date(), Some("2024-01-08")); // forced to "now"
    assert!(engine.show_detail_panel());
    assert!(!engine.show_playback_controls());

    // The camera flew to the region, not the national default.
    assert_ne!(engine.viewport().longitude, Viewport::national().longitude);
}

#[test]
fn play_tick_then_drill_scenario() {
    // National view, dates ["2024-01-01","2024-01-08"], cursor on the first.
    let mut engine = engine_with_history();
    engine.handle(Event::Scrub { index: 0 });

    let effects = engine.handle(Event::Play);
    assert_eq!(effects, vec![Effect::Timer(TimerCommand::Start { interval_ms: 1000 })]);

    engine.handle(Event::Tick);
    assert_eq!(engine.playback().index(), 1);

    let effects = engine.handle(Event::RegionClicked { name: "Texas".into() });
    assert_eq!(engine.playback().index(), 1); // already the last date
    assert!(!engine.drill().is_national());
    assert!(matches!(
        &effects[0],
        Effect::Fetch { request: FetchRequest::Subregions { region }, .. } if &**region == "Texas"
    ));
}

#[test]
fn zoom_gesture_resets_drill_down_and_discards_late_responses() {
    let mut engine = engine_with_history();
    let effects = engine.handle(Event::RegionClicked { name: "Texas".into() });
    let generation = subregion_fetch_generation(&effects);

    // A zoom gesture while drilled in exits to national, unconditionally.
    engine.handle(Event::ViewportChanged {
        viewport: Viewport::national(),
        zoom_gesture: true,
    });
    assert!(engine.drill().is_national());
    assert!(engine.show_playback_controls());
    let vp = engine.viewport();
    assert_eq!((vp.longitude, vp.latitude, vp.zoom), (-98.5795, 39.8283, 3.0));

    // The sub-region fetch from the abandoned drill-down resolves late.
    engine.handle(Event::FetchCompleted {
        generation,
        payload: FetchPayload::Subregions {
            region: "Texas".into(),
            rows: vec![SubregionRow { name: "Travis".into(), category: Some("High".into()), period: None }],
        },
    });
    assert!(engine.drill().subregions().is_empty()); // discarded
}

#[test]
fn responses_for_the_current_drill_generation_apply() {
    let mut engine = engine_with_history();
    let effects = engine.handle(Event::RegionClicked { name: "Texas".into() });
    let generation = subregion_fetch_generation(&effects);

    engine.handle(Event::FetchCompleted {
        generation,
        payload: FetchPayload::Subregions {
            region: "Texas".into(),
            rows: vec![SubregionRow { name: "Travis".into(), category: Some("High".into()), period: None }],
        },
    });
    assert_eq!(engine.drill().subregions().len(), 1);
}

#[test]
fn responses_for_a_different_region_are_discarded() {
    let mut engine = engine_with_history();
    let effects = engine.handle(Event::RegionClicked { name: "Texas".into() });
    let stale = subregion_fetch_generation(&effects);

    // Switch to another region; Texas's fetch is now for a superseded context.
    engine.handle(Event::RegionClicked { name: "Oklahoma".into() });
    engine.handle(Event::FetchCompleted {
        generation: stale,
        payload: FetchPayload::Subregions {
            region: "Texas".into(),
            rows: vec![SubregionRow { name: "Travis".into(), category: None, period: None }],
        },
    });
    assert!(engine.drill().subregions().is_empty());
    assert_eq!(engine.drill().selected().map(|r| &*r.name), Some("Oklahoma"));
}

#[test]
fn subregion_clicks_never_renavigate() {
    let mut engine = engine_with_history();
    engine.handle(Event::RegionClicked { name: "Texas".into() });
    let before = *engine.viewport();

    let effects = engine.handle(Event::SubregionClicked { name: "Travis".into() });
    assert!(effects.is_empty());
    assert_eq!(engine.drill().selected().map(|r| &*r.name), Some("Texas"));
    assert_eq!(*engine.viewport(), before);
}

#[test]
fn unfittable_geometry_aborts_navigation() {
    let mut engine = engine_with_history();
    let effects = engine.handle(Event::RegionClicked { name: "Nowhere".into() });
    assert!(effects.is_empty());
    assert!(engine.drill().is_national());
    assert_eq!(*engine.viewport(), Viewport::national());
}

#[test]
fn back_restores_the_national_view() {
    let mut engine = engine_with_history();
    engine.handle(Event::RegionClicked { name: "Texas".into() });
    engine.handle(Event::Back);

    assert!(engine.drill().is_national());
    assert!(!engine.show_detail_panel());
    let vp = engine.viewport();
    assert_eq!((vp.longitude, vp.latitude, vp.zoom), (-98.5795, 39.8283, 3.0));
}

#[test]
fn pan_deltas_are_clamped_before_storage() {
    let mut engine = engine_with_history();
    engine.handle(Event::ViewportChanged {
        viewport: Viewport { longitude: -500.0, latitude: 99.0, zoom: 50.0, ..Viewport::national() },
        zoom_gesture: false,
    });
    let vp = engine.viewport();
    assert_eq!(vp.longitude, riskmap::MIN_LON);
    assert_eq!(vp.latitude, riskmap::MAX_LAT);
    assert_eq!(vp.zoom, riskmap::MAX_ZOOM);
}

#[test]
fn teardown_cancels_the_playback_timer() {
    let mut engine = engine_with_history();
    engine.handle(Event::Play);
    assert_eq!(engine.teardown(), vec![Effect::Timer(TimerCommand::Stop)]);
    // Idempotent once stopped.
    assert!(engine.teardown().is_empty());
}

#[test]
fn layer_stack_reflects_drill_state() {
    let mut engine = engine_with_history();

    let national = riskmap::derive_layers(&engine);
    assert_eq!(national.len(), 2);
    assert_eq!(national[0].id, "inset-boxes");
    assert_eq!(national[1].id, "regions");
    assert!(national[1].pickable);

    engine.handle(Event::RegionClicked { name: "Texas".into() });
    engine.handle(Event::Hover { region: Some("Travis".into()) });

    let detail = riskmap::derive_layers(&engine);
    assert_eq!(detail.len(), 3);
    assert_eq!(detail[2].id, "subregion-cells");
    assert!(detail[2].pickable);
    assert!(!detail[1].pickable); // dimmed coarse layer stops picking
    // One fill per tessellation cell, hovered cell emphasized.
    assert_eq!(detail[2].fills.len(), 2);
}
