use std::sync::Arc;

use tracing::{debug, warn};

use crate::camera::{self, Transition, Viewport, FIT_TRANSITION_MS};
use crate::color::{ColorSnapshot, LinearScale};
use crate::engine::drill::DrillState;
use crate::engine::event::{Effect, Event, FetchPayload, FetchRequest};
use crate::geom::GeometryStore;
use crate::metrics::{MetricTable, PredictionOverlay};
use crate::playback::Playback;

/// The interactive choropleth engine: owns the only mutable state of the map
/// view (camera, playback cursor, drill navigation, fetched metrics) and
/// reacts to events one at a time, single-threaded.
///
/// Handlers return the ordered [`Effect`]s the owning view must run; fetch
/// completions come back as events tagged with the generation they were
/// issued under, so responses for a superseded context are discarded instead
/// of applied.
pub struct MapEngine {
    pub(crate) store: GeometryStore,
    pub(crate) scale: LinearScale,
    pub(crate) viewport: Viewport,
    pub(crate) playback: Playback,
    pub(crate) drill: DrillState,
    pub(crate) table: MetricTable,
    pub(crate) overlay: Option<PredictionOverlay>,
    pub(crate) hovered: Option<Arc<str>>,
    /// Bumped on every drill transition; drill-scoped responses must match.
    generation: u64,
    pub(crate) show_detail_panel: bool,
    pub(crate) show_playback_controls: bool,
}

impl MapEngine {
    /// Build the engine over an immutable geometry store and request the
    /// startup loads: the latest snapshot first, then the full history in the
    /// background.
    pub fn new(store: GeometryStore) -> (Self, Vec<Effect>) {
        let engine = Self {
            store,
            scale: LinearScale::risk(),
            viewport: Viewport::national(),
            playback: Playback::new(),
            drill: DrillState::National,
            table: MetricTable::default(),
            overlay: None,
            hovered: None,
            generation: 0,
            show_detail_panel: false,
            show_playback_controls: true,
        };
        let effects = vec![
            Effect::Fetch { generation: 0, request: FetchRequest::Latest },
            Effect::Fetch { generation: 0, request: FetchRequest::History },
        ];
        (engine, effects)
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::RegionClicked { name } => self.enter_detail(&name),
            Event::SubregionClicked { name } => {
                // Never a navigation: sub-region picks must not re-enter.
                debug!(subregion = %name, "ignoring sub-region selection");
                Vec::new()
            }
            Event::Back => self.exit_detail(),
            Event::ViewportChanged { viewport, zoom_gesture } => {
                if zoom_gesture && !self.drill.is_national() {
                    // Zoom-out-to-reset: starting a zoom gesture while
                    // drilled in always exits drill-down.
                    self.exit_detail()
                } else {
                    self.viewport = viewport.clamped();
                    Vec::new()
                }
            }
            Event::Hover { region } => {
                self.hovered = region;
                Vec::new()
            }
            Event::Play => self.playback.play().map(Effect::Timer).into_iter().collect(),
            Event::Pause => self.playback.pause().map(Effect::Timer).into_iter().collect(),
            Event::Tick => {
                self.playback.tick();
                Vec::new()
            }
            Event::Scrub { index } => {
                self.playback.scrub(index);
                Vec::new()
            }
            Event::OverlaySelected { overlay } => {
                if self.drill.is_national() {
                    self.overlay = Some(overlay);
                } else {
                    debug!("ignoring prediction overlay while in region detail");
                }
                Vec::new()
            }
            Event::OverlayCleared => {
                self.overlay = None;
                Vec::new()
            }
            Event::FetchCompleted { generation, payload } => {
                self.apply_fetch(generation, payload);
                Vec::new()
            }
            Event::FetchFailed { generation, message } => {
                // Recovered locally: prior data stays until the next trigger.
                warn!(generation, %message, "metrics fetch failed");
                Vec::new()
            }
        }
    }

    /// Stop any owned timers. Must run when the owning view is torn down.
    pub fn teardown(&mut self) -> Vec<Effect> {
        self.playback.pause().map(Effect::Timer).into_iter().collect()
    }

    /// National -> RegionDetail for a named top-level region. The geometry is
    /// validated for camera fitting before any state changes; on failure the
    /// navigation is aborted and reported.
    fn enter_detail(&mut self, name: &str) -> Vec<Effect> {
        if self.drill.selected().is_some_and(|r| &*r.name == name) {
            return Vec::new(); // already showing this region
        }
        let Some(region) = self.store.region(name) else {
            debug!(region = %name, "click on unknown region");
            return Vec::new();
        };
        if !region.is_top_level() {
            debug!(region = %name, "click on non-top-level region");
            return Vec::new();
        }

        let fitted = match camera::fit_to_geometry(&region.geometry) {
            Ok(viewport) => viewport,
            Err(err) => {
                warn!(region = %name, %err, "cannot fit viewport; navigation aborted");
                return Vec::new();
            }
        };

        let id = region.id.clone();
        self.generation += 1;

        // Ordered side effects: child-data request, camera, overlay, panels.
        let effects = vec![
            Effect::Fetch {
                generation: self.generation,
                request: FetchRequest::Subregions { region: id.name.clone() },
            },
            Effect::Fetch {
                generation: self.generation,
                request: FetchRequest::Detail { region: id.name.clone() },
            },
        ];

        self.viewport = fitted;
        self.overlay = None;
        self.show_detail_panel = true;
        self.show_playback_controls = false;
        self.drill = DrillState::RegionDetail { region: id, subregions: Vec::new(), detail: Vec::new() };
        // Drill-down always shows "now", never a scrubbed slice.
        self.playback.jump_to_latest();

        effects
    }

    /// RegionDetail -> National, from the back action or the zoom-gesture
    /// reset rule.
    fn exit_detail(&mut self) -> Vec<Effect> {
        if self.drill.is_national() {
            return Vec::new();
        }
        self.generation += 1;
        self.drill = DrillState::National;
        self.viewport = Viewport::national().with_transition(Transition::fly_to(FIT_TRANSITION_MS));
        self.show_playback_controls = true;
        self.show_detail_panel = false;
        Vec::new()
    }

    fn apply_fetch(&mut self, generation: u64, payload: FetchPayload) {
        match payload {
            // National-scope loads stay relevant across navigation.
            FetchPayload::Latest(latest) => {
                self.table.set_latest(latest);
            }
            FetchPayload::History(history) => {
                self.table.set_history(history);
                self.playback.set_dates(self.table.dates());
            }
            FetchPayload::Subregions { region, rows } => {
                if !self.accepts_detail_response(generation, &region) {
                    warn!(region = %region, generation, "discarding stale sub-region response");
                    return;
                }
                if let DrillState::RegionDetail { subregions, .. } = &mut self.drill {
                    *subregions = rows;
                }
            }
            FetchPayload::Detail { region, points } => {
                if !self.accepts_detail_response(generation, &region) {
                    warn!(region = %region, generation, "discarding stale detail response");
                    return;
                }
                if let DrillState::RegionDetail { detail, .. } = &mut self.drill {
                    *detail = points;
                }
            }
        }
    }

    /// Drill-scoped responses must match both the current generation and the
    /// currently selected region.
    fn accepts_detail_response(&self, generation: u64, region: &str) -> bool {
        generation == self.generation
            && self.drill.selected().is_some_and(|r| &*r.name == region)
    }

    // Read-only view for rendering and hosts.

    #[inline] pub fn store(&self) -> &GeometryStore { &self.store }

    #[inline] pub fn viewport(&self) -> &Viewport { &self.viewport }

    #[inline] pub fn playback(&self) -> &Playback { &self.playback }

    #[inline] pub fn drill(&self) -> &DrillState { &self.drill }

    #[inline] pub fn table(&self) -> &MetricTable { &self.table }

    #[inline] pub fn scale(&self) -> &LinearScale { &self.scale }

    #[inline] pub fn overlay(&self) -> Option<&PredictionOverlay> { self.overlay.as_ref() }

    #[inline] pub fn hovered(&self) -> Option<&str> { self.hovered.as_deref() }

    #[inline] pub fn show_detail_panel(&self) -> bool { self.show_detail_panel }

    #[inline] pub fn show_playback_controls(&self) -> bool { self.show_playback_controls }

    /// The date driving historical coloring: the playback cursor once the
    /// historical load has landed, otherwise `None` (latest snapshot).
    pub fn active_date(&self) -> Option<&str> {
        if self.table.has_history() {
            self.playback.current_date().map(|d| &**d)
        } else {
            None
        }
    }

    /// Immutable per-render-pass inputs for region coloring.
    pub fn color_snapshot(&self) -> ColorSnapshot<'_> {
        ColorSnapshot {
            scale: &self.scale,
            table: &self.table,
            date: self.active_date(),
            overlay: self.overlay.as_ref(),
            hovered: self.hovered(),
            dim_base_layer: !self.drill.is_national(),
        }
    }
}
