use crate::color::scale::{category_value, LinearScale, Rgba, DATA_ALPHA, DIMMED, NEUTRAL};
use crate::metrics::{MetricTable, PredictionOverlay};

/// Gain applied to predicted values before the warm channel clamps. Tunable;
/// only the clamp at the channel maximum is contractual.
const PREDICTION_GAIN: f64 = 50.0;

/// Everything region coloring may read, captured per render pass.
///
/// Colors are a pure function of (region, snapshot): no closures over live
/// view state, so two calls with identical inputs give identical output.
#[derive(Debug, Clone, Copy)]
pub struct ColorSnapshot<'a> {
    pub scale: &'a LinearScale,
    pub table: &'a MetricTable,
    /// Active playback date; `None` selects the latest sample.
    pub date: Option<&'a str>,
    pub overlay: Option<&'a PredictionOverlay>,
    pub hovered: Option<&'a str>,
    /// Set while a finer-granularity view is shown over this layer.
    pub dim_base_layer: bool,
}

/// Fill color for a top-level region under the given snapshot.
pub fn color_for(region: &str, snapshot: &ColorSnapshot) -> Rgba {
    if snapshot.dim_base_layer {
        // The coarse layer recedes regardless of its computed value.
        return DIMMED;
    }

    let base = match snapshot.overlay {
        Some(overlay) => prediction_color(overlay.value(region)),
        None => historical_color(region, snapshot),
    };

    if snapshot.hovered == Some(region) { base.emphasized() } else { base }
}

/// Fill color for a finer-granularity cell that reports only a category label.
/// Unknown or missing labels are neutral, explicitly, not a default bucket.
pub fn subregion_color(category: Option<&str>, scale: &LinearScale) -> Rgba {
    match category.and_then(category_value) {
        Some(proxy) => scale.color(proxy),
        None => NEUTRAL,
    }
}

fn historical_color(region: &str, snapshot: &ColorSnapshot) -> Rgba {
    match snapshot.table.sample_on(region, snapshot.date).and_then(|s| s.value) {
        Some(value) => snapshot.scale.color(value),
        None => NEUTRAL,
    }
}

/// Clamped linear intensity of the predicted value on a warm-to-cool ramp,
/// independent of the historical scale. Regions the overlay knows about but
/// has no value for stay neutral.
fn prediction_color(value: Option<f64>) -> Rgba {
    match value {
        Some(value) => {
            let warm = (value * PREDICTION_GAIN).clamp(0.0, 255.0) as u8;
            Rgba::new(warm, 60, 255 - warm, DATA_ALPHA)
        }
        None => NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::scale::{HOVER_ALPHA, NEUTRAL};
    use crate::metrics::{MetricSample, MetricTable};
    use ahash::AHashMap;
    use std::sync::Arc;

    fn table_with(region: &str, value: Option<f64>) -> MetricTable {
        let mut latest = AHashMap::new();
        latest.insert(
            Arc::<str>::from(region),
            MetricSample {
                region: region.into(),
                date: "2024-01-08".into(),
                value,
                category: None,
            },
        );
        let mut table = MetricTable::default();
        table.set_latest(latest);
        table
    }

    fn snapshot<'a>(scale: &'a LinearScale, table: &'a MetricTable) -> ColorSnapshot<'a> {
        ColorSnapshot { scale, table, date: None, overlay: None, hovered: None, dim_base_layer: false }
    }

    #[test]
    fn null_value_is_always_neutral() {
        let scale = LinearScale::risk();
        let table = table_with("Ohio", None);
        assert_eq!(color_for("Ohio", &snapshot(&scale, &table)), NEUTRAL);
        // Region with no sample at all behaves identically.
        assert_eq!(color_for("Atlantis", &snapshot(&scale, &table)), NEUTRAL);
    }

    #[test]
    fn value_goes_through_the_continuous_scale() {
        let scale = LinearScale::risk();
        let table = table_with("Ohio", Some(5.0));
        assert_eq!(color_for("Ohio", &snapshot(&scale, &table)), scale.color(5.0));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let scale = LinearScale::risk();
        let table = table_with("Ohio", Some(2.5));
        let snap = snapshot(&scale, &table);
        assert_eq!(color_for("Ohio", &snap), color_for("Ohio", &snap));
    }

    #[test]
    fn hover_brightens_and_forces_alpha() {
        let scale = LinearScale::risk();
        let table = table_with("Ohio", Some(1.0));
        let mut snap = snapshot(&scale, &table);
        snap.hovered = Some("Ohio");
        let color = color_for("Ohio", &snap);
        assert_eq!(color.a, HOVER_ALPHA);
        assert_eq!(color, scale.color(1.0).emphasized());
    }

    #[test]
    fn dimming_wins_over_everything() {
        let scale = LinearScale::risk();
        let table = table_with("Ohio", Some(5.0));
        let mut snap = snapshot(&scale, &table);
        snap.dim_base_layer = true;
        snap.hovered = Some("Ohio");
        assert_eq!(color_for("Ohio", &snap), DIMMED);
    }

    #[test]
    fn overlay_replaces_historical_coloring() {
        let scale = LinearScale::risk();
        let table = table_with("Ohio", Some(5.0));
        let mut values = AHashMap::new();
        values.insert(Arc::<str>::from("Ohio"), 2.0);
        let overlay = PredictionOverlay::new(1, values);
        let mut snap = snapshot(&scale, &table);
        snap.overlay = Some(&overlay);

        let color = color_for("Ohio", &snap);
        assert_eq!(color.r, 100); // 2.0 * gain, inside the clamp
        assert_eq!(color.b, 155);
        // A region the overlay has no value for is neutral, not historical.
        assert_eq!(color_for("Utah", &snap), NEUTRAL);
    }

    #[test]
    fn overlay_intensity_clamps_at_channel_maximum() {
        let scale = LinearScale::risk();
        let table = MetricTable::default();
        let mut values = AHashMap::new();
        values.insert(Arc::<str>::from("Ohio"), 1e6);
        let overlay = PredictionOverlay::new(2, values);
        let mut snap = snapshot(&scale, &table);
        snap.overlay = Some(&overlay);

        let color = color_for("Ohio", &snap);
        assert_eq!(color.r, 255);
        assert_eq!(color.b, 0);
    }

    #[test]
    fn subregion_categories_map_through_the_table() {
        let scale = LinearScale::risk();
        assert_eq!(subregion_color(Some("Very High"), &scale), scale.color(5.0));
        assert_eq!(subregion_color(Some("unheard of"), &scale), NEUTRAL);
        assert_eq!(subregion_color(None, &scale), NEUTRAL);
    }
}
