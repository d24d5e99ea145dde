use thiserror::Error;

/// Failure taxonomy for the map engine.
///
/// Geometry problems abort the navigation that needed them; fetch and payload
/// problems degrade to neutral rendering while the previous data stays in place.
/// Nothing in this taxonomy is allowed to take the view down.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unsupported or empty geometry encountered while fitting the camera.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Network or decode failure talking to the metrics API.
    #[error("metrics fetch failed: {0}")]
    DataFetch(String),

    /// A payload parsed, but its shape is not what the engine expects.
    #[error("unexpected payload shape: {0}")]
    DataShape(String),
}
