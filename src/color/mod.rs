mod mapper;
mod scale;

pub use mapper::{color_for, subregion_color, ColorSnapshot};
pub use scale::{category_value, LinearScale, Rgba, DATA_ALPHA, DIMMED, HOVER_ALPHA, HOVER_DELTA, NEUTRAL};
