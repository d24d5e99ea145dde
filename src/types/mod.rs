mod region;

pub use region::{Region, RegionId, RegionLevel};
