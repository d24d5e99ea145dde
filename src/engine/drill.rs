use crate::metrics::{DetailPoint, SubregionRow};
use crate::types::RegionId;

/// Navigation state: the national overview, or one region drilled into with
/// its child-region data (which arrives asynchronously after entry).
#[derive(Debug, Clone, Default)]
pub enum DrillState {
    #[default]
    National,
    RegionDetail {
        region: RegionId,
        subregions: Vec<SubregionRow>,
        detail: Vec<DetailPoint>,
    },
}

impl DrillState {
    #[inline]
    pub fn is_national(&self) -> bool {
        matches!(self, DrillState::National)
    }

    /// The drilled-into region, if any.
    pub fn selected(&self) -> Option<&RegionId> {
        match self {
            DrillState::National => None,
            DrillState::RegionDetail { region, .. } => Some(region),
        }
    }

    pub fn subregions(&self) -> &[SubregionRow] {
        match self {
            DrillState::National => &[],
            DrillState::RegionDetail { subregions, .. } => subregions,
        }
    }

    pub fn detail(&self) -> &[DetailPoint] {
        match self {
            DrillState::National => &[],
            DrillState::RegionDetail { detail, .. } => detail,
        }
    }
}
