//! Static description of a contended area.

use nav_core::AreaId;

use crate::ExclusivityFlags;

/// How much room an area offers to simultaneous users.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaFootprint {
    /// A single lane or crossing cell.  Every pair of users is exclusive.
    Narrow,
    /// Room for several users (sidewalks, plazas); the exclusivity table
    /// decides.
    #[default]
    Wide,
}

/// Immutable per-area configuration supplied by the world model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaConfig {
    pub id:        AreaId,
    pub footprint: AreaFootprint,
}

impl AreaConfig {
    pub fn narrow(id: AreaId) -> Self {
        Self { id, footprint: AreaFootprint::Narrow }
    }

    pub fn wide(id: AreaId) -> Self {
        Self { id, footprint: AreaFootprint::Wide }
    }

    /// Caller flags combined with what the footprint implies.
    pub fn effective_flags(&self, flags: ExclusivityFlags) -> ExclusivityFlags {
        match self.footprint {
            AreaFootprint::Narrow => flags | ExclusivityFlags::STRICT,
            AreaFootprint::Wide   => flags,
        }
    }
}
