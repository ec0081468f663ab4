//! Coarse mover classification shared by the reservation and obstacle crates.
//!
//! The steering layer tags every agent with a small integer mover type.  The
//! tag is decoded once into this closed enum; exclusivity and criticality
//! rules then `match` on it instead of dispatching through per-type objects.

use std::str::FromStr;

/// The kind of traffic participant an agent is.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoverType {
    /// Unclassified tag.  Treated as exclusive with everything.
    #[default]
    Unknown,
    /// Controlled road vehicle (units, service vehicles).
    Car,
    /// Any person on foot.
    Pedestrian,
    /// Ambient civilian road traffic.
    Civil,
    /// Emergency vehicle running with signals.
    Emergency,
}

impl MoverType {
    /// Every classified variant, in tag order.  `Unknown` excluded.
    pub const CLASSIFIED: [MoverType; 4] = [
        MoverType::Car,
        MoverType::Pedestrian,
        MoverType::Civil,
        MoverType::Emergency,
    ];

    /// Decode a coarse integer tag.  Unrecognised tags become `Unknown`.
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            1 => MoverType::Car,
            2 => MoverType::Pedestrian,
            3 => MoverType::Civil,
            4 => MoverType::Emergency,
            _ => MoverType::Unknown,
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            MoverType::Unknown    => 0,
            MoverType::Car        => 1,
            MoverType::Pedestrian => 2,
            MoverType::Civil      => 3,
            MoverType::Emergency  => 4,
        }
    }

    /// `true` for anything that drives on a lane.
    #[inline]
    pub fn is_car(self) -> bool {
        matches!(self, MoverType::Car | MoverType::Civil | MoverType::Emergency)
    }

    /// `true` for ambient civilian traffic.
    #[inline]
    pub fn is_civil(self) -> bool {
        matches!(self, MoverType::Civil)
    }

    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, MoverType::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoverType::Unknown    => "unknown",
            MoverType::Car        => "car",
            MoverType::Pedestrian => "pedestrian",
            MoverType::Civil      => "civil",
            MoverType::Emergency  => "emergency",
        }
    }
}

impl FromStr for MoverType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown"    => Ok(MoverType::Unknown),
            "car"        => Ok(MoverType::Car),
            "pedestrian" => Ok(MoverType::Pedestrian),
            "civil"      => Ok(MoverType::Civil),
            "emergency"  => Ok(MoverType::Emergency),
            other        => Err(format!("unknown mover type {other:?}")),
        }
    }
}

impl std::fmt::Display for MoverType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
