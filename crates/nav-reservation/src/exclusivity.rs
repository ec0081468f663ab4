//! Mutual-exclusivity classification of two reservations on the same area.
//!
//! # Policy table
//!
//! The decision is a lookup in a symmetric `MoverType × MoverType` table
//! rather than per-type override logic, so projects extend it through
//! configuration (see [`crate::loader`]) without touching the resolver.
//!
//! | Pair                   | Default policy |
//! |------------------------|----------------|
//! | pedestrian/pedestrian  | `Shared`       |
//! | anything else          | `Exclusive`    |
//! | anything with Unknown  | always `Exclusive` (not configurable) |
//!
//! The table is a minimum viable policy.  Vehicle-class tie-breaking beyond
//! this matrix is expressed through criticality weights instead.

use nav_agent::MovableState;
use nav_core::MoverType;

use crate::Reservation;

bitflags::bitflags! {
    /// Per-call overrides supplied by the steering system.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ExclusivityFlags: u32 {
        /// Treat every pair as exclusive.  Wins over `RELAXED`.
        const STRICT  = 0b0000_0001;
        /// Treat `SharedWhenSlow` pairs as `Shared` regardless of speed.
        const RELAXED = 0b0000_0010;
    }
}

/// How two mover types may share an area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PairPolicy {
    #[default]
    Exclusive,
    Shared,
    /// Shared only while both agents move at or below the table's
    /// `slow_speed_mps`.
    SharedWhenSlow,
}

impl PairPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            PairPolicy::Exclusive      => "exclusive",
            PairPolicy::Shared         => "shared",
            PairPolicy::SharedWhenSlow => "shared_when_slow",
        }
    }
}

impl std::str::FromStr for PairPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclusive"        => Ok(PairPolicy::Exclusive),
            "shared"           => Ok(PairPolicy::Shared),
            "shared_when_slow" => Ok(PairPolicy::SharedWhenSlow),
            other              => Err(format!("unknown pair policy {other:?}")),
        }
    }
}

const KINDS: usize = 5;

/// Symmetric policy table indexed by mover tag.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExclusivityTable {
    policies: [[PairPolicy; KINDS]; KINDS],
    /// Speed limit for `SharedWhenSlow`, m/s.
    pub slow_speed_mps: f32,
}

impl ExclusivityTable {
    /// Every pair exclusive.  The starting point for CSV-loaded tables.
    pub fn all_exclusive() -> Self {
        Self {
            policies:       [[PairPolicy::Exclusive; KINDS]; KINDS],
            slow_speed_mps: 1.5,
        }
    }

    /// Set the policy for `a`/`b` (both orders).
    pub fn set(&mut self, a: MoverType, b: MoverType, policy: PairPolicy) {
        let (i, j) = (a.tag() as usize, b.tag() as usize);
        self.policies[i][j] = policy;
        self.policies[j][i] = policy;
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, a: MoverType, b: MoverType, policy: PairPolicy) -> Self {
        self.set(a, b, policy);
        self
    }

    /// Effective policy for a pair.  `Unknown` on either side is always
    /// `Exclusive`.
    pub fn policy(&self, a: MoverType, b: MoverType) -> PairPolicy {
        if !a.is_known() || !b.is_known() {
            return PairPolicy::Exclusive;
        }
        self.policies[a.tag() as usize][b.tag() as usize]
    }

    /// Can `lhs` and `rhs` **not** coexist on their area?
    ///
    /// Only the mover tags carried by the reservations, the owners' movable
    /// state, and `flags` are consulted; time overlap is the caller's
    /// concern.  Two reservations of the same owner are never exclusive.
    pub fn are_reservations_mutually_exclusive(
        &self,
        lhs:         &Reservation,
        rhs:         &Reservation,
        lhs_movable: Option<&MovableState>,
        rhs_movable: Option<&MovableState>,
        flags:       ExclusivityFlags,
    ) -> bool {
        if lhs.owner == rhs.owner {
            return false;
        }
        if !lhs.mover_type.is_known() || !rhs.mover_type.is_known() {
            return true;
        }
        if flags.contains(ExclusivityFlags::STRICT) {
            return true;
        }
        match self.policy(lhs.mover_type, rhs.mover_type) {
            PairPolicy::Exclusive => true,
            PairPolicy::Shared    => false,
            PairPolicy::SharedWhenSlow => {
                if flags.contains(ExclusivityFlags::RELAXED) {
                    return false;
                }
                !(self.is_slow(lhs_movable) && self.is_slow(rhs_movable))
            }
        }
    }

    fn is_slow(&self, movable: Option<&MovableState>) -> bool {
        movable.is_none_or(|m| !m.is_moving(self.slow_speed_mps))
    }
}

impl Default for ExclusivityTable {
    fn default() -> Self {
        Self::all_exclusive().with(MoverType::Pedestrian, MoverType::Pedestrian, PairPolicy::Shared)
    }
}
