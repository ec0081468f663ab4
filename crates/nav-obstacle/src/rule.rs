//! Per-category "treat as static" rules.

use nav_core::{MoverType, TransformTolerance};

/// Current classification of an agent's collision footprint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObstacleState {
    Static,
    /// Every agent starts dynamic until its first poll.
    #[default]
    Dynamic,
}

impl ObstacleState {
    #[inline]
    pub fn is_static(self) -> bool {
        self == ObstacleState::Static
    }
}

/// The agent facts a rule looks at, sampled once per poll.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ObstacleSnapshot {
    pub speed_mps:          f32,
    /// Navigation has a target to move to.
    pub has_move_target:    bool,
    /// The action queue is not empty.
    pub has_pending_action: bool,
    /// Evasion logic is about to step or pull aside.
    pub about_to_evade:     bool,
    /// The agent is part of ambient traffic (a car waiting at a signal).
    pub in_traffic:         bool,
}

/// Classifier tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierConfig {
    /// Speeds strictly below this count as standing still, m/s.
    pub static_speed_mps: f32,
    /// Drift allowed before a baked static transform is refreshed.
    pub tolerance: TransformTolerance,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            static_speed_mps: 0.05,
            tolerance:        TransformTolerance::default(),
        }
    }
}

/// Which static rule applies to an agent.  Each rule adds conditions to the
/// one before it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObstacleRule {
    /// No move target, no pending action, below the static speed.
    #[default]
    Default,
    /// `Default`, and not about to evade.
    CivilPerson,
    /// `CivilPerson`, and not in ambient traffic.
    CivilCar,
}

impl ObstacleRule {
    /// Rule used for agents of `mover_type` unless the caller overrides it.
    pub fn for_mover(mover_type: MoverType) -> Self {
        match mover_type {
            MoverType::Pedestrian => ObstacleRule::CivilPerson,
            MoverType::Civil      => ObstacleRule::CivilCar,
            _                     => ObstacleRule::Default,
        }
    }

    pub fn should_be_treated_as_static(self, snapshot: &ObstacleSnapshot, config: &ClassifierConfig) -> bool {
        let base = !snapshot.has_move_target
            && !snapshot.has_pending_action
            && snapshot.speed_mps < config.static_speed_mps;
        match self {
            ObstacleRule::Default     => base,
            ObstacleRule::CivilPerson => base && !snapshot.about_to_evade,
            ObstacleRule::CivilCar    => base && !snapshot.about_to_evade && !snapshot.in_traffic,
        }
    }
}
