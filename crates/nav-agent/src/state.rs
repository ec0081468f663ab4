//! Per-agent state snapshots read by the reservation core.

use nav_core::AreaId;

/// Physical movement capability of an agent that can currently move.
///
/// An agent without one (parked, despawned movable component) is represented
/// by `Option::<MovableState>::None` in the view.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovableState {
    /// Current ground speed, m/s.  Never negative.
    pub speed_mps: f32,
    /// Maximum braking deceleration, m/s².  Zero means "cannot brake".
    pub max_deceleration_mps2: f32,
}

impl MovableState {
    #[inline]
    pub fn new(speed_mps: f32, max_deceleration_mps2: f32) -> Self {
        Self { speed_mps, max_deceleration_mps2 }
    }

    /// Distance needed to stop from the current speed: `v² / (2a)`.
    ///
    /// Returns `None` for an agent that is moving but has no braking
    /// capability; callers substitute their own upper bound.
    pub fn braking_distance_m(&self) -> Option<f32> {
        let v = self.speed_mps.max(0.0);
        if v == 0.0 {
            return Some(0.0);
        }
        if self.max_deceleration_mps2 <= f32::EPSILON {
            return None;
        }
        Some(v * v / (2.0 * self.max_deceleration_mps2))
    }

    #[inline]
    pub fn is_moving(&self, threshold_mps: f32) -> bool {
        self.speed_mps > threshold_mps
    }
}

/// Where the agent currently is on the navigation graph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationState {
    /// The area the agent is physically inside, if any.
    pub current_area: Option<AreaId>,
    /// `true` while the navigation component has a target to move to.
    pub has_move_target: bool,
}

/// Coarse view of the agent's action queue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionState {
    /// Nothing queued.
    #[default]
    Idle,
    /// A move action is executing.
    MoveInProgress,
    /// Some other action is queued or executing.
    Busy,
}

impl ActionState {
    /// `true` unless the queue is empty.
    #[inline]
    pub fn has_pending_action(self) -> bool {
        !matches!(self, ActionState::Idle)
    }
}
