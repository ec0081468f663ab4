//! Criticality scoring: how costly would it be to make this agent yield?
//!
//! ```text
//! movable absent:  score = stationary_criticality
//! otherwise:       score = base_criticality * mover_weight
//!                        + elapsed_weight * min(now - begin [s], max_elapsed_secs)
//!                        + braking_weight * min(v² / 2a [m], max_braking_distance_m)
//!                        + current_area_bonus   (if already inside the area)
//! ```
//!
//! Every term is non-negative and the elapsed term only grows with `now`, so
//! the score is monotonically non-decreasing in `now` for a fixed agent state.
//! With the default weights a stationary agent always scores below a moving
//! one.

use nav_agent::MovableState;
use nav_core::{MoverType, Tick};

/// Weights and caps of the scoring function.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalityConfig {
    /// Simulated seconds per tick (copied from `SimClock`).
    pub seconds_per_tick: f32,
    /// Fixed score of an agent without movement capability.
    pub stationary_criticality: f32,
    /// Base score of a moving agent before its mover weight is applied.
    pub base_criticality: f32,
    pub car_weight: f32,
    pub pedestrian_weight: f32,
    pub civil_weight: f32,
    pub emergency_weight: f32,
    /// Score per second the reservation has been running.
    pub elapsed_weight: f32,
    pub max_elapsed_secs: f32,
    /// Score per metre of braking distance.
    pub braking_weight: f32,
    /// Cap on braking distance; also used for agents that cannot brake.
    pub max_braking_distance_m: f32,
    /// Added when the agent already stands in the area it claims.
    pub current_area_bonus: f32,
}

impl CriticalityConfig {
    pub fn mover_weight(&self, mover_type: MoverType) -> f32 {
        match mover_type {
            MoverType::Car        => self.car_weight,
            MoverType::Pedestrian => self.pedestrian_weight,
            MoverType::Civil      => self.civil_weight,
            MoverType::Emergency  => self.emergency_weight,
            MoverType::Unknown    => 1.0,
        }
    }
}

impl Default for CriticalityConfig {
    fn default() -> Self {
        Self {
            seconds_per_tick:       0.1,
            stationary_criticality: 0.5,
            base_criticality:       1.0,
            car_weight:             1.0,
            pedestrian_weight:      1.0,
            civil_weight:           1.0,
            emergency_weight:       4.0,
            elapsed_weight:         0.1,
            max_elapsed_secs:       60.0,
            braking_weight:         0.1,
            max_braking_distance_m: 100.0,
            current_area_bonus:     20.0,
        }
    }
}

/// Navigation facts about the reservation owner, resolved by the caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub mover_type:       MoverType,
    /// The owner is physically inside the area it claims.
    pub in_reserved_area: bool,
}

/// Score the owner of a reservation that began at `reservation_begin`.
///
/// Pure function of its inputs; never negative, never NaN.
///
/// Without `movable` the score is `stationary_criticality`; the current-area
/// bonus does not apply.
pub fn calculate_criticality(
    now:               Tick,
    reservation_begin: Tick,
    movable:           Option<&MovableState>,
    navigation:        &NavigationSnapshot,
    config:            &CriticalityConfig,
) -> f32 {
    let Some(movable) = movable else {
        return config.stationary_criticality.max(0.0);
    };

    let base = config.base_criticality * config.mover_weight(navigation.mover_type);

    let elapsed_secs = now.saturating_since(reservation_begin) as f32 * config.seconds_per_tick;
    let elapsed = config.elapsed_weight * elapsed_secs.min(config.max_elapsed_secs);

    let braking_m = movable
        .braking_distance_m()
        .filter(|d| d.is_finite())
        .unwrap_or(config.max_braking_distance_m)
        .min(config.max_braking_distance_m);
    let braking = config.braking_weight * braking_m;

    let area_bonus = if navigation.in_reserved_area { config.current_area_bonus } else { 0.0 };

    // `max` also maps a NaN sum (bad input) to zero.
    (base + elapsed + braking + area_bonus).max(0.0)
}
