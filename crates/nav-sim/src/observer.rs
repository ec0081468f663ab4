//! World observer trait for progress reporting and data collection.

use nav_core::{AgentId, Tick};
use nav_obstacle::ObstacleEvent;
use nav_reservation::Reservation;

/// Callbacks invoked by [`NavWorld`][crate::NavWorld] during the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — eviction counter
///
/// ```rust,ignore
/// struct Evictions(usize);
///
/// impl NavObserver for Evictions {
///     fn on_evicted(&mut self, _tick: Tick, _evicted: &Reservation, _by: AgentId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait NavObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// `planned` is the number of agents whose steering model ran this tick.
    fn on_tick_end(&mut self, _tick: Tick, _planned: usize) {}

    /// A claim was stored (possibly extending the owner's previous window).
    fn on_inserted(&mut self, _tick: Tick, _reservation: &Reservation) {}

    /// `evicted` lost its area to a claim of `by`.
    fn on_evicted(&mut self, _tick: Tick, _evicted: &Reservation, _by: AgentId) {}

    fn on_rejected(&mut self, _tick: Tick, _candidate: &Reservation, _blockers: &[AgentId]) {}

    fn on_expired(&mut self, _tick: Tick, _reservation: &Reservation) {}

    /// Static/dynamic transitions and re-bakes for the mesh update layer.
    fn on_obstacle_event(&mut self, _tick: Tick, _event: &ObstacleEvent) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`NavObserver`] that does nothing.
pub struct NoopObserver;

impl NavObserver for NoopObserver {}
