//! The `SteeringModel` trait — where agents decide which areas to claim.

use nav_agent::AgentStore;
use nav_core::{AgentId, AreaId, SimClock, Tick};
use nav_reservation::{ExclusivityFlags, Reservation, ReservationContainer, TimeWindow};

/// What an agent wants done with its reservations this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SteeringIntent {
    /// Claim `area` for `window`.  A claim touching the agent's existing
    /// window on that area extends it.
    Claim {
        area:   AreaId,
        window: TimeWindow,
        flags:  ExclusivityFlags,
    },
    /// Give up the claim on one area.  No-op if none is held.
    Release(AreaId),
    /// Give up every claim (re-plan from scratch, leaving the map).
    ReleaseAll,
}

impl SteeringIntent {
    /// Claim with no exclusivity overrides.
    pub fn claim(area: AreaId, window: TimeWindow) -> Self {
        SteeringIntent::Claim { area, window, flags: ExclusivityFlags::empty() }
    }
}

/// Outcome of an earlier claim, delivered on the agent's next steering pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SteeringFeedback {
    Rejected {
        reservation: Reservation,
        blockers:    Vec<AgentId>,
    },
    Evicted {
        reservation: Reservation,
        by:          AgentId,
    },
}

/// Read-only world state passed to every steering callback.
///
/// Built once per tick and shared across all agents of the steering phase.
pub struct SteeringContext<'a> {
    pub now:          Tick,
    pub clock:        &'a SimClock,
    pub agents:       &'a AgentStore,
    pub reservations: &'a ReservationContainer,
}

impl<'a> SteeringContext<'a> {
    #[inline]
    pub fn new(
        now:          Tick,
        clock:        &'a SimClock,
        agents:       &'a AgentStore,
        reservations: &'a ReservationContainer,
    ) -> Self {
        Self { now, clock, agents, reservations }
    }

    /// Window of `secs` seconds starting now (at least one tick).
    pub fn window_for_secs(&self, secs: f32) -> TimeWindow {
        TimeWindow::at_least_one_tick(self.now, self.clock.ticks_for_secs(secs))
    }
}

/// Pluggable steering.
///
/// The world may call these methods for many agents in parallel, so
/// implementations must be `Send + Sync` and keep per-agent state in the
/// `AgentStore`, not in the model.
///
/// Only [`plan`](Self::plan) is required.
pub trait SteeringModel: Send + Sync + 'static {
    /// Called once per tick for every active agent that is not a static
    /// obstacle.
    fn plan(&self, agent: AgentId, ctx: &SteeringContext<'_>) -> Vec<SteeringIntent>;

    /// A claim of `agent` lost to more critical `blockers`.
    ///
    /// Default: no reaction (the agent simply tries again in `plan`).
    fn on_rejected(
        &self,
        _agent:       AgentId,
        _reservation: &Reservation,
        _blockers:    &[AgentId],
        _ctx:         &SteeringContext<'_>,
    ) -> Vec<SteeringIntent> {
        vec![]
    }

    /// A reservation of `agent` was evicted by a claim of `by`.
    fn on_evicted(
        &self,
        _agent:       AgentId,
        _reservation: &Reservation,
        _by:          AgentId,
        _ctx:         &SteeringContext<'_>,
    ) -> Vec<SteeringIntent> {
        vec![]
    }
}

/// A [`SteeringModel`] that never claims anything.
pub struct NoopSteering;

impl SteeringModel for NoopSteering {
    fn plan(&self, _agent: AgentId, _ctx: &SteeringContext<'_>) -> Vec<SteeringIntent> {
        vec![]
    }
}
