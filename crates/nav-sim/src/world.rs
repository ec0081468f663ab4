//! The `NavWorld` struct and its tick loop.

use std::collections::BTreeMap;

use nav_agent::{AgentStore, AgentView, MovableState};
use nav_core::{AgentId, MoverType, NavError, SimClock, SimConfig, Tick};
use nav_obstacle::{ObstacleRule, ObstacleTracker};
use nav_reservation::{ExclusivityFlags, InsertResult, Reservation, ReservationContainer};
use tracing::{debug, info};

use crate::{NavObserver, SimResult, SteeringContext, SteeringFeedback, SteeringIntent, SteeringModel};

/// One map's navigation state plus the loop that advances it.
///
/// Create via [`NavWorldBuilder`][crate::NavWorldBuilder].
pub struct NavWorld<S: SteeringModel> {
    pub config: SimConfig,

    /// Tracks the current tick and maps ticks to simulated seconds.
    pub clock: SimClock,

    /// Agent state (SoA arrays).  Written by the application between ticks;
    /// read-only during a tick.
    pub agents: AgentStore,

    /// Every live reservation of the map.
    pub reservations: ReservationContainer,

    /// Static/dynamic classification of every registered agent.
    pub obstacles: ObstacleTracker,

    pub steering: S,

    /// Rejections and evictions waiting for the owner's next steering pass.
    pub(crate) feedback: BTreeMap<AgentId, Vec<SteeringFeedback>>,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<S: SteeringModel> NavWorld<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: NavObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            agents = self.agents.count,
            end = %self.config.end_tick(),
            tick_ms = self.config.tick_duration_ms,
            "navigation run started"
        );
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step(now, observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        let stats = self.reservations.stats();
        info!(
            at = %self.clock,
            inserted = stats.inserted,
            evicted = stats.evicted,
            rejected = stats.rejected,
            "navigation run finished"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: NavObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step(now, observer)?;
        }
        Ok(())
    }

    /// Add an agent mid-run.  Its first classification poll is this tick.
    pub fn spawn(&mut self, mover_type: MoverType, movable: Option<MovableState>) -> AgentId {
        let agent = self.agents.push_agent(mover_type);
        self.agents.movable[agent.index()] = movable;
        self.obstacles
            .register(agent, ObstacleRule::for_mover(mover_type), self.clock.current_tick);
        debug!(agent = %agent, mover = %mover_type, "agent spawned");
        agent
    }

    /// Remove `agent` from the map: release its reservations, stop
    /// classifying it, drop buffered feedback, and mark it inactive.
    ///
    /// Despawning an already inactive agent returns an empty list.
    ///
    /// # Errors
    ///
    /// [`NavError::AgentNotFound`] if `agent` never existed.
    pub fn despawn(&mut self, agent: AgentId) -> SimResult<Vec<Reservation>> {
        if !self.agents.contains(agent) {
            return Err(NavError::AgentNotFound(agent).into());
        }
        let released = self.reservations.remove_all_for_agent(agent);
        self.obstacles.unregister(agent);
        self.feedback.remove(&agent);
        if self.agents.despawn(agent) {
            debug!(agent = %agent, released = released.len(), "agent despawned");
        }
        Ok(released)
    }

    /// Feedback buffered for `agent`'s next steering pass.
    pub fn pending_feedback(&self, agent: AgentId) -> &[SteeringFeedback] {
        self.feedback.get(&agent).map(Vec::as_slice).unwrap_or(&[])
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: NavObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(now);
        let planned = self.process_tick(now, observer)?;
        observer.on_tick_end(now, planned);
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: NavObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        // ── Phase 1: expiry ───────────────────────────────────────────────
        for expired in self.reservations.purge_expired(now) {
            observer.on_expired(now, &expired);
        }

        // ── Phase 2: obstacle classification ──────────────────────────────
        for event in self.obstacles.tick(now, &self.agents)? {
            observer.on_obstacle_event(now, &event);
        }

        // ── Phase 3: steering (produce) ───────────────────────────────────
        //
        // Static obstacles are baked into the mesh and do not negotiate.
        // Their buffered feedback waits until they become dynamic again.
        let planners: Vec<AgentId> = self
            .agents
            .active_ids()
            .filter(|&a| !self.obstacles.is_static(a))
            .collect();
        let inputs: Vec<Vec<SteeringFeedback>> = planners
            .iter()
            .map(|a| self.feedback.remove(a).unwrap_or_default())
            .collect();
        let intents = self.compute_intents(now, &planners, inputs);

        // ── Phase 4: apply (consume) ──────────────────────────────────────
        self.apply_intents(now, intents, observer);

        Ok(planners.len())
    }

    /// Run the steering model for every planner.  With the `parallel`
    /// feature this runs on Rayon's pool; output order is `planners` order
    /// either way.
    fn compute_intents(
        &self,
        now:      Tick,
        planners: &[AgentId],
        inputs:   Vec<Vec<SteeringFeedback>>,
    ) -> Vec<(AgentId, Vec<SteeringIntent>)> {
        let ctx = SteeringContext::new(now, &self.clock, &self.agents, &self.reservations);
        let steering = &self.steering;

        let plan_one = |(&agent, feedback): (&AgentId, Vec<SteeringFeedback>)| {
            let mut intents = Vec::new();
            for item in feedback {
                match item {
                    SteeringFeedback::Rejected { reservation, blockers } => {
                        intents.extend(steering.on_rejected(agent, &reservation, &blockers, &ctx));
                    }
                    SteeringFeedback::Evicted { reservation, by } => {
                        intents.extend(steering.on_evicted(agent, &reservation, by, &ctx));
                    }
                }
            }
            intents.extend(steering.plan(agent, &ctx));
            (agent, intents)
        };

        #[cfg(not(feature = "parallel"))]
        {
            planners.iter().zip(inputs).map(plan_one).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || -> Vec<(AgentId, Vec<SteeringIntent>)> {
                planners.par_iter().zip(inputs.into_par_iter()).map(plan_one).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None       => run(),
            }
        }
    }

    /// Apply all releases, then resolve all claims.
    ///
    /// Claims are grouped by exclusivity flags and each group goes through
    /// one `insert_batch`, so results do not depend on which agent planned
    /// first.
    fn apply_intents<O: NavObserver>(
        &mut self,
        now:      Tick,
        intents:  Vec<(AgentId, Vec<SteeringIntent>)>,
        observer: &mut O,
    ) {
        let mut claims: BTreeMap<u32, Vec<Reservation>> = BTreeMap::new();
        for (agent, agent_intents) in intents {
            for intent in agent_intents {
                match intent {
                    SteeringIntent::Release(area) => {
                        self.reservations.remove(agent, area);
                    }
                    SteeringIntent::ReleaseAll => {
                        self.reservations.remove_all_for_agent(agent);
                    }
                    SteeringIntent::Claim { area, window, flags } => {
                        let mover = self.agents.mover_type(agent);
                        claims
                            .entry(flags.bits())
                            .or_default()
                            .push(Reservation::with_window(agent, area, window, mover));
                    }
                }
            }
        }

        for (bits, batch) in claims {
            let flags = ExclusivityFlags::from_bits_retain(bits);
            let results = self.reservations.insert_batch(batch, now, &self.agents, flags);
            for result in results {
                self.dispatch(now, result, observer);
            }
        }
    }

    fn dispatch<O: NavObserver>(&mut self, now: Tick, result: InsertResult, observer: &mut O) {
        match result {
            InsertResult::Inserted { reservation, evicted, .. } => {
                observer.on_inserted(now, &reservation);
                for victim in evicted {
                    observer.on_evicted(now, &victim, reservation.owner);
                    self.feedback
                        .entry(victim.owner)
                        .or_default()
                        .push(SteeringFeedback::Evicted { reservation: victim, by: reservation.owner });
                }
            }
            InsertResult::Rejected { candidate, blockers } => {
                observer.on_rejected(now, &candidate, &blockers);
                self.feedback
                    .entry(candidate.owner)
                    .or_default()
                    .push(SteeringFeedback::Rejected { reservation: candidate, blockers });
            }
        }
    }
}
