//! Integration tests for nav-sim.

use nav_agent::{AgentStore, AgentStoreBuilder, MovableState};
use nav_core::{AgentId, AreaId, MoverType, SimConfig, Tick};
use nav_obstacle::ObstacleEvent;
use nav_reservation::Reservation;

use crate::{NavObserver, SteeringContext, SteeringIntent, SteeringModel};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_duration_ms:            100,
        total_ticks,
        classification_period_ticks: 1,
        num_threads:                 Some(1),
    }
}

/// Two cars heading for area 1.  Agent 0 is fast (score 6.0), agent 1 slow
/// (score ≈1.21).
fn crossing_store() -> AgentStore {
    let mut store = AgentStoreBuilder::new(2)
        .mover_type(MoverType::Car)
        .movable(MovableState::new(0.0, 6.0))
        .build();
    store.movable[0] = Some(MovableState::new(20.0, 4.0));
    store.movable[1] = Some(MovableState::new(5.0, 6.0));
    store.navigation[0].has_move_target = true;
    store.navigation[1].has_move_target = true;
    store
}

/// Every agent with a move target claims area 1 for the next 5 ticks; a
/// rejected agent falls back to area 2.
struct ClaimOrDetour;

impl SteeringModel for ClaimOrDetour {
    fn plan(&self, agent: AgentId, ctx: &SteeringContext<'_>) -> Vec<SteeringIntent> {
        if !ctx.agents.navigation[agent.index()].has_move_target {
            return vec![];
        }
        vec![SteeringIntent::claim(AreaId(1), ctx.window_for_secs(0.5))]
    }

    fn on_rejected(
        &self,
        _agent:       AgentId,
        _reservation: &Reservation,
        _blockers:    &[AgentId],
        ctx:          &SteeringContext<'_>,
    ) -> Vec<SteeringIntent> {
        vec![SteeringIntent::claim(AreaId(2), ctx.window_for_secs(0.5))]
    }
}

/// Claims area 1 on every tick for every planned agent.
struct AlwaysClaim;

impl SteeringModel for AlwaysClaim {
    fn plan(&self, _agent: AgentId, ctx: &SteeringContext<'_>) -> Vec<SteeringIntent> {
        vec![SteeringIntent::claim(AreaId(1), ctx.window_for_secs(0.3))]
    }
}

#[derive(Default)]
struct Recorder {
    inserted:  Vec<(Tick, AgentId, AreaId)>,
    rejected:  Vec<(Tick, AgentId)>,
    evicted:   Vec<(Tick, AgentId, AgentId)>,
    expired:   usize,
    obstacles: Vec<ObstacleEvent>,
    planned:   Vec<usize>,
    ended:     Option<Tick>,
}

impl NavObserver for Recorder {
    fn on_tick_end(&mut self, _tick: Tick, planned: usize) {
        self.planned.push(planned);
    }

    fn on_inserted(&mut self, tick: Tick, r: &Reservation) {
        self.inserted.push((tick, r.owner, r.area));
    }

    fn on_evicted(&mut self, tick: Tick, r: &Reservation, by: AgentId) {
        self.evicted.push((tick, r.owner, by));
    }

    fn on_rejected(&mut self, tick: Tick, r: &Reservation, _blockers: &[AgentId]) {
        self.rejected.push((tick, r.owner));
    }

    fn on_expired(&mut self, _tick: Tick, _r: &Reservation) {
        self.expired += 1;
    }

    fn on_obstacle_event(&mut self, _tick: Tick, event: &ObstacleEvent) {
        self.obstacles.push(*event);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── NavWorldBuilder ───────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use nav_core::NavError;
    use nav_obstacle::ObstacleRule;
    use nav_reservation::AreaConfig;

    use super::*;
    use crate::{NavWorldBuilder, NoopSteering, SimError};

    #[test]
    fn builds_with_defaults() {
        let world = NavWorldBuilder::new(test_config(10), crossing_store(), NoopSteering)
            .area(AreaConfig::narrow(AreaId(1)))
            .build()
            .unwrap();
        assert_eq!(world.agents.count, 2);
        assert_eq!(world.obstacles.len(), 2);
        assert_eq!(world.reservations.area_config(AreaId(1)), AreaConfig::narrow(AreaId(1)));
        assert!((world.reservations.policy().criticality.seconds_per_tick - 0.1).abs() < 1e-6);
    }

    #[test]
    fn rule_count_mismatch_errors() {
        let result = NavWorldBuilder::new(test_config(10), crossing_store(), NoopSteering)
            .obstacle_rules(vec![ObstacleRule::Default])
            .build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { expected: 2, got: 1, .. })));
    }

    #[test]
    fn invalid_config_errors() {
        let config = SimConfig { tick_duration_ms: 0, ..test_config(10) };
        let result = NavWorldBuilder::new(config, crossing_store(), NoopSteering).build();
        assert!(matches!(result, Err(SimError::Nav(NavError::Config(_)))));
    }
}

// ── SteeringContext ───────────────────────────────────────────────────────────

#[cfg(test)]
mod steering_tests {
    use nav_reservation::ReservationContainer;

    use super::*;

    #[test]
    fn window_for_secs_is_clamped() {
        let clock = test_config(10).make_clock();
        let agents = crossing_store();
        let reservations = ReservationContainer::default();
        let ctx = SteeringContext::new(Tick(5), &clock, &agents, &reservations);

        let w = ctx.window_for_secs(f32::INFINITY);
        assert_eq!((w.begin(), w.end()), (Tick(5), Tick::MAX));
        let w = ctx.window_for_secs(0.0);
        assert_eq!((w.begin(), w.end()), (Tick(5), Tick(6)));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world_tests {
    use nav_agent::ActionState;
    use nav_core::NavError;

    use super::*;
    use crate::{NavWorldBuilder, NoopObserver, SimError, SteeringFeedback};

    #[test]
    fn more_critical_agent_wins_and_loser_detours() {
        let mut world = NavWorldBuilder::new(test_config(10), crossing_store(), ClaimOrDetour)
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        world.run_ticks(1, &mut rec).unwrap();
        assert_eq!(rec.inserted, vec![(Tick(0), AgentId(0), AreaId(1))]);
        assert_eq!(rec.rejected, vec![(Tick(0), AgentId(1))]);
        assert!(matches!(
            world.pending_feedback(AgentId(1)),
            [SteeringFeedback::Rejected { .. }]
        ));

        world.run_ticks(1, &mut rec).unwrap();
        assert!(world.reservations.reservation(AgentId(1), AreaId(2)).is_some());
        assert!(world.pending_feedback(AgentId(1)).iter().all(|f| matches!(f, SteeringFeedback::Rejected { .. })));
        // Agent 0 kept extending its claim.
        let held = world.reservations.reservation(AgentId(0), AreaId(1)).unwrap();
        assert_eq!((held.begin(), held.end()), (Tick(0), Tick(6)));
        assert_eq!(world.clock.current_tick, Tick(2));
    }

    #[test]
    fn stronger_newcomer_evicts_and_victim_is_told() {
        let mut store = crossing_store();
        // Agent 0 starts idle so agent 1 claims alone.
        store.navigation[0].has_move_target = false;
        let mut world = NavWorldBuilder::new(test_config(10), store, ClaimOrDetour).build().unwrap();
        let mut rec = Recorder::default();
        world.run_ticks(1, &mut rec).unwrap();
        assert_eq!(rec.inserted, vec![(Tick(0), AgentId(1), AreaId(1))]);

        world.agents.navigation[0].has_move_target = true;
        world.run_ticks(1, &mut rec).unwrap();
        assert_eq!(rec.evicted, vec![(Tick(1), AgentId(1), AgentId(0))]);
        // Evicted by agent 0, then its own re-claim lost to the new holder.
        assert!(matches!(
            world.pending_feedback(AgentId(1)),
            [SteeringFeedback::Evicted { by: AgentId(0), .. }, SteeringFeedback::Rejected { .. }]
        ));
    }

    #[test]
    fn static_agents_do_not_plan() {
        let mut store = crossing_store();
        store.movable[1] = Some(MovableState::new(0.0, 6.0));
        store.navigation[1].has_move_target = false;
        let mut world = NavWorldBuilder::new(test_config(10), store, AlwaysClaim).build().unwrap();
        let mut rec = Recorder::default();

        world.run_ticks(1, &mut rec).unwrap();
        assert!(world.obstacles.is_static(AgentId(1)));
        assert_eq!(rec.planned, vec![1]);
        assert!(world.reservations.areas_of(AgentId(1)).is_empty());
        assert!(rec.obstacles.contains(&ObstacleEvent::BecameStatic { agent: AgentId(1) }));

        // A queued move makes it dynamic again on the next poll.
        world.agents.action[1] = ActionState::MoveInProgress;
        world.run_ticks(1, &mut rec).unwrap();
        assert!(!world.obstacles.is_static(AgentId(1)));
        assert_eq!(rec.planned, vec![1, 2]);
        assert!(rec.obstacles.contains(&ObstacleEvent::BecameDynamic { agent: AgentId(1) }));
    }

    #[test]
    fn releases_apply_before_claims() {
        struct ReleaseThenClaim;
        impl SteeringModel for ReleaseThenClaim {
            fn plan(&self, agent: AgentId, ctx: &SteeringContext<'_>) -> Vec<SteeringIntent> {
                // Claim first, release afterwards: the release still runs first.
                let mut intents = vec![SteeringIntent::claim(AreaId(agent.0 + 10), ctx.window_for_secs(0.2))];
                intents.push(SteeringIntent::ReleaseAll);
                intents
            }
        }
        let mut world = NavWorldBuilder::new(test_config(10), crossing_store(), ReleaseThenClaim)
            .build()
            .unwrap();
        world.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(world.reservations.areas_of(AgentId(0)), vec![AreaId(10)]);
        assert_eq!(world.reservations.areas_of(AgentId(1)), vec![AreaId(11)]);
    }

    #[test]
    fn expired_claims_are_purged() {
        let mut store = crossing_store();
        store.navigation[1].has_move_target = false;
        store.movable[1] = None;
        let mut world = NavWorldBuilder::new(test_config(10), store, ClaimOrDetour).build().unwrap();
        let mut rec = Recorder::default();
        world.run_ticks(1, &mut rec).unwrap();

        // Stop claiming; the [0,5) window expires at tick 5.
        world.agents.navigation[0].has_move_target = false;
        world.run_ticks(5, &mut rec).unwrap();
        assert_eq!(rec.expired, 1);
        assert!(world.reservations.is_empty());
    }

    #[test]
    fn despawn_releases_everything() {
        let mut world = NavWorldBuilder::new(test_config(10), crossing_store(), ClaimOrDetour)
            .build()
            .unwrap();
        world.run_ticks(2, &mut NoopObserver).unwrap();
        let released = world.despawn(AgentId(0)).unwrap();
        assert_eq!(released.len(), 1);
        assert!(world.reservations.areas_of(AgentId(0)).is_empty());
        assert!(world.obstacles.classifier(AgentId(0)).is_none());

        assert!(world.despawn(AgentId(0)).unwrap().is_empty());
        assert!(matches!(
            world.despawn(AgentId(7)),
            Err(SimError::Nav(NavError::AgentNotFound(AgentId(7))))
        ));

        // The survivor now gets the area.
        world.run_ticks(1, &mut NoopObserver).unwrap();
        assert!(world.reservations.reservation(AgentId(1), AreaId(1)).is_some());
    }

    #[test]
    fn spawned_agent_joins_the_loop() {
        let mut world = NavWorldBuilder::new(test_config(10), AgentStoreBuilder::new(0).build(), AlwaysClaim)
            .build()
            .unwrap();
        let agent = world.spawn(MoverType::Pedestrian, Some(MovableState::new(1.2, 3.0)));
        world.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(world.reservations.areas_of(agent), vec![AreaId(1)]);
        assert!(!world.obstacles.is_static(agent));
    }

    #[test]
    fn run_stops_at_end_tick() {
        let mut world = NavWorldBuilder::new(test_config(4), crossing_store(), ClaimOrDetour)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();
        assert_eq!(rec.ended, Some(Tick(4)));
        assert_eq!(rec.planned.len(), 4);
    }

    #[test]
    fn identical_worlds_identical_histories() {
        let run = || {
            let mut world = NavWorldBuilder::new(test_config(20), crossing_store(), ClaimOrDetour)
                .build()
                .unwrap();
            let mut rec = Recorder::default();
            world.run(&mut rec).unwrap();
            (rec.inserted, rec.rejected, rec.evicted, world.reservations.stats())
        };
        assert_eq!(run(), run());
    }
}
