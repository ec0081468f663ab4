//! crossing — a four-way junction with a crosswalk.
//!
//! Cars, a civil car, an emergency vehicle, and two pedestrians negotiate a
//! narrow junction cell and a shared crosswalk.  A parked car sits on the
//! west lane and is classified as a static obstacle.
//!
//! ```text
//! RUST_LOG=crossing=info,nav_reservation=debug cargo run -p crossing
//! ```

use std::io::Cursor;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use nav_agent::{AgentStore, AgentStoreBuilder, MovableState};
use nav_core::{AgentId, AreaId, MoverType, SimConfig, Tick};
use nav_obstacle::ObstacleEvent;
use nav_reservation::{AreaConfig, Reservation, load_exclusivity_reader};
use nav_sim::{NavObserver, NavWorldBuilder, SteeringContext, SteeringIntent, SteeringModel};

// ── Constants ─────────────────────────────────────────────────────────────────

const TICK_DURATION_MS: u32 = 100;
const TOTAL_TICKS:      u64 = 400;
/// Ticks an agent spends in an area before it may move on.
const DWELL_TICKS:      u64 = 15;

const WEST_LANE:  AreaId = AreaId(0);
const JUNCTION:   AreaId = AreaId(1);
const EAST_LANE:  AreaId = AreaId(2);
const NORTH_LANE: AreaId = AreaId(3);
const SOUTH_LANE: AreaId = AreaId(4);
const CROSSWALK:  AreaId = AreaId(5);

// Civil cars may roll through the crosswalk alongside pedestrians only at
// walking pace.
const EXCLUSIVITY_CSV: &str = "\
lhs,rhs,policy,slow_speed_mps\n\
pedestrian,pedestrian,shared,\n\
civil,pedestrian,shared_when_slow,1.5\n\
";

// ── Population ────────────────────────────────────────────────────────────────

struct Traveller {
    mover:  MoverType,
    cruise: MovableState,
    route:  &'static [AreaId],
}

const POPULATION: &[Traveller] = &[
    Traveller { mover: MoverType::Car,        cruise: MovableState { speed_mps: 12.0, max_deceleration_mps2: 6.0 }, route: &[WEST_LANE, JUNCTION, EAST_LANE] },
    Traveller { mover: MoverType::Civil,      cruise: MovableState { speed_mps: 9.0,  max_deceleration_mps2: 5.0 }, route: &[NORTH_LANE, JUNCTION, SOUTH_LANE] },
    Traveller { mover: MoverType::Emergency,  cruise: MovableState { speed_mps: 16.0, max_deceleration_mps2: 7.0 }, route: &[SOUTH_LANE, JUNCTION, NORTH_LANE] },
    Traveller { mover: MoverType::Pedestrian, cruise: MovableState { speed_mps: 1.3,  max_deceleration_mps2: 3.0 }, route: &[CROSSWALK] },
    Traveller { mover: MoverType::Pedestrian, cruise: MovableState { speed_mps: 1.1,  max_deceleration_mps2: 3.0 }, route: &[CROSSWALK] },
    Traveller { mover: MoverType::Car,        cruise: MovableState { speed_mps: 10.0, max_deceleration_mps2: 6.0 }, route: &[EAST_LANE, CROSSWALK, JUNCTION, WEST_LANE] },
    // Parked: no route, never moves.
    Traveller { mover: MoverType::Civil,      cruise: MovableState { speed_mps: 0.0,  max_deceleration_mps2: 5.0 }, route: &[] },
];

fn build_store() -> AgentStore {
    let mut store = AgentStoreBuilder::new(POPULATION.len()).build();
    for (i, t) in POPULATION.iter().enumerate() {
        store.mover_type[i] = t.mover;
        store.movable[i] = Some(MovableState { speed_mps: 0.0, ..t.cruise });
        store.navigation[i].has_move_target = !t.route.is_empty();
        store.collision[i] = Some(nav_core::CollisionId(i as u32));
    }
    store.navigation[6].current_area = Some(WEST_LANE);
    store
}

/// Next area on `agent`'s route after the one it stands in.
fn next_area(store: &AgentStore, agent: AgentId) -> Option<AreaId> {
    let route = POPULATION.get(agent.index())?.route;
    match store.navigation[agent.index()].current_area {
        None       => route.first().copied(),
        Some(here) => {
            let pos = route.iter().position(|&a| a == here)?;
            route.get(pos + 1).copied()
        }
    }
}

// ── Steering model ────────────────────────────────────────────────────────────

/// Hold the current area, claim the next one two seconds ahead.
struct RouteSteering;

impl SteeringModel for RouteSteering {
    fn plan(&self, agent: AgentId, ctx: &SteeringContext<'_>) -> Vec<SteeringIntent> {
        if !ctx.agents.navigation[agent.index()].has_move_target {
            return vec![];
        }
        let mut intents = Vec::with_capacity(2);
        if let Some(here) = ctx.agents.navigation[agent.index()].current_area {
            intents.push(SteeringIntent::claim(here, ctx.window_for_secs(1.0)));
        }
        if let Some(next) = next_area(ctx.agents, agent) {
            intents.push(SteeringIntent::claim(next, ctx.window_for_secs(2.0)));
        }
        intents
    }

    fn on_evicted(
        &self,
        agent:       AgentId,
        reservation: &Reservation,
        by:          AgentId,
        _ctx:        &SteeringContext<'_>,
    ) -> Vec<SteeringIntent> {
        debug!(agent = %agent, area = %reservation.area, by = %by, "yielding");
        vec![]
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    inserted:  u64,
    evicted:   u64,
    rejected:  u64,
    baked:     u64,
}

impl NavObserver for Tally {
    fn on_inserted(&mut self, _tick: Tick, _reservation: &Reservation) {
        self.inserted += 1;
    }

    fn on_evicted(&mut self, tick: Tick, evicted: &Reservation, by: AgentId) {
        self.evicted += 1;
        info!(%tick, loser = %evicted.owner, winner = %by, area = %evicted.area, "eviction");
    }

    fn on_rejected(&mut self, _tick: Tick, _candidate: &Reservation, _blockers: &[AgentId]) {
        self.rejected += 1;
    }

    fn on_obstacle_event(&mut self, tick: Tick, event: &ObstacleEvent) {
        if let ObstacleEvent::StaticTransformUpdated { agent, transform } = event {
            self.baked += 1;
            info!(%tick, agent = %agent, %transform, "baked static obstacle");
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crossing=info")),
        )
        .init();

    let config = SimConfig {
        tick_duration_ms:            TICK_DURATION_MS,
        total_ticks:                 TOTAL_TICKS,
        classification_period_ticks: 10,
        num_threads:                 None,
    };
    let table = load_exclusivity_reader(Cursor::new(EXCLUSIVITY_CSV))?;

    let mut world = NavWorldBuilder::new(config, build_store(), RouteSteering)
        .exclusivity(table)
        .area(AreaConfig::narrow(JUNCTION))
        .areas([WEST_LANE, EAST_LANE, NORTH_LANE, SOUTH_LANE].map(AreaConfig::narrow))
        .area(AreaConfig::wide(CROSSWALK))
        .build()?;

    let mut tally = Tally::default();
    let mut dwell = vec![0u64; world.agents.count];
    let start = Instant::now();

    // The emergency vehicle sets off a little later.
    world.agents.navigation[2].has_move_target = false;

    while world.clock.current_tick < world.config.end_tick() {
        if world.clock.current_tick == Tick(40) {
            world.agents.navigation[2].has_move_target = true;
            info!("emergency vehicle dispatched");
        }
        world.run_ticks(1, &mut tally)?;
        advance_agents(&mut world, &mut dwell);
    }

    let arrived = (0..world.agents.count)
        .filter(|&i| !POPULATION[i].route.is_empty() && !world.agents.navigation[i].has_move_target)
        .count();
    let stats = world.reservations.stats();
    info!(
        ticks = TOTAL_TICKS,
        arrived,
        inserted = tally.inserted,
        extended = stats.extended,
        evicted = tally.evicted,
        rejected = tally.rejected,
        baked = tally.baked,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "crossing finished"
    );
    Ok(())
}

/// Move each travelling agent one area forward once it has dwelt long enough
/// and holds the next area right now.
fn advance_agents<S: SteeringModel>(world: &mut nav_sim::NavWorld<S>, dwell: &mut [u64]) {
    let now = world.clock.current_tick;
    for i in 0..world.agents.count {
        let agent = AgentId(i as u32);
        if !world.agents.active[i] || !world.agents.navigation[i].has_move_target {
            continue;
        }
        dwell[i] += 1;

        let Some(next) = next_area(&world.agents, agent) else {
            // Route finished.
            world.agents.navigation[i].has_move_target = false;
            world.agents.set_speed(agent, 0.0);
            let released = world.reservations.remove_all_for_agent(agent);
            info!(%now, agent = %agent, released = released.len(), "arrived");
            continue;
        };

        let holds_next = world
            .reservations
            .reservation(agent, next)
            .is_some_and(|r| r.window.contains(now));
        let cruise = POPULATION[i].cruise.speed_mps;
        world.agents.set_speed(agent, if holds_next { cruise } else { cruise.min(0.5) });

        let entering = world.agents.navigation[i].current_area.is_none();
        if holds_next && (entering || dwell[i] >= DWELL_TICKS) {
            if let Some(here) = world.agents.navigation[i].current_area {
                world.reservations.remove(agent, here);
            }
            world.agents.set_current_area(agent, Some(next));
            dwell[i] = 0;
            debug!(%now, agent = %agent, area = %next, "entered area");
        }
    }
}
