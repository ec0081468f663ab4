//! Fluent builder for constructing a [`NavWorld`].

use std::collections::BTreeMap;

use nav_agent::{AgentStore, AgentView};
use nav_core::{SimConfig, Tick};
use nav_obstacle::{ClassifierConfig, ObstacleRule, ObstacleTracker};
use nav_reservation::{AreaConfig, ExclusivityTable, ReservationContainer, ReservationPolicy};
use tracing::debug;

use crate::{NavWorld, SimError, SimResult, SteeringModel};

/// Fluent builder for [`NavWorld<S>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — tick duration, total ticks, classification period, …
/// - [`AgentStore`] — from [`nav_agent::AgentStoreBuilder`]
/// - `S: SteeringModel` — the steering implementation
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                   |
/// |--------------------------|-------------------------------------------|
/// | `.policy(p)`             | `ReservationPolicy::default()`            |
/// | `.exclusivity(t)`        | `ExclusivityTable::default()`             |
/// | `.classifier(c)`         | `ClassifierConfig::default()`             |
/// | `.area(a)` / `.areas(v)` | every area `Wide`                         |
/// | `.obstacle_rules(v)`     | `ObstacleRule::for_mover` per agent       |
///
/// `policy.criticality.seconds_per_tick` is always overwritten from the
/// config's tick duration.
pub struct NavWorldBuilder<S: SteeringModel> {
    config:         SimConfig,
    agents:         AgentStore,
    steering:       S,
    policy:         ReservationPolicy,
    classifier:     ClassifierConfig,
    areas:          Vec<AreaConfig>,
    obstacle_rules: Option<Vec<ObstacleRule>>,
}

impl<S: SteeringModel> NavWorldBuilder<S> {
    pub fn new(config: SimConfig, agents: AgentStore, steering: S) -> Self {
        Self {
            config,
            agents,
            steering,
            policy:         ReservationPolicy::default(),
            classifier:     ClassifierConfig::default(),
            areas:          Vec::new(),
            obstacle_rules: None,
        }
    }

    pub fn policy(mut self, policy: ReservationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace only the exclusivity table of the policy.
    pub fn exclusivity(mut self, table: ExclusivityTable) -> Self {
        self.policy.exclusivity = table;
        self
    }

    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn area(mut self, area: AreaConfig) -> Self {
        self.areas.push(area);
        self
    }

    pub fn areas(mut self, areas: impl IntoIterator<Item = AreaConfig>) -> Self {
        self.areas.extend(areas);
        self
    }

    /// Per-agent obstacle rules (must be length `agent_count`).
    pub fn obstacle_rules(mut self, rules: Vec<ObstacleRule>) -> Self {
        self.obstacle_rules = Some(rules);
        self
    }

    /// Validate inputs, register areas and agents, and return a ready-to-run
    /// [`NavWorld`].
    pub fn build(self) -> SimResult<NavWorld<S>> {
        self.config.validate()?;
        let agent_count = self.agents.count;

        let rules = match self.obstacle_rules {
            Some(r) => {
                if r.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      r.len(),
                        what:     "obstacle rules",
                    });
                }
                r
            }
            None => self
                .agents
                .agent_ids()
                .map(|a| ObstacleRule::for_mover(self.agents.mover_type(a)))
                .collect(),
        };

        let clock = self.config.make_clock();

        let mut policy = self.policy;
        policy.criticality.seconds_per_tick = clock.seconds_per_tick();
        let mut reservations = ReservationContainer::new(policy);
        let area_count = self.areas.len();
        for area in self.areas {
            reservations.register_area(area);
        }

        let mut obstacles = ObstacleTracker::new(self.classifier, self.config.classification_period_ticks);
        for (agent, rule) in self.agents.agent_ids().zip(rules.iter().copied()) {
            if self.agents.is_active(agent) {
                obstacles.register(agent, rule, Tick::ZERO);
            }
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        debug!(agents = agent_count, areas = area_count, "navigation world built");

        Ok(NavWorld {
            clock,
            config: self.config,
            agents: self.agents,
            reservations,
            obstacles,
            steering: self.steering,
            feedback: BTreeMap::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
