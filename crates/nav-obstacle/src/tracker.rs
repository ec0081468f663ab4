//! `ObstacleTracker` — one classifier per registered agent, polled on a fixed
//! period.

use std::collections::BTreeMap;

use nav_core::{AgentId, Tick, Transform};
use tracing::trace;

use crate::{
    ClassifierConfig, ObstacleClassifier, ObstacleError, ObstacleResult, ObstacleRule,
    ObstacleState, ObstacleTransition, ObstacleView, PollQueue,
};

/// Output of [`ObstacleTracker::tick`] for the mesh update layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObstacleEvent {
    BecameStatic { agent: AgentId },
    /// The footprint must be un-baked.
    BecameDynamic { agent: AgentId },
    /// Bake (or re-bake) the footprint at `transform`.
    StaticTransformUpdated { agent: AgentId, transform: Transform },
}

impl ObstacleEvent {
    pub fn agent(&self) -> AgentId {
        match *self {
            ObstacleEvent::BecameStatic { agent }
            | ObstacleEvent::BecameDynamic { agent }
            | ObstacleEvent::StaticTransformUpdated { agent, .. } => agent,
        }
    }
}

pub struct ObstacleTracker {
    config:            ClassifierConfig,
    poll_period_ticks: u64,
    classifiers:       BTreeMap<AgentId, ObstacleClassifier>,
    queue:             PollQueue,
}

impl ObstacleTracker {
    /// `poll_period_ticks` is clamped to at least 1.
    pub fn new(config: ClassifierConfig, poll_period_ticks: u64) -> Self {
        Self {
            config,
            poll_period_ticks: poll_period_ticks.max(1),
            classifiers:       BTreeMap::new(),
            queue:             PollQueue::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn poll_period_ticks(&self) -> u64 {
        self.poll_period_ticks
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// Start classifying `agent`; its first poll is at `now`.
    ///
    /// Re-registering keeps the current state and only changes the rule.
    pub fn register(&mut self, agent: AgentId, rule: ObstacleRule, now: Tick) {
        if let Some(existing) = self.classifiers.get_mut(&agent) {
            existing.set_rule(rule);
            return;
        }
        self.classifiers.insert(agent, ObstacleClassifier::new(agent, rule));
        self.queue.push(now, agent);
    }

    /// Stop classifying `agent`.  Returns the final classifier, or `None` if
    /// it was not registered.  Pending polls for `agent` are dropped, so a
    /// later `register` starts a single fresh schedule.
    pub fn unregister(&mut self, agent: AgentId) -> Option<ObstacleClassifier> {
        self.queue.remove(agent);
        self.classifiers.remove(&agent)
    }

    /// Number of queued polls across all agents.
    pub fn pending_polls(&self) -> usize {
        self.queue.len()
    }

    pub fn classifier(&self, agent: AgentId) -> Option<&ObstacleClassifier> {
        self.classifiers.get(&agent)
    }

    /// Unregistered agents read as `Dynamic`.
    pub fn state_of(&self, agent: AgentId) -> ObstacleState {
        self.classifiers.get(&agent).map_or(ObstacleState::Dynamic, ObstacleClassifier::state)
    }

    pub fn is_static(&self, agent: AgentId) -> bool {
        self.state_of(agent).is_static()
    }

    pub fn set_rule(&mut self, agent: AgentId, rule: ObstacleRule) -> ObstacleResult<()> {
        self.classifiers
            .get_mut(&agent)
            .ok_or(ObstacleError::NotRegistered(agent))?
            .set_rule(rule);
        Ok(())
    }

    /// Bake `agent` at `transform` outside the polling schedule.
    pub fn transfer_static_transform(&mut self, agent: AgentId, transform: Transform) -> ObstacleResult<()> {
        self.classifiers
            .get_mut(&agent)
            .ok_or(ObstacleError::NotRegistered(agent))?
            .transfer_last_static_transform(transform)
    }

    /// Poll every agent due at or before `now` and reschedule it one period
    /// later.  Agents the view no longer knows are unregistered.
    ///
    /// Events come out in ascending agent order.
    pub fn tick<V: ObstacleView + ?Sized>(&mut self, now: Tick, view: &V) -> ObstacleResult<Vec<ObstacleEvent>> {
        let mut events = Vec::new();
        for agent in self.queue.drain_due(now) {
            if !self.classifiers.contains_key(&agent) {
                continue;
            }
            let Some(snapshot) = view.obstacle_snapshot(agent) else {
                trace!(agent = %agent, "obstacle agent gone, unregistering");
                self.classifiers.remove(&agent);
                continue;
            };
            self.queue.push(now + self.poll_period_ticks, agent);

            let Some(classifier) = self.classifiers.get_mut(&agent) else {
                continue;
            };
            classifier.refresh_collision(view.collision(agent));
            match classifier.poll(&snapshot, &self.config) {
                Some(ObstacleTransition::ToStatic)  => events.push(ObstacleEvent::BecameStatic { agent }),
                Some(ObstacleTransition::ToDynamic) => events.push(ObstacleEvent::BecameDynamic { agent }),
                None => {}
            }

            if let Some(current) = view.transform(agent) {
                if classifier.needs_transform_update(&current, &self.config.tolerance) {
                    classifier.transfer_last_static_transform(current)?;
                    events.push(ObstacleEvent::StaticTransformUpdated { agent, transform: current });
                }
            }
            trace!(agent = %agent, state = ?classifier.state(), "obstacle polled");
        }
        Ok(events)
    }
}
