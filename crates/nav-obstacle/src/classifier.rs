//! Per-agent static/dynamic state machine.

use nav_core::{AgentId, CollisionId, Transform, TransformTolerance};
use tracing::{debug, error};

use crate::{ClassifierConfig, ObstacleError, ObstacleResult, ObstacleRule, ObstacleSnapshot, ObstacleState};

/// A state change reported by [`ObstacleClassifier::poll`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleTransition {
    ToStatic,
    ToDynamic,
}

/// Classification state of one agent.
///
/// The collision handle is not owned: it is re-read from the agent store on
/// every poll, so a detached footprint shows up as `None` on the next poll.
#[derive(Clone, Debug)]
pub struct ObstacleClassifier {
    agent:                 AgentId,
    rule:                  ObstacleRule,
    state:                 ObstacleState,
    last_static_transform: Option<Transform>,
    collision:             Option<CollisionId>,
}

impl ObstacleClassifier {
    pub fn new(agent: AgentId, rule: ObstacleRule) -> Self {
        Self {
            agent,
            rule,
            state:                 ObstacleState::Dynamic,
            last_static_transform: None,
            collision:             None,
        }
    }

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn rule(&self) -> ObstacleRule {
        self.rule
    }

    pub fn set_rule(&mut self, rule: ObstacleRule) {
        self.rule = rule;
    }

    #[inline]
    pub fn state(&self) -> ObstacleState {
        self.state
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.state.is_static()
    }

    /// Transform recorded when the footprint was last baked as static.
    #[inline]
    pub fn last_static_transform(&self) -> Option<Transform> {
        self.last_static_transform
    }

    #[inline]
    pub fn collision(&self) -> Option<CollisionId> {
        self.collision
    }

    /// Re-resolve the collision handle.
    pub fn refresh_collision(&mut self, collision: Option<CollisionId>) {
        self.collision = collision;
    }

    pub fn should_be_treated_as_static(&self, snapshot: &ObstacleSnapshot, config: &ClassifierConfig) -> bool {
        self.rule.should_be_treated_as_static(snapshot, config)
    }

    /// Evaluate the rule and switch state if it disagrees with the current one.
    ///
    /// Leaving `Static` forgets the baked transform.
    pub fn poll(&mut self, snapshot: &ObstacleSnapshot, config: &ClassifierConfig) -> Option<ObstacleTransition> {
        let want_static = self.should_be_treated_as_static(snapshot, config);
        match (self.state, want_static) {
            (ObstacleState::Dynamic, true) => {
                self.state = ObstacleState::Static;
                debug!(agent = %self.agent, rule = ?self.rule, "obstacle became static");
                Some(ObstacleTransition::ToStatic)
            }
            (ObstacleState::Static, false) => {
                self.state = ObstacleState::Dynamic;
                self.last_static_transform = None;
                debug!(agent = %self.agent, rule = ?self.rule, "obstacle became dynamic");
                Some(ObstacleTransition::ToDynamic)
            }
            _ => None,
        }
    }

    /// Static, with a collision footprint, and the baked transform is missing
    /// or has drifted past `tolerance`.
    pub fn needs_transform_update(&self, current: &Transform, tolerance: &TransformTolerance) -> bool {
        if !self.is_static() || self.collision.is_none() {
            return false;
        }
        match self.last_static_transform {
            None        => true,
            Some(baked) => current.differs_from(baked, tolerance),
        }
    }

    /// Record `current` as the baked static transform.
    ///
    /// # Errors
    ///
    /// [`ObstacleError::MissingCollisionData`] if no collision footprint is
    /// attached.  The stored transform is left unchanged.
    pub fn transfer_last_static_transform(&mut self, current: Transform) -> ObstacleResult<()> {
        if self.collision.is_none() {
            error!(agent = %self.agent, "static transform transfer without collision data");
            return Err(ObstacleError::MissingCollisionData(self.agent));
        }
        self.last_static_transform = Some(current);
        Ok(())
    }
}
