//! Read-only seam between the classifier and agent storage.

use nav_agent::{AgentStore, AgentView};
use nav_core::{AgentId, CollisionId, Transform};

use crate::ObstacleSnapshot;

/// What the obstacle tracker reads about an agent on each poll.
pub trait ObstacleView {
    /// `None` for despawned or unknown agents.
    fn obstacle_snapshot(&self, agent: AgentId) -> Option<ObstacleSnapshot>;

    /// Current transform of the collision footprint.
    fn transform(&self, agent: AgentId) -> Option<Transform>;

    /// Handle of the attached collision footprint, if any.
    fn collision(&self, agent: AgentId) -> Option<CollisionId>;
}

impl ObstacleView for AgentStore {
    fn obstacle_snapshot(&self, agent: AgentId) -> Option<ObstacleSnapshot> {
        if !self.is_active(agent) {
            return None;
        }
        let i = agent.index();
        Some(ObstacleSnapshot {
            speed_mps:          self.movable[i].map_or(0.0, |m| m.speed_mps),
            has_move_target:    self.navigation[i].has_move_target,
            has_pending_action: self.action[i].has_pending_action(),
            about_to_evade:     self.about_to_evade[i],
            in_traffic:         self.in_traffic[i],
        })
    }

    fn transform(&self, agent: AgentId) -> Option<Transform> {
        if !self.is_active(agent) {
            return None;
        }
        Some(self.transform[agent.index()])
    }

    fn collision(&self, agent: AgentId) -> Option<CollisionId> {
        if !self.is_active(agent) {
            return None;
        }
        self.collision[agent.index()]
    }
}
