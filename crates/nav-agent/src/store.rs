//! `AgentStore` — Structure-of-Arrays snapshot of every agent's state.
//!
//! Every `Vec` field has exactly `count` elements and the `AgentId` value is
//! the index into all of them:
//!
//! ```ignore
//! let speed = store.movable[agent.index()].map(|m| m.speed_mps);
//! ```
//!
//! The steering layer writes these arrays between ticks.  During a tick the
//! reservation and obstacle crates only see `&AgentStore` through the
//! [`AgentView`] trait (and `nav-obstacle`'s `ObstacleView`).

use nav_core::{AgentId, AreaId, CollisionId, MoverType, Transform};

use crate::{ActionState, AgentView, MovableState, NavigationState};

pub struct AgentStore {
    /// Number of agent slots.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// `false` once the agent has been despawned.  Slots are never reused.
    pub active: Vec<bool>,

    /// Decoded mover type tag.
    pub mover_type: Vec<MoverType>,

    // ── Movement ──────────────────────────────────────────────────────────
    /// `None` while the agent has no movement capability (parked, disabled).
    pub movable: Vec<Option<MovableState>>,

    pub navigation: Vec<NavigationState>,

    pub action: Vec<ActionState>,

    // ── Obstacle inputs ───────────────────────────────────────────────────
    /// Set by the evasion logic when a stationary agent is about to step or
    /// pull aside.
    pub about_to_evade: Vec<bool>,

    /// `true` while a civil car is part of ambient traffic (even when halted
    /// at a signal).
    pub in_traffic: Vec<bool>,

    /// Last known transform of the collision footprint.
    pub transform: Vec<Transform>,

    /// Optional handle to the collision footprint.  Re-read on every
    /// classification poll, so a detached component shows up as `None`.
    pub collision: Vec<Option<CollisionId>>,
}

impl AgentStore {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Iterator over the ids of agents that are still active.
    pub fn active_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids().filter(|a| self.active[a.index()])
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Append a fresh agent slot and return its id.
    pub fn push_agent(&mut self, mover_type: MoverType) -> AgentId {
        let id = AgentId(self.count as u32);
        self.count += 1;
        self.active.push(true);
        self.mover_type.push(mover_type);
        self.movable.push(None);
        self.navigation.push(NavigationState::default());
        self.action.push(ActionState::Idle);
        self.about_to_evade.push(false);
        self.in_traffic.push(false);
        self.transform.push(Transform::default());
        self.collision.push(None);
        id
    }

    /// Mark `agent` inactive and drop its movement and collision handles.
    ///
    /// Returns `false` if the agent was unknown or already despawned.
    pub fn despawn(&mut self, agent: AgentId) -> bool {
        let i = agent.index();
        if i >= self.count || !self.active[i] {
            return false;
        }
        self.active[i] = false;
        self.movable[i] = None;
        self.navigation[i] = NavigationState::default();
        self.action[i] = ActionState::Idle;
        self.collision[i] = None;
        true
    }

    /// Put `agent` into motion (or stop it) at `speed_mps`, keeping its
    /// braking capability.  Adds a default movable if none is attached.
    pub fn set_speed(&mut self, agent: AgentId, speed_mps: f32) {
        if let Some(slot) = self.movable.get_mut(agent.index()) {
            let movable = slot.get_or_insert_with(MovableState::default);
            movable.speed_mps = speed_mps.max(0.0);
        }
    }

    pub fn set_current_area(&mut self, agent: AgentId, area: Option<AreaId>) {
        if let Some(nav) = self.navigation.get_mut(agent.index()) {
            nav.current_area = area;
        }
    }

    pub(crate) fn with_capacity(count: usize) -> Self {
        Self {
            count,
            active:         vec![true; count],
            mover_type:     vec![MoverType::Unknown; count],
            movable:        vec![None; count],
            navigation:     vec![NavigationState::default(); count],
            action:         vec![ActionState::Idle; count],
            about_to_evade: vec![false; count],
            in_traffic:     vec![false; count],
            transform:      vec![Transform::default(); count],
            collision:      vec![None; count],
        }
    }
}

impl AgentView for AgentStore {
    #[inline]
    fn is_active(&self, agent: AgentId) -> bool {
        self.active.get(agent.index()).copied().unwrap_or(false)
    }

    fn mover_type(&self, agent: AgentId) -> MoverType {
        if !self.is_active(agent) {
            return MoverType::Unknown;
        }
        self.mover_type[agent.index()]
    }

    fn movable(&self, agent: AgentId) -> Option<MovableState> {
        if !self.is_active(agent) {
            return None;
        }
        self.movable[agent.index()]
    }

    fn current_area(&self, agent: AgentId) -> Option<AreaId> {
        if !self.is_active(agent) {
            return None;
        }
        self.navigation[agent.index()].current_area
    }
}
