//! The read-only seam between the reservation core and agent storage.

use nav_core::{AgentId, AreaId, MoverType};

use crate::MovableState;

/// Read-only per-agent state consumed by the conflict resolver.
///
/// Every method is total: an unknown or despawned agent reports
/// `MoverType::Unknown`, no movable, and no current area, which makes the
/// resolver treat it conservatively instead of failing.
///
/// The `parallel` batch insert shares one view across threads, so
/// implementations used there must also be `Sync`.
pub trait AgentView {
    /// `false` for agents that were despawned or never existed.
    fn is_active(&self, agent: AgentId) -> bool;

    fn mover_type(&self, agent: AgentId) -> MoverType;

    /// `None` when the agent currently has no movement capability.
    fn movable(&self, agent: AgentId) -> Option<MovableState>;

    fn current_area(&self, agent: AgentId) -> Option<AreaId>;

    /// `true` if `agent` is physically inside `area` right now.
    #[inline]
    fn is_in_area(&self, agent: AgentId, area: AreaId) -> bool {
        self.current_area(agent) == Some(area)
    }
}
