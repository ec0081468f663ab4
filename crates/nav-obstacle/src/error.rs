use nav_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObstacleError {
    /// A static transform transfer was attempted while the agent had no
    /// collision footprint attached.  Guard with `needs_transform_update`.
    #[error("{0} has no collision data attached")]
    MissingCollisionData(AgentId),

    #[error("{0} is not registered with the obstacle tracker")]
    NotRegistered(AgentId),
}

pub type ObstacleResult<T> = Result<T, ObstacleError>;
