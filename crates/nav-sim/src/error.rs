use nav_core::NavError;
use nav_obstacle::ObstacleError;
use nav_reservation::ReservationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Nav(#[from] NavError),

    #[error("obstacle classification failed: {0}")]
    Obstacle(#[from] ObstacleError),

    #[error("reservation error: {0}")]
    Reservation(#[from] ReservationError),
}

pub type SimResult<T> = Result<T, SimError>;
