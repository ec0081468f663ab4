//! Framework error type.
//!
//! Sub-crates define their own error enums (`ReservationError`,
//! `ObstacleError`, …) and wrap them where they meet; `NavError` covers the
//! failures that belong to no particular subsystem.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `nav-core`.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `nav-core`.
pub type NavResult<T> = Result<T, NavError>;
