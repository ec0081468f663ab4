use nav_core::Tick;
use thiserror::Error;

/// Contract violations and configuration failures.
///
/// Losing a conflict is *not* an error: it is reported as
/// [`InsertResult::Rejected`][crate::InsertResult::Rejected].
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("invalid reservation interval [{begin}, {end}): begin must be before end")]
    InvalidInterval { begin: Tick, end: Tick },

    #[error("exclusivity table parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReservationResult<T> = Result<T, ReservationError>;
