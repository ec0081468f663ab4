//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing integer `Tick`.  Reservation windows,
//! poll schedules, and the `now` argument of every scoring function are all
//! expressed in ticks, so interval arithmetic is exact and comparisons are
//! O(1).  `SimClock` maps ticks to simulated seconds when a physical quantity
//! (elapsed seconds, braking time) is needed:
//!
//!   secs = tick * tick_duration_ms / 1000
//!
//! Nothing in the reservation core reads a process-wide clock; the current
//! tick is always passed in explicitly.

use std::fmt;

use crate::{NavError, NavResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
    pub const MAX: Tick = Tick(u64::MAX);

    /// Return the tick `n` steps after `self`, saturating at [`Tick::MAX`].
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// `None` if `self + n` does not fit in a tick.
    #[inline]
    pub fn checked_offset(self, n: u64) -> Option<Tick> {
        self.0.checked_add(n).map(Tick)
    }

    /// Ticks elapsed from `earlier` to `self`, or zero if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Saturating, same as [`Tick::offset`].
impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

/// Ticks from `rhs` to `self`.  Panics in debug builds if `rhs > self`; use
/// [`Tick::saturating_since`] when the order is not known.
impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts tick counts to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds per tick.  Default: 100 (10 Hz steering).
    pub tick_duration_ms: u32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_ms: u32) -> Self {
        Self {
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds represented by one tick.
    #[inline]
    pub fn seconds_per_tick(&self) -> f32 {
        self.tick_duration_ms as f32 / 1_000.0
    }

    /// Simulated seconds spanned by `ticks`.
    #[inline]
    pub fn secs(&self, ticks: u64) -> f32 {
        ticks as f32 * self.seconds_per_tick()
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_duration_ms as f64 / 1_000.0
    }

    /// How many ticks span `secs` seconds? (rounds up; a claim never ends
    /// before the agent has left the area)
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if secs <= 0.0 || self.tick_duration_ms == 0 {
            return 0;
        }
        (secs * 1_000.0 / self.tick_duration_ms as f32).ceil() as u64
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(100)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration of a navigation world.
///
/// Usually built in code or deserialized by the application (with the
/// `serde` feature) and handed to the world builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated milliseconds per tick.
    pub tick_duration_ms: u32,

    /// Total ticks to simulate when running to completion.
    pub total_ticks: u64,

    /// Obstacle classification runs once every this many ticks per agent.
    /// Must be at least 1.
    pub classification_period_ticks: u64,

    /// Worker thread count for the `parallel` feature.  `None` uses rayon's
    /// global pool.
    pub num_threads: Option<usize>,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_ms)
    }

    /// # Errors
    ///
    /// [`NavError::Config`] for a zero tick duration, a zero classification
    /// period, or a zero thread count.
    pub fn validate(&self) -> NavResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(NavError::Config("tick_duration_ms must be positive".into()));
        }
        if self.classification_period_ticks == 0 {
            return Err(NavError::Config("classification_period_ticks must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(NavError::Config("num_threads must be at least 1 when set".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms:            100,
            total_ticks:                 600,
            classification_period_ticks: 10,
            num_threads:                 None,
        }
    }
}
