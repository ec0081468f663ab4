//! Time windows and reservations.

use nav_core::{AgentId, AreaId, MoverType, Tick};

use crate::{ReservationError, ReservationResult};

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A half-open tick interval `[begin, end)` with `begin < end`.
///
/// The fields are private so an empty or inverted window cannot be built
/// outside [`TimeWindow::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    begin: Tick,
    end:   Tick,
}

impl TimeWindow {
    /// # Errors
    ///
    /// [`ReservationError::InvalidInterval`] if `begin >= end`.
    pub fn new(begin: Tick, end: Tick) -> ReservationResult<Self> {
        if begin >= end {
            return Err(ReservationError::InvalidInterval { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Window starting at `begin` and lasting `ticks` ticks.
    ///
    /// # Errors
    ///
    /// [`ReservationError::InvalidInterval`] if `ticks` is zero or the end
    /// would pass [`Tick::MAX`].
    pub fn starting_at(begin: Tick, ticks: u64) -> ReservationResult<Self> {
        let end = begin
            .checked_offset(ticks)
            .ok_or(ReservationError::InvalidInterval { begin, end: Tick::MAX })?;
        Self::new(begin, end)
    }

    /// Window of `ticks` ticks starting at `begin`, clamped to at least one
    /// tick.  The end saturates at [`Tick::MAX`]; a `begin` of `Tick::MAX`
    /// is pulled back one tick.
    pub fn at_least_one_tick(begin: Tick, ticks: u64) -> Self {
        let begin = begin.min(Tick(u64::MAX - 1));
        Self { begin, end: begin.offset(ticks.max(1)) }
    }

    #[inline]
    pub fn begin(&self) -> Tick {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> Tick {
        self.end
    }

    #[inline]
    pub fn duration_ticks(&self) -> u64 {
        self.end - self.begin
    }

    #[inline]
    pub fn contains(&self, t: Tick) -> bool {
        self.begin <= t && t < self.end
    }

    /// Half-open intersection test: `[0,5)` and `[5,9)` do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Like [`overlaps`](Self::overlaps) but adjacent windows also count.
    #[inline]
    pub fn touches(&self, other: &TimeWindow) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// Smallest window covering both.
    pub fn hull(&self, other: &TimeWindow) -> TimeWindow {
        TimeWindow {
            begin: self.begin.min(other.begin),
            end:   self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

// ── Reservation ───────────────────────────────────────────────────────────────

/// One agent's claim on one area for one time window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reservation {
    pub owner:      AgentId,
    pub area:       AreaId,
    pub window:     TimeWindow,
    /// Mover type of the owner when the claim was made.
    pub mover_type: MoverType,
}

impl Reservation {
    /// # Errors
    ///
    /// [`ReservationError::InvalidInterval`] if `begin >= end`.
    pub fn new(
        owner:      AgentId,
        area:       AreaId,
        begin:      Tick,
        end:        Tick,
        mover_type: MoverType,
    ) -> ReservationResult<Self> {
        Ok(Self::with_window(owner, area, TimeWindow::new(begin, end)?, mover_type))
    }

    #[inline]
    pub fn with_window(owner: AgentId, area: AreaId, window: TimeWindow, mover_type: MoverType) -> Self {
        Self { owner, area, window, mover_type }
    }

    #[inline]
    pub fn begin(&self) -> Tick {
        self.window.begin()
    }

    #[inline]
    pub fn end(&self) -> Tick {
        self.window.end()
    }

    /// Same area and overlapping windows.
    #[inline]
    pub fn collides_with(&self, other: &Reservation) -> bool {
        self.area == other.area && self.window.overlaps(&other.window)
    }

    /// `true` once the window lies entirely in the past.
    #[inline]
    pub fn is_expired(&self, now: Tick) -> bool {
        self.end() <= now
    }
}

impl std::fmt::Display for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} on {} {}", self.mover_type, self.owner, self.area, self.window)
    }
}
