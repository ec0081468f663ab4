//! The conflict resolver: may a candidate reservation be inserted, and whom
//! does it displace?

use nav_agent::AgentView;
use nav_core::Tick;

use crate::{
    AreaConfig, CriticalityConfig, ExclusivityFlags, ExclusivityTable, NavigationSnapshot,
    Reservation, calculate_criticality,
};

/// Outcome of [`ConflictResolver::can_insert_after_resolve`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolveDecision {
    AllowInsert,
    RejectInsert,
}

/// Decision plus the eviction pattern over the collision list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub decision: ResolveDecision,
    /// Parallel to the `collisions` slice: `true` marks a reservation that
    /// must be evicted for the candidate to be stored.  All `false` on
    /// rejection.
    pub delete_flags: Vec<bool>,
    /// Index of the collision that caused a rejection.
    pub blocker: Option<usize>,
}

impl Resolution {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        self.decision == ResolveDecision::AllowInsert
    }

    /// Indices of collisions flagged for eviction, ascending.
    pub fn evicted_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.delete_flags
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(|(i, _)| i)
    }

    fn reject(collision_count: usize, blocker: usize) -> Self {
        Self {
            decision:     ResolveDecision::RejectInsert,
            delete_flags: vec![false; collision_count],
            blocker:      Some(blocker),
        }
    }
}

/// Exclusivity table plus scoring weights: everything the resolver needs
/// besides agent state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservationPolicy {
    pub exclusivity: ExclusivityTable,
    pub criticality: CriticalityConfig,
}

/// Stateless decision engine borrowing the policy and a read-only agent view.
///
/// Built per call site; holds no clock.  Every decision is a pure function of
/// `now`, the reservations involved, and the agents' current state.
pub struct ConflictResolver<'a, V: AgentView + ?Sized> {
    policy: &'a ReservationPolicy,
    agents: &'a V,
}

impl<'a, V: AgentView + ?Sized> ConflictResolver<'a, V> {
    pub fn new(policy: &'a ReservationPolicy, agents: &'a V) -> Self {
        Self { policy, agents }
    }

    pub fn policy(&self) -> &ReservationPolicy {
        self.policy
    }

    /// Is the owner of `reservation` already standing in the claimed area?
    #[inline]
    pub fn is_reservation_for_current_area(&self, reservation: &Reservation) -> bool {
        self.agents.is_in_area(reservation.owner, reservation.area)
    }

    /// Score of `reservation`'s owner at `now`.
    pub fn criticality(&self, now: Tick, reservation: &Reservation) -> f32 {
        let navigation = NavigationSnapshot {
            mover_type:       reservation.mover_type,
            in_reserved_area: self.is_reservation_for_current_area(reservation),
        };
        let movable = self.agents.movable(reservation.owner);
        calculate_criticality(
            now,
            reservation.begin(),
            movable.as_ref(),
            &navigation,
            &self.policy.criticality,
        )
    }

    pub fn are_mutually_exclusive(
        &self,
        lhs:   &Reservation,
        rhs:   &Reservation,
        flags: ExclusivityFlags,
    ) -> bool {
        let lhs_movable = self.agents.movable(lhs.owner);
        let rhs_movable = self.agents.movable(rhs.owner);
        self.policy.exclusivity.are_reservations_mutually_exclusive(
            lhs,
            rhs,
            lhs_movable.as_ref(),
            rhs_movable.as_ref(),
            flags,
        )
    }

    /// Decide whether `candidate` may be inserted despite `collisions`.
    ///
    /// `collisions` are the reservations sharing the candidate's area whose
    /// windows overlap it.  Non-exclusive ones are ignored.  The candidate
    /// must strictly outrank every exclusive one; the first exclusive
    /// collision scoring at least as high rejects the candidate and stops the
    /// scan.  Otherwise every exclusive collision is flagged for deletion.
    pub fn can_insert_after_resolve(
        &self,
        now:            Tick,
        collisions:     &[Reservation],
        candidate:      &Reservation,
        candidate_area: &AreaConfig,
        flags:          ExclusivityFlags,
    ) -> Resolution {
        let flags = candidate_area.effective_flags(flags);
        let mut delete_flags = vec![false; collisions.len()];
        let mut candidate_score: Option<f32> = None;

        for (i, other) in collisions.iter().enumerate() {
            if !self.are_mutually_exclusive(candidate, other, flags) {
                continue;
            }
            let ours = *candidate_score.get_or_insert_with(|| self.criticality(now, candidate));
            let theirs = self.criticality(now, other);
            if ours <= theirs {
                return Resolution::reject(collisions.len(), i);
            }
            delete_flags[i] = true;
        }

        Resolution {
            decision: ResolveDecision::AllowInsert,
            delete_flags,
            blocker: None,
        }
    }
}
