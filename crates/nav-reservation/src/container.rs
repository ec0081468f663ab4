//! `ReservationContainer` — every live reservation, indexed by area and by
//! agent.
//!
//! # Layout
//!
//! ```text
//! areas:    AreaId  → AreaReservations (Vec sorted by (begin, owner))
//! by_agent: AgentId → BTreeSet<AreaId>  (areas the agent holds a claim on)
//! ```
//!
//! Each `AreaReservations` is an independent value: resolving a candidate
//! only ever reads and writes the list of the candidate's own area.  That is
//! what lets [`ReservationContainer::insert_batch`] shard work per area (see
//! the `parallel` feature) and merge the agent index back sequentially.
//!
//! # Same agent, same area
//!
//! At most one reservation per (agent, area).  A new claim whose window
//! overlaps or touches the held one **extends** it (the hull keeps the
//! original begin, so accumulated criticality is not lost); a disjoint claim
//! **replaces** it.  Either way the held reservation is only dropped if the
//! new claim wins resolution.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use nav_agent::AgentView;
use nav_core::{AgentId, AreaId, Tick};
use tracing::{debug, trace};

use crate::{
    AreaConfig, ConflictResolver, ExclusivityFlags, Reservation, ReservationPolicy, TimeWindow,
};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

// ── InsertResult ──────────────────────────────────────────────────────────────

/// What happened to a candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertResult {
    /// The candidate (possibly extended) is stored.
    Inserted {
        /// The reservation as stored.
        reservation: Reservation,
        /// Reservations of other agents that lost the conflict.
        evicted:     Vec<Reservation>,
        /// The owner's previous claim on this area, if any.
        replaced:    Option<Reservation>,
    },
    /// A more critical exclusive claim exists; nothing changed.
    Rejected {
        candidate: Reservation,
        /// Owners of the reservations that blocked the candidate.
        blockers:  Vec<AgentId>,
    },
}

impl InsertResult {
    #[inline]
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertResult::Inserted { .. })
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(self, InsertResult::Rejected { .. })
    }

    /// Evicted reservations; empty for a rejection.
    pub fn evicted(&self) -> &[Reservation] {
        match self {
            InsertResult::Inserted { evicted, .. } => evicted,
            InsertResult::Rejected { .. }          => &[],
        }
    }
}

// ── AreaReservations ──────────────────────────────────────────────────────────

/// Reservations on one area, sorted by `(begin, owner)`.
#[derive(Clone, Debug, Default)]
pub struct AreaReservations {
    entries: Vec<Reservation>,
}

impl AreaReservations {
    #[inline]
    pub fn as_slice(&self) -> &[Reservation] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All reservations whose window intersects `window`, ascending by begin.
    pub fn find_overlapping(&self, window: &TimeWindow) -> Vec<Reservation> {
        // Sorted by begin: nothing at or after `window.end()` can overlap.
        self.entries
            .iter()
            .take_while(|r| r.begin() < window.end())
            .filter(|r| r.window.overlaps(window))
            .copied()
            .collect()
    }

    pub fn reservation_of(&self, agent: AgentId) -> Option<&Reservation> {
        self.entries.iter().find(|r| r.owner == agent)
    }

    /// Resolve `candidate` against this list and apply the outcome.
    ///
    /// Pure with respect to everything but `self`, so shards of different
    /// areas may run concurrently.
    pub fn try_insert<V: AgentView + ?Sized>(
        &mut self,
        candidate: Reservation,
        config:    &AreaConfig,
        now:       Tick,
        resolver:  &ConflictResolver<'_, V>,
        flags:     ExclusivityFlags,
    ) -> InsertResult {
        let held = self.reservation_of(candidate.owner).copied();
        let effective = match held {
            Some(old) if old.window.touches(&candidate.window) => Reservation {
                window: old.window.hull(&candidate.window),
                ..candidate
            },
            _ => candidate,
        };

        let collisions: Vec<Reservation> = self
            .find_overlapping(&effective.window)
            .into_iter()
            .filter(|r| r.owner != effective.owner)
            .collect();

        let resolution = resolver.can_insert_after_resolve(now, &collisions, &effective, config, flags);
        if !resolution.is_allowed() {
            return InsertResult::Rejected {
                candidate: effective,
                blockers:  resolution.blocker.map(|i| collisions[i].owner).into_iter().collect(),
            };
        }

        let evicted: Vec<Reservation> = resolution
            .evicted_indices()
            .map(|i| collisions[i])
            .collect();
        for victim in &evicted {
            self.remove_owner(victim.owner);
        }
        let replaced = self.remove_owner(effective.owner);
        self.insert_sorted(effective);

        InsertResult::Inserted { reservation: effective, evicted, replaced }
    }

    fn insert_sorted(&mut self, reservation: Reservation) {
        let key = (reservation.begin(), reservation.owner);
        let pos = self.entries.partition_point(|r| (r.begin(), r.owner) < key);
        self.entries.insert(pos, reservation);
    }

    fn remove_owner(&mut self, agent: AgentId) -> Option<Reservation> {
        let pos = self.entries.iter().position(|r| r.owner == agent)?;
        Some(self.entries.remove(pos))
    }

    fn drain_expired(&mut self, now: Tick) -> Vec<Reservation> {
        let (expired, live): (Vec<_>, Vec<_>) = self.entries.drain(..).partition(|r| r.is_expired(now));
        self.entries = live;
        expired
    }
}

// ── ContainerStats ────────────────────────────────────────────────────────────

/// Cumulative counters since the container was created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerStats {
    pub inserted: u64,
    /// Inserts that extended the owner's held window.
    pub extended: u64,
    pub evicted:  u64,
    pub rejected: u64,
    /// Removals through `remove`, `remove_all_for_agent`, or expiry.
    pub released: u64,
}

// ── ReservationContainer ──────────────────────────────────────────────────────

/// Owns every live reservation of one map.
///
/// Single writer: all mutation happens on the tick loop between ticks.
/// Conflict outcomes are return values only; there are no observers.
#[derive(Default)]
pub struct ReservationContainer {
    policy:       ReservationPolicy,
    areas:        Map<AreaId, AreaReservations>,
    area_configs: Map<AreaId, AreaConfig>,
    by_agent:     Map<AgentId, BTreeSet<AreaId>>,
    stats:        ContainerStats,
}

impl ReservationContainer {
    pub fn new(policy: ReservationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &ReservationPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut ReservationPolicy {
        &mut self.policy
    }

    // ── Areas ─────────────────────────────────────────────────────────────

    /// Register (or overwrite) the configuration of an area.
    pub fn register_area(&mut self, config: AreaConfig) {
        self.area_configs.insert(config.id, config);
    }

    /// Configuration of `area`; unregistered areas are `Wide`.
    pub fn area_config(&self, area: AreaId) -> AreaConfig {
        self.area_configs
            .get(&area)
            .copied()
            .unwrap_or_else(|| AreaConfig::wide(area))
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Total number of live reservations.
    pub fn len(&self) -> usize {
        self.areas.values().map(AreaReservations::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of areas with at least one live reservation.
    pub fn area_count(&self) -> usize {
        self.areas.values().filter(|a| !a.is_empty()).count()
    }

    pub fn stats(&self) -> ContainerStats {
        self.stats
    }

    /// Reservations on `area`, sorted by `(begin, owner)`.
    pub fn reservations_on(&self, area: AreaId) -> &[Reservation] {
        self.areas.get(&area).map(AreaReservations::as_slice).unwrap_or(&[])
    }

    pub fn reservation(&self, agent: AgentId, area: AreaId) -> Option<&Reservation> {
        self.areas.get(&area)?.reservation_of(agent)
    }

    /// Areas `agent` currently holds claims on, ascending.
    pub fn areas_of(&self, agent: AgentId) -> Vec<AreaId> {
        self.by_agent
            .get(&agent)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All reservations on `area` intersecting `window`, ascending by begin
    /// (ties by owner).
    pub fn find_overlapping(&self, area: AreaId, window: &TimeWindow) -> Vec<Reservation> {
        self.areas
            .get(&area)
            .map(|list| list.find_overlapping(window))
            .unwrap_or_default()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Try to insert `candidate`, evicting weaker exclusive claims.
    pub fn insert<V: AgentView + ?Sized>(
        &mut self,
        candidate: Reservation,
        now:       Tick,
        agents:    &V,
        flags:     ExclusivityFlags,
    ) -> InsertResult {
        let config = self.area_config(candidate.area);
        let resolver = ConflictResolver::new(&self.policy, agents);
        let result = self
            .areas
            .entry(candidate.area)
            .or_default()
            .try_insert(candidate, &config, now, &resolver, flags);
        self.record(&result);
        result
    }

    /// Insert many candidates at once.
    ///
    /// Candidates are grouped per area and resolved in ascending
    /// `(area, owner)` order (arrival order within one owner), so the outcome
    /// does not depend on the order of `requests` across agents.  Results come
    /// back in that same order.  With the `parallel` feature each area group
    /// runs on Rayon's thread pool.
    pub fn insert_batch<V: AgentView + Sync + ?Sized>(
        &mut self,
        requests: Vec<Reservation>,
        now:      Tick,
        agents:   &V,
        flags:    ExclusivityFlags,
    ) -> Vec<InsertResult> {
        let mut groups: BTreeMap<AreaId, Vec<Reservation>> = BTreeMap::new();
        for request in requests {
            groups.entry(request.area).or_default().push(request);
        }

        // Detach each touched list so shards own their data.
        let mut shards: Vec<(AreaConfig, AreaReservations, Vec<Reservation>)> = Vec::with_capacity(groups.len());
        for (area, mut batch) in groups {
            batch.sort_by_key(|r| r.owner);
            let config = self.area_config(area);
            let list = self.areas.remove(&area).unwrap_or_default();
            shards.push((config, list, batch));
        }

        let per_area: Vec<Vec<InsertResult>> = {
            let resolver = ConflictResolver::new(&self.policy, agents);
            let resolve_shard = |(config, list, batch): &mut (AreaConfig, AreaReservations, Vec<Reservation>)| {
                batch
                    .iter()
                    .map(|candidate| list.try_insert(*candidate, config, now, &resolver, flags))
                    .collect::<Vec<_>>()
            };

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                shards.par_iter_mut().map(resolve_shard).collect()
            }

            #[cfg(not(feature = "parallel"))]
            {
                shards.iter_mut().map(resolve_shard).collect()
            }
        };

        for (config, list, _) in shards {
            self.areas.insert(config.id, list);
        }

        let results: Vec<InsertResult> = per_area.into_iter().flatten().collect();
        for result in &results {
            self.record(result);
        }
        results
    }

    /// Release `agent`'s claim on `area`.  No-op if it holds none.
    pub fn remove(&mut self, agent: AgentId, area: AreaId) -> Option<Reservation> {
        let removed = self.areas.get_mut(&area).and_then(|list| list.remove_owner(agent));
        match removed {
            Some(r) => {
                self.unindex(agent, area);
                self.drop_if_empty(area);
                self.stats.released += 1;
                debug!(agent = %agent, area = %area, window = %r.window, "reservation released");
                Some(r)
            }
            None => {
                trace!(agent = %agent, area = %area, "release of unheld reservation ignored");
                None
            }
        }
    }

    /// Release every claim of `agent`.  Calling it again returns nothing.
    pub fn remove_all_for_agent(&mut self, agent: AgentId) -> Vec<Reservation> {
        let Some(areas) = self.by_agent.remove(&agent) else {
            return Vec::new();
        };
        let mut removed = Vec::with_capacity(areas.len());
        for area in areas {
            if let Some(r) = self.areas.get_mut(&area).and_then(|list| list.remove_owner(agent)) {
                removed.push(r);
            }
            self.drop_if_empty(area);
        }
        self.stats.released += removed.len() as u64;
        if !removed.is_empty() {
            debug!(agent = %agent, count = removed.len(), "all reservations released");
        }
        removed
    }

    /// Drop every reservation whose window ended at or before `now`.
    pub fn purge_expired(&mut self, now: Tick) -> Vec<Reservation> {
        let mut expired: Vec<Reservation> = Vec::new();
        for list in self.areas.values_mut() {
            expired.extend(list.drain_expired(now));
        }
        for r in &expired {
            self.unindex(r.owner, r.area);
        }
        self.areas.retain(|_, list| !list.is_empty());
        self.stats.released += expired.len() as u64;
        if !expired.is_empty() {
            trace!(now = %now, count = expired.len(), "expired reservations purged");
        }
        // HashMap iteration order is arbitrary; callers get a stable order.
        expired.sort_by_key(|r| (r.area, r.begin(), r.owner));
        expired
    }

    // ── Bookkeeping ───────────────────────────────────────────────────────

    fn record(&mut self, result: &InsertResult) {
        match result {
            InsertResult::Inserted { reservation, evicted, replaced } => {
                for victim in evicted {
                    self.unindex(victim.owner, victim.area);
                    debug!(
                        winner = %reservation.owner,
                        evicted = %victim.owner,
                        area = %victim.area,
                        window = %victim.window,
                        "reservation evicted"
                    );
                }
                self.by_agent.entry(reservation.owner).or_default().insert(reservation.area);
                self.stats.inserted += 1;
                self.stats.evicted += evicted.len() as u64;
                if replaced.is_some_and(|old| old.window.touches(&reservation.window)) {
                    self.stats.extended += 1;
                }
                debug!(
                    agent = %reservation.owner,
                    area = %reservation.area,
                    window = %reservation.window,
                    evicted = evicted.len(),
                    "reservation inserted"
                );
            }
            InsertResult::Rejected { candidate, blockers } => {
                self.stats.rejected += 1;
                debug!(
                    agent = %candidate.owner,
                    area = %candidate.area,
                    window = %candidate.window,
                    blockers = ?blockers,
                    "reservation rejected"
                );
            }
        }
    }

    fn unindex(&mut self, agent: AgentId, area: AreaId) {
        if let Some(set) = self.by_agent.get_mut(&agent) {
            set.remove(&area);
            if set.is_empty() {
                self.by_agent.remove(&agent);
            }
        }
    }

    fn drop_if_empty(&mut self, area: AreaId) {
        if self.areas.get(&area).is_some_and(AreaReservations::is_empty) {
            self.areas.remove(&area);
        }
    }
}
