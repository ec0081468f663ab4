//! `PollQueue` — sparse per-tick classification schedule.
//!
//! Each registered agent is due once every `poll_period_ticks`.  Storing
//! agents by due tick means a tick only touches the agents due on it, not
//! every registered agent.

use std::collections::BTreeMap;

use nav_core::{AgentId, Tick};

/// Maps ticks to the agents whose classification is due at that tick.
#[derive(Default)]
pub struct PollQueue {
    inner: BTreeMap<Tick, Vec<AgentId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl PollQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` for `tick`.  Duplicates are allowed; the tracker
    /// dedups when draining.
    pub fn push(&mut self, tick: Tick, agent: AgentId) {
        self.inner.entry(tick).or_default().push(agent);
        self.total += 1;
    }

    /// Remove and return every agent due at or before `now`, ascending by id
    /// with duplicates removed.
    /// Agents due at ticks the caller skipped are included.
    pub fn drain_due(&mut self, now: Tick) -> Vec<AgentId> {
        let later = self.inner.split_off(&Tick(now.0.saturating_add(1)));
        let due = std::mem::replace(&mut self.inner, later);
        let mut agents: Vec<AgentId> = due.into_values().flatten().collect();
        self.total -= agents.len();
        agents.sort_unstable();
        agents.dedup();
        agents
    }

    /// Drop every entry for `agent`.  Returns how many were removed.
    pub fn remove(&mut self, agent: AgentId) -> usize {
        let mut removed = 0;
        self.inner.retain(|_, agents| {
            let before = agents.len();
            agents.retain(|&a| a != agent);
            removed += before - agents.len();
            !agents.is_empty()
        });
        self.total -= removed;
        removed
    }

    /// The earliest tick with at least one queued agent.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
