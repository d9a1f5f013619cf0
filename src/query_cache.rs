//! Per-query fetch cache with a freshness window and explicit invalidation.
//!
//! One entry per `(query, parameters)` pair. Each entry walks
//! `Idle -> Loading -> {Success, Error}` and returns to `Loading` on refetch
//! or after invalidation. At most one request is in flight per entry; results
//! carry the generation they were spawned with so answers for superseded
//! requests are dropped instead of overwriting newer state.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// How long a successful fetch stays fresh.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(30);

/// Fetch state of one cache entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchState {
    /// Never fetched.
    Idle,
    /// A request is in flight.
    Loading,
    /// Last fetch succeeded.
    Success,
    /// Last fetch failed with this user-presentable message.
    Error(String),
}

/// Decision returned by [`QueryCache::plan_fetch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchPlan {
    /// The cached value is fresh; no request needed.
    UseCached,
    /// A request for these parameters is already in flight.
    AlreadyLoading,
    /// The last fetch failed; wait for an explicit retry or invalidation.
    HoldError,
    /// Spawn a request and report back with this generation.
    Spawn {
        /// Token the worker must echo in its completion message.
        generation: u64,
    },
}

#[derive(Debug)]
struct CacheEntry<T> {
    state: FetchState,
    value: Option<T>,
    fetched_at: Option<Instant>,
    forced_stale: bool,
    generation: u64,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Idle,
            value: None,
            fetched_at: None,
            forced_stale: false,
            generation: 0,
        }
    }
}

/// Cache for one query, keyed by its parameter set.
#[derive(Debug)]
pub struct QueryCache<P, T> {
    entries: HashMap<P, CacheEntry<T>>,
    next_generation: u64,
}

impl<P, T> Default for QueryCache<P, T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_generation: 1,
        }
    }
}

impl<P: Clone + Eq + Hash, T> QueryCache<P, T> {
    /// Decide whether a read for `params` needs a request right now.
    ///
    /// Transitions the entry to `Loading` when a spawn is required.
    pub fn plan_fetch(&mut self, params: &P, now: Instant) -> FetchPlan {
        let generation = self.next_generation;
        let entry = self.entries.entry(params.clone()).or_default();
        match entry.state {
            FetchState::Loading => return FetchPlan::AlreadyLoading,
            FetchState::Success if entry.is_fresh(now) => return FetchPlan::UseCached,
            // No automatic retries: a failed entry stays failed until the
            // user refreshes or an upload invalidates it.
            FetchState::Error(_) if !entry.forced_stale => return FetchPlan::HoldError,
            _ => {}
        }
        entry.state = FetchState::Loading;
        entry.generation = generation;
        self.next_generation += 1;
        FetchPlan::Spawn { generation }
    }

    /// Apply a worker result.
    ///
    /// Returns false (and changes nothing) when the generation no longer
    /// matches the entry, i.e. the request was superseded.
    pub fn complete(
        &mut self,
        params: &P,
        generation: u64,
        result: Result<T, String>,
        now: Instant,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(params) else {
            return false;
        };
        if entry.state != FetchState::Loading || entry.generation != generation {
            return false;
        }
        match result {
            Ok(value) => {
                entry.value = Some(value);
                entry.fetched_at = Some(now);
                entry.forced_stale = false;
                entry.state = FetchState::Success;
            }
            Err(message) => {
                // Keep the previous value for display; the state records the
                // failure so the UI can surface it.
                entry.state = FetchState::Error(message);
            }
        }
        true
    }

    /// Force every entry of this query to refetch on its next read, ignoring
    /// the freshness window.
    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.forced_stale = true;
        }
    }

    /// Allow failed entries to be fetched again on their next read.
    pub fn clear_errors(&mut self) {
        for entry in self.entries.values_mut() {
            if matches!(entry.state, FetchState::Error(_)) {
                entry.forced_stale = true;
            }
        }
    }

    /// Last successfully fetched value for `params`, fresh or not.
    pub fn value(&self, params: &P) -> Option<&T> {
        self.entries.get(params).and_then(|entry| entry.value.as_ref())
    }

    /// Fetch state for `params` (`Idle` when never requested).
    pub fn state(&self, params: &P) -> FetchState {
        self.entries
            .get(params)
            .map(|entry| entry.state.clone())
            .unwrap_or(FetchState::Idle)
    }

    /// True while a request for `params` is in flight.
    pub fn is_loading(&self, params: &P) -> bool {
        self.state(params) == FetchState::Loading
    }
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, now: Instant) -> bool {
        if self.forced_stale {
            return false;
        }
        self.fetched_at
            .is_some_and(|at| now.duration_since(at) < FRESHNESS_WINDOW)
    }
}
