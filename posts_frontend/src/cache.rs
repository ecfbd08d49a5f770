//! Client-side query cache.
//!
//! Reads are keyed by [`QueryKey`]. A key has at most one request in flight;
//! every view reading that key renders from the same entry. Mutations never
//! go through the cache, but once they succeed they invalidate the keys listed
//! in [`Mutation::invalidates`] so the next read goes back to the network.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::ApiError;
use crate::models::{Post, PostsPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Posts { page: u32, limit: u32 },
    Post { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    /// Paginated lists of the collection.
    Posts,
    /// Single posts fetched by id.
    Post,
}

impl QueryKey {
    pub fn family(&self) -> ResourceFamily {
        match self {
            QueryKey::Posts { .. } => ResourceFamily::Posts,
            QueryKey::Post { .. } => ResourceFamily::Post,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update { id: u64 },
    Delete { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Family(ResourceFamily),
    Key(QueryKey),
}

impl Invalidation {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Invalidation::Family(family) => key.family() == *family,
            Invalidation::Key(target) => key == target,
        }
    }
}

impl Mutation {
    /// Cache keys made obsolete by a successful mutation.
    pub fn invalidates(&self) -> Vec<Invalidation> {
        match *self {
            Mutation::Create => vec![Invalidation::Family(ResourceFamily::Posts)],
            Mutation::Update { id } | Mutation::Delete { id } => vec![
                Invalidation::Family(ResourceFamily::Posts),
                Invalidation::Key(QueryKey::Post { id }),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: Option<V>,
    pub error: Option<ApiError>,
    pub status: QueryStatus,
    pub fetched_at: Option<DateTime<Utc>>,
    pub fetching: bool,
    pub invalidated: bool,
    generation: u64,
}

impl<V> CacheEntry<V> {
    fn pending(generation: u64) -> Self {
        Self {
            value: None,
            error: None,
            status: QueryStatus::Pending,
            fetched_at: None,
            fetching: false,
            invalidated: false,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Values the application keeps in its cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryData {
    Page(PostsPage),
    Post(Post),
}

impl QueryData {
    pub fn as_page(&self) -> Option<&PostsPage> {
        match self {
            QueryData::Page(page) => Some(page),
            QueryData::Post(_) => None,
        }
    }

    pub fn as_post(&self) -> Option<&Post> {
        match self {
            QueryData::Post(post) => Some(post),
            QueryData::Page(_) => None,
        }
    }
}

pub struct QueryCache<V> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    stale_time: chrono::Duration,
    /// Generation new entries start at. Raised by `clear` so requests issued
    /// before it can never match an entry created after it.
    generation_floor: u64,
}

impl<V> QueryCache<V> {
    pub fn new(stale_time: Duration) -> Self {
        let stale_time =
            chrono::Duration::from_std(stale_time).unwrap_or_else(|_| chrono::Duration::days(365));
        Self {
            entries: HashMap::new(),
            stale_time,
            generation_floor: 0,
        }
    }

    pub fn entry(&self, key: &QueryKey) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    pub fn value(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key).and_then(|entry| entry.value.as_ref())
    }

    pub fn status(&self, key: &QueryKey) -> Option<QueryStatus> {
        self.entries.get(key).map(|entry| entry.status)
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.fetching)
    }

    pub fn is_fresh(&self, key: &QueryKey, now: DateTime<Utc>) -> bool {
        self.entries.get(key).is_some_and(|entry| {
            entry.status == QueryStatus::Success
                && !entry.invalidated
                && entry
                    .fetched_at
                    .is_some_and(|at| now.signed_duration_since(at) < self.stale_time)
        })
    }

    /// Registers a read of `key`. Returns the generation to fetch under when
    /// the caller must hit the network, or `None` when the entry is fresh or a
    /// request for it is already in flight.
    pub fn begin_fetch(&mut self, key: QueryKey, now: DateTime<Utc>) -> Option<u64> {
        if self.is_fresh(&key, now) {
            return None;
        }
        let floor = self.generation_floor;
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| CacheEntry::pending(floor));
        if entry.fetching {
            return None;
        }
        entry.fetching = true;
        if entry.value.is_none() {
            entry.status = QueryStatus::Pending;
        }
        debug!("fetching {key:?} (generation {})", entry.generation);
        Some(entry.generation)
    }

    /// Stores the outcome of a fetch started by [`QueryCache::begin_fetch`].
    pub fn complete(
        &mut self,
        key: QueryKey,
        generation: u64,
        result: Result<V, ApiError>,
        now: DateTime<Utc>,
    ) {
        let Some(entry) = self.entries.get_mut(&key) else {
            debug!("dropping result for evicted key {key:?}");
            return;
        };

        if generation != entry.generation {
            // Started before an invalidation: keep it only as a stale
            // placeholder, never as fresh data.
            if entry.value.is_none() {
                if let Ok(value) = result {
                    entry.value = Some(value);
                    entry.error = None;
                    entry.status = QueryStatus::Success;
                    entry.fetched_at = Some(now);
                    entry.invalidated = true;
                }
            }
            return;
        }

        entry.fetching = false;
        entry.fetched_at = Some(now);
        match result {
            Ok(value) => {
                entry.value = Some(value);
                entry.error = None;
                entry.status = QueryStatus::Success;
                entry.invalidated = false;
            }
            Err(err) => {
                entry.error = Some(err);
                entry.status = QueryStatus::Error;
            }
        }
    }

    /// Marks every entry touched by `mutation` stale. Returns how many
    /// entries were affected.
    pub fn invalidate(&mut self, mutation: &Mutation) -> usize {
        let rules = mutation.invalidates();
        let mut count = 0;
        for (key, entry) in self.entries.iter_mut() {
            if rules.iter().any(|rule| rule.matches(key)) {
                mark_stale(entry);
                count += 1;
            }
        }
        debug!("{mutation:?} invalidated {count} cache entries");
        count
    }

    /// Marks a single entry stale, e.g. for a manual retry.
    pub fn invalidate_key(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                mark_stale(entry);
                true
            }
            None => false,
        }
    }

    /// Drops every entry. Results of requests still in flight come back
    /// under an outdated generation and are never stored as fresh.
    pub fn clear(&mut self) {
        let next = self
            .entries
            .values()
            .map(|entry| entry.generation + 1)
            .max()
            .unwrap_or(0);
        self.generation_floor = self.generation_floor.max(next);
        debug!(
            "cleared {} cache entries, generations restart at {}",
            self.entries.len(),
            self.generation_floor
        );
        self.entries.clear();
    }
}

fn mark_stale<V>(entry: &mut CacheEntry<V>) {
    entry.invalidated = true;
    entry.fetching = false;
    entry.generation += 1;
}
