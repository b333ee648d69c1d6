//! Time-bounded memoization of generated fact tables, keyed by regime.
//!
//! The cache is an ordinary value owned by whoever drives generation.
//! Reads take an explicit `now` so expiry is testable without sleeping.

use crate::{record::FactTable, types::RegimeKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CacheEntry {
    table:       Arc<FactTable>,
    inserted_at: Instant,
}

pub struct FactTableCache {
    entries: HashMap<RegimeKind, CacheEntry>,
    ttl:     Duration,
}

impl FactTableCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::with_capacity(RegimeKind::ALL.len()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached table, or None if missing or expired.
    /// Expired entries are dropped on the way out.
    pub fn get(&mut self, kind: RegimeKind, now: Instant) -> Option<Arc<FactTable>> {
        let expired = {
            let entry = self.entries.get(&kind)?;
            now.saturating_duration_since(entry.inserted_at) >= self.ttl
        };
        if expired {
            self.entries.remove(&kind);
            log::debug!("cache: {kind} entry expired");
            return None;
        }
        self.entries.get(&kind).map(|e| Arc::clone(&e.table))
    }

    /// Insert or replace the table for its regime.
    pub fn put(&mut self, table: Arc<FactTable>, now: Instant) {
        self.entries.insert(
            table.regime,
            CacheEntry {
                table,
                inserted_at: now,
            },
        );
    }

    pub fn invalidate(&mut self, kind: RegimeKind) -> bool {
        self.entries.remove(&kind).is_some()
    }

    /// Remove expired entries. Returns how many were dropped.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
