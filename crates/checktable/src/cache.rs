//! Cache of unordered check tables.
//!
//! Tables are cached per (hostname, filter mode) and shared via `Arc`. The
//! whole cache sits behind one lock: lookups only take the read side, so
//! resolutions of different hosts do not block each other on hits.
//! Invalidation clears every table and bumps the generation under the write
//! lock in one step.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::resolver::FilterMode;
use crate::table::CheckTable;

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    tables: HashMap<FilterMode, HashMap<String, Arc<CheckTable>>>,
}

/// Check table cache, invalidated together with the configuration
#[derive(Debug, Default)]
pub struct CheckTableCache {
    state: RwLock<CacheState>,
}

impl CheckTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current configuration generation
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn get(&self, hostname: &str, filter_mode: FilterMode) -> Option<Arc<CheckTable>> {
        self.state.read().tables.get(&filter_mode)?.get(hostname).cloned()
    }

    /// Store a table built from configuration generation `generation`.
    ///
    /// Tables built before the latest invalidation are not stored. Returns
    /// whether the table was stored.
    pub fn insert(
        &self,
        generation: u64,
        hostname: &str,
        filter_mode: FilterMode,
        table: Arc<CheckTable>,
    ) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            debug!(
                host = hostname,
                generation,
                current = state.generation,
                "discarding stale check table"
            );
            return false;
        }

        state.tables.entry(filter_mode).or_default().insert(hostname.to_string(), table);
        true
    }

    /// Drop every cached table. Returns the new generation.
    pub fn invalidate(&self) -> u64 {
        let mut state = self.state.write();
        state.tables.clear();
        state.generation += 1;
        debug!(generation = state.generation, "check table cache invalidated");
        state.generation
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.state.read().tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
