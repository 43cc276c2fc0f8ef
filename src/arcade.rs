//! Registry of live matches
//!
//! The arcade owns every match by id. Lookup, creation and eviction across
//! ids go through one `RwLock`; each match sits behind its own `Mutex`, so
//! mutations of one match are serialized and never observed half-done,
//! while different matches proceed independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, info};

use crate::game::{Control, Match, MatchId};
use crate::rules::Rules;

/// Shared handle to one match
pub type MatchHandle = Arc<Mutex<Match>>;

/// Concurrent match store.
#[derive(Debug)]
pub struct Arcade {
    matches: RwLock<HashMap<MatchId, MatchHandle>>,
    next_id: AtomicU64,
    rules: Rules,
}

impl Arcade {
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Arcade whose new matches are played under `rules`
    pub fn with_rules(rules: Rules) -> Self {
        Self {
            matches: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            rules,
        }
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Register a fresh match and return its id and handle.
    pub fn create(&self, p1: Control, p2: Control) -> (MatchId, MatchHandle) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = Arc::new(Mutex::new(Match::with_rules(id, p1, p2, self.rules)));

        self.matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&handle));

        info!(id, ?p1, ?p2, "match created");
        (id, handle)
    }

    pub fn get(&self, id: MatchId) -> Option<MatchHandle> {
        self.matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Evict a match. Holders of its handle keep it alive until dropped.
    pub fn remove(&self, id: MatchId) -> bool {
        let removed = self
            .matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            info!(id, "match evicted");
        } else {
            debug!(id, "evict of unknown match");
        }
        removed
    }

    /// Run `f` with exclusive access to match `id`.
    ///
    /// Returns `None` when no such match exists.
    pub fn with_match<R>(&self, id: MatchId, f: impl FnOnce(&mut Match) -> R) -> Option<R> {
        let handle = self.get(id)?;
        let mut guard = lock(&handle);
        Some(f(&mut guard))
    }

    pub fn len(&self) -> usize {
        self.matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Arcade {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock a match. Core operations never leave a match half-mutated, so a
/// poisoned lock still guards a consistent match.
pub fn lock(handle: &MatchHandle) -> MutexGuard<'_, Match> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
