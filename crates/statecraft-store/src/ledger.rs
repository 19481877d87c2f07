//! In-memory working copy of every nation's unlocked set, one lock per
//! nation.
//!
//! The ledger is the only mutable progression state in the engine.
//! [`ProgressLedger::with_nation`] hands out exclusive access to a single
//! nation's set; a research attempt evaluates, pays, inserts, and persists
//! entirely inside that scope, so concurrent attempts for one nation
//! serialize while unrelated nations never contend. Reads of nations the
//! ledger has never seen return empty sets without allocating anything.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use statecraft_core::{NationId, TechId};

use crate::{ProgressStore, StoreError};

type NationCell = Arc<Mutex<HashSet<TechId>>>;

/// Per-nation unlocked sets with scoped locking, backed by a
/// [`ProgressStore`].
#[derive(Debug)]
pub struct ProgressLedger {
    store: Arc<dyn ProgressStore>,
    nations: RwLock<HashMap<NationId, NationCell>>,
}

impl ProgressLedger {
    /// Loads every stored record into memory. Startup-only; afterwards the
    /// ledger is the authority and the store only receives writes.
    pub fn open(store: Arc<dyn ProgressStore>) -> Result<Self, StoreError> {
        let records = store.load_all()?;
        debug!(nations = records.len(), "ledger opened");
        let nations = records
            .into_iter()
            .map(|(nation, set)| (nation, Arc::new(Mutex::new(set))))
            .collect();
        Ok(Self {
            store,
            nations: RwLock::new(nations),
        })
    }

    /// The cell for `nation`, created empty on first reference.
    fn cell(&self, nation: &NationId) -> NationCell {
        if let Some(cell) = self.nations.read().unwrap().get(nation) {
            return Arc::clone(cell);
        }
        let mut nations = self.nations.write().unwrap();
        Arc::clone(nations.entry(nation.clone()).or_default())
    }

    /// Runs `f` with exclusive access to `nation`'s unlocked set, creating
    /// it empty on first reference. The nation's lock is held for the whole
    /// call; `f` must not re-enter `with_nation` for the same nation.
    pub fn with_nation<R>(
        &self,
        nation: &NationId,
        f: impl FnOnce(&mut HashSet<TechId>) -> R,
    ) -> R {
        let cell = self.cell(nation);
        let mut set = cell.lock().unwrap();
        f(&mut set)
    }

    /// Writes `unlocked` through to the backing store as `nation`'s
    /// complete record. Call from inside [`Self::with_nation`] so writes
    /// for one nation stay ordered.
    pub fn persist(&self, nation: &NationId, unlocked: &HashSet<TechId>) -> Result<(), StoreError> {
        self.store.save(nation, unlocked)
    }

    /// Snapshot of `nation`'s unlocked set. Empty for unknown nations.
    pub fn unlocked(&self, nation: &NationId) -> HashSet<TechId> {
        match self.nations.read().unwrap().get(nation) {
            Some(cell) => cell.lock().unwrap().clone(),
            None => HashSet::new(),
        }
    }

    /// Whether `nation` has unlocked `tech`.
    pub fn is_unlocked(&self, nation: &NationId, tech: &str) -> bool {
        match self.nations.read().unwrap().get(nation) {
            Some(cell) => cell.lock().unwrap().contains(tech),
            None => false,
        }
    }

    /// Every nation the ledger currently tracks, in no particular order.
    pub fn nations(&self) -> Vec<NationId> {
        self.nations.read().unwrap().keys().cloned().collect()
    }
}
