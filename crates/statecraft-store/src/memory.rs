//! In-process store adapter, for tests and embedders that persist elsewhere.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use statecraft_core::{NationId, TechId};

use crate::{ProgressStore, StoreError};

/// Keeps records in a plain map. Load and save never fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<NationId, HashSet<TechId>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one nation's record, replacing any existing one.
    pub fn with_record<I>(self, nation: impl Into<NationId>, unlocked: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TechId>,
    {
        self.records.lock().unwrap().insert(
            nation.into(),
            unlocked.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// The stored record for `nation`, if any. Mainly for assertions.
    pub fn record(&self, nation: &NationId) -> Option<HashSet<TechId>> {
        self.records.lock().unwrap().get(nation).cloned()
    }
}

impl ProgressStore for MemoryStore {
    fn load_all(&self) -> Result<HashMap<NationId, HashSet<TechId>>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn save(&self, nation: &NationId, unlocked: &HashSet<TechId>) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(nation.clone(), unlocked.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let nation = NationId::new("avalon");
        let unlocked: HashSet<TechId> = [TechId::new("basic_military")].into();

        store.save(&nation, &unlocked).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&nation], unlocked);
    }

    #[test]
    fn save_replaces_previous_record() {
        let store = MemoryStore::new().with_record("avalon", ["a", "b"]);
        let nation = NationId::new("avalon");

        let smaller: HashSet<TechId> = [TechId::new("a")].into();
        store.save(&nation, &smaller).unwrap();

        assert_eq!(store.record(&nation).unwrap(), smaller);
    }
}
