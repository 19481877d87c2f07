//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests and, via the `test-utils` feature, in the
//! dev-dependencies of sibling crates.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::id::{CapabilityId, NationId, TechId};
use crate::provider::{
    CapabilityProvider, EducationProvider, NotificationSink, NotifyError, ProviderError,
    TreasuryProvider,
};
use crate::registry::{RegistryBuilder, TechRegistry};
use crate::tech::{Branch, Technology};

// ===========================================================================
// Definition helpers
// ===========================================================================

/// A minimal technology whose name equals its id.
pub fn tech(id: &str, branch: Branch, tier: u8, cost: f64) -> Technology {
    Technology::new(id, id, branch, tier, cost)
}

/// Builds a registry from definitions, panicking on validation errors.
pub fn build_registry<I>(techs: I) -> TechRegistry
where
    I: IntoIterator<Item = Technology>,
{
    let mut builder = RegistryBuilder::new();
    for tech in techs {
        builder.register(tech).unwrap();
    }
    builder.build().unwrap()
}

// ===========================================================================
// Provider doubles
// ===========================================================================

/// Treasury backed by a plain map. Nations must be seeded; unknown nations
/// report `EntityNotFound` like a real provider would.
#[derive(Debug, Default)]
pub struct MapTreasury {
    balances: Mutex<HashMap<NationId, f64>>,
}

impl MapTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, nation: impl Into<NationId>, amount: f64) -> Self {
        self.set(nation, amount);
        self
    }

    pub fn set(&self, nation: impl Into<NationId>, amount: f64) {
        self.balances.lock().unwrap().insert(nation.into(), amount);
    }
}

impl TreasuryProvider for MapTreasury {
    fn balance(&self, nation: &NationId) -> Result<f64, ProviderError> {
        self.balances
            .lock()
            .unwrap()
            .get(nation)
            .copied()
            .ok_or_else(|| ProviderError::EntityNotFound(nation.clone()))
    }

    fn deduct(&self, nation: &NationId, amount: f64) -> Result<(), ProviderError> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances
            .get_mut(nation)
            .ok_or_else(|| ProviderError::EntityNotFound(nation.clone()))?;
        if *balance < amount {
            return Err(ProviderError::InsufficientFunds {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }
}

/// Education levels backed by a plain map.
#[derive(Debug, Default)]
pub struct MapEducation {
    levels: Mutex<HashMap<NationId, f64>>,
}

impl MapEducation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(self, nation: impl Into<NationId>, level: f64) -> Self {
        self.set(nation, level);
        self
    }

    pub fn set(&self, nation: impl Into<NationId>, level: f64) {
        self.levels.lock().unwrap().insert(nation.into(), level);
    }
}

impl EducationProvider for MapEducation {
    fn level(&self, nation: &NationId) -> Result<f64, ProviderError> {
        self.levels
            .lock()
            .unwrap()
            .get(nation)
            .copied()
            .ok_or_else(|| ProviderError::EntityNotFound(nation.clone()))
    }
}

/// Capability set that tests can toggle at runtime, e.g. to simulate an
/// extension appearing or disappearing mid-session.
#[derive(Debug, Default)]
pub struct ToggleCapabilities {
    available: Mutex<HashSet<CapabilityId>>,
}

impl ToggleCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_available(self, capability: impl Into<CapabilityId>) -> Self {
        self.enable(capability);
        self
    }

    pub fn enable(&self, capability: impl Into<CapabilityId>) {
        self.available.lock().unwrap().insert(capability.into());
    }

    pub fn disable(&self, capability: &str) {
        self.available.lock().unwrap().remove(capability);
    }
}

impl CapabilityProvider for ToggleCapabilities {
    fn is_available(&self, capability: &CapabilityId) -> bool {
        self.available.lock().unwrap().contains(capability)
    }
}

/// Sink that records every completion, optionally failing on demand to
/// exercise the fire-and-forget contract.
#[derive(Debug, Default)]
pub struct RecordingSink {
    completed: Mutex<Vec<(NationId, TechId)>>,
    failing: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn completions(&self) -> Vec<(NationId, TechId)> {
        self.completed.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn research_completed(&self, nation: &NationId, tech: &Technology) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError("sink offline".to_string()));
        }
        self.completed
            .lock()
            .unwrap()
            .push((nation.clone(), tech.id.clone()));
        Ok(())
    }
}
