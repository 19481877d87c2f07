//! Technology definitions: branches, progression stages, and the
//! [`Technology`] struct itself.
//!
//! Definitions are immutable once registered. Runtime progression state
//! (which nation has unlocked what) lives in `statecraft-store`; this module
//! only describes the catalog entries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::{CapabilityId, TechId};

/// Education threshold per tier. A tier-N technology requires a collective
/// education level of `N * EDUCATION_PER_TIER`.
pub const EDUCATION_PER_TIER: f64 = 10.0;

/// Lowest valid technology tier.
pub const MIN_TIER: u8 = 1;

/// Highest valid technology tier.
pub const MAX_TIER: u8 = 5;

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// A thematic grouping of technologies. Closed set; data files using any
/// other branch name fail at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Military,
    Industry,
    Economy,
    Infrastructure,
    Science,
}

impl Branch {
    /// All branches, in display order.
    pub const ALL: [Branch; 5] = [
        Branch::Military,
        Branch::Industry,
        Branch::Economy,
        Branch::Infrastructure,
        Branch::Science,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Military => "military",
            Branch::Industry => "industry",
            Branch::Economy => "economy",
            Branch::Infrastructure => "infrastructure",
            Branch::Science => "science",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for branch names outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown branch: {0}")]
pub struct UnknownBranch(pub String);

impl FromStr for Branch {
    type Err = UnknownBranch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "military" => Ok(Branch::Military),
            "industry" => Ok(Branch::Industry),
            "economy" => Ok(Branch::Economy),
            "infrastructure" => Ok(Branch::Infrastructure),
            "science" => Ok(Branch::Science),
            other => Err(UnknownBranch(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Coarse progression label derived from tier. Never stored on a
/// [`Technology`]; always recomputed from the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Tiers 1-2.
    Early,
    /// Tiers 3-4.
    Mid,
    /// Tier 5.
    Late,
}

impl Stage {
    /// All stages, in progression order.
    pub const ALL: [Stage; 3] = [Stage::Early, Stage::Mid, Stage::Late];

    /// The stage a tier belongs to. Tiers above the valid range map to
    /// `Late`; the registry rejects such tiers before they ever reach here.
    pub fn from_tier(tier: u8) -> Stage {
        match tier {
            0..=2 => Stage::Early,
            3..=4 => Stage::Mid,
            _ => Stage::Late,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Early => "early",
            Stage::Mid => "mid",
            Stage::Late => "late",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Technology definition
// ---------------------------------------------------------------------------

/// A technology that a nation can research. Registered at startup; immutable
/// after the registry is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    /// Unique identifier.
    pub id: TechId,

    /// Human-readable name.
    pub name: String,

    /// Longer description for menus and notifications.
    #[serde(default)]
    pub description: String,

    /// Which branch this technology belongs to.
    pub branch: Branch,

    /// Difficulty/progression level, 1 through 5.
    pub tier: u8,

    /// Technologies that must be unlocked before this one can be researched.
    #[serde(default)]
    pub prerequisites: Vec<TechId>,

    /// Treasury cost paid on unlock, in currency units. Non-negative.
    pub research_cost: f64,

    /// Nominal research duration. Informational only; the resolver unlocks
    /// instantly on payment. Reserved for future time-gated research.
    #[serde(default)]
    pub research_time_hours: f64,

    /// Bonus-name to multiplier map, each multiplier > 0. Ordered so that
    /// reports and serialized forms are stable.
    #[serde(default)]
    pub bonuses: BTreeMap<String, f64>,

    /// Capability that gates this technology, if any.
    #[serde(default)]
    pub required_capability: Option<CapabilityId>,

    /// If true, the technology can be unlocked while the capability is
    /// absent. Its bonuses still only apply while the capability is
    /// available.
    #[serde(default)]
    pub capability_optional: bool,
}

impl Technology {
    /// A minimal definition: no prerequisites, no bonuses, no capability
    /// gate. Chain the `with_*`/`requires` helpers to fill in the rest.
    pub fn new(
        id: impl Into<TechId>,
        name: impl Into<String>,
        branch: Branch,
        tier: u8,
        research_cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            branch,
            tier,
            prerequisites: Vec::new(),
            research_cost,
            research_time_hours: 0.0,
            bonuses: BTreeMap::new(),
            required_capability: None,
            capability_optional: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_research_time(mut self, hours: f64) -> Self {
        self.research_time_hours = hours;
        self
    }

    /// Adds prerequisite technology ids.
    pub fn requires<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TechId>,
    {
        self.prerequisites.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds one bonus multiplier.
    pub fn with_bonus(mut self, bonus: impl Into<String>, multiplier: f64) -> Self {
        self.bonuses.insert(bonus.into(), multiplier);
        self
    }

    /// Gates the technology behind `capability`; it cannot be unlocked while
    /// the capability is absent.
    pub fn with_capability(mut self, capability: impl Into<CapabilityId>) -> Self {
        self.required_capability = Some(capability.into());
        self.capability_optional = false;
        self
    }

    /// Associates `capability` but allows unlocking without it. The bonuses
    /// still only apply while the capability is available.
    pub fn with_optional_capability(mut self, capability: impl Into<CapabilityId>) -> Self {
        self.required_capability = Some(capability.into());
        self.capability_optional = true;
        self
    }

    /// The stage this technology belongs to. Pure function of tier.
    pub fn stage(&self) -> Stage {
        Stage::from_tier(self.tier)
    }

    /// Education level a nation needs before researching this technology.
    pub fn required_education(&self) -> f64 {
        f64::from(self.tier) * EDUCATION_PER_TIER
    }

    /// The multiplier this technology contributes for `bonus`, if any.
    pub fn bonus(&self, bonus: &str) -> Option<f64> {
        self.bonuses.get(bonus).copied()
    }
}
