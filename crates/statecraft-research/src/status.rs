//! Research eligibility projection and attempt results.

use serde::Serialize;

use statecraft_core::{CapabilityId, NationId, TechId};

/// Read-only snapshot of every eligibility gate for one (nation,
/// technology) pair. Produced by the resolver; the flags are all evaluated
/// against the same moment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResearchStatus {
    /// Whether the nation has already unlocked the technology.
    pub unlocked: bool,

    /// Prerequisite ids not yet in the nation's unlocked set, in the order
    /// the technology declares them.
    pub missing_prerequisites: Vec<TechId>,

    /// True iff `missing_prerequisites` is empty.
    pub prerequisites_met: bool,

    /// True if the technology needs no capability, the capability is
    /// optional, or it is currently available.
    pub capability_met: bool,

    /// Education threshold for the technology's tier.
    pub required_education: f64,

    /// The nation's education level as reported by the provider.
    pub current_education: f64,

    /// True iff `current_education >= required_education`.
    pub education_met: bool,

    /// The nation's treasury balance as reported by the provider.
    pub treasury: f64,

    /// True iff the treasury covers the research cost.
    pub treasury_enough: bool,
}

impl ResearchStatus {
    /// Whether a research attempt would pass every gate right now.
    pub fn can_research(&self) -> bool {
        !self.unlocked
            && self.prerequisites_met
            && self.capability_met
            && self.education_met
            && self.treasury_enough
    }
}

fn join_ids(ids: &[TechId]) -> String {
    ids.iter()
        .map(TechId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a research attempt was refused. Structured results, not errors in
/// the panicking sense; every variant leaves all state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResearchDenial {
    #[error("unknown technology: {0}")]
    TechNotFound(TechId),

    #[error("already unlocked: {0}")]
    AlreadyUnlocked(TechId),

    #[error("missing prerequisites: {}", join_ids(.missing))]
    PrerequisitesNotMet { missing: Vec<TechId> },

    #[error("requires capability: {0}")]
    CapabilityNotMet(CapabilityId),

    #[error("education too low: need {required}, have {current}")]
    InsufficientEducation { required: f64, current: f64 },

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("unknown nation: {0}")]
    EntityNotFound(NationId),
}

/// What an attempt did.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchOutcome {
    /// The technology was paid for and unlocked.
    Unlocked { cost_paid: f64 },
    /// Nothing changed; the denial says why.
    Denied(ResearchDenial),
}

/// Outcome of [`crate::ResearchResolver::attempt_research`], with the
/// status snapshot the decision was based on. For `TechNotFound` and
/// `EntityNotFound` the snapshot is zeroed, since there was nothing to
/// evaluate against.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchResult {
    /// The technology the attempt was about, as requested by the caller.
    pub tech: TechId,
    pub outcome: ResearchOutcome,
    pub status: ResearchStatus,
}

impl ResearchResult {
    pub fn success(&self) -> bool {
        matches!(self.outcome, ResearchOutcome::Unlocked { .. })
    }

    /// The denial, if the attempt was refused.
    pub fn denial(&self) -> Option<&ResearchDenial> {
        match &self.outcome {
            ResearchOutcome::Unlocked { .. } => None,
            ResearchOutcome::Denied(denial) => Some(denial),
        }
    }

    /// Human-readable one-liner for chat feedback and logs.
    pub fn message(&self) -> String {
        match &self.outcome {
            ResearchOutcome::Unlocked { cost_paid } => {
                format!("research complete: {} (cost {cost_paid})", self.tech)
            }
            ResearchOutcome::Denied(denial) => {
                format!("cannot research {}: {denial}", self.tech)
            }
        }
    }
}

/// Menu-facing state of one (nation, technology) pair. `Unlocked` is
/// terminal; there is no path out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TechState {
    /// Some gate other than payment timing is closed: prerequisites,
    /// capability, education, or treasury.
    Locked,
    /// `can_research()` holds; an attempt right now would succeed.
    Available,
    /// Already researched.
    Unlocked,
}
