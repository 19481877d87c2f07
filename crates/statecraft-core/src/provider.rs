//! Contracts the engine expects the host game to implement.
//!
//! The engine never detects capabilities, funds treasuries, or accumulates
//! education itself; it queries these providers. All providers must be safe
//! to call from any thread, because research attempts for unrelated nations
//! run concurrently.

use std::fmt;

use crate::id::{CapabilityId, NationId};
use crate::tech::Technology;

/// Failure reported by a treasury or education provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The provider does not know this entity.
    #[error("unknown entity: {0}")]
    EntityNotFound(NationId),

    /// A deduction was refused because the balance is too low. Carries the
    /// balance the provider saw at the moment of refusal.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },
}

/// Access to a nation's treasury.
///
/// `deduct` must itself check the balance before withdrawing: the resolver
/// serializes research attempts per nation, but other game systems may spend
/// from the same treasury at any time.
pub trait TreasuryProvider: fmt::Debug + Send + Sync {
    fn balance(&self, nation: &NationId) -> Result<f64, ProviderError>;

    fn deduct(&self, nation: &NationId, amount: f64) -> Result<(), ProviderError>;
}

/// Access to a nation's collective education level.
pub trait EducationProvider: fmt::Debug + Send + Sync {
    fn level(&self, nation: &NationId) -> Result<f64, ProviderError>;
}

/// Answers whether an externally-detected capability is currently present.
/// Availability may change over the lifetime of the process; callers must
/// not cache answers.
pub trait CapabilityProvider: fmt::Debug + Send + Sync {
    fn is_available(&self, capability: &CapabilityId) -> bool;
}

/// Failure inside a notification sink. Reported by the sink, logged by the
/// resolver, and never rolls back the unlock that triggered it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Fire-and-forget announcement of a completed research, e.g. a broadcast
/// message or an achievement hook. Invoked outside the nation's critical
/// section, after the unlock is already durable.
pub trait NotificationSink: fmt::Debug + Send + Sync {
    fn research_completed(&self, nation: &NationId, tech: &Technology) -> Result<(), NotifyError>;
}
