//! Progress events buffered by the resolver and drained by the embedder.
//!
//! Unlike the [`provider::NotificationSink`](crate::provider::NotificationSink)
//! callback, which fires immediately after an unlock, events accumulate in
//! the resolver until the host drains them, typically once per game loop
//! iteration. Dropping undrained events cannot affect progression state.

use serde::{Deserialize, Serialize};

use crate::id::{NationId, TechId};

/// A progression event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressEvent {
    /// A nation paid for and unlocked a technology.
    ResearchCompleted {
        nation: NationId,
        tech: TechId,
        /// Treasury amount actually deducted.
        cost_paid: f64,
    },
}

impl ProgressEvent {
    /// The nation this event concerns.
    pub fn nation(&self) -> &NationId {
        match self {
            ProgressEvent::ResearchCompleted { nation, .. } => nation,
        }
    }
}
