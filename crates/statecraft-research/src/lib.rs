//! Statecraft Research -- the single mutation point for nation progression.
//!
//! Every unlock flows through [`resolver::ResearchResolver::attempt_research`],
//! which evaluates all eligibility gates and performs the pay-then-unlock
//! transaction inside the nation's critical section:
//!
//! 1. Resolve the technology (unknown id denies immediately).
//! 2. Recompute [`status::ResearchStatus`] fresh, inside the lock.
//! 3. Deny on: already unlocked, missing prerequisites, absent capability,
//!    low education, low treasury. Denials have no side effects.
//! 4. Otherwise deduct the cost, insert into the unlocked set, persist, and
//!    emit a [`statecraft_core::ProgressEvent`].
//!
//! Denials are ordinary values carried in [`status::ResearchResult`], never
//! panics; see `ResearchDenial` for the full taxonomy. The resolver also
//! answers the read-only queries menus need (available, researchable, and
//! next-tier technologies, and the per-technology LOCKED/AVAILABLE/UNLOCKED
//! state) and hosts the periodic maintenance hook reserved for time-gated
//! research.

pub mod resolver;
pub mod status;

pub use resolver::ResearchResolver;
pub use status::{ResearchDenial, ResearchOutcome, ResearchResult, ResearchStatus, TechState};
