//! Statecraft Core -- the progression model for nation-scale strategy games.
//!
//! This crate provides the technology catalog, its prerequisite graph, the
//! provider seams to the surrounding game (treasury, education, capability
//! detection, notification), and the progress events other crates emit. The
//! mutation path itself lives in `statecraft-research`; derived values live
//! in `statecraft-stats`.
//!
//! # Catalog Lifecycle
//!
//! Technology definitions are collected through a [`registry::RegistryBuilder`]
//! and frozen into an immutable [`registry::TechRegistry`]:
//!
//! ```rust,ignore
//! let mut builder = RegistryBuilder::new();
//! builder.register(basic_military)?;
//! builder.register(fortifications)?;
//! let registry = builder.build()?; // validates references and acyclicity
//! ```
//!
//! `build` is the single validation point: duplicate ids are rejected at
//! `register`, unknown prerequisites, prerequisite cycles, out-of-range
//! tiers, and non-positive bonus multipliers are rejected at `build`. After
//! that the registry is read-only and safe to share across threads without
//! synchronization.
//!
//! # Key Types
//!
//! - [`tech::Technology`] -- One unlockable node: branch, tier, cost,
//!   prerequisites, bonus multipliers, optional capability gate.
//! - [`tech::Branch`] / [`tech::Stage`] -- Closed enums for the five
//!   technology branches and the EARLY/MID/LATE progression stages.
//! - [`registry::TechRegistry`] -- Immutable catalog with branch, tier,
//!   stage, and topological-order queries.
//! - [`provider::TreasuryProvider`] (and friends) -- Contracts the engine
//!   expects the host game to implement.
//! - [`event::ProgressEvent`] -- Buffered events drained by the embedder.

pub mod event;
pub mod id;
pub mod provider;
pub mod registry;
pub mod tech;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use event::ProgressEvent;
pub use id::{CapabilityId, NationId, TechId};
pub use provider::{
    CapabilityProvider, EducationProvider, NotificationSink, ProviderError, TreasuryProvider,
};
pub use registry::{RegistryBuilder, RegistryError, TechRegistry};
pub use tech::{Branch, Stage, Technology};
