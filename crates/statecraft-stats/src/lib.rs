//! Aggregate views over technology progression: effective bonus
//! multipliers, stage and branch progress, and per-nation / cross-nation
//! reports.
//!
//! Everything here is read-only. The calculators take snapshots from the
//! same [`ProgressLedger`](statecraft_store::ProgressLedger) the research
//! path writes, so a report reflects whatever was unlocked at the moment
//! it was built and nothing blocks while one is assembled.

pub mod bonus;
pub mod report;
pub mod stage;

pub use bonus::{bonus_multiplier, bonus_summary, is_bonus_active};
pub use report::{GlobalReport, NationPower, NationReport, ProgressStats, TechPopularity};
pub use stage::{
    BranchProgress, StageProgress, TierProgress, branch_progress, nation_stage, stage_progress,
    tier_progress,
};
