//! Stage and branch progress.

use std::collections::HashSet;

use serde::Serialize;

use statecraft_core::TechId;
use statecraft_core::registry::TechRegistry;
use statecraft_core::tech::{Branch, Stage};

/// How far a nation is through one stage of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageProgress {
    pub stage: Stage,
    /// Unlocked technologies in this stage.
    pub unlocked: usize,
    /// Technologies the catalog has in this stage.
    pub total: usize,
}

impl StageProgress {
    pub fn percent(&self) -> f64 {
        percent(self.unlocked, self.total)
    }
}

/// How far a nation is through one branch of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchProgress {
    pub branch: Branch,
    pub unlocked: usize,
    pub total: usize,
}

impl BranchProgress {
    pub fn percent(&self) -> f64 {
        percent(self.unlocked, self.total)
    }
}

/// How far a nation is through one tier of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierProgress {
    pub tier: u8,
    pub unlocked: usize,
    pub total: usize,
}

impl TierProgress {
    pub fn percent(&self) -> f64 {
        percent(self.unlocked, self.total)
    }
}

fn percent(unlocked: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        unlocked as f64 / total as f64 * 100.0
    }
}

/// The stage of the nation's highest-tier unlocked technology. A nation
/// with nothing unlocked is at the start of [`Stage::Early`].
pub fn nation_stage(registry: &TechRegistry, unlocked: &HashSet<TechId>) -> Stage {
    let max_tier = registry
        .all()
        .filter(|t| unlocked.contains(t.id.as_str()))
        .map(|t| t.tier)
        .max()
        .unwrap_or(0);
    Stage::from_tier(max_tier)
}

/// Progress through every stage, in `Stage::ALL` order. Stages the catalog
/// does not populate appear with a zero total.
pub fn stage_progress(registry: &TechRegistry, unlocked: &HashSet<TechId>) -> Vec<StageProgress> {
    Stage::ALL
        .into_iter()
        .map(|stage| StageProgress {
            stage,
            unlocked: registry
                .by_stage(stage)
                .filter(|t| unlocked.contains(t.id.as_str()))
                .count(),
            total: registry.by_stage(stage).count(),
        })
        .collect()
}

/// Progress through every branch, in `Branch::ALL` order.
pub fn branch_progress(registry: &TechRegistry, unlocked: &HashSet<TechId>) -> Vec<BranchProgress> {
    Branch::ALL
        .into_iter()
        .map(|branch| BranchProgress {
            branch,
            unlocked: registry
                .by_branch(branch)
                .filter(|t| unlocked.contains(t.id.as_str()))
                .count(),
            total: registry.by_branch(branch).count(),
        })
        .collect()
}

/// Progress through each tier 1 to 5.
pub fn tier_progress(registry: &TechRegistry, unlocked: &HashSet<TechId>) -> Vec<TierProgress> {
    (1..=5)
        .map(|tier| TierProgress {
            tier,
            unlocked: registry
                .by_tier(tier)
                .filter(|t| unlocked.contains(t.id.as_str()))
                .count(),
            total: registry.by_tier(tier).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use statecraft_core::test_utils::{build_registry, tech};

    use super::*;

    fn fixture() -> TechRegistry {
        build_registry([
            tech("basic_military", Branch::Military, 1, 5000.0),
            tech("basic_trade", Branch::Economy, 1, 3000.0),
            tech("fortifications", Branch::Military, 2, 8000.0).requires(["basic_military"]),
            tech("artillery", Branch::Military, 3, 20000.0).requires(["fortifications"]),
            tech("total_warfare", Branch::Military, 5, 50000.0).requires(["artillery"]),
        ])
    }

    fn unlocked(ids: &[&str]) -> HashSet<TechId> {
        ids.iter().map(|id| TechId::new(*id)).collect()
    }

    // -----------------------------------------------------------------------
    // Test 1: A fresh nation sits at the start of the early stage
    // -----------------------------------------------------------------------

    #[test]
    fn fresh_nation_is_early() {
        let registry = fixture();
        let none = HashSet::new();

        assert_eq!(nation_stage(&registry, &none), Stage::Early);
        for progress in stage_progress(&registry, &none) {
            assert_eq!(progress.unlocked, 0);
            assert_eq!(progress.percent(), 0.0);
        }
    }

    // -----------------------------------------------------------------------
    // Test 2: Nation stage follows the highest unlocked tier
    // -----------------------------------------------------------------------

    #[test]
    fn stage_follows_highest_tier() {
        let registry = fixture();

        assert_eq!(
            nation_stage(&registry, &unlocked(&["basic_military"])),
            Stage::Early
        );
        assert_eq!(
            nation_stage(&registry, &unlocked(&["basic_military", "artillery"])),
            Stage::Mid
        );
        assert_eq!(
            nation_stage(&registry, &unlocked(&["total_warfare"])),
            Stage::Late
        );
        // Ids the catalog no longer carries do not advance the stage.
        assert_eq!(
            nation_stage(&registry, &unlocked(&["removed_from_catalog"])),
            Stage::Early
        );
    }

    // -----------------------------------------------------------------------
    // Test 3: Stage progress counts unlocked against totals
    // -----------------------------------------------------------------------

    #[test]
    fn stage_progress_counts() {
        let registry = fixture();
        let progress = stage_progress(&registry, &unlocked(&["basic_military", "artillery"]));

        assert_eq!(
            progress,
            vec![
                StageProgress { stage: Stage::Early, unlocked: 1, total: 3 },
                StageProgress { stage: Stage::Mid, unlocked: 1, total: 1 },
                StageProgress { stage: Stage::Late, unlocked: 0, total: 1 },
            ]
        );
        assert_eq!(progress[1].percent(), 100.0);
    }

    // -----------------------------------------------------------------------
    // Test 4: Branch progress counts per branch
    // -----------------------------------------------------------------------

    #[test]
    fn branch_progress_counts() {
        let registry = fixture();
        let progress = branch_progress(&registry, &unlocked(&["basic_military", "basic_trade"]));

        let military = progress
            .iter()
            .find(|p| p.branch == Branch::Military)
            .unwrap();
        assert_eq!(military.unlocked, 1);
        assert_eq!(military.total, 4);
        assert_eq!(military.percent(), 25.0);

        let economy = progress.iter().find(|p| p.branch == Branch::Economy).unwrap();
        assert_eq!(economy.unlocked, 1);
        assert_eq!(economy.total, 1);

        let science = progress.iter().find(|p| p.branch == Branch::Science).unwrap();
        assert_eq!(science.total, 0);
        assert_eq!(science.percent(), 0.0);
    }

    // -----------------------------------------------------------------------
    // Test 5: Tier progress covers tiers 1 to 5, populated or not
    // -----------------------------------------------------------------------

    #[test]
    fn tier_progress_counts() {
        let registry = fixture();
        let progress = tier_progress(&registry, &unlocked(&["basic_military", "artillery"]));

        assert_eq!(
            progress,
            vec![
                TierProgress { tier: 1, unlocked: 1, total: 2 },
                TierProgress { tier: 2, unlocked: 0, total: 1 },
                TierProgress { tier: 3, unlocked: 1, total: 1 },
                TierProgress { tier: 4, unlocked: 0, total: 0 },
                TierProgress { tier: 5, unlocked: 0, total: 1 },
            ]
        );
        assert_eq!(progress[0].percent(), 50.0);
    }
}
