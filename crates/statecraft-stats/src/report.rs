//! Per-nation and cross-nation progression reports.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use statecraft_core::provider::CapabilityProvider;
use statecraft_core::registry::TechRegistry;
use statecraft_core::tech::{Branch, Stage};
use statecraft_core::{NationId, TechId};
use statecraft_store::ProgressLedger;

use crate::bonus::{bonus_multiplier, bonus_summary, is_bonus_active};
use crate::stage::{
    BranchProgress, StageProgress, TierProgress, branch_progress, nation_stage, stage_progress,
    tier_progress,
};

/// Read-only statistics facade over a catalog and a progress ledger.
/// Shares the same snapshots the research path reads, so reports never
/// block an unlock.
#[derive(Debug, Clone)]
pub struct ProgressStats {
    registry: Arc<TechRegistry>,
    ledger: Arc<ProgressLedger>,
    capabilities: Arc<dyn CapabilityProvider>,
}

/// Everything worth showing on one nation's research screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationReport {
    pub nation: NationId,
    /// Catalog technologies the nation has unlocked.
    pub unlocked: usize,
    /// Technologies the catalog offers in total.
    pub catalog_size: usize,
    pub completion_percent: f64,
    /// Stage of the highest-tier unlocked technology.
    pub stage: Stage,
    pub stages: Vec<StageProgress>,
    pub branches: Vec<BranchProgress>,
    pub tiers: Vec<TierProgress>,
    /// Per bonus name, the sum of `multiplier - 1` over active unlocked
    /// technologies. A rough tally of amassed advantage; the engine's
    /// effective multiplier stays the multiplicative aggregate.
    pub bonus_totals: BTreeMap<String, f64>,
    /// Unlocked technologies gated on a required capability.
    pub required_capability_unlocks: usize,
    /// Unlocked technologies with an optional capability.
    pub optional_capability_unlocks: usize,
    pub power_score: f64,
}

/// One technology's spread across all nations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechPopularity {
    pub tech: TechId,
    /// Nations that have unlocked it.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationPower {
    pub nation: NationId,
    pub power: f64,
}

/// The world-wide progression picture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalReport {
    /// Nations with at least one stored record.
    pub nations: usize,
    pub total_unlocks: usize,
    pub average_unlocks: f64,
    pub branch_unlocks: BTreeMap<Branch, usize>,
    pub stage_unlocks: BTreeMap<Stage, usize>,
    /// Technologies by how many nations hold them, most widespread first.
    pub most_researched: Vec<TechPopularity>,
    /// Nations by power score, strongest first.
    pub top_nations: Vec<NationPower>,
}

impl ProgressStats {
    pub fn new(
        registry: Arc<TechRegistry>,
        ledger: Arc<ProgressLedger>,
        capabilities: Arc<dyn CapabilityProvider>,
    ) -> Self {
        Self {
            registry,
            ledger,
            capabilities,
        }
    }

    /// Effective multiplier for one bonus name. See
    /// [`bonus_multiplier`](crate::bonus::bonus_multiplier).
    pub fn bonus(&self, nation: &NationId, name: &str) -> f64 {
        let unlocked = self.ledger.unlocked(nation);
        bonus_multiplier(
            &self.registry,
            self.capabilities.as_ref(),
            &unlocked,
            name,
        )
    }

    /// Every effective multiplier the nation currently holds.
    pub fn bonus_summary(&self, nation: &NationId) -> BTreeMap<String, f64> {
        let unlocked = self.ledger.unlocked(nation);
        bonus_summary(&self.registry, self.capabilities.as_ref(), &unlocked)
    }

    pub fn nation_stage(&self, nation: &NationId) -> Stage {
        nation_stage(&self.registry, &self.ledger.unlocked(nation))
    }

    /// Per-stage completion, independent per stage.
    pub fn stage_progress(&self, nation: &NationId) -> Vec<StageProgress> {
        stage_progress(&self.registry, &self.ledger.unlocked(nation))
    }

    /// Completion within a single branch.
    pub fn branch_progress(&self, nation: &NationId, branch: Branch) -> BranchProgress {
        let unlocked = self.ledger.unlocked(nation);
        BranchProgress {
            branch,
            unlocked: self
                .registry
                .by_branch(branch)
                .filter(|t| unlocked.contains(t.id.as_str()))
                .count(),
            total: self.registry.by_branch(branch).count(),
        }
    }

    /// Rates everything the nation has researched: each unlocked
    /// technology is worth ten points per tier plus five per bonus
    /// multiplier point. Dormant capabilities do not lower the score;
    /// power rates what was researched, not what is active right now.
    pub fn power_score(&self, nation: &NationId) -> f64 {
        power_of(&self.registry, &self.ledger.unlocked(nation))
    }

    pub fn nation_report(&self, nation: &NationId) -> NationReport {
        let unlocked = self.ledger.unlocked(nation);
        let catalog_size = self.registry.len();

        let mut unlocked_count = 0;
        let mut required_capability_unlocks = 0;
        let mut optional_capability_unlocks = 0;
        let mut bonus_totals: BTreeMap<String, f64> = BTreeMap::new();
        for tech in self
            .registry
            .all()
            .filter(|t| unlocked.contains(t.id.as_str()))
        {
            unlocked_count += 1;
            if tech.required_capability.is_some() {
                if tech.capability_optional {
                    optional_capability_unlocks += 1;
                } else {
                    required_capability_unlocks += 1;
                }
            }
            if is_bonus_active(tech, self.capabilities.as_ref()) {
                for (name, multiplier) in &tech.bonuses {
                    *bonus_totals.entry(name.clone()).or_insert(0.0) += multiplier - 1.0;
                }
            }
        }

        NationReport {
            nation: nation.clone(),
            unlocked: unlocked_count,
            catalog_size,
            completion_percent: if catalog_size == 0 {
                0.0
            } else {
                unlocked_count as f64 / catalog_size as f64 * 100.0
            },
            stage: nation_stage(&self.registry, &unlocked),
            stages: stage_progress(&self.registry, &unlocked),
            branches: branch_progress(&self.registry, &unlocked),
            tiers: tier_progress(&self.registry, &unlocked),
            bonus_totals,
            required_capability_unlocks,
            optional_capability_unlocks,
            power_score: power_of(&self.registry, &unlocked),
        }
    }

    pub fn global_report(&self) -> GlobalReport {
        let nations = self.ledger.nations();

        let mut total_unlocks = 0;
        let mut branch_unlocks: BTreeMap<Branch, usize> = BTreeMap::new();
        let mut stage_unlocks: BTreeMap<Stage, usize> = BTreeMap::new();
        let mut per_tech: HashMap<TechId, usize> = HashMap::new();
        let mut top_nations = Vec::with_capacity(nations.len());

        for nation in &nations {
            let unlocked = self.ledger.unlocked(nation);
            for tech in self
                .registry
                .all()
                .filter(|t| unlocked.contains(t.id.as_str()))
            {
                total_unlocks += 1;
                *branch_unlocks.entry(tech.branch).or_insert(0) += 1;
                *stage_unlocks.entry(tech.stage()).or_insert(0) += 1;
                *per_tech.entry(tech.id.clone()).or_insert(0) += 1;
            }
            top_nations.push(NationPower {
                nation: nation.clone(),
                power: power_of(&self.registry, &unlocked),
            });
        }

        let mut most_researched: Vec<TechPopularity> = per_tech
            .into_iter()
            .map(|(tech, count)| TechPopularity { tech, count })
            .collect();
        most_researched.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tech.cmp(&b.tech)));

        top_nations.sort_by(|a, b| {
            b.power
                .total_cmp(&a.power)
                .then_with(|| a.nation.cmp(&b.nation))
        });

        GlobalReport {
            nations: nations.len(),
            total_unlocks,
            average_unlocks: if nations.is_empty() {
                0.0
            } else {
                total_unlocks as f64 / nations.len() as f64
            },
            branch_unlocks,
            stage_unlocks,
            most_researched,
            top_nations,
        }
    }
}

fn power_of(registry: &TechRegistry, unlocked: &HashSet<TechId>) -> f64 {
    registry
        .all()
        .filter(|t| unlocked.contains(t.id.as_str()))
        .map(|t| f64::from(t.tier) * 10.0 + t.bonuses.values().sum::<f64>() * 5.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use statecraft_core::test_utils::{ToggleCapabilities, build_registry, tech};
    use statecraft_store::{MemoryStore, ProgressStore};

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn fixture_registry() -> Arc<TechRegistry> {
        Arc::new(build_registry([
            tech("basic_military", Branch::Military, 1, 5000.0).with_bonus("warStrength", 1.1),
            tech("fortifications", Branch::Military, 2, 8000.0)
                .requires(["basic_military"])
                .with_bonus("defenseBonus", 1.3),
            tech("artillery", Branch::Military, 3, 20000.0)
                .requires(["fortifications"])
                .with_capability("ballistix")
                .with_bonus("siegeStrength", 1.5),
            tech("basic_trade", Branch::Economy, 1, 3000.0).with_bonus("tradeBonus", 1.15),
        ]))
    }

    fn fixture(store: MemoryStore) -> (ProgressStats, Arc<ToggleCapabilities>) {
        let capabilities = Arc::new(ToggleCapabilities::new());
        let ledger = Arc::new(
            ProgressLedger::open(Arc::new(store) as Arc<dyn ProgressStore>).unwrap(),
        );
        let stats = ProgressStats::new(
            fixture_registry(),
            ledger,
            Arc::clone(&capabilities) as Arc<dyn CapabilityProvider>,
        );
        (stats, capabilities)
    }

    // -----------------------------------------------------------------------
    // Test 1: Nation report counts, percentages and stage
    // -----------------------------------------------------------------------

    #[test]
    fn nation_report_counts() {
        let store = MemoryStore::new()
            .with_record("avalon", ["basic_military", "fortifications", "artillery"]);
        let (stats, capabilities) = fixture(store);
        capabilities.enable("ballistix");

        let report = stats.nation_report(&NationId::new("avalon"));

        assert_eq!(report.unlocked, 3);
        assert_eq!(report.catalog_size, 4);
        assert!(close(report.completion_percent, 75.0));
        assert_eq!(report.stage, Stage::Mid);
        assert_eq!(report.required_capability_unlocks, 1);
        assert_eq!(report.optional_capability_unlocks, 0);

        assert_eq!(report.tiers.len(), 5);
        assert_eq!(report.tiers[0], TierProgress { tier: 1, unlocked: 1, total: 2 });
        assert_eq!(report.tiers[2], TierProgress { tier: 3, unlocked: 1, total: 1 });
        assert_eq!(report.tiers[4].total, 0);

        // Sum of multiplier - 1 per bonus name.
        assert!(close(report.bonus_totals["warStrength"], 0.1));
        assert!(close(report.bonus_totals["defenseBonus"], 0.3));
        assert!(close(report.bonus_totals["siegeStrength"], 0.5));
    }

    // -----------------------------------------------------------------------
    // Test 2: Dormant capabilities drop out of bonus totals, not power
    // -----------------------------------------------------------------------

    #[test]
    fn dormant_capability_excluded_from_totals_but_not_power() {
        let store = MemoryStore::new()
            .with_record("avalon", ["basic_military", "fortifications", "artillery"]);
        let (stats, _capabilities) = fixture(store);
        let avalon = NationId::new("avalon");

        let report = stats.nation_report(&avalon);
        assert!(!report.bonus_totals.contains_key("siegeStrength"));

        // 1*10 + 1.1*5, 2*10 + 1.3*5, 3*10 + 1.5*5.
        let expected = 15.5 + 26.5 + 37.5;
        assert!(close(report.power_score, expected));
        assert!(close(stats.power_score(&avalon), expected));
    }

    // -----------------------------------------------------------------------
    // Test 3: The bonus facade mirrors the aggregation functions
    // -----------------------------------------------------------------------

    #[test]
    fn bonus_facade_matches_aggregation() {
        let store = MemoryStore::new().with_record("avalon", ["basic_military", "basic_trade"]);
        let (stats, _capabilities) = fixture(store);
        let avalon = NationId::new("avalon");

        assert!(close(stats.bonus(&avalon, "warStrength"), 1.1));
        assert_eq!(stats.bonus(&avalon, "siegeStrength"), 1.0);

        let summary = stats.bonus_summary(&avalon);
        assert_eq!(summary.len(), 2);
        assert!(close(summary["tradeBonus"], 1.15));

        assert_eq!(stats.nation_stage(&avalon), Stage::Early);

        let stages = stats.stage_progress(&avalon);
        assert_eq!(stages[0], StageProgress { stage: Stage::Early, unlocked: 2, total: 3 });

        let military = stats.branch_progress(&avalon, Branch::Military);
        assert_eq!(military, BranchProgress { branch: Branch::Military, unlocked: 1, total: 3 });
        let science = stats.branch_progress(&avalon, Branch::Science);
        assert_eq!(science.total, 0);
    }

    // -----------------------------------------------------------------------
    // Test 4: Global report ranks technologies and nations
    // -----------------------------------------------------------------------

    #[test]
    fn global_report_ranks() {
        let store = MemoryStore::new()
            .with_record("avalon", ["basic_military", "fortifications"])
            .with_record("borduria", ["basic_military"])
            .with_record("cascadia", ["basic_trade"]);
        let (stats, _capabilities) = fixture(store);

        let report = stats.global_report();

        assert_eq!(report.nations, 3);
        assert_eq!(report.total_unlocks, 4);
        assert!(close(report.average_unlocks, 4.0 / 3.0));
        assert_eq!(report.branch_unlocks[&Branch::Military], 3);
        assert_eq!(report.branch_unlocks[&Branch::Economy], 1);
        assert_eq!(report.stage_unlocks[&Stage::Early], 4);

        assert_eq!(
            report.most_researched,
            vec![
                TechPopularity { tech: TechId::new("basic_military"), count: 2 },
                TechPopularity { tech: TechId::new("basic_trade"), count: 1 },
                TechPopularity { tech: TechId::new("fortifications"), count: 1 },
            ]
        );

        // basic_trade alone outscores basic_military alone on bonuses.
        let order: Vec<&str> = report
            .top_nations
            .iter()
            .map(|n| n.nation.as_str())
            .collect();
        assert_eq!(order, ["avalon", "cascadia", "borduria"]);
        assert!(report.top_nations[0].power > report.top_nations[1].power);
    }

    // -----------------------------------------------------------------------
    // Test 5: An empty world produces an empty report
    // -----------------------------------------------------------------------

    #[test]
    fn empty_world_report() {
        let (stats, _capabilities) = fixture(MemoryStore::new());

        let report = stats.global_report();

        assert_eq!(report.nations, 0);
        assert_eq!(report.total_unlocks, 0);
        assert_eq!(report.average_unlocks, 0.0);
        assert!(report.most_researched.is_empty());
        assert!(report.top_nations.is_empty());
    }

    // -----------------------------------------------------------------------
    // Test 6: Reports serialize for dashboards
    // -----------------------------------------------------------------------

    #[test]
    fn reports_serialize_to_json() {
        let store = MemoryStore::new().with_record("avalon", ["basic_military"]);
        let (stats, _capabilities) = fixture(store);

        let value = serde_json::to_value(stats.nation_report(&NationId::new("avalon"))).unwrap();
        assert_eq!(value["nation"], "avalon");
        assert_eq!(value["unlocked"], 1);
        assert_eq!(value["stage"], "early");

        let value = serde_json::to_value(stats.global_report()).unwrap();
        assert_eq!(value["nations"], 1);
        assert_eq!(value["branch_unlocks"]["military"], 1);
    }
}
