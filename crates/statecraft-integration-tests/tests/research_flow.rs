//! Campaign-style tests that drive nations through the stock catalog.
//!
//! Each test wires the full stack the way a host game would: the built-in
//! registry, a progress store, the resolver with provider doubles, and
//! the stats facade reading the same ledger. Scenarios follow real play:
//! paying for tiers, hitting capability and education walls, reopening a
//! save, comparing nations.

use std::sync::Arc;

use statecraft_core::provider::{
    CapabilityProvider, EducationProvider, NotificationSink, TreasuryProvider,
};
use statecraft_core::registry::TechRegistry;
use statecraft_core::test_utils::{MapEducation, MapTreasury, RecordingSink, ToggleCapabilities};
use statecraft_core::{NationId, ProgressEvent};
use statecraft_data::default_catalog;
use statecraft_research::{ResearchDenial, ResearchResolver};
use statecraft_stats::ProgressStats;
use statecraft_store::{MemoryStore, ProgressLedger, ProgressStore};

// ============================================================================
// World harness
// ============================================================================

struct World {
    resolver: ResearchResolver,
    stats: ProgressStats,
    treasury: Arc<MapTreasury>,
    education: Arc<MapEducation>,
    capabilities: Arc<ToggleCapabilities>,
    sink: Arc<RecordingSink>,
}

impl World {
    /// Stock catalog, in-memory store, one seeded nation.
    fn new(nation: &str, balance: f64, education_level: f64) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), nation, balance, education_level)
    }

    fn with_store(
        store: Arc<dyn ProgressStore>,
        nation: &str,
        balance: f64,
        education_level: f64,
    ) -> Self {
        let registry = Arc::new(default_catalog());
        let treasury = Arc::new(MapTreasury::new().with_balance(nation, balance));
        let education = Arc::new(MapEducation::new().with_level(nation, education_level));
        let capabilities = Arc::new(ToggleCapabilities::new());
        let sink = Arc::new(RecordingSink::new());
        let ledger = Arc::new(ProgressLedger::open(store).unwrap());

        let resolver = ResearchResolver::new(
            Arc::clone(&registry),
            Arc::clone(&ledger),
            Arc::clone(&treasury) as Arc<dyn TreasuryProvider>,
            Arc::clone(&education) as Arc<dyn EducationProvider>,
            Arc::clone(&capabilities) as Arc<dyn CapabilityProvider>,
        )
        .with_notifier(Arc::clone(&sink) as Arc<dyn NotificationSink>);

        let stats = ProgressStats::new(
            registry,
            ledger,
            Arc::clone(&capabilities) as Arc<dyn CapabilityProvider>,
        );

        World {
            resolver,
            stats,
            treasury,
            education,
            capabilities,
            sink,
        }
    }

    fn research(&self, nation: &NationId, tech: &str) {
        let result = self.resolver.attempt_research(nation, tech);
        assert!(result.success(), "{}", result.message());
    }

    fn balance(&self, nation: &NationId) -> f64 {
        self.treasury.balance(nation).unwrap()
    }
}

fn registry() -> TechRegistry {
    default_catalog()
}

// ============================================================================
// Early game: paying through the first tiers
// ============================================================================

#[test]
fn early_military_campaign_pays_tier_by_tier() {
    let world = World::new("avalon", 20000.0, 25.0);
    let avalon = NationId::new("avalon");

    // Tier 1 costs 5000.
    world.research(&avalon, "basic_military");
    assert_eq!(world.balance(&avalon), 15000.0);

    // Tier 2 needs education 20; 25 clears it. Costs 8000.
    world.research(&avalon, "fortifications");
    assert_eq!(world.balance(&avalon), 7000.0);

    // Bonuses flow immediately.
    assert!((world.stats.bonus(&avalon, "defenseBonus") - 1.3).abs() < 1e-9);
    assert!((world.stats.bonus(&avalon, "warStrength") - 1.1).abs() < 1e-9);

    // The sink saw both completions, in order.
    let completions = world.sink.completions();
    assert_eq!(completions.len(), 2);
    assert_eq!(completions[0].1.as_str(), "basic_military");
    assert_eq!(completions[1].1.as_str(), "fortifications");
}

// ============================================================================
// Walls: capability before education before funds
// ============================================================================

#[test]
fn tier_three_walls_fall_in_order() {
    let world = World::new("avalon", 1_000_000.0, 25.0);
    let avalon = NationId::new("avalon");

    world.research(&avalon, "basic_military");
    world.research(&avalon, "basic_weapons");
    world.research(&avalon, "tactical_warfare");

    // Education 25 is below the 30 a tier 3 demands, but the capability
    // wall is reported first.
    let result = world.resolver.attempt_research(&avalon, "firearms_tech");
    assert!(matches!(
        result.denial(),
        Some(ResearchDenial::CapabilityNotMet(c)) if c.as_str() == "tacz"
    ));

    world.capabilities.enable("tacz");
    let result = world.resolver.attempt_research(&avalon, "firearms_tech");
    assert_eq!(
        result.denial(),
        Some(&ResearchDenial::InsufficientEducation {
            required: 30.0,
            current: 25.0,
        })
    );

    world.education.set("avalon", 32.0);
    world.research(&avalon, "firearms_tech");
    assert!(world.resolver.is_unlocked(&avalon, "firearms_tech"));
}

// ============================================================================
// Full military line to the tier 5 capstone
// ============================================================================

#[test]
fn military_line_reaches_total_warfare() {
    let world = World::new("avalon", 150_000.0, 50.0);
    let avalon = NationId::new("avalon");
    for capability in ["tacz", "ballistix", "superwarfare"] {
        world.capabilities.enable(capability);
    }

    // capsawims stays absent; elite_equipment's capability is optional.
    let line = [
        "basic_military",
        "basic_weapons",
        "tactical_warfare",
        "firearms_tech",
        "artillery_tech",
        "military_vehicles",
        "elite_equipment",
        "total_warfare",
    ];
    for tech in line {
        world.research(&avalon, tech);
    }

    // 5000 + 3000 + 10000 + 15000 + 20000 + 25000 + 20000 + 40000.
    assert_eq!(world.balance(&avalon), 150_000.0 - 138_000.0);

    let report = world.stats.nation_report(&avalon);
    assert_eq!(report.unlocked, 8);
    assert_eq!(report.stage, statecraft_core::tech::Stage::Late);
    assert!(report.power_score > 0.0);

    // One event per unlock, drained once.
    let events = world.resolver.drain_events();
    assert_eq!(events.len(), line.len());
    assert!(events.iter().all(|e| matches!(
        e,
        ProgressEvent::ResearchCompleted { nation, .. } if nation == &avalon
    )));
    assert!(world.resolver.drain_events().is_empty());

    // elite_equipment unlocked without its capability, so its bonuses
    // wait for it.
    let war_before = world.stats.bonus(&avalon, "warStrength");
    world.capabilities.enable("capsawims");
    let war_after = world.stats.bonus(&avalon, "warStrength");
    assert!(war_after > war_before);
}

// ============================================================================
// Saves survive a process restart
// ============================================================================

#[test]
fn progress_survives_reopen() {
    let dir = std::env::temp_dir().join(format!(
        "statecraft_integration_reopen_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);

    {
        let store = Arc::new(statecraft_store::JsonDirStore::new(&dir));
        let world = World::with_store(store, "avalon", 20000.0, 25.0);
        let avalon = NationId::new("avalon");
        world.research(&avalon, "basic_military");
        world.research(&avalon, "fortifications");
    }

    // A fresh stack over the same directory sees the same progression.
    let store = Arc::new(statecraft_store::JsonDirStore::new(&dir));
    let world = World::with_store(store, "avalon", 20000.0, 25.0);
    let avalon = NationId::new("avalon");

    assert!(world.resolver.is_unlocked(&avalon, "basic_military"));
    assert!(world.resolver.is_unlocked(&avalon, "fortifications"));
    assert_eq!(
        world
            .resolver
            .attempt_research(&avalon, "basic_military")
            .denial(),
        Some(&ResearchDenial::AlreadyUnlocked(
            statecraft_core::TechId::new("basic_military")
        ))
    );
    // Nothing was re-paid.
    assert_eq!(world.balance(&avalon), 20000.0);

    let _ = std::fs::remove_dir_all(&dir);
}

// ============================================================================
// Cross-nation reporting
// ============================================================================

#[test]
fn global_report_compares_nations() {
    let registry = Arc::new(registry());
    let treasury = Arc::new(
        MapTreasury::new()
            .with_balance("avalon", 100_000.0)
            .with_balance("borduria", 100_000.0),
    );
    let education = Arc::new(
        MapEducation::new()
            .with_level("avalon", 30.0)
            .with_level("borduria", 30.0),
    );
    let capabilities = Arc::new(ToggleCapabilities::new());
    let ledger = Arc::new(
        ProgressLedger::open(Arc::new(MemoryStore::new()) as Arc<dyn ProgressStore>).unwrap(),
    );
    let resolver = ResearchResolver::new(
        Arc::clone(&registry),
        Arc::clone(&ledger),
        Arc::clone(&treasury) as Arc<dyn TreasuryProvider>,
        education,
        Arc::clone(&capabilities) as Arc<dyn CapabilityProvider>,
    );
    let stats = ProgressStats::new(
        registry,
        ledger,
        capabilities as Arc<dyn CapabilityProvider>,
    );

    let avalon = NationId::new("avalon");
    let borduria = NationId::new("borduria");
    for tech in ["basic_military", "basic_weapons", "tactical_warfare"] {
        assert!(resolver.attempt_research(&avalon, tech).success());
    }
    assert!(resolver.attempt_research(&borduria, "basic_military").success());

    let report = stats.global_report();
    assert_eq!(report.nations, 2);
    assert_eq!(report.total_unlocks, 4);
    assert_eq!(report.most_researched[0].tech.as_str(), "basic_military");
    assert_eq!(report.most_researched[0].count, 2);
    assert_eq!(report.top_nations[0].nation, avalon);

    // Reports serialize for the host game's dashboards.
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["nations"], 2);
}
