//! Research demo: one nation working through the stock catalog.
//!
//! Wires the resolver with in-memory providers, then walks a nation
//! through denials and unlocks: missing prerequisites, an education
//! wall, a capability wall, and finally the bonuses that come out the
//! other side. Set `RUST_LOG=debug` to watch the resolver's own logging
//! alongside the narration.
//!
//! Run with: `cargo run -p statecraft-examples --example research_demo`

use std::sync::Arc;

use statecraft_core::NationId;
use statecraft_core::provider::{
    CapabilityProvider, EducationProvider, NotificationSink, TreasuryProvider,
};
use statecraft_core::test_utils::{MapEducation, MapTreasury, RecordingSink, ToggleCapabilities};
use statecraft_data::default_catalog;
use statecraft_research::ResearchResolver;
use statecraft_stats::ProgressStats;
use statecraft_store::{MemoryStore, ProgressLedger, ProgressStore};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // --- Wire the stack ---

    let registry = Arc::new(default_catalog());
    let treasury = Arc::new(MapTreasury::new().with_balance("avalon", 60000.0));
    let education = Arc::new(MapEducation::new().with_level("avalon", 25.0));
    let capabilities = Arc::new(ToggleCapabilities::new());
    let sink = Arc::new(RecordingSink::new());
    let ledger = Arc::new(
        ProgressLedger::open(Arc::new(MemoryStore::new()) as Arc<dyn ProgressStore>)
            .expect("open ledger"),
    );

    let resolver = ResearchResolver::new(
        Arc::clone(&registry),
        Arc::clone(&ledger),
        Arc::clone(&treasury) as Arc<dyn TreasuryProvider>,
        Arc::clone(&education) as Arc<dyn EducationProvider>,
        Arc::clone(&capabilities) as Arc<dyn CapabilityProvider>,
    )
    .with_notifier(Arc::clone(&sink) as Arc<dyn NotificationSink>);

    let stats = ProgressStats::new(
        Arc::clone(&registry),
        Arc::clone(&ledger),
        Arc::clone(&capabilities) as Arc<dyn CapabilityProvider>,
    );

    let avalon = NationId::new("avalon");
    println!(
        "Catalog: {} technologies. Avalon: 60000 treasury, education 25.\n",
        registry.len()
    );

    // --- Denied: prerequisites first ---

    println!("=== Attempt: fortifications before basic_military ===\n");
    let result = resolver.attempt_research(&avalon, "fortifications");
    println!("  {}", result.message());

    // --- The tier 1 and 2 unlocks ---

    println!("\n=== Researching the early military line ===\n");
    for tech in ["basic_military", "fortifications", "basic_weapons", "tactical_warfare"] {
        let result = resolver.attempt_research(&avalon, tech);
        println!("  {}", result.message());
    }
    println!(
        "\nTreasury now {:.0}.",
        treasury.balance(&avalon).expect("balance")
    );

    // --- Walls: capability, then education ---

    println!("\n=== Attempt: firearms_tech (tier 3) ===\n");
    let result = resolver.attempt_research(&avalon, "firearms_tech");
    println!("  {}", result.message());

    println!("\n  (the tacz capability comes online)\n");
    capabilities.enable("tacz");
    let result = resolver.attempt_research(&avalon, "firearms_tech");
    println!("  {}", result.message());

    println!("\n  (education programs raise the level to 32)\n");
    education.set("avalon", 32.0);
    let result = resolver.attempt_research(&avalon, "firearms_tech");
    println!("  {}", result.message());

    // --- What the nation gained ---

    println!("\n=== Effective bonuses ===\n");
    for (name, multiplier) in stats.bonus_summary(&avalon) {
        println!("  {name}: x{multiplier:.3}");
    }

    let report = stats.nation_report(&avalon);
    println!(
        "\nAvalon: {}/{} unlocked ({:.0}%), stage {}, power score {:.1}.",
        report.unlocked,
        report.catalog_size,
        report.completion_percent,
        report.stage,
        report.power_score
    );

    // --- Events and notifications ---

    println!("\n=== Progress events ===\n");
    for event in resolver.drain_events() {
        println!("  {event:?}");
    }
    println!(
        "\nNotification sink saw {} completions.",
        sink.completions().len()
    );

    // --- What to aim for next ---

    println!("\n=== Available next ===\n");
    for tech in resolver.available_techs(&avalon) {
        println!(
            "  {} (tier {}, cost {:.0})",
            tech.id, tech.tier, tech.research_cost
        );
    }

    println!("\nResearch demo complete.");
}
