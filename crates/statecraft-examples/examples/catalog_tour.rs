//! Catalog tour: the stock technology tree and the data-file loader.
//!
//! Prints the built-in tree branch by branch, shows the dependency
//! ordering the registry computes, then round-trips a small custom
//! catalog through a JSON data file the way a server operator would
//! override the stock tree.
//!
//! Run with: `cargo run -p statecraft-examples --example catalog_tour`

use statecraft_core::tech::{Branch, Stage};
use statecraft_data::{default_catalog, load_catalog_or_default};

fn main() {
    let registry = default_catalog();

    // --- The tree, branch by branch ---

    println!("=== Stock catalog: {} technologies ===\n", registry.len());
    for branch in Branch::ALL {
        println!("[{branch}]");
        for tech in registry.by_branch(branch) {
            let gate = match (&tech.required_capability, tech.capability_optional) {
                (Some(capability), false) => format!(" [requires {capability}]"),
                (Some(capability), true) => format!(" [optional {capability}]"),
                (None, _) => String::new(),
            };
            println!(
                "  tier {} {:<22} cost {:>6.0}  education {:>2.0}{}",
                tech.tier,
                tech.id.as_str(),
                tech.research_cost,
                tech.required_education(),
                gate
            );
        }
        println!();
    }

    // --- Stages ---

    println!("=== Stages ===\n");
    for stage in Stage::ALL {
        println!("  {stage}: {} technologies", registry.by_stage(stage).count());
    }

    // --- Research order ---

    println!("\n=== Dependency order (first ten) ===\n");
    for tech in registry.topological_order().take(10) {
        let prereqs: Vec<&str> = tech.prerequisites.iter().map(|p| p.as_str()).collect();
        if prereqs.is_empty() {
            println!("  {}", tech.id);
        } else {
            println!("  {} (after {})", tech.id, prereqs.join(", "));
        }
    }

    // --- Overriding the tree with a data file ---

    println!("\n=== Loading a custom catalog from disk ===\n");
    let dir = std::env::temp_dir().join(format!("statecraft_catalog_tour_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create catalog dir");
    std::fs::write(
        dir.join("technologies.json"),
        r#"[
            {"id": "stone_tools", "name": "Stone Tools", "branch": "industry",
             "tier": 1, "research_cost": 500.0,
             "bonuses": {"resourceExtraction": 1.05}},
            {"id": "bronze_working", "name": "Bronze Working", "branch": "military",
             "tier": 2, "prerequisites": ["stone_tools"], "research_cost": 1500.0,
             "bonuses": {"warStrength": 1.1}}
        ]"#,
    )
    .expect("write custom catalog");

    let custom = load_catalog_or_default(&dir).expect("load custom catalog");
    println!("Loaded {} technologies from {}:", custom.len(), dir.display());
    for tech in custom.topological_order() {
        println!("  {} ({}, tier {})", tech.id, tech.branch, tech.tier);
    }

    std::fs::remove_dir_all(&dir).expect("clean up catalog dir");

    println!("\nCatalog tour complete.");
}
