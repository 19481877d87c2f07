//! The built-in technology tree.
//!
//! Five branches, five tiers, thirty-seven technologies. Tiers 1 and 2
//! are open to everyone; from tier 3 on, most military and industry
//! technologies are gated on a capability so the tree adapts to what the
//! host game actually has installed. Two pairs (`firearms_tech` /
//! `firearms_tech_alt`, `elite_equipment` / `elite_equipment_alt`) cover
//! alternative providers of the same capability niche.

use statecraft_core::registry::{RegistryBuilder, TechRegistry};
use statecraft_core::tech::{Branch, Technology};

/// The stock catalog as a validated registry.
pub fn default_catalog() -> TechRegistry {
    let mut builder = RegistryBuilder::new();
    for tech in default_technologies() {
        builder
            .register(tech)
            .expect("built-in catalog has unique ids");
    }
    builder.build().expect("built-in catalog validates")
}

/// The stock technology definitions, tier by tier.
pub fn default_technologies() -> Vec<Technology> {
    vec![
        // -------------------------------------------------------------------
        // Tier 1: foundations, no prerequisites
        // -------------------------------------------------------------------
        Technology::new("basic_military", "Basic Military", Branch::Military, 1, 5000.0)
            .with_research_time(2.0)
            .with_bonus("warStrength", 1.1),
        Technology::new("basic_weapons", "Basic Weapons", Branch::Military, 1, 3000.0)
            .with_research_time(1.5)
            .with_bonus("warStrength", 1.05),
        Technology::new(
            "basic_construction",
            "Basic Construction",
            Branch::Infrastructure,
            1,
            4000.0,
        )
        .with_research_time(2.0)
        .with_bonus("buildSpeed", 1.2),
        Technology::new("basic_mining", "Basic Mining", Branch::Industry, 1, 3000.0)
            .with_research_time(1.5)
            .with_bonus("resourceExtraction", 1.1),
        Technology::new("basic_trade", "Basic Trade", Branch::Economy, 1, 3000.0)
            .with_research_time(1.5)
            .with_bonus("tradeBonus", 1.15),
        Technology::new("basic_currency", "Basic Currency", Branch::Economy, 1, 5000.0)
            .with_research_time(2.0)
            .with_bonus("economicEfficiency", 1.1),
        Technology::new("basic_education", "Basic Education", Branch::Science, 1, 4000.0)
            .with_research_time(2.0)
            .with_bonus("researchSpeed", 1.1),
        // -------------------------------------------------------------------
        // Tier 2: specialization
        // -------------------------------------------------------------------
        Technology::new("fortifications", "Fortifications", Branch::Military, 2, 8000.0)
            .with_research_time(3.0)
            .requires(["basic_military"])
            .with_bonus("defenseBonus", 1.3),
        Technology::new(
            "tactical_warfare",
            "Tactical Warfare",
            Branch::Military,
            2,
            10000.0,
        )
        .with_research_time(3.5)
        .requires(["basic_military", "basic_weapons"])
        .with_bonus("warStrength", 1.2),
        Technology::new("basic_industry", "Basic Industry", Branch::Industry, 2, 10000.0)
            .with_research_time(3.0)
            .requires(["basic_construction"])
            .with_bonus("productionBonus", 1.3),
        Technology::new("improved_mining", "Improved Mining", Branch::Industry, 2, 8000.0)
            .with_research_time(2.5)
            .requires(["basic_mining"])
            .with_bonus("resourceExtraction", 1.3),
        Technology::new("trade_networks", "Trade Networks", Branch::Economy, 2, 8000.0)
            .with_research_time(2.5)
            .requires(["basic_trade"])
            .with_bonus("tradeBonus", 1.25),
        Technology::new("banking", "Banking", Branch::Economy, 2, 10000.0)
            .with_research_time(3.0)
            .requires(["basic_currency"])
            .with_bonus("economicEfficiency", 1.2),
        Technology::new("roads", "Roads", Branch::Infrastructure, 2, 6000.0)
            .with_research_time(2.0)
            .requires(["basic_construction"])
            .with_bonus("mobility", 1.2),
        Technology::new(
            "advanced_education",
            "Advanced Education",
            Branch::Science,
            2,
            12000.0,
        )
        .with_research_time(4.0)
        .requires(["basic_education"])
        .with_bonus("researchSpeed", 1.3),
        // -------------------------------------------------------------------
        // Tier 3: capability-gated modernization
        // -------------------------------------------------------------------
        Technology::new("firearms_tech", "Firearms Technology", Branch::Military, 3, 15000.0)
            .with_research_time(5.0)
            .requires(["tactical_warfare"])
            .with_capability("tacz")
            .with_bonus("warStrength", 1.3)
            .with_bonus("weaponDamage", 1.25),
        Technology::new(
            "firearms_tech_alt",
            "Firearms Technology",
            Branch::Military,
            3,
            15000.0,
        )
        .with_research_time(5.0)
        .requires(["tactical_warfare"])
        .with_capability("pointblank")
        .with_bonus("warStrength", 1.3)
        .with_bonus("weaponDamage", 1.25),
        Technology::new("artillery_tech", "Artillery", Branch::Military, 3, 20000.0)
            .with_research_time(6.0)
            .requires(["firearms_tech"])
            .with_capability("ballistix")
            .with_bonus("siegeStrength", 1.5)
            .with_bonus("defenseBonus", 1.2),
        Technology::new(
            "military_vehicles",
            "Military Vehicles",
            Branch::Military,
            3,
            25000.0,
        )
        .with_research_time(7.0)
        .requires(["tactical_warfare"])
        .with_capability("superwarfare")
        .with_bonus("warStrength", 1.4)
        .with_bonus("mobility", 1.3),
        Technology::new(
            "industrial_engineering",
            "Industrial Engineering",
            Branch::Industry,
            3,
            18000.0,
        )
        .with_research_time(6.0)
        .requires(["basic_industry"])
        .with_capability("immersiveengineering")
        .with_bonus("productionBonus", 1.5)
        .with_bonus("energyEfficiency", 1.3),
        Technology::new(
            "resource_extraction",
            "Resource Extraction",
            Branch::Industry,
            3,
            15000.0,
        )
        .with_research_time(5.0)
        .requires(["improved_mining", "industrial_engineering"])
        .with_capability("simplyquarries")
        .with_bonus("resourceExtraction", 2.0),
        Technology::new("automation_tech", "Automation", Branch::Economy, 3, 20000.0)
            .with_research_time(7.0)
            .requires(["trade_networks", "industrial_engineering"])
            .with_capability("appliedenergistics2")
            .with_bonus("tradeBonus", 1.4)
            .with_bonus("resourceEfficiency", 1.35),
        Technology::new(
            "transportation_tech",
            "Transportation",
            Branch::Infrastructure,
            3,
            15000.0,
        )
        .with_research_time(5.0)
        .requires(["roads"])
        .with_capability("immersivevehicles")
        .with_bonus("tradeBonus", 1.25)
        .with_bonus("mobility", 1.5),
        Technology::new("research_labs", "Research Labs", Branch::Science, 3, 18000.0)
            .with_research_time(6.0)
            .requires(["advanced_education"])
            .with_bonus("researchSpeed", 1.5),
        // -------------------------------------------------------------------
        // Tier 4: late industrialization
        // -------------------------------------------------------------------
        Technology::new("elite_equipment", "Elite Equipment", Branch::Military, 4, 20000.0)
            .with_research_time(6.0)
            .requires(["firearms_tech"])
            .with_optional_capability("capsawims")
            .with_bonus("warStrength", 1.2)
            .with_bonus("defenseBonus", 1.15),
        Technology::new(
            "elite_equipment_alt",
            "Elite Equipment",
            Branch::Military,
            4,
            20000.0,
        )
        .with_research_time(6.0)
        .requires(["firearms_tech"])
        .with_optional_capability("warium")
        .with_bonus("warStrength", 1.2)
        .with_bonus("defenseBonus", 1.15),
        Technology::new(
            "advanced_industry",
            "Advanced Industry",
            Branch::Industry,
            4,
            25000.0,
        )
        .with_research_time(8.0)
        .requires(["industrial_engineering"])
        .with_capability("industrialupgrade")
        .with_bonus("productionBonus", 1.8)
        .with_bonus("energyEfficiency", 1.5),
        Technology::new(
            "quantum_energy",
            "Quantum Energy",
            Branch::Infrastructure,
            4,
            30000.0,
        )
        .with_research_time(10.0)
        .requires(["advanced_industry"])
        .with_capability("quantumgenerators")
        .with_bonus("energyProduction", 3.0)
        .with_bonus("energyEfficiency", 2.0),
        Technology::new(
            "power_networks",
            "Power Networks",
            Branch::Infrastructure,
            4,
            20000.0,
        )
        .with_research_time(6.0)
        .requires(["industrial_engineering"])
        .with_optional_capability("powerutils")
        .with_bonus("energyEfficiency", 1.4),
        Technology::new("advanced_trade", "Advanced Trade", Branch::Economy, 4, 25000.0)
            .with_research_time(8.0)
            .requires(["automation_tech", "transportation_tech"])
            .with_bonus("tradeBonus", 1.6),
        Technology::new("space_program", "Space Program", Branch::Science, 4, 30000.0)
            .with_research_time(12.0)
            .requires(["research_labs"])
            .with_bonus("researchSpeed", 2.0)
            .with_bonus("prestige", 1.5),
        // -------------------------------------------------------------------
        // Tier 5: endgame
        // -------------------------------------------------------------------
        Technology::new("nuclear_weapons", "Nuclear Weapons", Branch::Military, 5, 50000.0)
            .with_research_time(15.0)
            .requires(["space_program", "quantum_energy"])
            .with_bonus("warStrength", 2.0)
            .with_bonus("deterrence", 3.0),
        Technology::new("total_warfare", "Total Warfare", Branch::Military, 5, 40000.0)
            .with_research_time(12.0)
            .requires(["military_vehicles", "artillery_tech", "elite_equipment"])
            .with_bonus("warStrength", 1.8),
        Technology::new("mega_production", "Mega Production", Branch::Industry, 5, 45000.0)
            .with_research_time(14.0)
            .requires(["advanced_industry", "automation_tech"])
            .with_bonus("productionBonus", 2.5),
        Technology::new("global_economy", "Global Economy", Branch::Economy, 5, 40000.0)
            .with_research_time(12.0)
            .requires(["advanced_trade", "automation_tech"])
            .with_bonus("tradeBonus", 2.0),
        Technology::new(
            "mega_infrastructure",
            "Mega Infrastructure",
            Branch::Infrastructure,
            5,
            45000.0,
        )
        .with_research_time(14.0)
        .requires(["quantum_energy", "transportation_tech"])
        .with_bonus("mobility", 2.0)
        .with_bonus("energyProduction", 2.5),
        Technology::new(
            "transcendent_science",
            "Transcendent Science",
            Branch::Science,
            5,
            50000.0,
        )
        .with_research_time(15.0)
        .requires(["space_program", "research_labs"])
        .with_bonus("researchSpeed", 3.0),
    ]
}
