//! Serde structs for technology data files.
//!
//! These define the on-disk format. They deserialize from RON, JSON or
//! TOML and are then resolved into engine types and validated by the
//! registry builder; a data file is never trusted to be well-formed.

use std::collections::BTreeMap;

use serde::Deserialize;

use statecraft_core::tech::{Branch, Technology};
use statecraft_core::{CapabilityId, TechId};

/// A technology definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct TechnologyData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub branch: Branch,
    pub tier: u8,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub research_cost: f64,
    #[serde(default)]
    pub research_time_hours: f64,
    #[serde(default)]
    pub bonuses: BTreeMap<String, f64>,
    #[serde(default)]
    pub required_capability: Option<String>,
    #[serde(default)]
    pub capability_optional: bool,
}

impl TechnologyData {
    /// Resolves the raw file entry into the engine type.
    pub fn into_technology(self) -> Technology {
        Technology {
            id: TechId::new(self.id),
            name: self.name,
            description: self.description,
            branch: self.branch,
            tier: self.tier,
            prerequisites: self.prerequisites.into_iter().map(TechId::new).collect(),
            research_cost: self.research_cost,
            research_time_hours: self.research_time_hours,
            bonuses: self.bonuses,
            required_capability: self.required_capability.map(CapabilityId::new),
            capability_optional: self.capability_optional,
        }
    }
}

/// Top-level shape of a TOML catalog file: a `[[technologies]]` array of
/// tables. RON and JSON files hold the bare list instead.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub technologies: Vec<TechnologyData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_entry_fills_defaults() {
        let data: TechnologyData = serde_json::from_str(
            r#"{"id": "basic_trade", "name": "Basic Trade", "branch": "economy",
                "tier": 1, "research_cost": 3000.0}"#,
        )
        .unwrap();

        let tech = data.into_technology();
        assert_eq!(tech.id.as_str(), "basic_trade");
        assert_eq!(tech.branch, Branch::Economy);
        assert!(tech.description.is_empty());
        assert!(tech.prerequisites.is_empty());
        assert_eq!(tech.research_time_hours, 0.0);
        assert!(tech.bonuses.is_empty());
        assert!(tech.required_capability.is_none());
        assert!(!tech.capability_optional);
    }

    #[test]
    fn full_entry_resolves_every_field() {
        let data: TechnologyData = serde_json::from_str(
            r#"{
                "id": "artillery_tech",
                "name": "Artillery",
                "description": "Siege engines and indirect fire.",
                "branch": "military",
                "tier": 3,
                "prerequisites": ["firearms_tech"],
                "research_cost": 20000.0,
                "research_time_hours": 6.0,
                "bonuses": {"siegeStrength": 1.5, "defenseBonus": 1.2},
                "required_capability": "ballistix"
            }"#,
        )
        .unwrap();

        let tech = data.into_technology();
        assert_eq!(tech.prerequisites, vec![TechId::new("firearms_tech")]);
        assert_eq!(tech.bonus("siegeStrength"), Some(1.5));
        assert_eq!(tech.required_capability, Some(CapabilityId::new("ballistix")));
        assert!(!tech.capability_optional);
    }
}
