//! Effective bonus multipliers.
//!
//! Unlocks are permanent but their bonuses are not: a technology gated on
//! a capability stops contributing the moment that capability goes away
//! and resumes when it returns. That holds for optional capabilities too.
//! An optional capability lets the technology be *researched* without the
//! backing extension; the bonus still waits for it.

use std::collections::{BTreeMap, HashSet};

use statecraft_core::TechId;
use statecraft_core::provider::CapabilityProvider;
use statecraft_core::registry::TechRegistry;
use statecraft_core::tech::Technology;

/// Whether an unlocked technology currently contributes its bonuses.
pub fn is_bonus_active(tech: &Technology, capabilities: &dyn CapabilityProvider) -> bool {
    match &tech.required_capability {
        None => true,
        Some(capability) => capabilities.is_available(capability),
    }
}

/// The nation's effective multiplier for one bonus name: the product over
/// every unlocked, currently active technology carrying it. `1.0` when
/// nothing contributes.
///
/// Iterates the registry in catalog order, so the product is the same
/// every call. Ids in `unlocked` that the registry no longer knows are
/// skipped.
pub fn bonus_multiplier(
    registry: &TechRegistry,
    capabilities: &dyn CapabilityProvider,
    unlocked: &HashSet<TechId>,
    name: &str,
) -> f64 {
    registry
        .all()
        .filter(|t| unlocked.contains(t.id.as_str()) && is_bonus_active(t, capabilities))
        .filter_map(|t| t.bonus(name))
        .product()
}

/// Every bonus the nation currently holds, aggregated the same way as
/// [`bonus_multiplier`]. Names with no active contributor are absent.
pub fn bonus_summary(
    registry: &TechRegistry,
    capabilities: &dyn CapabilityProvider,
    unlocked: &HashSet<TechId>,
) -> BTreeMap<String, f64> {
    let mut summary = BTreeMap::new();
    for tech in registry
        .all()
        .filter(|t| unlocked.contains(t.id.as_str()) && is_bonus_active(t, capabilities))
    {
        for (name, multiplier) in &tech.bonuses {
            *summary.entry(name.clone()).or_insert(1.0) *= multiplier;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use statecraft_core::Branch;
    use statecraft_core::test_utils::{ToggleCapabilities, build_registry, tech};

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn unlocked(ids: &[&str]) -> HashSet<TechId> {
        ids.iter().map(|id| TechId::new(*id)).collect()
    }

    // -----------------------------------------------------------------------
    // Test 1: Empty progression means identity multipliers
    // -----------------------------------------------------------------------

    #[test]
    fn no_unlocks_means_identity() {
        let registry = build_registry([
            tech("basic_military", Branch::Military, 1, 5000.0).with_bonus("warStrength", 1.1),
        ]);
        let caps = ToggleCapabilities::new();

        assert_eq!(
            bonus_multiplier(&registry, &caps, &HashSet::new(), "warStrength"),
            1.0
        );
        assert!(bonus_summary(&registry, &caps, &HashSet::new()).is_empty());
    }

    // -----------------------------------------------------------------------
    // Test 2: Multipliers stack multiplicatively across technologies
    // -----------------------------------------------------------------------

    #[test]
    fn multipliers_stack_across_techs() {
        let registry = build_registry([
            tech("basic_military", Branch::Military, 1, 5000.0).with_bonus("warStrength", 1.1),
            tech("tactical_warfare", Branch::Military, 2, 10000.0)
                .requires(["basic_military"])
                .with_bonus("warStrength", 1.2),
            tech("basic_trade", Branch::Economy, 1, 3000.0).with_bonus("tradeBonus", 1.15),
        ]);
        let caps = ToggleCapabilities::new();
        let unlocked = unlocked(&["basic_military", "tactical_warfare", "basic_trade"]);

        let war = bonus_multiplier(&registry, &caps, &unlocked, "warStrength");
        assert!(close(war, 1.1 * 1.2), "got {war}");

        // An unrelated tech contributes nothing to this name.
        let trade = bonus_multiplier(&registry, &caps, &unlocked, "tradeBonus");
        assert!(close(trade, 1.15), "got {trade}");

        let summary = bonus_summary(&registry, &caps, &unlocked);
        assert_eq!(summary.len(), 2);
        assert!(close(summary["warStrength"], 1.1 * 1.2));
    }

    // -----------------------------------------------------------------------
    // Test 3: Capability loss suspends the bonus, return restores it
    // -----------------------------------------------------------------------

    #[test]
    fn capability_flicker_suspends_and_restores() {
        let registry = build_registry([
            tech("artillery", Branch::Military, 3, 20000.0)
                .with_capability("ballistix")
                .with_bonus("siegeStrength", 1.5),
        ]);
        let caps = ToggleCapabilities::new();
        let unlocked = unlocked(&["artillery"]);

        assert_eq!(
            bonus_multiplier(&registry, &caps, &unlocked, "siegeStrength"),
            1.0
        );

        caps.enable("ballistix");
        assert!(close(
            bonus_multiplier(&registry, &caps, &unlocked, "siegeStrength"),
            1.5
        ));

        caps.disable("ballistix");
        assert_eq!(
            bonus_multiplier(&registry, &caps, &unlocked, "siegeStrength"),
            1.0
        );
    }

    // -----------------------------------------------------------------------
    // Test 4: Optional capabilities gate the bonus exactly like required ones
    // -----------------------------------------------------------------------

    #[test]
    fn optional_capability_still_gates_bonus() {
        let registry = build_registry([
            tech("elite_equipment", Branch::Military, 4, 20000.0)
                .with_optional_capability("warium")
                .with_bonus("warStrength", 1.2),
        ]);
        let caps = ToggleCapabilities::new();
        let unlocked = unlocked(&["elite_equipment"]);

        assert_eq!(
            bonus_multiplier(&registry, &caps, &unlocked, "warStrength"),
            1.0
        );
        assert!(bonus_summary(&registry, &caps, &unlocked).is_empty());

        caps.enable("warium");
        assert!(close(
            bonus_multiplier(&registry, &caps, &unlocked, "warStrength"),
            1.2
        ));
    }

    // -----------------------------------------------------------------------
    // Test 5: Unlocked ids missing from the catalog are skipped
    // -----------------------------------------------------------------------

    #[test]
    fn stale_unlocked_ids_are_skipped() {
        let registry = build_registry([
            tech("basic_military", Branch::Military, 1, 5000.0).with_bonus("warStrength", 1.1),
        ]);
        let caps = ToggleCapabilities::new();
        let unlocked = unlocked(&["basic_military", "removed_from_catalog"]);

        assert!(close(
            bonus_multiplier(&registry, &caps, &unlocked, "warStrength"),
            1.1
        ));
    }
}
