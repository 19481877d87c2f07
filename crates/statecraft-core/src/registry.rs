//! Immutable technology catalog with prerequisite-graph validation.
//!
//! Two-phase lifecycle: definitions are collected through [`RegistryBuilder`]
//! (duplicate ids rejected immediately), then [`RegistryBuilder::build`]
//! validates prerequisite references, rejects cycles via depth-first
//! traversal, checks tier and bonus ranges, and freezes everything into a
//! [`TechRegistry`]. The built registry is read-only and safe to share
//! across threads without synchronization.

use std::collections::HashMap;

use crate::id::TechId;
use crate::tech::{Branch, MAX_TIER, MIN_TIER, Stage, Technology};

/// Catalog validation errors. All are fatal at load time; a registry is
/// either fully valid or never built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate technology id: {0}")]
    DuplicateId(TechId),

    #[error("technology {tech} lists unknown prerequisite: {prereq}")]
    UnknownPrerequisite { tech: TechId, prereq: TechId },

    #[error("prerequisite cycle through technology: {0}")]
    CycleDetected(TechId),

    #[error("technology {tech} has tier {tier}, valid range is 1-5")]
    TierOutOfRange { tech: TechId, tier: u8 },

    #[error("technology {tech} has negative research cost: {cost}")]
    NegativeCost { tech: TechId, cost: f64 },

    #[error("technology {tech} bonus \"{bonus}\" must be a positive multiplier, got {value}")]
    NonPositiveBonus {
        tech: TechId,
        bonus: String,
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`TechRegistry`].
///
/// `register` only rejects duplicate ids, so definitions can arrive in any
/// order; forward references to not-yet-registered prerequisites are
/// resolved in `build`.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    techs: Vec<Technology>,
    index: HashMap<TechId, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: collect a definition.
    pub fn register(&mut self, tech: Technology) -> Result<(), RegistryError> {
        if self.index.contains_key(tech.id.as_str()) {
            return Err(RegistryError::DuplicateId(tech.id));
        }
        self.index.insert(tech.id.clone(), self.techs.len());
        self.techs.push(tech);
        Ok(())
    }

    /// Number of definitions collected so far.
    pub fn len(&self) -> usize {
        self.techs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }

    /// Phase 2: validate everything and freeze the catalog.
    pub fn build(self) -> Result<TechRegistry, RegistryError> {
        let Self { techs, index } = self;

        for tech in &techs {
            if !(MIN_TIER..=MAX_TIER).contains(&tech.tier) {
                return Err(RegistryError::TierOutOfRange {
                    tech: tech.id.clone(),
                    tier: tech.tier,
                });
            }
            if tech.research_cost < 0.0 {
                return Err(RegistryError::NegativeCost {
                    tech: tech.id.clone(),
                    cost: tech.research_cost,
                });
            }
            for (bonus, &value) in &tech.bonuses {
                if value <= 0.0 {
                    return Err(RegistryError::NonPositiveBonus {
                        tech: tech.id.clone(),
                        bonus: bonus.clone(),
                        value,
                    });
                }
            }
            for prereq in &tech.prerequisites {
                if !index.contains_key(prereq.as_str()) {
                    return Err(RegistryError::UnknownPrerequisite {
                        tech: tech.id.clone(),
                        prereq: prereq.clone(),
                    });
                }
            }
        }

        let topo = topological_order(&techs, &index)?;

        let mut branch_order: HashMap<Branch, Vec<usize>> = HashMap::new();
        for (i, tech) in techs.iter().enumerate() {
            branch_order.entry(tech.branch).or_default().push(i);
        }

        Ok(TechRegistry {
            techs,
            index,
            topo,
            branch_order,
        })
    }
}

/// Depth-first postorder over prerequisite edges. Emits each technology
/// after all of its prerequisites, and reports the first technology found on
/// a cycle. Deterministic for a given registration order.
fn topological_order(
    techs: &[Technology],
    index: &HashMap<TechId, usize>,
) -> Result<Vec<usize>, RegistryError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    fn visit(
        at: usize,
        techs: &[Technology],
        index: &HashMap<TechId, usize>,
        marks: &mut [Mark],
        order: &mut Vec<usize>,
    ) -> Result<(), RegistryError> {
        match marks[at] {
            Mark::Done => return Ok(()),
            Mark::InProgress => return Err(RegistryError::CycleDetected(techs[at].id.clone())),
            Mark::Unvisited => {}
        }
        marks[at] = Mark::InProgress;
        for prereq in &techs[at].prerequisites {
            // Existence was validated before this pass runs.
            visit(index[prereq.as_str()], techs, index, marks, order)?;
        }
        marks[at] = Mark::Done;
        order.push(at);
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; techs.len()];
    let mut order = Vec::with_capacity(techs.len());
    for at in 0..techs.len() {
        visit(at, techs, index, &mut marks, &mut order)?;
    }
    Ok(order)
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable catalog. Frozen after [`RegistryBuilder::build`]; thread-safe
/// to share.
#[derive(Debug)]
pub struct TechRegistry {
    techs: Vec<Technology>,
    index: HashMap<TechId, usize>,
    topo: Vec<usize>,
    branch_order: HashMap<Branch, Vec<usize>>,
}

impl TechRegistry {
    pub fn get(&self, id: &str) -> Option<&Technology> {
        self.index.get(id).map(|&i| &self.techs[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All technologies in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Technology> {
        self.techs.iter()
    }

    /// Technologies in `branch`, in registration order.
    pub fn by_branch(&self, branch: Branch) -> impl Iterator<Item = &Technology> {
        self.branch_order
            .get(&branch)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.techs[i])
    }

    /// Technologies of exactly `tier`. Empty for tiers outside 1-5.
    pub fn by_tier(&self, tier: u8) -> impl Iterator<Item = &Technology> {
        self.techs.iter().filter(move |t| t.tier == tier)
    }

    /// Technologies whose derived stage is `stage`.
    pub fn by_stage(&self, stage: Stage) -> impl Iterator<Item = &Technology> {
        self.techs.iter().filter(move |t| t.stage() == stage)
    }

    /// All technologies ordered so every one appears after its
    /// prerequisites.
    pub fn topological_order(&self) -> impl Iterator<Item = &Technology> {
        self.topo.iter().map(|&i| &self.techs[i])
    }

    pub fn len(&self) -> usize {
        self.techs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }
}
