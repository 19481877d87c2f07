//! The resolver: eligibility evaluation and the atomic pay-then-unlock
//! transaction.
//!
//! One resolver serves every nation. It owns no progression state itself;
//! the unlocked sets live in the [`ProgressLedger`], the catalog in the
//! [`TechRegistry`], and treasury/education/capability answers come from
//! the host game's providers. `attempt_research` holds the nation's ledger
//! lock from the status recheck through the persistence call, so two
//! concurrent attempts for one nation can never both pay.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use statecraft_core::provider::{
    CapabilityProvider, EducationProvider, NotificationSink, ProviderError, TreasuryProvider,
};
use statecraft_core::registry::TechRegistry;
use statecraft_core::tech::Technology;
use statecraft_core::{NationId, ProgressEvent, TechId};
use statecraft_store::ProgressLedger;

use crate::status::{ResearchDenial, ResearchOutcome, ResearchResult, ResearchStatus, TechState};

/// Evaluates research eligibility and performs unlocks. Cheap to share as
/// `Arc<ResearchResolver>`; all methods take `&self`.
#[derive(Debug)]
pub struct ResearchResolver {
    registry: Arc<TechRegistry>,
    ledger: Arc<ProgressLedger>,
    treasury: Arc<dyn TreasuryProvider>,
    education: Arc<dyn EducationProvider>,
    capabilities: Arc<dyn CapabilityProvider>,
    notifier: Option<Arc<dyn NotificationSink>>,
    events: Mutex<Vec<ProgressEvent>>,
}

impl ResearchResolver {
    pub fn new(
        registry: Arc<TechRegistry>,
        ledger: Arc<ProgressLedger>,
        treasury: Arc<dyn TreasuryProvider>,
        education: Arc<dyn EducationProvider>,
        capabilities: Arc<dyn CapabilityProvider>,
    ) -> Self {
        Self {
            registry,
            ledger,
            treasury,
            education,
            capabilities,
            notifier: None,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Attaches a fire-and-forget completion sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The catalog this resolver answers for.
    pub fn registry(&self) -> &TechRegistry {
        &self.registry
    }

    // -----------------------------------------------------------------------
    // Status evaluation
    // -----------------------------------------------------------------------

    /// Evaluates every gate for `tech` against one unlocked-set snapshot.
    /// Fails only when a provider cannot resolve the nation.
    fn evaluate(
        &self,
        tech: &Technology,
        nation: &NationId,
        unlocked: &HashSet<TechId>,
    ) -> Result<ResearchStatus, ResearchDenial> {
        let missing_prerequisites: Vec<TechId> = tech
            .prerequisites
            .iter()
            .filter(|p| !unlocked.contains(p.as_str()))
            .cloned()
            .collect();
        let prerequisites_met = missing_prerequisites.is_empty();

        let capability_met = match &tech.required_capability {
            None => true,
            Some(capability) => {
                tech.capability_optional || self.capabilities.is_available(capability)
            }
        };

        let current_education = self.education.level(nation).map_err(denial_from_provider)?;
        let required_education = tech.required_education();

        let treasury = self.treasury.balance(nation).map_err(denial_from_provider)?;

        Ok(ResearchStatus {
            unlocked: unlocked.contains(tech.id.as_str()),
            missing_prerequisites,
            prerequisites_met,
            capability_met,
            required_education,
            current_education,
            education_met: current_education >= required_education,
            treasury,
            treasury_enough: treasury >= tech.research_cost,
        })
    }

    /// Read-only projection of every eligibility gate. `Err` only when the
    /// technology or the nation cannot be resolved; an ineligible-but-known
    /// pair is an `Ok` status with `can_research() == false`.
    pub fn research_status(
        &self,
        nation: &NationId,
        tech_id: &str,
    ) -> Result<ResearchStatus, ResearchDenial> {
        let tech = self
            .registry
            .get(tech_id)
            .ok_or_else(|| ResearchDenial::TechNotFound(TechId::new(tech_id)))?;
        let unlocked = self.ledger.unlocked(nation);
        self.evaluate(tech, nation, &unlocked)
    }

    /// The LOCKED / AVAILABLE / UNLOCKED state of one pair.
    pub fn tech_state(
        &self,
        nation: &NationId,
        tech_id: &str,
    ) -> Result<TechState, ResearchDenial> {
        let status = self.research_status(nation, tech_id)?;
        Ok(if status.unlocked {
            TechState::Unlocked
        } else if status.can_research() {
            TechState::Available
        } else {
            TechState::Locked
        })
    }

    // -----------------------------------------------------------------------
    // The mutation path
    // -----------------------------------------------------------------------

    /// Attempts to research `tech_id` for `nation`.
    ///
    /// The status is recomputed inside the nation's critical section and
    /// the checks run in a fixed order: unknown technology, already
    /// unlocked, missing prerequisites, absent capability, low education,
    /// low treasury. The first closed gate denies the attempt with no side
    /// effects. If all gates pass, the cost is deducted, the unlocked set
    /// updated, and the record persisted before the lock is released.
    ///
    /// The treasury's own `deduct` check is authoritative: if another game
    /// system spent the balance between the status read and the deduction,
    /// the attempt is denied even though the snapshot said otherwise.
    pub fn attempt_research(&self, nation: &NationId, tech_id: &str) -> ResearchResult {
        let Some(tech) = self.registry.get(tech_id) else {
            let requested = TechId::new(tech_id);
            return ResearchResult {
                tech: requested.clone(),
                outcome: ResearchOutcome::Denied(ResearchDenial::TechNotFound(requested)),
                status: ResearchStatus::default(),
            };
        };

        let result = self.ledger.with_nation(nation, |unlocked| {
            let status = match self.evaluate(tech, nation, unlocked) {
                Ok(status) => status,
                Err(denial) => return denied(&tech.id, denial, ResearchStatus::default()),
            };

            if status.unlocked {
                return denied(
                    &tech.id,
                    ResearchDenial::AlreadyUnlocked(tech.id.clone()),
                    status,
                );
            }
            if !status.prerequisites_met {
                let missing = status.missing_prerequisites.clone();
                return denied(
                    &tech.id,
                    ResearchDenial::PrerequisitesNotMet { missing },
                    status,
                );
            }
            if let (Some(capability), false) = (&tech.required_capability, status.capability_met) {
                return denied(
                    &tech.id,
                    ResearchDenial::CapabilityNotMet(capability.clone()),
                    status,
                );
            }
            if !status.education_met {
                return denied(
                    &tech.id,
                    ResearchDenial::InsufficientEducation {
                        required: status.required_education,
                        current: status.current_education,
                    },
                    status,
                );
            }
            if !status.treasury_enough {
                return denied(
                    &tech.id,
                    ResearchDenial::InsufficientFunds {
                        needed: tech.research_cost,
                        available: status.treasury,
                    },
                    status,
                );
            }

            if let Err(e) = self.treasury.deduct(nation, tech.research_cost) {
                debug!(nation = %nation, tech = %tech.id, error = %e, "deduction refused");
                return denied(&tech.id, denial_from_provider(e), status);
            }

            unlocked.insert(tech.id.clone());
            if let Err(e) = self.ledger.persist(nation, unlocked) {
                // The unlock stands; the next save of this nation rewrites
                // the complete set.
                warn!(nation = %nation, tech = %tech.id, error = %e, "progress save failed");
            }

            self.events
                .lock()
                .unwrap()
                .push(ProgressEvent::ResearchCompleted {
                    nation: nation.clone(),
                    tech: tech.id.clone(),
                    cost_paid: tech.research_cost,
                });

            ResearchResult {
                tech: tech.id.clone(),
                outcome: ResearchOutcome::Unlocked {
                    cost_paid: tech.research_cost,
                },
                status,
            }
        });

        if result.success() {
            info!(nation = %nation, tech = %tech.id, cost = tech.research_cost, "technology unlocked");
            if let Some(notifier) = &self.notifier {
                if let Err(e) = notifier.research_completed(nation, tech) {
                    warn!(nation = %nation, tech = %tech.id, error = %e, "notification sink failed");
                }
            }
        }
        result
    }

    /// Buffered progress events, oldest first. Draining hands ownership to
    /// the caller and leaves the buffer empty.
    pub fn drain_events(&self) -> Vec<ProgressEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    // -----------------------------------------------------------------------
    // Read-only queries
    // -----------------------------------------------------------------------

    /// Whether `nation` has unlocked `tech_id`.
    pub fn is_unlocked(&self, nation: &NationId, tech_id: &str) -> bool {
        self.ledger.is_unlocked(nation, tech_id)
    }

    /// The nation's unlocked technologies, sorted by tier.
    pub fn unlocked_techs(&self, nation: &NationId) -> Vec<&Technology> {
        let unlocked = self.ledger.unlocked(nation);
        let mut techs: Vec<&Technology> = self
            .registry
            .all()
            .filter(|t| unlocked.contains(t.id.as_str()))
            .collect();
        techs.sort_by_key(|t| t.tier);
        techs
    }

    /// Technologies the nation could open research on: not unlocked,
    /// prerequisites met, capability requirement met. Education and
    /// treasury are not consulted, so this is stable across income ticks.
    /// Sorted by tier.
    pub fn available_techs(&self, nation: &NationId) -> Vec<&Technology> {
        let unlocked = self.ledger.unlocked(nation);
        let mut techs: Vec<&Technology> = self
            .registry
            .all()
            .filter(|t| {
                !unlocked.contains(t.id.as_str())
                    && t.prerequisites.iter().all(|p| unlocked.contains(p.as_str()))
                    && match &t.required_capability {
                        None => true,
                        Some(capability) => {
                            t.capability_optional || self.capabilities.is_available(capability)
                        }
                    }
            })
            .collect();
        techs.sort_by_key(|t| t.tier);
        techs
    }

    /// Technologies the nation could unlock right now, every gate included.
    /// Fails only when a provider cannot resolve the nation.
    pub fn researchable_techs(
        &self,
        nation: &NationId,
    ) -> Result<Vec<&Technology>, ResearchDenial> {
        let unlocked = self.ledger.unlocked(nation);
        let mut techs = Vec::new();
        for tech in self.registry.all() {
            if self.evaluate(tech, nation, &unlocked)?.can_research() {
                techs.push(tech);
            }
        }
        techs.sort_by_key(|t| t.tier);
        Ok(techs)
    }

    /// Technologies one tier above the nation's highest unlocked tier
    /// (tier 1 for a fresh nation). The natural "what to aim for next"
    /// list; ignores eligibility.
    pub fn next_tier_techs(&self, nation: &NationId) -> Vec<&Technology> {
        let unlocked = self.ledger.unlocked(nation);
        let max_tier = unlocked
            .iter()
            .filter_map(|id| self.registry.get(id.as_str()))
            .map(|t| t.tier)
            .max()
            .unwrap_or(0);
        self.registry.by_tier(max_tier + 1).collect()
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Periodic hook reserved for time-gated research. Acquires each
    /// nation's lock in turn, which is where future completion checks will
    /// run so they serialize with research attempts. Callers schedule it;
    /// the resolver never spawns threads.
    pub fn maintenance_tick(&self) {
        for nation in self.ledger.nations() {
            self.ledger.with_nation(&nation, |_unlocked| {
                // Future: complete pending research whose timer elapsed.
            });
        }
    }
}

fn denied(tech: &TechId, denial: ResearchDenial, status: ResearchStatus) -> ResearchResult {
    ResearchResult {
        tech: tech.clone(),
        outcome: ResearchOutcome::Denied(denial),
        status,
    }
}

fn denial_from_provider(e: ProviderError) -> ResearchDenial {
    match e {
        ProviderError::EntityNotFound(nation) => ResearchDenial::EntityNotFound(nation),
        ProviderError::InsufficientFunds { needed, available } => {
            ResearchDenial::InsufficientFunds { needed, available }
        }
    }
}
