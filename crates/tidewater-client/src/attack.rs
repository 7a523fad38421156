//! Attack lifecycle: preview, plan, alliance wait, confirmation, cards,
//! execution.
//!
//! The whole negotiation is one state machine on `PlanStatus`; render and
//! allow-action logic switch on that single field. At most one plan is
//! non-terminal at a time.

use thiserror::Error;
use tidewater_protocol::{
    AllyBreakdown, ClientMessage, CombatCard, PlanId, PlayerId, Reinforcement,
    ReinforcementError, TerritoryId,
};
use tracing::{debug, info, warn};

use crate::alliance::AllianceWaitTracker;
use crate::outbox::Outbox;

/// Attack plan lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanStatus {
    /// Display-only preview of the target; nothing sent to the server yet.
    Previewing,
    /// `RequestAttackPlan` sent. Transient; moves straight to the alliance
    /// wait.
    PlanSubmitted,
    /// The server is running the alliance vote.
    AwaitingAllianceResolution,
    /// Vote resolved; waiting for the attacker to confirm or cancel.
    AwaitingConfirmation,
    /// Attacker is choosing attack cards.
    AwaitingAttackCards,
    /// Execution requested; the combat result arrives as a game event.
    Executing,
    /// Terminal: combat played out.
    Resolved,
    /// Terminal: aborted locally or rejected by the server.
    Cancelled { reason: String },
}

impl PlanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Resolved | PlanStatus::Cancelled { .. })
    }
}

/// The local record of an in-progress attack negotiation.
#[derive(Clone, Debug)]
pub struct AttackPlan {
    /// Allocated locally at submission; `None` while previewing.
    pub id: Option<PlanId>,
    pub attacker: PlayerId,
    pub target: TerritoryId,
    /// Base strengths from the preview, before allies.
    pub base_attack_strength: u32,
    pub base_defense_strength: u32,
    /// Vote-resolved strengths, authoritative and ally-inclusive.
    pub resolved_attack_strength: Option<u32>,
    pub resolved_defense_strength: Option<u32>,
    pub allies: Vec<AllyBreakdown>,
    pub reinforcement: Option<Reinforcement>,
    pub status: PlanStatus,
}

/// Rejected local attack actions. Never sent to the server.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttackError {
    #[error("an attack is already in progress")]
    PlanInProgress,
    #[error("no attack plan in progress")]
    NoPlan,
    #[error("attack plan is not in a state that allows this (status {status})")]
    WrongStatus { status: &'static str },
    #[error("invalid reinforcement: {0}")]
    InvalidReinforcement(#[from] ReinforcementError),
}

/// Orchestrates the full attack lifecycle and owns the single active plan.
#[derive(Debug)]
pub struct AttackResolutionCoordinator {
    local_player: PlayerId,
    plan: Option<AttackPlan>,
    alliance: AllianceWaitTracker,
    /// Locally allocated plan ids, echoed by the server.
    next_plan_id: u32,
}

impl AttackResolutionCoordinator {
    pub fn new(local_player: PlayerId) -> Self {
        Self {
            local_player,
            plan: None,
            alliance: AllianceWaitTracker::new(),
            next_plan_id: 1,
        }
    }

    pub fn plan(&self) -> Option<&AttackPlan> {
        self.plan.as_ref()
    }

    pub fn alliance(&self) -> &AllianceWaitTracker {
        &self.alliance
    }

    /// True while a plan exists and is non-terminal. Gates end-turn and new
    /// previews.
    pub fn in_progress(&self) -> bool {
        self.plan.as_ref().is_some_and(|p| !p.status.is_terminal())
    }

    /// Begin previewing an attack on a territory. Display-only; asks the
    /// server for base strengths without touching authoritative state.
    pub fn show_preview(
        &mut self,
        target: TerritoryId,
        outbox: &mut Outbox,
    ) -> Result<(), AttackError> {
        if self.in_progress() {
            return Err(AttackError::PlanInProgress);
        }
        self.plan = Some(AttackPlan {
            id: None,
            attacker: self.local_player,
            target,
            base_attack_strength: 0,
            base_defense_strength: 0,
            resolved_attack_strength: None,
            resolved_defense_strength: None,
            allies: Vec::new(),
            reinforcement: None,
            status: PlanStatus::Previewing,
        });
        outbox.push(ClientMessage::RequestAttackPreview { target });
        Ok(())
    }

    /// Preview strengths arrived from the server.
    pub fn apply_preview(&mut self, target: TerritoryId, attack: u32, defense: u32) {
        match self.plan.as_mut() {
            Some(plan) if plan.status == PlanStatus::Previewing && plan.target == target => {
                plan.base_attack_strength = attack;
                plan.base_defense_strength = defense;
            }
            _ => debug!(?target, "dropping preview for no matching plan"),
        }
    }

    /// Submit the previewed plan, opening the alliance vote on the server.
    ///
    /// The reinforcement is validated locally only to gate the UI; the
    /// server revalidates at execution time.
    pub fn submit_plan(
        &mut self,
        reinforcement: Option<Reinforcement>,
        alliance_deadline_frames: u32,
        outbox: &mut Outbox,
    ) -> Result<PlanId, AttackError> {
        let plan = self.plan.as_mut().ok_or(AttackError::NoPlan)?;
        if plan.status != PlanStatus::Previewing {
            return Err(AttackError::WrongStatus {
                status: status_name(&plan.status),
            });
        }
        if let Some(r) = &reinforcement {
            r.validate()?;
        }

        let id = PlanId(self.next_plan_id);
        self.next_plan_id += 1;

        plan.id = Some(id);
        plan.reinforcement = reinforcement.clone();
        plan.status = PlanStatus::PlanSubmitted;
        outbox.push(ClientMessage::RequestAttackPlan {
            plan: id,
            target: plan.target,
            reinforcement,
        });

        // The wait begins as soon as the request is out.
        plan.status = PlanStatus::AwaitingAllianceResolution;
        self.alliance.begin(id, alliance_deadline_frames);
        info!(plan = ?id, target = ?plan.target, "attack plan submitted");
        Ok(id)
    }

    /// The server resolved the alliance vote for a plan. Late resolutions
    /// for cancelled or unknown plans are dropped silently.
    pub fn apply_resolution(
        &mut self,
        plan_id: PlanId,
        attack_strength: u32,
        defense_strength: u32,
        allies: Vec<AllyBreakdown>,
    ) {
        let matches = self.plan.as_ref().is_some_and(|p| {
            p.id == Some(plan_id) && p.status == PlanStatus::AwaitingAllianceResolution
        });
        if !matches {
            debug!(plan = ?plan_id, "dropping stale attack plan resolution");
            return;
        }
        self.alliance.resolve(plan_id);
        if let Some(plan) = self.plan.as_mut() {
            plan.resolved_attack_strength = Some(attack_strength);
            plan.resolved_defense_strength = Some(defense_strength);
            plan.allies = allies;
            plan.status = PlanStatus::AwaitingConfirmation;
        }
    }

    /// The server rejected the plan or its execution. Terminal, no retry.
    pub fn apply_rejection(&mut self, plan_id: PlanId, reason: String) {
        let matches = self
            .plan
            .as_ref()
            .is_some_and(|p| p.id == Some(plan_id) && !p.status.is_terminal());
        if !matches {
            debug!(plan = ?plan_id, "dropping rejection for unknown plan");
            return;
        }
        warn!(plan = ?plan_id, %reason, "attack plan rejected by server");
        self.alliance.clear();
        if let Some(plan) = self.plan.as_mut() {
            plan.status = PlanStatus::Cancelled { reason };
        }
    }

    /// Confirm the resolved plan. Returns the attacker's eligible cards when
    /// a card window must open; otherwise execution is requested directly.
    pub fn confirm(
        &mut self,
        card_combat_enabled: bool,
        hand: &[CombatCard],
        outbox: &mut Outbox,
    ) -> Result<Option<Vec<CombatCard>>, AttackError> {
        let plan = self.plan.as_mut().ok_or(AttackError::NoPlan)?;
        if plan.status != PlanStatus::AwaitingConfirmation {
            return Err(AttackError::WrongStatus {
                status: status_name(&plan.status),
            });
        }

        let eligible: Vec<CombatCard> = hand
            .iter()
            .filter(|c| c.kind == tidewater_protocol::CardKind::Attack)
            .cloned()
            .collect();

        if card_combat_enabled && !eligible.is_empty() {
            plan.status = PlanStatus::AwaitingAttackCards;
            return Ok(Some(eligible));
        }

        let id = plan.id.ok_or(AttackError::NoPlan)?;
        plan.status = PlanStatus::Executing;
        outbox.push(ClientMessage::ExecuteAttackWithPlan {
            target: plan.target,
            plan: id,
            reinforcement: plan.reinforcement.clone(),
        });
        Ok(None)
    }

    /// The attack card window closed (commit or skip). Sends the execute
    /// request with the chosen cards, empty on skip.
    pub fn execute_with_cards(
        &mut self,
        cards: Vec<tidewater_protocol::CardId>,
        outbox: &mut Outbox,
    ) -> Result<(), AttackError> {
        let plan = self.plan.as_mut().ok_or(AttackError::NoPlan)?;
        if plan.status != PlanStatus::AwaitingAttackCards {
            return Err(AttackError::WrongStatus {
                status: status_name(&plan.status),
            });
        }
        let id = plan.id.ok_or(AttackError::NoPlan)?;
        plan.status = PlanStatus::Executing;
        outbox.push(ClientMessage::ExecuteAttackWithCards {
            target: plan.target,
            plan: id,
            reinforcement: plan.reinforcement.clone(),
            cards,
        });
        Ok(())
    }

    /// Local abort. Legal from every state before `Executing`; never legal
    /// once execution was requested. A cancel notice goes out only when the
    /// plan was already submitted; the server's own vote timeout
    /// self-resolves in any case.
    pub fn cancel(&mut self, outbox: &mut Outbox) -> Result<(), AttackError> {
        let plan = self.plan.as_mut().ok_or(AttackError::NoPlan)?;
        match plan.status {
            PlanStatus::Executing => Err(AttackError::WrongStatus { status: "Executing" }),
            _ if plan.status.is_terminal() => Err(AttackError::NoPlan),
            PlanStatus::Previewing => {
                plan.status = PlanStatus::Cancelled {
                    reason: "cancelled".into(),
                };
                Ok(())
            }
            _ => {
                if let Some(id) = plan.id {
                    outbox.push(ClientMessage::CancelAttackPlan { plan: id });
                }
                plan.status = PlanStatus::Cancelled {
                    reason: "cancelled".into(),
                };
                self.alliance.clear();
                Ok(())
            }
        }
    }

    /// The alliance wait passed its local deadline without a resolution.
    pub fn alliance_timed_out(&mut self, plan_id: PlanId) {
        let matches = self.plan.as_ref().is_some_and(|p| {
            p.id == Some(plan_id) && p.status == PlanStatus::AwaitingAllianceResolution
        });
        if !matches {
            return;
        }
        if let Some(plan) = self.plan.as_mut() {
            plan.status = PlanStatus::Cancelled {
                reason: "alliance vote timed out".into(),
            };
        }
    }

    /// Advance the alliance wait clock.
    pub fn tick(&mut self, frames: u32) {
        if let Some(plan_id) = self.alliance.tick(frames) {
            self.alliance_timed_out(plan_id);
        }
    }

    /// The combat result for a plan finished local playback.
    pub fn resolve_from_combat(&mut self, plan_id: PlanId) {
        let matches = self
            .plan
            .as_ref()
            .is_some_and(|p| p.id == Some(plan_id) && p.status == PlanStatus::Executing);
        if !matches {
            debug!(plan = ?plan_id, "combat result for no executing plan");
            return;
        }
        if let Some(plan) = self.plan.as_mut() {
            plan.status = PlanStatus::Resolved;
            info!(plan = ?plan_id, "attack plan resolved");
        }
    }

    /// Discard all non-terminal state (reconnect resync).
    pub fn reset(&mut self) {
        self.plan = None;
        self.alliance.clear();
    }
}

fn status_name(status: &PlanStatus) -> &'static str {
    match status {
        PlanStatus::Previewing => "Previewing",
        PlanStatus::PlanSubmitted => "PlanSubmitted",
        PlanStatus::AwaitingAllianceResolution => "AwaitingAllianceResolution",
        PlanStatus::AwaitingConfirmation => "AwaitingConfirmation",
        PlanStatus::AwaitingAttackCards => "AwaitingAttackCards",
        PlanStatus::Executing => "Executing",
        PlanStatus::Resolved => "Resolved",
        PlanStatus::Cancelled { .. } => "Cancelled",
    }
}
