//! Client façade wiring the protocol components together.
//!
//! Runs on the UI's per-frame loop: the transport drains inbound messages
//! into `handle_server_message`, UI input arrives as `Intent` values, and
//! `tick` advances every deadline and animation clock. Outbound messages
//! accumulate in the outbox until the transport flushes them.

use tidewater_protocol::{
    AllianceSide, BattleId, ClientMessage, CombatCard, EventPayload, PlayerId, ServerMessage,
    TerritoryId,
};
use tracing::{debug, info, warn};

use crate::ack::EventAckQueue;
use crate::attack::{AttackError, AttackResolutionCoordinator};
use crate::cards::{CardCombatNegotiator, WindowMode};
use crate::config::ClientConfig;
use crate::intent::Intent;
use crate::outbox::Outbox;
use crate::turn::TurnPhaseController;

/// A pending alliance vote request from the server, held for the UI.
#[derive(Clone, Debug)]
pub struct PendingAllianceRequest {
    pub battle: BattleId,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub territory: TerritoryId,
    pub your_strength: u32,
    pub deadline_frames: u32,
}

/// The client-side protocol core for one connected player.
#[derive(Debug)]
pub struct GameClient {
    config: ClientConfig,
    turn: TurnPhaseController,
    attack: AttackResolutionCoordinator,
    negotiator: CardCombatNegotiator,
    events: EventAckQueue,
    outbox: Outbox,
    /// Dealt combat cards, replaced by snapshots.
    hand: Vec<CombatCard>,
    alliance_request: Option<PendingAllianceRequest>,
}

impl GameClient {
    pub fn new(local_player: PlayerId, config: ClientConfig) -> Self {
        Self {
            turn: TurnPhaseController::new(local_player),
            attack: AttackResolutionCoordinator::new(local_player),
            negotiator: CardCombatNegotiator::new(),
            events: EventAckQueue::new(config.playback.clone()),
            outbox: Outbox::new(),
            hand: Vec::new(),
            alliance_request: None,
            config,
        }
    }

    pub fn turn(&self) -> &TurnPhaseController {
        &self.turn
    }

    pub fn attack(&self) -> &AttackResolutionCoordinator {
        &self.attack
    }

    pub fn negotiator(&self) -> &CardCombatNegotiator {
        &self.negotiator
    }

    pub fn events(&self) -> &EventAckQueue {
        &self.events
    }

    pub fn hand(&self) -> &[CombatCard] {
        &self.hand
    }

    pub fn alliance_request(&self) -> Option<&PendingAllianceRequest> {
        self.alliance_request.as_ref()
    }

    /// Whether "End Turn" may be offered right now.
    pub fn can_end_turn(&self) -> bool {
        self.turn.can_end_turn(self.attack.in_progress())
    }

    /// Take all outbound messages for the transport to flush.
    pub fn drain_outbox(&mut self) -> Vec<ClientMessage> {
        self.outbox.drain()
    }

    /// Classify and file one inbound server message.
    pub fn handle_server_message(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::AttackPreview {
                target,
                base_attack_strength,
                base_defense_strength,
            } => {
                self.attack
                    .apply_preview(target, base_attack_strength, base_defense_strength);
            }

            ServerMessage::AttackPlanResolved {
                plan,
                attack_strength,
                defense_strength,
                allies,
            } => {
                self.attack
                    .apply_resolution(plan, attack_strength, defense_strength, allies);
            }

            ServerMessage::AttackRejected { plan, reason } => {
                self.attack.apply_rejection(plan, reason);
            }

            ServerMessage::AllianceRequest {
                battle,
                attacker,
                defender,
                territory,
                your_strength,
                deadline_frames,
            } => {
                self.alliance_request = Some(PendingAllianceRequest {
                    battle,
                    attacker,
                    defender,
                    territory,
                    your_strength,
                    deadline_frames,
                });
            }

            ServerMessage::DefenseCardRequest {
                battle,
                attacker,
                territory,
                eligible,
                deadline_frames,
            } => {
                // Defense windows only open on this push; it cannot coincide
                // with the local player being the attacker of this battle.
                let context = format!(
                    "Player {} is attacking territory {}. Choose defense cards.",
                    attacker.0, territory.0
                );
                self.negotiator.open(
                    WindowMode::Defense { battle },
                    eligible,
                    context,
                    Some(deadline_frames),
                );
            }

            ServerMessage::Events { events } => {
                for event in events {
                    self.events.enqueue(event, &mut self.outbox);
                }
            }

            ServerMessage::TurnUpdate {
                round,
                phase,
                turn_holder,
            } => {
                if self.turn.apply_turn_update(round, phase, turn_holder) {
                    info!(round, ?phase, "your turn");
                }
            }

            ServerMessage::Snapshot {
                round,
                phase,
                turn_holder,
                hand,
            } => {
                self.resync(round, phase, turn_holder, hand);
            }
        }
    }

    /// Apply one UI intent, driving local state transitions.
    pub fn handle_intent(&mut self, intent: Intent) {
        let result = self.apply_intent(intent);
        if let Err(err) = result {
            // Invalid local actions never reach the server.
            warn!(%err, "intent rejected");
        }
    }

    fn apply_intent(&mut self, intent: Intent) -> Result<(), AttackError> {
        match intent {
            Intent::PreviewAttack { target } => self.attack.show_preview(target, &mut self.outbox),

            Intent::SubmitAttackPlan { reinforcement } => {
                let deadline = self
                    .config
                    .alliance
                    .deadline_frames(self.config.frames_per_second);
                self.attack
                    .submit_plan(reinforcement, deadline, &mut self.outbox)
                    .map(|_| ())
            }

            Intent::ConfirmAttack => {
                let opened = self.attack.confirm(
                    self.config.card_combat_enabled,
                    &self.hand,
                    &mut self.outbox,
                )?;
                if let Some(eligible) = opened {
                    let target = self
                        .attack
                        .plan()
                        .map(|p| p.target)
                        .ok_or(AttackError::NoPlan)?;
                    let context =
                        format!("Choose attack cards for territory {}.", target.0);
                    self.negotiator
                        .open(WindowMode::Attack, eligible, context, None);
                }
                Ok(())
            }

            Intent::CancelAttack => {
                // An open attack card window belongs to the cancelled plan.
                if let Some(window) = self.negotiator.window() {
                    if window.mode == WindowMode::Attack {
                        self.negotiator.skip();
                    }
                }
                self.attack.cancel(&mut self.outbox)
            }

            Intent::ToggleCard { card } => {
                self.negotiator.toggle(card);
                Ok(())
            }

            Intent::CommitCards => {
                if let Some((mode, cards)) = self.negotiator.commit() {
                    self.dispatch_card_selection(mode, cards)?;
                }
                Ok(())
            }

            Intent::SkipCards => {
                if let Some(mode) = self.negotiator.skip() {
                    self.dispatch_card_selection(mode, Vec::new())?;
                }
                Ok(())
            }

            Intent::CastAllianceVote { battle, side } => {
                self.cast_alliance_vote(battle, side);
                Ok(())
            }

            Intent::DismissPrompt => {
                if let Some(live) = self.events.live() {
                    let id = live.event.id;
                    if let Some(done) = self.events.complete(id, &mut self.outbox) {
                        self.after_event_playback(&done);
                    }
                }
                Ok(())
            }

            Intent::EndTurn => {
                if !self.can_end_turn() {
                    debug!("end turn not available");
                    return Ok(());
                }
                if let Some(state) = self.turn.state() {
                    self.outbox.push(ClientMessage::EndTurn { round: state.round });
                }
                Ok(())
            }
        }
    }

    /// Advance every frame-driven clock: event playback, the defense card
    /// deadline, and the alliance wait.
    pub fn tick(&mut self, frames: u32) {
        if let Some(done) = self.events.tick(frames, &mut self.outbox) {
            self.after_event_playback(&done);
        }

        if let Some(auto) = self.negotiator.tick(frames) {
            self.outbox.push(ClientMessage::SelectDefenseCards {
                battle: auto.battle,
                cards: auto.cards,
            });
        }

        self.attack.tick(frames);
    }

    fn dispatch_card_selection(
        &mut self,
        mode: WindowMode,
        cards: Vec<tidewater_protocol::CardId>,
    ) -> Result<(), AttackError> {
        match mode {
            WindowMode::Attack => self.attack.execute_with_cards(cards, &mut self.outbox),
            WindowMode::Defense { battle } => {
                self.outbox
                    .push(ClientMessage::SelectDefenseCards { battle, cards });
                Ok(())
            }
        }
    }

    fn cast_alliance_vote(&mut self, battle: BattleId, side: AllianceSide) {
        let pending = self
            .alliance_request
            .as_ref()
            .is_some_and(|r| r.battle == battle);
        if !pending {
            debug!(?battle, "vote for no pending alliance request");
            return;
        }
        self.alliance_request = None;
        self.outbox.push(ClientMessage::AllianceVote { battle, side });
    }

    /// React to an event finishing local playback. A combat result carrying
    /// our plan id resolves the executing plan.
    fn after_event_playback(&mut self, event: &tidewater_protocol::GameEvent) {
        if let EventPayload::Combat(result) = &event.payload {
            if let Some(plan_id) = result.plan {
                self.attack.resolve_from_combat(plan_id);
            }
        }
    }

    /// Discard all non-terminal state and resynchronize from a snapshot.
    fn resync(
        &mut self,
        round: u32,
        phase: tidewater_protocol::Phase,
        turn_holder: PlayerId,
        hand: Vec<CombatCard>,
    ) {
        info!(round, ?phase, "resynchronizing from snapshot");
        self.attack.reset();
        self.negotiator.reset();
        self.events.reset();
        self.alliance_request = None;
        self.hand = hand;
        self.turn.reset();
        self.turn.apply_turn_update(round, phase, turn_holder);
    }
}
