//! Client/server messages for the attack-resolution and event-ack protocol.
//!
//! The transport (out of scope here) delivers these ordered and exactly once
//! within a session, and signals recovery with a fresh `Snapshot`.

use serde::{Deserialize, Serialize};

use crate::{
    AllianceSide, AllyBreakdown, BattleId, CardId, CombatCard, EventId, EventKind, GameEvent,
    Phase, PlanId, PlayerId, Reinforcement, TerritoryId,
};

/// Client-to-server messages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Ask for a display-only combat preview of a target territory.
    RequestAttackPreview { target: TerritoryId },
    /// Submit an attack plan. Starts the server-run alliance vote.
    ///
    /// `plan` is allocated by this client and echoed by the server in the
    /// resolution, so stale resolutions stay attributable after a cancel.
    RequestAttackPlan {
        plan: PlanId,
        target: TerritoryId,
        #[serde(default)]
        reinforcement: Option<Reinforcement>,
    },
    /// Notify the server of a local abort after plan submission. Best
    /// effort; the server's vote timeout self-resolves regardless.
    CancelAttackPlan { plan: PlanId },
    /// Execute a confirmed attack without card play.
    ExecuteAttackWithPlan {
        target: TerritoryId,
        plan: PlanId,
        #[serde(default)]
        reinforcement: Option<Reinforcement>,
    },
    /// Execute a confirmed attack with the attacker's card selection
    /// (empty on skip).
    ExecuteAttackWithCards {
        target: TerritoryId,
        plan: PlanId,
        #[serde(default)]
        reinforcement: Option<Reinforcement>,
        cards: Vec<CardId>,
    },
    /// Third-party vote in an alliance poll.
    AllianceVote { battle: BattleId, side: AllianceSide },
    /// Defender's card selection for a battle (empty on skip or deadline).
    SelectDefenseCards { battle: BattleId, cards: Vec<CardId> },
    /// Local playback of an event finished; the server may advance past it.
    ClientReady { event: EventId, kind: EventKind },
    /// End the local player's turn.
    EndTurn { round: u32 },
}

/// Server-to-client messages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Display-only preview of attacking a territory.
    AttackPreview {
        target: TerritoryId,
        base_attack_strength: u32,
        base_defense_strength: u32,
    },
    /// The alliance vote for a submitted plan has concluded. Resolved
    /// strengths already include all ally contributions.
    AttackPlanResolved {
        plan: PlanId,
        attack_strength: u32,
        defense_strength: u32,
        allies: Vec<AllyBreakdown>,
    },
    /// A plan or execution was rejected (target no longer valid,
    /// reinforcement now illegal, insufficient resources).
    AttackRejected { plan: PlanId, reason: String },
    /// Pushed to third-party neighbors of a battle: cast a vote before the
    /// deadline.
    AllianceRequest {
        battle: BattleId,
        attacker: PlayerId,
        defender: PlayerId,
        territory: TerritoryId,
        your_strength: u32,
        deadline_frames: u32,
    },
    /// Pushed to the defender after attack confirmation: choose defense
    /// cards before the deadline.
    DefenseCardRequest {
        battle: BattleId,
        attacker: PlayerId,
        territory: TerritoryId,
        eligible: Vec<CombatCard>,
        deadline_frames: u32,
    },
    /// A batch of ordered game events for local playback.
    Events { events: Vec<GameEvent> },
    /// Authoritative round/phase/turn broadcast. Replaces local turn state
    /// wholesale.
    TurnUpdate {
        round: u32,
        phase: Phase,
        turn_holder: PlayerId,
    },
    /// Reconnect/recovery snapshot. The client discards all non-terminal
    /// local state and resynchronizes from these fields.
    Snapshot {
        round: u32,
        phase: Phase,
        turn_holder: PlayerId,
        hand: Vec<CombatCard>,
    },
}
