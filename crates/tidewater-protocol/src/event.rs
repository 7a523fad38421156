use serde::{Deserialize, Serialize};

use crate::{
    CardReveal, CombatResult, EventId, Phase, PhaseSkipReason, PlayerId, ProductionResults,
    TerritoryId,
};

/// A server-pushed outcome notification.
///
/// Events are produced in the order the authoritative simulation resolves
/// them and must be played back locally in exactly that order. Events with
/// `requires_ack` gate the server's progression on a `ClientReady` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub requires_ack: bool,
    pub payload: EventPayload,
}

/// The outcome carried by a game event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    /// Final result of a battle.
    Combat(CombatResult),
    /// Simultaneous production phase output.
    Production(ProductionResults),
    /// A stockpile changed hands outside regular combat math.
    StockpileCapture {
        territory: TerritoryId,
        by: PlayerId,
        from: PlayerId,
        stockpiles: u32,
    },
    /// Cards played in a battle, revealed before the combat result.
    CardReveal(CardReveal),
    /// A phase was skipped this round.
    PhaseSkip {
        phase: Phase,
        reason: PhaseSkipReason,
    },
}

/// Event kind tag, reported back to the server in `ClientReady`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Combat,
    Production,
    StockpileCapture,
    CardReveal,
    PhaseSkip,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self.payload {
            EventPayload::Combat(_) => EventKind::Combat,
            EventPayload::Production(_) => EventKind::Production,
            EventPayload::StockpileCapture { .. } => EventKind::StockpileCapture,
            EventPayload::CardReveal(_) => EventKind::CardReveal,
            EventPayload::PhaseSkip { .. } => EventKind::PhaseSkip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BattleId;

    #[test]
    fn kind_matches_payload() {
        let event = GameEvent {
            id: EventId(1),
            requires_ack: true,
            payload: EventPayload::PhaseSkip {
                phase: Phase::Development,
                reason: PhaseSkipReason::FirstRound,
            },
        };
        assert_eq!(event.kind(), EventKind::PhaseSkip);

        let event = GameEvent {
            id: EventId(2),
            requires_ack: true,
            payload: EventPayload::Combat(CombatResult {
                plan: None,
                battle: BattleId(4),
                attacker: PlayerId(0),
                defender: PlayerId(1),
                territory: TerritoryId(7),
                attack_strength: 4,
                defense_strength: 4,
                attacker_wins: false,
                territory_captured: false,
            }),
        };
        assert_eq!(event.kind(), EventKind::Combat);
    }
}
