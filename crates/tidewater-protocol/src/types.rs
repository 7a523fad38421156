use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BattleId, CardId, PlanId, PlayerId, TerritoryId, WaterBodyId};

/// The six phases of a round. Exactly one is active at a time.
///
/// Development is skipped in round 1; the server announces the skip with a
/// `PhaseSkip` event rather than silently jumping ahead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    TerritorySelection,
    Production,
    Trade,
    Shipment,
    Conquest,
    Development,
}

impl Phase {
    /// Whether players issue actions during this phase.
    ///
    /// Production is simultaneous and automatic, so it is the only phase
    /// without player actions.
    pub fn is_action_phase(self) -> bool {
        !matches!(self, Phase::Production)
    }
}

/// Unit kinds that can reinforce an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Stockpile,
    Horse,
    Boat,
}

impl UnitKind {
    /// Horses and boats can carry a weapon into battle.
    pub fn can_carry_weapon(self) -> bool {
        matches!(self, UnitKind::Horse | UnitKind::Boat)
    }

    /// Only boats can carry a horse.
    pub fn can_carry_horse(self) -> bool {
        matches!(self, UnitKind::Boat)
    }
}

/// An additional unit contributed to an attack beyond the territory's base
/// strength.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reinforcement {
    pub unit_kind: UnitKind,
    pub from_territory: TerritoryId,
    #[serde(default)]
    pub carry_weapon: bool,
    #[serde(default)]
    pub carry_horse: bool,
    /// Required for boats, absent otherwise.
    #[serde(default)]
    pub water_body: Option<WaterBodyId>,
}

/// Local validation failures for a reinforcement selection.
///
/// These gate UI actions only; the server revalidates reachability and cargo
/// availability at execution time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReinforcementError {
    #[error("{0:?} cannot carry a weapon")]
    WeaponNotSupported(UnitKind),
    #[error("{0:?} cannot carry a horse")]
    HorseNotSupported(UnitKind),
    #[error("boat reinforcement requires a water body")]
    MissingWaterBody,
    #[error("{0:?} does not travel by water")]
    UnexpectedWaterBody(UnitKind),
}

impl Reinforcement {
    /// Check that cargo flags and the water body are consistent with the
    /// unit kind.
    pub fn validate(&self) -> Result<(), ReinforcementError> {
        if self.carry_weapon && !self.unit_kind.can_carry_weapon() {
            return Err(ReinforcementError::WeaponNotSupported(self.unit_kind));
        }
        if self.carry_horse && !self.unit_kind.can_carry_horse() {
            return Err(ReinforcementError::HorseNotSupported(self.unit_kind));
        }
        match (self.unit_kind, self.water_body) {
            (UnitKind::Boat, None) => Err(ReinforcementError::MissingWaterBody),
            (UnitKind::Boat, Some(_)) => Ok(()),
            (kind, Some(_)) => Err(ReinforcementError::UnexpectedWaterBody(kind)),
            (_, None) => Ok(()),
        }
    }
}

/// Combat card rarity tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRarity {
    Common,
    Uncommon,
    Rare,
    UltraRare,
}

/// Which side of a battle a card can be played on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Attack,
    Defense,
}

/// A dealt combat card. Immutable once dealt; identified by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatCard {
    pub id: CardId,
    pub name: String,
    pub rarity: CardRarity,
    pub kind: CardKind,
    pub description: String,
}

/// Which combatant a third-party ally reinforces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllianceSide {
    Attacker,
    Defender,
}

/// One ally's contribution, as decided by the server-run alliance vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllyBreakdown {
    pub player: PlayerId,
    pub side: AllianceSide,
    pub contributed_strength: u32,
}

/// Final outcome of one battle.
///
/// `plan` is present only for the attacking client's own plan; observers of
/// the same battle receive `None`. On equal strengths `attacker_wins` is
/// authoritative; the client never breaks ties itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    #[serde(default)]
    pub plan: Option<PlanId>,
    pub battle: BattleId,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub territory: TerritoryId,
    pub attack_strength: u32,
    pub defense_strength: u32,
    pub attacker_wins: bool,
    pub territory_captured: bool,
}

/// Card play reveal for a battle. Omitted entirely by the server when
/// neither side played any cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardReveal {
    pub battle: BattleId,
    pub attacker_cards: Vec<CombatCard>,
    pub defender_cards: Vec<CombatCard>,
    /// Cards whose effects were negated by opposing plays.
    pub negated_cards: Vec<CardId>,
    pub final_attack_strength: u32,
    pub final_defense_strength: u32,
    pub bribe_activated: bool,
    pub sabotage_count: u32,
    pub safe_retreat: bool,
}

impl CardReveal {
    /// True when neither side played any cards. Such a reveal is never
    /// displayed.
    pub fn is_empty(&self) -> bool {
        self.attacker_cards.is_empty() && self.defender_cards.is_empty()
    }
}

/// Per-territory output of a production phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryYield {
    pub territory: TerritoryId,
    pub owner: PlayerId,
    pub stockpiles_gained: u32,
}

/// Aggregated results of the simultaneous production phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionResults {
    pub round: u32,
    pub yields: Vec<TerritoryYield>,
}

/// Why a phase was skipped for this round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseSkipReason {
    /// Development does not run in round 1.
    FirstRound,
    /// No player had a legal action in the phase.
    NoEligiblePlayers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_phases() {
        assert!(Phase::TerritorySelection.is_action_phase());
        assert!(Phase::Trade.is_action_phase());
        assert!(Phase::Shipment.is_action_phase());
        assert!(Phase::Conquest.is_action_phase());
        assert!(Phase::Development.is_action_phase());
        assert!(!Phase::Production.is_action_phase());
    }

    #[test]
    fn reinforcement_cargo_rules() {
        let stockpile = Reinforcement {
            unit_kind: UnitKind::Stockpile,
            from_territory: TerritoryId(3),
            carry_weapon: false,
            carry_horse: false,
            water_body: None,
        };
        assert!(stockpile.validate().is_ok());

        let armed_stockpile = Reinforcement {
            carry_weapon: true,
            ..stockpile.clone()
        };
        assert_eq!(
            armed_stockpile.validate(),
            Err(ReinforcementError::WeaponNotSupported(UnitKind::Stockpile))
        );

        let horse = Reinforcement {
            unit_kind: UnitKind::Horse,
            from_territory: TerritoryId(3),
            carry_weapon: true,
            carry_horse: false,
            water_body: None,
        };
        assert!(horse.validate().is_ok());

        let horse_on_horse = Reinforcement {
            carry_horse: true,
            ..horse
        };
        assert_eq!(
            horse_on_horse.validate(),
            Err(ReinforcementError::HorseNotSupported(UnitKind::Horse))
        );
    }

    #[test]
    fn boat_requires_water_body() {
        let boat = Reinforcement {
            unit_kind: UnitKind::Boat,
            from_territory: TerritoryId(9),
            carry_weapon: true,
            carry_horse: true,
            water_body: None,
        };
        assert_eq!(boat.validate(), Err(ReinforcementError::MissingWaterBody));

        let boat = Reinforcement {
            water_body: Some(WaterBodyId(2)),
            ..boat
        };
        assert!(boat.validate().is_ok());

        let landlocked_horse = Reinforcement {
            unit_kind: UnitKind::Horse,
            from_territory: TerritoryId(9),
            carry_weapon: false,
            carry_horse: false,
            water_body: Some(WaterBodyId(2)),
        };
        assert_eq!(
            landlocked_horse.validate(),
            Err(ReinforcementError::UnexpectedWaterBody(UnitKind::Horse))
        );
    }

    #[test]
    fn empty_reveal_detection() {
        let mut reveal = CardReveal {
            battle: BattleId(1),
            attacker_cards: vec![],
            defender_cards: vec![],
            negated_cards: vec![],
            final_attack_strength: 4,
            final_defense_strength: 3,
            bribe_activated: false,
            sabotage_count: 0,
            safe_retreat: false,
        };
        assert!(reveal.is_empty());

        reveal.defender_cards.push(CombatCard {
            id: CardId(7),
            name: "Palisade".into(),
            rarity: CardRarity::Common,
            kind: CardKind::Defense,
            description: "+1 defense".into(),
        });
        assert!(!reveal.is_empty());
    }
}
