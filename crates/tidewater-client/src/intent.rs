use serde::{Deserialize, Serialize};

use tidewater_protocol::{AllianceSide, BattleId, CardId, Reinforcement, TerritoryId};

/// All possible UI→client intents. Fully serializable.
///
/// UI input produces these values instead of wiring callbacks into the
/// coordinator, so the protocol core stays testable without a rendering
/// harness.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Intent {
    // Attack flow
    PreviewAttack {
        target: TerritoryId,
    },
    SubmitAttackPlan {
        #[serde(default)]
        reinforcement: Option<Reinforcement>,
    },
    ConfirmAttack,
    CancelAttack,

    // Card window
    ToggleCard { card: CardId },
    CommitCards,
    SkipCards,

    // Alliance vote (third-party)
    CastAllianceVote { battle: BattleId, side: AllianceSide },

    // Event playback
    DismissPrompt,

    // Turn flow
    EndTurn,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_wire_shape() {
        let intent = Intent::PreviewAttack {
            target: TerritoryId(7),
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value, json!({ "type": "PreviewAttack", "target": 7 }));

        // Unit variants carry the tag alone
        let value = serde_json::to_value(&Intent::EndTurn).unwrap();
        assert_eq!(value, json!({ "type": "EndTurn" }));

        // Omitted reinforcement defaults to None on decode
        let intent: Intent =
            serde_json::from_value(json!({ "type": "SubmitAttackPlan" })).unwrap();
        assert!(matches!(
            intent,
            Intent::SubmitAttackPlan {
                reinforcement: None
            }
        ));
    }
}
