//! Round/phase/turn tracking and action gating.
//!
//! Single source of truth for "whose turn, which phase, which round". The
//! server broadcast is authoritative; every accepted update replaces local
//! state wholesale.

use tidewater_protocol::{Phase, PlayerId};
use tracing::debug;

/// Current round, phase, and turn holder. Replaced wholesale on each server
/// broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnState {
    pub round: u32,
    pub phase: Phase,
    pub turn_holder: PlayerId,
}

/// Tracks turn state for the local player and gates phase actions.
#[derive(Debug)]
pub struct TurnPhaseController {
    local_player: PlayerId,
    state: Option<TurnState>,
}

impl TurnPhaseController {
    pub fn new(local_player: PlayerId) -> Self {
        Self {
            local_player,
            state: None,
        }
    }

    pub fn local_player(&self) -> PlayerId {
        self.local_player
    }

    pub fn state(&self) -> Option<&TurnState> {
        self.state.as_ref()
    }

    /// Apply a server round/phase/turn broadcast.
    ///
    /// Updates with a stale round number are ignored as out-of-order
    /// duplicates; everything else is last-write-wins. Returns true when the
    /// turn holder just became the local player (the one-shot "your turn"
    /// notification).
    pub fn apply_turn_update(&mut self, round: u32, phase: Phase, turn_holder: PlayerId) -> bool {
        if let Some(current) = &self.state {
            if round < current.round {
                debug!(round, current = current.round, "ignoring stale turn update");
                return false;
            }
        }

        let was_ours = self
            .state
            .as_ref()
            .is_some_and(|s| s.turn_holder == self.local_player);
        self.state = Some(TurnState {
            round,
            phase,
            turn_holder,
        });
        !was_ours && turn_holder == self.local_player
    }

    /// Discard all turn state (reconnect resync).
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// True while the current phase accepts player actions.
    pub fn is_action_phase(&self) -> bool {
        self.state.is_some_and(|s| s.phase.is_action_phase())
    }

    /// True while the local player holds the turn.
    pub fn is_local_turn(&self) -> bool {
        self.state.is_some_and(|s| s.turn_holder == self.local_player)
    }

    /// Whether "End Turn" may be offered right now.
    ///
    /// Requires the local player's turn, an action phase, and no attack flow
    /// in a non-terminal state.
    pub fn can_end_turn(&self, attack_in_progress: bool) -> bool {
        self.is_local_turn() && self.is_action_phase() && !attack_in_progress
    }
}
