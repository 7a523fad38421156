//! Card selection windows for card-based combat.
//!
//! Exactly one window is open at a time. Attack windows open while the local
//! attack awaits card selection; defense windows open in response to a
//! server push and always carry a deadline.

use std::collections::BTreeSet;

use tidewater_protocol::{BattleId, CardId, CardKind, CombatCard};
use tracing::{debug, warn};

/// Why a card window is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowMode {
    /// Attacker pre-commits cards while confirming a plan.
    Attack,
    /// Defender responds to an attack; the server set a deadline.
    Defense { battle: BattleId },
}

/// The bounded period during which cards may be chosen for one battle.
#[derive(Clone, Debug)]
pub struct CardSelectionWindow {
    pub mode: WindowMode,
    pub eligible: Vec<CombatCard>,
    pub selected: BTreeSet<CardId>,
    pub context_message: String,
    /// Frames until auto-commit; defense windows only.
    pub deadline_frames: Option<u32>,
    elapsed_frames: u32,
}

impl CardSelectionWindow {
    fn is_eligible(&self, card: CardId) -> bool {
        self.eligible.iter().any(|c| c.id == card)
    }
}

/// Owns the single card selection window.
#[derive(Debug, Default)]
pub struct CardCombatNegotiator {
    window: Option<CardSelectionWindow>,
}

/// What an expired defense deadline produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoCommit {
    pub battle: BattleId,
    pub cards: Vec<CardId>,
}

impl CardCombatNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> Option<&CardSelectionWindow> {
        self.window.as_ref()
    }

    /// Open a window. Warns and returns false if one is already open; mode
    /// exclusivity upstream means that only happens on a protocol violation.
    pub fn open(
        &mut self,
        mode: WindowMode,
        eligible: Vec<CombatCard>,
        context_message: String,
        deadline_frames: Option<u32>,
    ) -> bool {
        if self.window.is_some() {
            warn!(?mode, "card window already open, ignoring open request");
            return false;
        }
        let expected_kind = match mode {
            WindowMode::Attack => CardKind::Attack,
            WindowMode::Defense { .. } => CardKind::Defense,
        };
        let eligible: Vec<CombatCard> = eligible
            .into_iter()
            .filter(|c| c.kind == expected_kind)
            .collect();
        self.window = Some(CardSelectionWindow {
            mode,
            eligible,
            selected: BTreeSet::new(),
            context_message,
            deadline_frames,
            elapsed_frames: 0,
        });
        true
    }

    /// Add or remove a card from the selection. Ineligible ids are a no-op.
    pub fn toggle(&mut self, card: CardId) {
        let Some(window) = self.window.as_mut() else {
            warn!(?card, "toggle with no open card window");
            return;
        };
        if !window.is_eligible(card) {
            debug!(?card, "toggled card not in eligible set");
            return;
        }
        if !window.selected.remove(&card) {
            window.selected.insert(card);
        }
    }

    /// Close the window and return the committed selection.
    pub fn commit(&mut self) -> Option<(WindowMode, Vec<CardId>)> {
        let window = self.window.take()?;
        let cards: Vec<CardId> = window.selected.into_iter().collect();
        debug!(mode = ?window.mode, count = cards.len(), "card selection committed");
        Some((window.mode, cards))
    }

    /// Close the window with an empty selection. Wire effect is identical to
    /// committing zero cards; only the log line differs.
    pub fn skip(&mut self) -> Option<WindowMode> {
        let window = self.window.take()?;
        debug!(mode = ?window.mode, "card selection skipped");
        Some(window.mode)
    }

    /// Advance the deadline clock. When a defense deadline elapses the
    /// current selection is committed as-is so other players are never
    /// blocked by an unresponsive client.
    pub fn tick(&mut self, frames: u32) -> Option<AutoCommit> {
        let window = self.window.as_mut()?;
        let deadline = window.deadline_frames?;
        window.elapsed_frames = window.elapsed_frames.saturating_add(frames);
        if window.elapsed_frames < deadline {
            return None;
        }
        let window = self.window.take()?;
        match window.mode {
            WindowMode::Defense { battle } => {
                let cards: Vec<CardId> = window.selected.into_iter().collect();
                debug!(?battle, count = cards.len(), "defense deadline auto-commit");
                Some(AutoCommit { battle, cards })
            }
            WindowMode::Attack => {
                // Attack windows never carry a deadline today.
                warn!("deadline elapsed on attack card window");
                None
            }
        }
    }

    /// Discard any open window (resync).
    pub fn reset(&mut self) {
        self.window = None;
    }
}
