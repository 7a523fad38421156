//! Ordered playback and acknowledgment of server-pushed events.
//!
//! Events are played strictly FIFO with at most one live at a time; the
//! server is unblocked for an event only when its local playback finishes
//! and a `ClientReady` goes out. Acknowledgments are sent exactly once per
//! event id, including across reconnect replays.

use std::collections::{HashSet, VecDeque};

use tidewater_protocol::{ClientMessage, EventId, EventKind, EventPayload, GameEvent};
use tracing::{debug, warn};

use crate::config::PlaybackConfig;
use crate::outbox::Outbox;

/// The event currently animating or displayed.
#[derive(Clone, Debug)]
pub struct LiveEvent {
    pub event: GameEvent,
    /// Total playback frames; `None` blocks on an explicit dismissal.
    pub duration_frames: Option<u32>,
    pub elapsed_frames: u32,
}

/// FIFO queue of events awaiting playback.
#[derive(Debug)]
pub struct EventAckQueue {
    playback: PlaybackConfig,
    queue: VecDeque<GameEvent>,
    live: Option<LiveEvent>,
    /// Ids fully played this session. Survives resync so replayed events are
    /// neither re-displayed nor re-acknowledged.
    completed: HashSet<EventId>,
}

impl EventAckQueue {
    pub fn new(playback: PlaybackConfig) -> Self {
        Self {
            playback,
            queue: VecDeque::new(),
            live: None,
            completed: HashSet::new(),
        }
    }

    /// The event currently being presented, if any.
    pub fn live(&self) -> Option<&LiveEvent> {
        self.live.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Append an event; promotes it to live immediately if nothing is
    /// playing. Duplicate ids and empty card reveals are filtered here.
    pub fn enqueue(&mut self, event: GameEvent, outbox: &mut Outbox) {
        if self.is_known(event.id) {
            debug!(id = ?event.id, "dropping duplicate event");
            return;
        }

        if let EventPayload::CardReveal(reveal) = &event.payload {
            if reveal.is_empty() {
                // Nothing to show. Release the server right away if it
                // expected a receipt.
                debug!(id = ?event.id, "skipping reveal with no cards played");
                self.mark_completed(&event, outbox);
                return;
            }
        }

        self.queue.push_back(event);
        self.promote_next();
    }

    /// Playback of the live event finished (animation done, or prompt
    /// dismissed). Idempotent: only the live event's id has any effect, so a
    /// double completion for the same head acknowledges once. Returns the
    /// event whose playback finished.
    pub fn complete(&mut self, event_id: EventId, outbox: &mut Outbox) -> Option<GameEvent> {
        match &self.live {
            Some(live) if live.event.id == event_id => {}
            Some(live) => {
                warn!(?event_id, live = ?live.event.id, "completion for non-live event");
                return None;
            }
            None => {
                warn!(?event_id, "playback completion with no live event");
                return None;
            }
        }

        let live = self.live.take()?;
        self.mark_completed(&live.event, outbox);
        self.promote_next();
        Some(live.event)
    }

    /// Advance the live animation clock, completing timed events whose
    /// duration elapsed. Prompt events (no duration) wait for `complete`.
    /// Returns the event whose playback finished this tick, if any.
    pub fn tick(&mut self, frames: u32, outbox: &mut Outbox) -> Option<GameEvent> {
        let live = self.live.as_mut()?;
        let duration = live.duration_frames?;
        live.elapsed_frames = live.elapsed_frames.saturating_add(frames);
        if live.elapsed_frames >= duration {
            let id = live.event.id;
            self.complete(id, outbox)
        } else {
            None
        }
    }

    /// Drop queued and live events (resync). The completed-id memory is kept
    /// so a replayed event id never plays or acks twice.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.live = None;
    }

    /// The live event's kind, for render dispatch.
    pub fn live_kind(&self) -> Option<EventKind> {
        self.live.as_ref().map(|l| l.event.kind())
    }

    fn is_known(&self, id: EventId) -> bool {
        self.completed.contains(&id)
            || self.live.as_ref().is_some_and(|l| l.event.id == id)
            || self.queue.iter().any(|e| e.id == id)
    }

    fn promote_next(&mut self) {
        if self.live.is_some() {
            return;
        }
        if let Some(event) = self.queue.pop_front() {
            let duration_frames = self.playback.duration_frames(event.kind());
            debug!(id = ?event.id, kind = ?event.kind(), "event playback started");
            self.live = Some(LiveEvent {
                event,
                duration_frames,
                elapsed_frames: 0,
            });
        }
    }

    /// Record that an event finished (or was skipped), sending `ClientReady`
    /// for ack-bearing events. First completion per id wins.
    fn mark_completed(&mut self, event: &GameEvent, outbox: &mut Outbox) {
        if !self.completed.insert(event.id) {
            return;
        }
        if event.requires_ack {
            outbox.push(ClientMessage::ClientReady {
                event: event.id,
                kind: event.kind(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidewater_protocol::{
        BattleId, CardReveal, CombatResult, PlayerId, ProductionResults, TerritoryId,
    };

    fn combat_event(id: u64) -> GameEvent {
        GameEvent {
            id: EventId(id),
            requires_ack: true,
            payload: EventPayload::Combat(CombatResult {
                plan: None,
                battle: BattleId(id as u32),
                attacker: PlayerId(0),
                defender: PlayerId(1),
                territory: TerritoryId(5),
                attack_strength: 3,
                defense_strength: 2,
                attacker_wins: true,
                territory_captured: true,
            }),
        }
    }

    fn production_event(id: u64) -> GameEvent {
        GameEvent {
            id: EventId(id),
            requires_ack: true,
            payload: EventPayload::Production(ProductionResults {
                round: 2,
                yields: vec![],
            }),
        }
    }

    fn ready_ids(outbox: &mut Outbox) -> Vec<EventId> {
        outbox
            .drain()
            .into_iter()
            .filter_map(|m| match m {
                ClientMessage::ClientReady { event, .. } => Some(event),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn fifo_order_even_when_later_event_is_ready() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        queue.enqueue(combat_event(1), &mut outbox);
        queue.enqueue(production_event(2), &mut outbox);

        // Only the first is live; the second waits despite being ready
        assert_eq!(queue.live().unwrap().event.id, EventId(1));
        assert_eq!(queue.pending(), 1);
        assert!(ready_ids(&mut outbox).is_empty());

        queue.complete(EventId(1), &mut outbox);
        assert_eq!(ready_ids(&mut outbox), vec![EventId(1)]);
        assert_eq!(queue.live().unwrap().event.id, EventId(2));

        queue.complete(EventId(2), &mut outbox);
        assert_eq!(ready_ids(&mut outbox), vec![EventId(2)]);
        assert!(queue.live().is_none());
    }

    #[test]
    fn double_completion_acks_once() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        queue.enqueue(combat_event(1), &mut outbox);
        queue.enqueue(combat_event(2), &mut outbox);

        queue.complete(EventId(1), &mut outbox);
        // Second completion for the old head must not touch event 2
        queue.complete(EventId(1), &mut outbox);

        assert_eq!(ready_ids(&mut outbox), vec![EventId(1)]);
        assert_eq!(queue.live().unwrap().event.id, EventId(2));
    }

    #[test]
    fn duplicate_event_id_dropped() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        queue.enqueue(combat_event(1), &mut outbox);
        queue.enqueue(combat_event(1), &mut outbox);
        assert_eq!(queue.pending(), 0);

        queue.complete(EventId(1), &mut outbox);
        assert_eq!(ready_ids(&mut outbox), vec![EventId(1)]);

        // Replay after ack: no playback, no second ack
        queue.enqueue(combat_event(1), &mut outbox);
        assert!(queue.live().is_none());
        assert!(ready_ids(&mut outbox).is_empty());
    }

    #[test]
    fn empty_reveal_never_displayed() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        let reveal = GameEvent {
            id: EventId(3),
            requires_ack: false,
            payload: EventPayload::CardReveal(CardReveal {
                battle: BattleId(1),
                attacker_cards: vec![],
                defender_cards: vec![],
                negated_cards: vec![],
                final_attack_strength: 3,
                final_defense_strength: 3,
                bribe_activated: false,
                sabotage_count: 0,
                safe_retreat: false,
            }),
        };
        queue.enqueue(reveal, &mut outbox);
        assert!(queue.live().is_none());
        assert_eq!(queue.pending(), 0);
        assert!(outbox.is_empty());
    }

    #[test]
    fn empty_reveal_with_ack_releases_server() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        let mut reveal = GameEvent {
            id: EventId(4),
            requires_ack: true,
            payload: EventPayload::CardReveal(CardReveal {
                battle: BattleId(1),
                attacker_cards: vec![],
                defender_cards: vec![],
                negated_cards: vec![],
                final_attack_strength: 1,
                final_defense_strength: 1,
                bribe_activated: false,
                sabotage_count: 0,
                safe_retreat: false,
            }),
        };
        queue.enqueue(reveal.clone(), &mut outbox);
        assert!(queue.live().is_none());
        assert_eq!(ready_ids(&mut outbox), vec![EventId(4)]);

        // Replaying it afterwards must not ack again
        reveal.requires_ack = true;
        queue.enqueue(reveal, &mut outbox);
        assert!(outbox.is_empty());
    }

    #[test]
    fn timed_playback_completes_via_tick() {
        let playback = PlaybackConfig {
            combat_frames: 10,
            ..PlaybackConfig::default()
        };
        let mut queue = EventAckQueue::new(playback);
        let mut outbox = Outbox::new();

        queue.enqueue(combat_event(1), &mut outbox);
        queue.tick(6, &mut outbox);
        assert!(queue.live().is_some());
        queue.tick(6, &mut outbox);
        assert!(queue.live().is_none());
        assert_eq!(ready_ids(&mut outbox), vec![EventId(1)]);
    }

    #[test]
    fn no_ack_event_pops_silently() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        let mut event = production_event(7);
        event.requires_ack = false;
        queue.enqueue(event, &mut outbox);
        queue.complete(EventId(7), &mut outbox);
        assert!(outbox.is_empty());
        assert!(queue.live().is_none());
    }

    #[test]
    fn completed_nonack_event_not_redisplayed_on_replay() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        let mut event = production_event(5);
        event.requires_ack = false;
        queue.enqueue(event.clone(), &mut outbox);
        queue.complete(EventId(5), &mut outbox);
        assert!(outbox.is_empty());

        // Reconnect replay of the already-played event: no second playback,
        // and still no ack
        queue.enqueue(event, &mut outbox);
        assert!(queue.live().is_none());
        assert!(outbox.is_empty());
    }

    #[test]
    fn reset_keeps_ack_memory() {
        let mut queue = EventAckQueue::new(PlaybackConfig::default());
        let mut outbox = Outbox::new();

        queue.enqueue(combat_event(1), &mut outbox);
        queue.complete(EventId(1), &mut outbox);
        outbox.drain();

        queue.enqueue(combat_event(2), &mut outbox);
        queue.reset();
        assert!(queue.live().is_none());

        // Snapshot replays event 1: already acked, stays silent
        queue.enqueue(combat_event(1), &mut outbox);
        assert!(queue.live().is_none());
        assert!(outbox.is_empty());
    }
}
