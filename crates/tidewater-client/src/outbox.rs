//! Outbound message queue.
//!
//! The coordinator treats sends as fire-and-forget: messages are pushed here
//! and the transport layer drains and flushes them asynchronously.

use std::collections::VecDeque;

use tidewater_protocol::ClientMessage;

/// FIFO of messages awaiting transport flush.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<ClientMessage>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: ClientMessage) {
        self.queue.push_back(msg);
    }

    /// Take all pending messages in send order.
    pub fn drain(&mut self) -> Vec<ClientMessage> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidewater_protocol::TerritoryId;

    #[test]
    fn drain_preserves_order() {
        let mut outbox = Outbox::new();
        outbox.push(ClientMessage::RequestAttackPreview {
            target: TerritoryId(1),
        });
        outbox.push(ClientMessage::EndTurn { round: 2 });
        assert_eq!(outbox.len(), 2);

        let drained = outbox.drain();
        assert!(outbox.is_empty());
        assert!(matches!(
            drained[0],
            ClientMessage::RequestAttackPreview { .. }
        ));
        assert!(matches!(drained[1], ClientMessage::EndTurn { round: 2 }));
    }
}
