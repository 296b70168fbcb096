//! Ordered inbound message queue with per-entry processed flags.
//!
//! Entries are never removed: the full history stays available for
//! inspection, and `take_pending` hands out each entry exactly once no matter
//! how often it is called.

use crate::protocol::ServerMessage;

/// One received message.
#[derive(Clone, Debug, PartialEq)]
pub struct InboxEntry {
    pub message: ServerMessage,
    pub processed: bool,
}

/// Arrival-ordered message history.
#[derive(Clone, Debug, Default)]
pub struct Inbox {
    entries: Vec<InboxEntry>,
}

impl Inbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message as unprocessed.
    pub fn push(&mut self, message: ServerMessage) {
        self.entries.push(InboxEntry {
            message,
            processed: false,
        });
    }

    /// Mark every unprocessed entry processed and return their messages, in
    /// arrival order.
    pub fn take_pending(&mut self) -> Vec<ServerMessage> {
        self.entries
            .iter_mut()
            .filter(|e| !e.processed)
            .map(|e| {
                e.processed = true;
                e.message.clone()
            })
            .collect()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.entries.iter().filter(|e| !e.processed).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in arrival order.
    #[must_use]
    pub fn entries(&self) -> &[InboxEntry] {
        &self.entries
    }
}
