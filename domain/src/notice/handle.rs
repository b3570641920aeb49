//! Durable references to delivered notification copies.

use crate::core::identity::UserId;
use crate::entry::EntryId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque locator of one delivered message: the destination the messaging
/// platform delivered to, and the message id within that destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub destination: i64,
    pub message: i64,
}

impl MessageRef {
    pub fn new(destination: i64, message: i64) -> Self {
        Self {
            destination,
            message,
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.destination, self.message)
    }
}

/// One reviewer's copy of an entry's notification.
///
/// Created together with the ledger's (entry, reviewer) key at fan-out time;
/// the handle set for an entry is fixed once fan-out completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationHandle {
    pub entry: EntryId,
    pub reviewer: UserId,
    pub message: MessageRef,
}

impl NotificationHandle {
    pub fn new(entry: EntryId, reviewer: UserId, message: MessageRef) -> Self {
        Self {
            entry,
            reviewer,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ref_display() {
        assert_eq!(MessageRef::new(10, 42).to_string(), "10/42");
    }
}
