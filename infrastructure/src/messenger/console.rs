//! Console messenger.
//!
//! Loopback adapter that logs every delivery instead of talking to a chat
//! platform, minting synthetic message locators so the full
//! fan-out/update/closure pipeline can run locally. Backs the `demo`
//! subcommand and doubles as the reference `Messenger` implementation.

use async_trait::async_trait;
use conclave_application::{Messenger, MessengerError};
use conclave_domain::{Entry, MessageRef, Notice, UserId};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::info;

/// Messenger that renders notices to the log.
#[derive(Default)]
pub struct ConsoleMessenger {
    next_message: AtomicI64,
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    fn controls_line(notice: &Notice) -> String {
        notice
            .controls
            .iter()
            .map(|c| format!("[{}]", c.label()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn deliver(
        &self,
        to: UserId,
        entry: &Entry,
        notice: &Notice,
    ) -> Result<MessageRef, MessengerError> {
        let message = self.next_message.fetch_add(1, Ordering::SeqCst);
        info!(
            "deliver -> {} ({} {}): {} {}",
            to,
            entry.kind,
            entry.media.as_str(),
            notice.caption.replace('\n', " | "),
            Self::controls_line(notice)
        );
        Ok(MessageRef::new(to.value(), message))
    }

    async fn update(&self, message: &MessageRef, notice: &Notice) -> Result<(), MessengerError> {
        info!(
            "update {} -> {} {}",
            message,
            notice.caption.replace('\n', " | "),
            Self::controls_line(notice)
        );
        Ok(())
    }

    async fn notify(&self, to: UserId, text: &str) -> Result<(), MessengerError> {
        info!("notify -> {}: {}", to, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conclave_domain::{EntryId, EntryStatus, MediaKind, MediaRef, render_submission_notice};

    #[tokio::test]
    async fn test_mints_distinct_message_refs() {
        let messenger = ConsoleMessenger::new();
        let entry = Entry {
            id: EntryId::new(1),
            submitter: UserId::new(100),
            username: None,
            caption: None,
            media: MediaRef::new("file-1"),
            kind: MediaKind::Image,
            status: EntryStatus::Pending,
            submitted_at: Utc::now(),
        };
        let notice = render_submission_notice(&entry);

        let first = messenger
            .deliver(UserId::new(1), &entry, &notice)
            .await
            .unwrap();
        let second = messenger
            .deliver(UserId::new(2), &entry, &notice)
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(first.destination, 1);
        assert_eq!(second.destination, 2);
    }
}
