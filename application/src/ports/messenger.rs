//! Messenger port.
//!
//! Defines the interface to the chat-platform messaging collaborator. The
//! voting core only ever needs three operations: deliver a fresh notice,
//! rewrite a delivered one, and send plain text.

use async_trait::async_trait;
use conclave_domain::{Entry, MessageRef, Notice, UserId};
use thiserror::Error;

/// Errors from messaging operations.
///
/// These are per-recipient failures: callers collect them per handle and
/// keep going; one broken handle never aborts a broadcast.
#[derive(Error, Debug)]
pub enum MessengerError {
    #[error("Delivery to {0} failed: {1}")]
    DeliveryFailed(UserId, String),

    #[error("Message update failed: {0}")]
    UpdateFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Gateway to the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send one copy of an entry's notice (media plus caption and controls)
    /// to a reviewer. Returns the locator of the created message.
    async fn deliver(
        &self,
        to: UserId,
        entry: &Entry,
        notice: &Notice,
    ) -> Result<MessageRef, MessengerError>;

    /// Rewrite the caption and controls of a previously delivered message.
    async fn update(&self, message: &MessageRef, notice: &Notice) -> Result<(), MessengerError>;

    /// Send a plain-text notification.
    async fn notify(&self, to: UserId, text: &str) -> Result<(), MessengerError>;
}
