//! Submit-entry use case.
//!
//! Persists a new entry and fans the notification out to every panel
//! member. Deliveries run concurrently; each produces an explicit result,
//! and the handle set is registered exactly once from the deliveries the
//! messaging collaborator confirmed.

use crate::config::PanelConfig;
use crate::ports::audit_log::{AuditEvent, AuditLog, NoAudit};
use crate::ports::messenger::Messenger;
use crate::ports::store::{NewEntry, ReviewStore, StoreError};
use conclave_domain::{
    Entry, MediaKind, MediaRef, NotificationHandle, UserId, render_submission_notice,
    submitter_ack,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that abort a submission.
#[derive(Error, Debug)]
pub enum SubmitEntryError {
    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

/// Input for the submit-entry use case.
#[derive(Debug, Clone)]
pub struct SubmitEntryInput {
    pub submitter: UserId,
    pub username: Option<String>,
    pub caption: Option<String>,
    pub media: MediaRef,
    pub kind: MediaKind,
}

/// Result of a completed submission.
#[derive(Debug)]
pub struct SubmitEntryOutcome {
    pub entry: Entry,
    /// Reviewers whose copy was delivered and registered.
    pub delivered: usize,
    /// Reviewers whose delivery failed; they have no handle and will not
    /// receive tally updates.
    pub failed: Vec<UserId>,
}

/// Use case for entry submission and notification fan-out.
pub struct SubmitEntryUseCase<S, M> {
    store: Arc<S>,
    messenger: Arc<M>,
    config: PanelConfig,
    audit: Arc<dyn AuditLog>,
}

impl<S: ReviewStore + 'static, M: Messenger + 'static> SubmitEntryUseCase<S, M> {
    pub fn new(store: Arc<S>, messenger: Arc<M>, config: PanelConfig) -> Self {
        Self {
            store,
            messenger,
            config,
            audit: Arc::new(NoAudit),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub async fn execute(
        &self,
        input: SubmitEntryInput,
    ) -> Result<SubmitEntryOutcome, SubmitEntryError> {
        let entry = self
            .store
            .insert_entry(NewEntry {
                submitter: input.submitter,
                username: input.username,
                caption: input.caption,
                media: input.media,
                kind: input.kind,
            })
            .await?;

        info!("Entry {} submitted by {}", entry.id, entry.submitter);

        let notice = render_submission_notice(&entry);

        // Fan out one copy per panel member, collecting a result for each.
        let mut join_set = JoinSet::new();
        for reviewer in self.config.panel().iter() {
            let messenger = Arc::clone(&self.messenger);
            let entry = entry.clone();
            let notice = notice.clone();

            join_set.spawn(async move {
                let result = messenger.deliver(reviewer, &entry, &notice).await;
                (reviewer, result)
            });
        }

        let mut handles = Vec::new();
        let mut failed = Vec::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((reviewer, Ok(message))) => {
                    handles.push(NotificationHandle::new(entry.id, reviewer, message));
                }
                Ok((reviewer, Err(e))) => {
                    warn!("Delivery to reviewer {} failed: {}", reviewer, e);
                    failed.push(reviewer);
                }
                Err(e) => {
                    warn!("Fan-out task join error: {}", e);
                }
            }
        }

        // Completion order is arbitrary; store the handle set in panel order.
        handles.sort_by_key(|h| h.reviewer);
        let delivered = handles.len();
        self.store.register_handles(entry.id, handles).await?;

        self.audit.record(AuditEvent::new(
            "entry_submitted",
            json!({
                "entry": entry.id.value(),
                "submitter": entry.submitter.value(),
                "kind": entry.kind.as_str(),
                "delivered": delivered,
                "failed": failed.len(),
            }),
        ));

        if let Err(e) = self.messenger.notify(entry.submitter, submitter_ack()).await {
            warn!("Submitter acknowledgment for entry {} failed: {}", entry.id, e);
        }

        Ok(SubmitEntryOutcome {
            entry,
            delivered,
            failed,
        })
    }
}
