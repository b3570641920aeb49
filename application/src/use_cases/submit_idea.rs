//! Submit-idea use case.
//!
//! Ideas are free text: stored, fanned out to the panel as plain
//! notifications, never voted on.

use crate::config::PanelConfig;
use crate::ports::audit_log::{AuditEvent, AuditLog, NoAudit};
use crate::ports::messenger::Messenger;
use crate::ports::store::{NewIdea, ReviewStore, StoreError};
use conclave_domain::{Idea, UserId, render_idea_notice};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SubmitIdeaError {
    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct SubmitIdeaInput {
    pub submitter: UserId,
    pub username: Option<String>,
    pub text: String,
}

#[derive(Debug)]
pub struct SubmitIdeaOutcome {
    pub idea: Idea,
    pub notified: usize,
    pub failed: Vec<UserId>,
}

pub struct SubmitIdeaUseCase<S, M> {
    store: Arc<S>,
    messenger: Arc<M>,
    config: PanelConfig,
    audit: Arc<dyn AuditLog>,
}

impl<S: ReviewStore + 'static, M: Messenger + 'static> SubmitIdeaUseCase<S, M> {
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
        input: SubmitIdeaInput,
    ) -> Result<SubmitIdeaOutcome, SubmitIdeaError> {
        let idea = self
            .store
            .insert_idea(NewIdea {
                submitter: input.submitter,
                username: input.username,
                text: input.text,
            })
            .await?;

        info!("Idea {} submitted by {}", idea.id, idea.submitter);

        let text = render_idea_notice(&idea);

        let mut join_set = JoinSet::new();
        for reviewer in self.config.panel().iter() {
            let messenger = Arc::clone(&self.messenger);
            let text = text.clone();

            join_set.spawn(async move {
                let result = messenger.notify(reviewer, &text).await;
                (reviewer, result)
            });
        }

        let mut notified = 0;
        let mut failed = Vec::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((_, Ok(()))) => notified += 1,
                Ok((reviewer, Err(e))) => {
                    warn!("Idea notice to reviewer {} failed: {}", reviewer, e);
                    failed.push(reviewer);
                }
                Err(e) => {
                    warn!("Idea fan-out task join error: {}", e);
                }
            }
        }

        self.audit.record(AuditEvent::new(
            "idea_submitted",
            json!({
                "idea": idea.id.value(),
                "submitter": idea.submitter.value(),
                "notified": notified,
            }),
        ));

        if let Err(e) = self
            .messenger
            .notify(idea.submitter, "Your idea was passed on to the panel.")
            .await
        {
            warn!("Submitter acknowledgment for idea {} failed: {}", idea.id, e);
        }

        Ok(SubmitIdeaOutcome {
            idea,
            notified,
            failed,
        })
    }
}
