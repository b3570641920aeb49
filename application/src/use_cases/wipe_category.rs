//! Challenge-guarded bulk wipe.
//!
//! Wiping a category is destructive and cascades, so it runs in two steps:
//! `begin` issues a challenge question and records a per-identity pending
//! challenge with an expiry; `confirm` validates the answer and performs
//! the wipe. A wrong answer or an expired challenge cancels the wipe
//! without touching the store.

use crate::config::PanelConfig;
use crate::ports::audit_log::{AuditEvent, AuditLog, NoAudit};
use crate::ports::store::{ReviewStore, StoreError};
use chrono::{Duration, Utc};
use conclave_domain::{Category, ChallengeBank, PendingChallenge, UserId};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// How long an issued challenge stays answerable.
pub const DEFAULT_CHALLENGE_TTL_SECS: i64 = 120;

#[derive(Error, Debug)]
pub enum WipeError {
    #[error("Identity {0} is not on the reviewer panel")]
    NotAuthorized(UserId),

    #[error("No wipe challenge is pending for {0}")]
    NoChallengePending(UserId),

    #[error("The wipe challenge for {0} has expired")]
    ChallengeExpired(UserId),

    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

/// Result of a confirmation attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum WipeOutcome {
    /// The category was wiped.
    Wiped(Category),
    /// The answer did not match; the wipe was cancelled.
    WrongAnswer,
}

pub struct WipeCategoryUseCase<S> {
    store: Arc<S>,
    config: PanelConfig,
    bank: ChallengeBank,
    ttl: Duration,
    pending: Mutex<HashMap<UserId, PendingChallenge>>,
    audit: Arc<dyn AuditLog>,
}

impl<S: ReviewStore> WipeCategoryUseCase<S> {
    pub fn new(store: Arc<S>, config: PanelConfig, bank: ChallengeBank) -> Self {
        Self::with_ttl(store, config, bank, Duration::seconds(DEFAULT_CHALLENGE_TTL_SECS))
    }

    pub fn with_ttl(store: Arc<S>, config: PanelConfig, bank: ChallengeBank, ttl: Duration) -> Self {
        Self {
            store,
            config,
            bank,
            ttl,
            pending: Mutex::new(HashMap::new()),
            audit: Arc::new(NoAudit),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    /// Issue a challenge for the caller. Returns the question to relay.
    ///
    /// A repeated `begin` replaces any earlier pending challenge for the
    /// same identity; there is at most one outstanding per caller.
    pub fn begin(&self, caller: UserId, category: Category) -> Result<String, WipeError> {
        if !self.config.panel().contains(caller) {
            return Err(WipeError::NotAuthorized(caller));
        }

        let prompt = self.bank.issue();
        let question = prompt.question.clone();
        let challenge = PendingChallenge::new(caller, category, prompt, Utc::now(), self.ttl);

        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(caller, challenge);

        info!("Wipe challenge issued to {} for {}", caller, category);
        Ok(question)
    }

    /// Validate the answer and, if it matches, wipe the challenged
    /// category. The pending challenge is consumed either way.
    pub async fn confirm(&self, caller: UserId, answer: &str) -> Result<WipeOutcome, WipeError> {
        if !self.config.panel().contains(caller) {
            return Err(WipeError::NotAuthorized(caller));
        }

        let challenge = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&caller)
            .ok_or(WipeError::NoChallengePending(caller))?;

        if challenge.is_expired(Utc::now()) {
            warn!("Wipe challenge for {} expired unanswered", caller);
            return Err(WipeError::ChallengeExpired(caller));
        }

        if !challenge.accepts(answer) {
            info!("Wipe of {} cancelled: wrong answer from {}", challenge.category, caller);
            return Ok(WipeOutcome::WrongAnswer);
        }

        self.store.wipe(challenge.category).await?;

        self.audit.record(AuditEvent::new(
            "category_wiped",
            json!({
                "category": challenge.category.as_str(),
                "by": caller.value(),
            }),
        ));

        info!("Category {} wiped by {}", challenge.category, caller);
        Ok(WipeOutcome::Wiped(challenge.category))
    }
}
