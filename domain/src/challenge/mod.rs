//! Challenge records guarding destructive bulk-wipe.
//!
//! A wipe request is confirmed by answering a challenge question. The
//! pending challenge is an explicit per-identity record with an expiry.
//! There is no transient "listen for the next message" state anywhere; the
//! intake collaborator simply relays the answer to the wipe use case.

use crate::core::error::DomainError;
use crate::core::identity::UserId;
use crate::entry::Category;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A challenge question and its expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengePrompt {
    pub question: String,
    pub answer: String,
}

impl ChallengePrompt {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Pool of challenge prompts, issued round-robin.
#[derive(Debug)]
pub struct ChallengeBank {
    prompts: Vec<ChallengePrompt>,
    cursor: AtomicUsize,
}

impl ChallengeBank {
    pub fn new(prompts: Vec<ChallengePrompt>) -> Result<Self, DomainError> {
        if prompts.is_empty() {
            return Err(DomainError::EmptyChallengeBank);
        }
        Ok(Self {
            prompts,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Hand out the next prompt in rotation.
    pub fn issue(&self) -> ChallengePrompt {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.prompts.len();
        self.prompts[index].clone()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

impl Default for ChallengeBank {
    fn default() -> Self {
        Self {
            prompts: vec![
                ChallengePrompt::new("What is seven times six?", "42"),
                ChallengePrompt::new("How many sides does a hexagon have?", "6"),
                ChallengePrompt::new("What color is an orange?", "orange"),
            ],
            cursor: AtomicUsize::new(0),
        }
    }
}

/// An outstanding wipe confirmation for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChallenge {
    pub identity: UserId,
    pub category: Category,
    pub prompt: ChallengePrompt,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingChallenge {
    pub fn new(
        identity: UserId,
        category: Category,
        prompt: ChallengePrompt,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            identity,
            category,
            prompt,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the answer matches, ignoring case and surrounding whitespace.
    pub fn accepts(&self, answer: &str) -> bool {
        answer.trim().eq_ignore_ascii_case(self.prompt.answer.trim())
    }
}
