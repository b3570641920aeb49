//! Domain layer for conclave
//!
//! This crate contains the core business logic, entities, and value objects
//! for panel-based media review. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Entry review
//!
//! End users submit media entries; a fixed panel of reviewers receives one
//! notification copy each and votes through inline controls. An entry is
//! `Pending` until the panel closes voting, at which point it becomes
//! `Approved` or `Rejected`: exactly once, never reversibly.
//!
//! ## Verdict
//!
//! The [`VotingRule`] decides when voting may close: participation must
//! reach a configurable fraction of the panel, and the tally must not be
//! tied. A tie can never be decided by counting alone, so it always leaves
//! the entry open.

pub mod ballot;
pub mod challenge;
pub mod core;
pub mod entry;
pub mod notice;

// Re-export commonly used types
pub use ballot::{
    ActionToken, ActionTokenError, Tally, Verdict, VoteValue, VotingRule,
};
pub use challenge::{ChallengeBank, ChallengePrompt, PendingChallenge};
pub use core::{
    error::DomainError,
    identity::{ReviewerPanel, UserId},
};
pub use entry::{Category, Entry, EntryId, EntryStatus, Idea, IdeaId, MediaKind, MediaRef};
pub use notice::{
    Control, MessageRef, Notice, NotificationHandle, render_final_notice, render_idea_notice,
    render_open_notice, render_submission_notice, submitter_ack, submitter_outcome,
};
