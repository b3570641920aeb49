//! Application layer for conclave
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConfigError, PanelConfig};
pub use ports::{
    audit_log::{AuditEvent, AuditLog, NoAudit},
    messenger::{Messenger, MessengerError},
    store::{NewEntry, NewIdea, ReviewStore, StoreError},
};
pub use use_cases::browse::{BrowseError, BrowseUseCase};
pub use use_cases::coordinate_voting::{
    CastVoteOutcome, CloseError, CloseOutcome, VoteError, VotingCoordinator,
};
pub use use_cases::submit_entry::{
    SubmitEntryError, SubmitEntryInput, SubmitEntryOutcome, SubmitEntryUseCase,
};
pub use use_cases::submit_idea::{
    SubmitIdeaError, SubmitIdeaInput, SubmitIdeaOutcome, SubmitIdeaUseCase,
};
pub use use_cases::wipe_category::{WipeCategoryUseCase, WipeError, WipeOutcome};
