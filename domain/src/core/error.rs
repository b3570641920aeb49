//! Domain error types

use crate::entry::{EntryId, EntryStatus};
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Voting threshold must be within (0.0, 1.0], got {0}")]
    InvalidThreshold(f64),

    #[error("Entry {0} is already finalized")]
    AlreadyFinalized(EntryId),

    #[error("{0} is not a terminal status")]
    NonTerminalStatus(EntryStatus),

    #[error("Challenge bank has no prompts")]
    EmptyChallengeBank,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::InvalidThreshold(1.5);
        assert_eq!(
            error.to_string(),
            "Voting threshold must be within (0.0, 1.0], got 1.5"
        );

        let error = DomainError::NonTerminalStatus(EntryStatus::Pending);
        assert_eq!(error.to_string(), "Pending is not a terminal status");
    }
}
