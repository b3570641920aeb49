//! Callback action token codec.
//!
//! Inline controls carry an opaque token encoding `{verb, entry id, value}`.
//! The command dispatcher parses inbound callback payloads with this codec
//! before invoking the coordinator; the notice renderer encodes outbound
//! tokens with the same type, so the wire format lives in exactly one place.
//!
//! Wire format: `vote_{entry}_{approve|reject}` and `close_{entry}`.

use crate::entry::EntryId;
use super::vote::VoteValue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from decoding a callback token.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ActionTokenError {
    #[error("Unknown action verb: {0}")]
    UnknownVerb(String),

    #[error("Malformed action token: {0}")]
    Malformed(String),
}

/// A decoded reviewer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionToken {
    /// Cast or change a vote on an entry.
    CastVote { entry: EntryId, value: VoteValue },
    /// Request closure of an entry's voting.
    CloseVoting { entry: EntryId },
}

impl ActionToken {
    pub fn entry(&self) -> EntryId {
        match self {
            ActionToken::CastVote { entry, .. } => *entry,
            ActionToken::CloseVoting { entry } => *entry,
        }
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionToken::CastVote { entry, value } => write!(f, "vote_{}_{}", entry, value),
            ActionToken::CloseVoting { entry } => write!(f, "close_{}", entry),
        }
    }
}

impl FromStr for ActionToken {
    type Err = ActionTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '_');
        let verb = parts.next().unwrap_or_default();

        let entry = parts
            .next()
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(EntryId::new)
            .ok_or_else(|| ActionTokenError::Malformed(s.to_string()))?;

        match (verb, parts.next()) {
            ("vote", Some(raw)) => {
                let value = raw
                    .parse::<VoteValue>()
                    .map_err(|_| ActionTokenError::Malformed(s.to_string()))?;
                Ok(ActionToken::CastVote { entry, value })
            }
            ("vote", None) => Err(ActionTokenError::Malformed(s.to_string())),
            ("close", None) => Ok(ActionToken::CloseVoting { entry }),
            ("close", Some(_)) => Err(ActionTokenError::Malformed(s.to_string())),
            _ => Err(ActionTokenError::UnknownVerb(verb.to_string())),
        }
    }
}
