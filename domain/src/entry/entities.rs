//! Entry and idea entities.
//!
//! An [`Entry`] is a submitted media item awaiting reviewer consensus. Its
//! status moves exactly once, from `Pending` to a terminal state, and only
//! the closure path performs that write. An [`Idea`] is a free-text
//! suggestion: stored and fanned out to the panel, but never voted on.

use crate::core::error::DomainError;
use crate::core::identity::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique, monotonic entry identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique idea identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IdeaId(i64);

impl IdeaId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of media attached to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Clip,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Clip => "clip",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaKind::Image),
            "clip" => Ok(MediaKind::Clip),
            _ => Err(format!("Unknown media kind: {}", s)),
        }
    }
}

/// Opaque reference to the media payload held by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Review status of an entry.
///
/// `Pending` is the only non-terminal state. The transition to a terminal
/// state happens exactly once, via [`Entry::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntryStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl EntryStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, EntryStatus::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "Pending",
            EntryStatus::Approved => "Approved",
            EntryStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(EntryStatus::Pending),
            "Approved" => Ok(EntryStatus::Approved),
            "Rejected" => Ok(EntryStatus::Rejected),
            _ => Err(format!("Unknown entry status: {}", s)),
        }
    }
}

/// A submitted media item awaiting reviewer consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub submitter: UserId,
    /// Display name of the submitter, if the platform knows one.
    pub username: Option<String>,
    pub caption: Option<String>,
    pub media: MediaRef,
    pub kind: MediaKind,
    pub status: EntryStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Entry {
    /// Transition the entry to a terminal status.
    ///
    /// Fails if the entry is already finalized or if `outcome` is not
    /// terminal. This is the only status write in the domain.
    pub fn finalize(&mut self, outcome: EntryStatus) -> Result<(), DomainError> {
        if !outcome.is_terminal() {
            return Err(DomainError::NonTerminalStatus(outcome));
        }
        if self.status.is_terminal() {
            return Err(DomainError::AlreadyFinalized(self.id));
        }
        self.status = outcome;
        Ok(())
    }
}

/// A free-text suggestion from an end user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub submitter: UserId,
    pub username: Option<String>,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

/// Wipeable storage category. Wiping one category never touches the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Entries plus their votes and notification handles.
    Entries,
    /// Free-text ideas.
    Ideas,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entries => "entries",
            Category::Ideas => "ideas",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
