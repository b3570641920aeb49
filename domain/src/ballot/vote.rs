//! Vote values and tallies.

use crate::entry::EntryStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reviewer's position on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Approve,
    Reject,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Approve => "approve",
            VoteValue::Reject => "reject",
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(VoteValue::Approve),
            "reject" => Ok(VoteValue::Reject),
            _ => Err(format!("Unknown vote value: {}", s)),
        }
    }
}

/// Aggregated vote counts for one entry.
///
/// Always computed fresh from the ledger; never cached across interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub approve: usize,
    pub reject: usize,
}

impl Tally {
    pub fn new(approve: usize, reject: usize) -> Self {
        Self { approve, reject }
    }

    /// Total votes cast.
    pub fn total(&self) -> usize {
        self.approve + self.reject
    }

    pub fn is_tie(&self) -> bool {
        self.approve == self.reject
    }

    /// Terminal status implied by the current counts: approved on a strict
    /// majority of cast votes, rejected otherwise. Only meaningful when the
    /// tally is not tied; the verdict rule never lets a tie close.
    pub fn outcome(&self) -> EntryStatus {
        if self.approve > self.reject {
            EntryStatus::Approved
        } else {
            EntryStatus::Rejected
        }
    }

    /// Count one vote of the given value.
    pub fn count(&mut self, value: VoteValue) {
        match value {
            VoteValue::Approve => self.approve += 1,
            VoteValue::Reject => self.reject += 1,
        }
    }
}
