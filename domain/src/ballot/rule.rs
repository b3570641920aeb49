//! Closure rule for entry voting.
//!
//! Decides whether an entry's tally is decidable: participation must reach
//! a configurable fraction of the panel, and the counts must not be tied.

use crate::core::error::DomainError;
use crate::entry::EntryStatus;
use super::vote::Tally;
use serde::{Deserialize, Serialize};

/// Verdict on an entry's current tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Quorum not yet reached, or the counts are tied.
    Open,
    /// Quorum reached with a strict majority; carries the implied outcome.
    Decidable(EntryStatus),
}

impl Verdict {
    pub fn is_decidable(&self) -> bool {
        matches!(self, Verdict::Decidable(_))
    }

    /// The implied terminal status, if decidable.
    pub fn outcome(&self) -> Option<EntryStatus> {
        match self {
            Verdict::Open => None,
            Verdict::Decidable(status) => Some(*status),
        }
    }
}

/// Participation threshold rule.
///
/// With panel size `n` and threshold fraction `t`, voting may close once at
/// least `ceil(n * t)` votes are cast AND the tally is not tied. A tie can
/// never be decided by counting alone, so it leaves the entry open no
/// matter how many reviewers have voted.
///
/// # Example
///
/// ```
/// use conclave_domain::{Tally, Verdict, VotingRule};
/// use conclave_domain::EntryStatus;
///
/// let rule = VotingRule::default(); // threshold 0.5
/// assert_eq!(rule.required_votes(3), 2);
///
/// // Two approvals out of a three-member panel: decidable.
/// let verdict = rule.verdict(&Tally::new(2, 0), 3);
/// assert_eq!(verdict, Verdict::Decidable(EntryStatus::Approved));
///
/// // A tie stays open even though participation is met.
/// assert_eq!(rule.verdict(&Tally::new(1, 1), 3), Verdict::Open);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VotingRule {
    threshold: f64,
}

impl VotingRule {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    /// Create a rule with the given threshold fraction.
    ///
    /// The fraction must be within `(0.0, 1.0]`: zero would let an entry
    /// close with no votes at all, above one could never be satisfied.
    pub fn new(threshold: f64) -> Result<Self, DomainError> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(DomainError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Minimum number of cast votes before closure is permitted.
    pub fn required_votes(&self, panel_size: usize) -> usize {
        (panel_size as f64 * self.threshold).ceil() as usize
    }

    /// Judge the current tally against the panel.
    ///
    /// Callers re-query the ledger and call this immediately before acting,
    /// at display time and again at close time, so the decision always
    /// reflects the latest vote changes.
    pub fn verdict(&self, tally: &Tally, panel_size: usize) -> Verdict {
        if tally.is_tie() || tally.total() < self.required_votes(panel_size) {
            Verdict::Open
        } else {
            Verdict::Decidable(tally.outcome())
        }
    }
}

impl Default for VotingRule {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}
