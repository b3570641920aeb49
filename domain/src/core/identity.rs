//! Reviewer and submitter identities.
//!
//! Identity is a chat-platform user id. The [`ReviewerPanel`] is the static
//! allow-list of identities entitled to vote and to close voting; everyone
//! else is a submitter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat-platform user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw platform id.
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed allow-list of reviewer identities.
///
/// Membership is the only authorization the system performs: a panel member
/// may vote on any entry and may request closure once a verdict is
/// decidable. The panel is set at startup and never changes at runtime.
///
/// # Example
///
/// ```
/// use conclave_domain::{ReviewerPanel, UserId};
///
/// let panel = ReviewerPanel::new(vec![UserId::new(1), UserId::new(2)]);
/// assert!(panel.contains(UserId::new(1)));
/// assert!(!panel.contains(UserId::new(99)));
/// assert_eq!(panel.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerPanel {
    reviewers: Vec<UserId>,
}

impl ReviewerPanel {
    /// Create a panel from a list of identities. Duplicates are dropped,
    /// first occurrence wins, order is preserved.
    pub fn new(reviewers: Vec<UserId>) -> Self {
        let mut seen = Vec::with_capacity(reviewers.len());
        for id in reviewers {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        Self { reviewers: seen }
    }

    /// Whether the identity is a panel member.
    pub fn contains(&self, id: UserId) -> bool {
        self.reviewers.contains(&id)
    }

    /// Panel size, the `n` in the participation threshold.
    pub fn len(&self) -> usize {
        self.reviewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty()
    }

    /// Iterate panel members in registration order.
    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.reviewers.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(UserId::from(42), id);
    }

    #[test]
    fn test_panel_membership() {
        let panel = ReviewerPanel::new(vec![UserId::new(1), UserId::new(2), UserId::new(3)]);
        assert_eq!(panel.len(), 3);
        assert!(panel.contains(UserId::new(2)));
        assert!(!panel.contains(UserId::new(4)));
    }

    #[test]
    fn test_panel_deduplicates() {
        let panel = ReviewerPanel::new(vec![UserId::new(1), UserId::new(1), UserId::new(2)]);
        assert_eq!(panel.len(), 2);
        let members: Vec<_> = panel.iter().collect();
        assert_eq!(members, vec![UserId::new(1), UserId::new(2)]);
    }

    #[test]
    fn test_empty_panel() {
        let panel = ReviewerPanel::default();
        assert!(panel.is_empty());
        assert_eq!(panel.len(), 0);
    }
}
