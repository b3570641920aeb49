//! Panel configuration.
//!
//! [`PanelConfig`] groups the two inputs every voting decision needs: the
//! reviewer allow-list and the closure threshold. It is built once at
//! startup from file configuration and shared by value across use cases.

use conclave_domain::{DomainError, ReviewerPanel, UserId, VotingRule};
use thiserror::Error;

/// Errors building a panel configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Reviewer panel is empty; at least one reviewer id is required")]
    NoReviewers,

    #[error(transparent)]
    InvalidRule(#[from] DomainError),
}

/// Reviewer panel plus closure rule.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    panel: ReviewerPanel,
    rule: VotingRule,
}

impl PanelConfig {
    /// Build and validate a configuration.
    pub fn new(reviewers: Vec<UserId>, threshold: f64) -> Result<Self, ConfigError> {
        let panel = ReviewerPanel::new(reviewers);
        if panel.is_empty() {
            return Err(ConfigError::NoReviewers);
        }
        let rule = VotingRule::new(threshold)?;
        Ok(Self { panel, rule })
    }

    pub fn panel(&self) -> &ReviewerPanel {
        &self.panel
    }

    pub fn rule(&self) -> &VotingRule {
        &self.rule
    }

    /// Votes required before closure is permitted, for this panel.
    pub fn required_votes(&self) -> usize {
        self.rule.required_votes(self.panel.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = PanelConfig::new(vec![UserId::new(1), UserId::new(2), UserId::new(3)], 0.5)
            .unwrap();
        assert_eq!(config.panel().len(), 3);
        assert_eq!(config.required_votes(), 2);
    }

    #[test]
    fn test_empty_panel_rejected() {
        assert!(matches!(
            PanelConfig::new(vec![], 0.5),
            Err(ConfigError::NoReviewers)
        ));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(matches!(
            PanelConfig::new(vec![UserId::new(1)], 0.0),
            Err(ConfigError::InvalidRule(_))
        ));
    }
}
