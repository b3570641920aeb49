//! TOML file configuration schema.
//!
//! Deserialized by figment from `conclave.toml`; every section and field is
//! optional and falls back to its default.

use conclave_application::{ConfigError, PanelConfig};
use conclave_domain::{ChallengeBank, ChallengePrompt, UserId, VotingRule};
use serde::{Deserialize, Serialize};

/// Root configuration file schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub panel: PanelSection,
    pub store: StoreSection,
    pub wipe: WipeSection,
}

/// `[panel]`: the reviewer allow-list and closure threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSection {
    /// Reviewer platform ids.
    pub reviewers: Vec<i64>,
    /// Fraction of the panel that must vote before closure is permitted.
    pub threshold: f64,
}

impl Default for PanelSection {
    fn default() -> Self {
        Self {
            reviewers: Vec::new(),
            threshold: VotingRule::DEFAULT_THRESHOLD,
        }
    }
}

/// `[store]`: persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Path of the embedded database file.
    pub path: String,
    /// Optional JSONL audit trail path; auditing is off when unset.
    pub audit_path: Option<String>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: "conclave.db".to_string(),
            audit_path: None,
        }
    }
}

/// `[wipe]`: bulk-wipe challenge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WipeSection {
    /// Challenge questions; the built-in bank is used when empty.
    pub challenges: Vec<ChallengeEntry>,
    /// Seconds an issued challenge stays answerable.
    pub ttl_secs: i64,
}

impl Default for WipeSection {
    fn default() -> Self {
        Self {
            challenges: Vec::new(),
            ttl_secs: conclave_application::use_cases::wipe_category::DEFAULT_CHALLENGE_TTL_SECS,
        }
    }
}

/// One `[[wipe.challenges]]` question/answer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeEntry {
    pub question: String,
    pub answer: String,
}

impl FileConfig {
    /// Build the validated panel configuration.
    pub fn panel_config(&self) -> Result<PanelConfig, ConfigError> {
        let reviewers = self.panel.reviewers.iter().copied().map(UserId::new).collect();
        PanelConfig::new(reviewers, self.panel.threshold)
    }

    /// Build the challenge bank, falling back to the built-in prompts when
    /// the file configures none.
    pub fn challenge_bank(&self) -> ChallengeBank {
        if self.wipe.challenges.is_empty() {
            return ChallengeBank::default();
        }
        let prompts = self
            .wipe
            .challenges
            .iter()
            .map(|c| ChallengePrompt::new(c.question.clone(), c.answer.clone()))
            .collect();
        // Non-empty by the check above
        ChallengeBank::new(prompts).unwrap_or_default()
    }

    pub fn challenge_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.wipe.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert!(config.panel.reviewers.is_empty());
        assert_eq!(config.panel.threshold, 0.5);
        assert_eq!(config.store.path, "conclave.db");
        assert!(config.store.audit_path.is_none());
        assert_eq!(config.wipe.ttl_secs, 120);
    }

    #[test]
    fn test_panel_config_requires_reviewers() {
        let config = FileConfig::default();
        assert!(config.panel_config().is_err());

        let mut config = FileConfig::default();
        config.panel.reviewers = vec![1, 2, 3];
        let panel = config.panel_config().unwrap();
        assert_eq!(panel.panel().len(), 3);
        assert_eq!(panel.required_votes(), 2);
    }

    #[test]
    fn test_challenge_bank_fallback() {
        let config = FileConfig::default();
        assert_eq!(config.challenge_bank().len(), 3);

        let mut config = FileConfig::default();
        config.wipe.challenges = vec![ChallengeEntry {
            question: "Password?".to_string(),
            answer: "swordfish".to_string(),
        }];
        assert_eq!(config.challenge_bank().len(), 1);
    }

    #[test]
    fn test_parses_from_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            [panel]
            reviewers = [11, 22]
            threshold = 0.75

            [store]
            path = "/tmp/review.db"

            [[wipe.challenges]]
            question = "Password?"
            answer = "swordfish"
            "#,
        )
        .unwrap();

        assert_eq!(config.panel.reviewers, vec![11, 22]);
        assert_eq!(config.panel.threshold, 0.75);
        assert_eq!(config.store.path, "/tmp/review.db");
        assert_eq!(config.wipe.challenges.len(), 1);
    }
}
