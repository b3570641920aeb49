//! Notice rendering.
//!
//! Pure functions producing the caption text and inline controls for every
//! reviewer-facing message state: initial fan-out, live tally, and the
//! terminal caption after closure. The messaging adapter maps [`Control`]s
//! to whatever inline-button mechanism the platform offers.

use crate::ballot::{ActionToken, Tally, VoteValue};
use crate::entry::{Entry, EntryId, EntryStatus, Idea};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// An inline control attached to a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Approve(EntryId),
    Reject(EntryId),
    Close(EntryId),
}

impl Control {
    /// Button label shown to the reviewer.
    pub fn label(&self) -> &'static str {
        match self {
            Control::Approve(_) => "✅ Approve",
            Control::Reject(_) => "❌ Reject",
            Control::Close(_) => "Close voting",
        }
    }

    /// Callback token the platform sends back when the control is pressed.
    pub fn token(&self) -> ActionToken {
        match self {
            Control::Approve(entry) => ActionToken::CastVote {
                entry: *entry,
                value: VoteValue::Approve,
            },
            Control::Reject(entry) => ActionToken::CastVote {
                entry: *entry,
                value: VoteValue::Reject,
            },
            Control::Close(entry) => ActionToken::CloseVoting { entry: *entry },
        }
    }
}

/// A rendered notification: caption text plus inline controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub caption: String,
    pub controls: Vec<Control>,
}

impl Notice {
    pub fn has_controls(&self) -> bool {
        !self.controls.is_empty()
    }
}

fn caption_header(entry: &Entry) -> String {
    let mut header = String::new();
    if let Some(caption) = &entry.caption
        && !caption.is_empty()
    {
        header.push_str(caption);
        header.push('\n');
    }
    let _ = writeln!(header, "@{}", entry.username.as_deref().unwrap_or("unknown"));
    header
}

/// Initial notice delivered to each reviewer at fan-out time. Vote controls
/// only; no tally line and no close control until votes exist.
pub fn render_submission_notice(entry: &Entry) -> Notice {
    let mut caption = String::new();
    if let Some(text) = &entry.caption
        && !text.is_empty()
    {
        caption.push_str(text);
        caption.push('\n');
    }
    let _ = write!(
        caption,
        "@{} submitted an entry for review.",
        entry.username.as_deref().unwrap_or("unknown")
    );

    Notice {
        caption,
        controls: vec![Control::Approve(entry.id), Control::Reject(entry.id)],
    }
}

/// Live tally notice pushed to every handle after a vote changes the
/// ledger. The close control appears only while the verdict is decidable.
pub fn render_open_notice(entry: &Entry, tally: &Tally, panel_size: usize, decidable: bool) -> Notice {
    let mut caption = caption_header(entry);
    let _ = write!(
        caption,
        "\n✅ {} / {} | ❌ {} / {}",
        tally.approve, panel_size, tally.reject, panel_size
    );

    let mut controls = vec![Control::Approve(entry.id), Control::Reject(entry.id)];
    if decidable {
        controls.push(Control::Close(entry.id));
    }

    Notice { caption, controls }
}

/// Terminal caption written to every handle at closure. No controls.
pub fn render_final_notice(entry: &Entry, tally: &Tally, status: EntryStatus) -> Notice {
    let mut caption = caption_header(entry);
    let _ = write!(
        caption,
        "\nVoting complete.\n✅ Approved: {}\n❌ Rejected: {}\nStatus: {}",
        tally.approve, tally.reject, status
    );

    Notice {
        caption,
        controls: Vec::new(),
    }
}

/// Reviewer-facing text announcing a new idea.
pub fn render_idea_notice(idea: &Idea) -> String {
    format!(
        "@{} suggested an idea:\n\"{}\"",
        idea.username.as_deref().unwrap_or("unknown"),
        idea.text
    )
}

/// Acknowledgment sent to the submitter once fan-out completes.
pub fn submitter_ack() -> &'static str {
    "Your entry was submitted for review."
}

/// Terminal notice sent to the submitter at closure.
pub fn submitter_outcome(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Approved => "Your entry was approved!",
        _ => "Your entry was rejected.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::UserId;
    use crate::entry::{EntryId, MediaKind, MediaRef};
    use chrono::Utc;

    fn entry() -> Entry {
        Entry {
            id: EntryId::new(5),
            submitter: UserId::new(100),
            username: Some("sender".to_string()),
            caption: Some("evening shot".to_string()),
            media: MediaRef::new("file-1"),
            kind: MediaKind::Image,
            status: EntryStatus::Pending,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_submission_notice() {
        let notice = render_submission_notice(&entry());
        assert!(notice.caption.contains("evening shot"));
        assert!(notice.caption.contains("@sender"));
        assert_eq!(
            notice.controls,
            vec![Control::Approve(EntryId::new(5)), Control::Reject(EntryId::new(5))]
        );
    }

    #[test]
    fn test_open_notice_tally_line() {
        let notice = render_open_notice(&entry(), &Tally::new(2, 0), 3, false);
        assert!(notice.caption.contains("✅ 2 / 3 | ❌ 0 / 3"));
        assert_eq!(notice.controls.len(), 2);
    }

    #[test]
    fn test_open_notice_close_control_when_decidable() {
        let notice = render_open_notice(&entry(), &Tally::new(2, 0), 3, true);
        assert_eq!(notice.controls.len(), 3);
        assert_eq!(notice.controls[2], Control::Close(EntryId::new(5)));
        assert_eq!(notice.controls[2].token().to_string(), "close_5");
    }

    #[test]
    fn test_final_notice_has_no_controls() {
        let notice = render_final_notice(&entry(), &Tally::new(2, 1), EntryStatus::Approved);
        assert!(!notice.has_controls());
        assert!(notice.caption.contains("Voting complete."));
        assert!(notice.caption.contains("Status: Approved"));
    }

    #[test]
    fn test_caption_without_text_or_username() {
        let mut e = entry();
        e.caption = None;
        e.username = None;
        let notice = render_submission_notice(&e);
        assert!(notice.caption.starts_with("@unknown"));
    }

    #[test]
    fn test_control_tokens() {
        let id = EntryId::new(9);
        assert_eq!(Control::Approve(id).token().to_string(), "vote_9_approve");
        assert_eq!(Control::Reject(id).token().to_string(), "vote_9_reject");
        assert_eq!(Control::Approve(id).label(), "✅ Approve");
    }

    #[test]
    fn test_submitter_texts() {
        assert_eq!(submitter_outcome(EntryStatus::Approved), "Your entry was approved!");
        assert_eq!(submitter_outcome(EntryStatus::Rejected), "Your entry was rejected.");
        assert!(!submitter_ack().is_empty());
    }
}
