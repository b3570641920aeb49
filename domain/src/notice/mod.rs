//! Reviewer-facing notifications: message handles and notice rendering

pub mod handle;
pub mod render;

pub use handle::{MessageRef, NotificationHandle};
pub use render::{
    Control, Notice, render_final_notice, render_idea_notice, render_open_notice,
    render_submission_notice, submitter_ack, submitter_outcome,
};
