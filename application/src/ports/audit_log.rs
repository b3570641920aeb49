//! Port for structured audit logging.
//!
//! Records state-changing review events (submission, votes, closure, wipes)
//! to an append-only structured log. This is separate from `tracing`-based
//! operation logs: tracing handles human-readable diagnostics, while this
//! port captures the review trail in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured audit event.
pub struct AuditEvent {
    /// Event type identifier (e.g., "entry_submitted", "vote_cast").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording audit events.
///
/// The `record` method is intentionally synchronous and non-fallible so
/// auditing can never disrupt a vote or a broadcast. Write failures are
/// the adapter's problem to log.
pub trait AuditLog: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAudit;

impl AuditLog for NoAudit {
    fn record(&self, _event: AuditEvent) {}
}
