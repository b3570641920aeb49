//! Audit trail adapters

pub mod jsonl_audit;

pub use jsonl_audit::JsonlAuditLog;
