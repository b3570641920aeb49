//! Review store port.
//!
//! One durable store backs three method groups: the entry table, the vote
//! ledger, and the notification-handle registry. They share a single port
//! because every row is keyed by entry id and the groups are created and
//! wiped together; adapters back them with one storage unit.

use async_trait::async_trait;
use conclave_domain::{
    Category, Entry, EntryId, EntryStatus, Idea, MediaKind, MediaRef, NotificationHandle, Tally,
    UserId, VoteValue,
};
use thiserror::Error;

/// Errors from store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Entry {0} not found")]
    EntryNotFound(EntryId),

    #[error("Notification handles already registered for entry {0}")]
    AlreadyRegistered(EntryId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// An entry prior to persistence; id, status, and timestamp are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub submitter: UserId,
    pub username: Option<String>,
    pub caption: Option<String>,
    pub media: MediaRef,
    pub kind: MediaKind,
}

/// An idea prior to persistence.
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub submitter: UserId,
    pub username: Option<String>,
    pub text: String,
}

/// Durable state behind the voting core.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    // ==================== Entries ====================

    /// Persist a new entry with `Pending` status and a fresh monotonic id.
    async fn insert_entry(&self, draft: NewEntry) -> Result<Entry, StoreError>;

    async fn entry(&self, id: EntryId) -> Result<Entry, StoreError>;

    async fn entries(&self) -> Result<Vec<Entry>, StoreError>;

    /// Compare-and-set terminal write: Pending → `status`.
    ///
    /// Returns `Ok(true)` when this call performed the transition and
    /// `Ok(false)` when the entry was already finalized. `status` must be
    /// terminal.
    async fn finalize_entry(&self, id: EntryId, status: EntryStatus) -> Result<bool, StoreError>;

    // ==================== Vote ledger ====================

    /// Idempotent upsert on the (entry, reviewer) key.
    ///
    /// Returns `Ok(true)` when the stored value changed, `Ok(false)` when
    /// the reviewer repeated their current vote. The write is durable
    /// before the call returns.
    async fn record_vote(
        &self,
        entry: EntryId,
        reviewer: UserId,
        value: VoteValue,
    ) -> Result<bool, StoreError>;

    /// Aggregate the ledger rows for one entry; absent rows count as zero.
    async fn tally(&self, entry: EntryId) -> Result<Tally, StoreError>;

    // ==================== Notification handles ====================

    /// Register the fan-out handle set for an entry, exactly once.
    ///
    /// Fails with [`StoreError::AlreadyRegistered`] if handles for the
    /// entry already exist; submission fan-out must be exactly-once.
    async fn register_handles(
        &self,
        entry: EntryId,
        handles: Vec<NotificationHandle>,
    ) -> Result<(), StoreError>;

    /// The registered handles for an entry, ordered by reviewer.
    async fn handles_for(&self, entry: EntryId) -> Result<Vec<NotificationHandle>, StoreError>;

    // ==================== Ideas ====================

    async fn insert_idea(&self, draft: NewIdea) -> Result<Idea, StoreError>;

    async fn ideas(&self) -> Result<Vec<Idea>, StoreError>;

    // ==================== Bulk wipe ====================

    /// Delete everything in one category. Wiping `Entries` cascades to
    /// votes and handles; the other category is never touched.
    async fn wipe(&self, category: Category) -> Result<(), StoreError>;
}
