//! Voting coordinator.
//!
//! Drives vote intake, tally recomputation, broadcast of updated tallies,
//! and closure. Each entry moves through `Open` → `Closing` → `Closed`:
//! open entries accept votes and re-broadcasts; the closing transition is
//! won atomically by exactly one close request; closed entries reject
//! everything.
//!
//! The read-tally/decide/broadcast sequence is serialized per entry by a
//! lazily created async lock; votes on different entries never block each
//! other. The tally is re-queried from the ledger immediately before every
//! decision, at display time and again at close time, so a last-moment vote
//! change is always honored.

use crate::config::PanelConfig;
use crate::ports::audit_log::{AuditEvent, AuditLog, NoAudit};
use crate::ports::messenger::Messenger;
use crate::ports::store::{ReviewStore, StoreError};
use conclave_domain::{
    Entry, EntryId, EntryStatus, Notice, Tally, UserId, Verdict, VoteValue, render_final_notice,
    render_open_notice, submitter_outcome,
};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors rejecting a vote interaction.
#[derive(Error, Debug)]
pub enum VoteError {
    #[error("Identity {0} is not on the reviewer panel")]
    NotAuthorized(UserId),

    #[error("Voting on entry {0} is closed")]
    EntryClosed(EntryId),

    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

/// Errors rejecting a close request.
#[derive(Error, Debug)]
pub enum CloseError {
    #[error("Identity {0} is not on the reviewer panel")]
    NotAuthorized(UserId),

    #[error("Voting on entry {0} is closed")]
    EntryClosed(EntryId),

    #[error("Entry {0} has no decidable tally yet")]
    NotDecidable(EntryId),

    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

/// Result of an accepted vote interaction.
#[derive(Debug)]
pub enum CastVoteOutcome {
    /// The ledger changed and the new tally was pushed to every handle.
    Recorded {
        tally: Tally,
        verdict: Verdict,
        /// Handles whose update failed; they keep their stale rendering
        /// until the next broadcast.
        failed_updates: usize,
    },
    /// The reviewer repeated their current vote. Nothing changed and
    /// nothing was broadcast; the caller just acknowledges.
    NoOp,
}

/// Result of a successful closure.
#[derive(Debug)]
pub struct CloseOutcome {
    pub status: EntryStatus,
    pub tally: Tally,
    pub failed_updates: usize,
}

/// Per-entry voting state machine over a store and a messenger.
pub struct VotingCoordinator<S, M> {
    store: Arc<S>,
    messenger: Arc<M>,
    config: PanelConfig,
    audit: Arc<dyn AuditLog>,
    /// Per-entry locks serializing read-tally/decide/broadcast.
    entry_locks: Mutex<HashMap<EntryId, Arc<tokio::sync::Mutex<()>>>>,
    /// Entries that have won the `Open` → `Closing` transition. Insertion
    /// is the atomic guard making closure at-most-once.
    closing: Mutex<HashSet<EntryId>>,
}

impl<S: ReviewStore + 'static, M: Messenger + 'static> VotingCoordinator<S, M> {
    pub fn new(store: Arc<S>, messenger: Arc<M>, config: PanelConfig) -> Self {
        Self {
            store,
            messenger,
            config,
            audit: Arc::new(NoAudit),
            entry_locks: Mutex::new(HashMap::new()),
            closing: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Record or change a reviewer's vote and re-broadcast the tally.
    pub async fn cast_vote(
        &self,
        entry_id: EntryId,
        reviewer: UserId,
        value: VoteValue,
    ) -> Result<CastVoteOutcome, VoteError> {
        if !self.config.panel().contains(reviewer) {
            return Err(VoteError::NotAuthorized(reviewer));
        }

        let lock = self.lock_for(entry_id);
        let _guard = lock.lock().await;

        let entry = self.store.entry(entry_id).await?;
        if entry.status.is_terminal() {
            return Err(VoteError::EntryClosed(entry_id));
        }

        // Linearization point: the ledger upsert on the (entry, reviewer) key.
        let changed = self.store.record_vote(entry_id, reviewer, value).await?;
        if !changed {
            debug!(
                "Reviewer {} repeated their {} vote on entry {}",
                reviewer, value, entry_id
            );
            return Ok(CastVoteOutcome::NoOp);
        }

        let tally = self.store.tally(entry_id).await?;
        let panel_size = self.config.panel().len();
        let verdict = self.config.rule().verdict(&tally, panel_size);

        info!(
            "Entry {}: {} voted {}, tally {}/{} approve/reject, verdict {:?}",
            entry_id, reviewer, value, tally.approve, tally.reject, verdict
        );

        let notice = render_open_notice(&entry, &tally, panel_size, verdict.is_decidable());
        let failed_updates = self.broadcast(entry_id, &notice).await?;

        self.audit.record(AuditEvent::new(
            "vote_cast",
            json!({
                "entry": entry_id.value(),
                "reviewer": reviewer.value(),
                "value": value.as_str(),
                "approve": tally.approve,
                "reject": tally.reject,
                "decidable": verdict.is_decidable(),
            }),
        ));

        Ok(CastVoteOutcome::Recorded {
            tally,
            verdict,
            failed_updates,
        })
    }

    /// Close voting on a decidable entry, at most once.
    pub async fn close_voting(
        &self,
        entry_id: EntryId,
        reviewer: UserId,
    ) -> Result<CloseOutcome, CloseError> {
        if !self.config.panel().contains(reviewer) {
            return Err(CloseError::NotAuthorized(reviewer));
        }

        let lock = self.lock_for(entry_id);
        let _guard = lock.lock().await;

        let entry = self.store.entry(entry_id).await?;
        if entry.status.is_terminal() {
            return Err(CloseError::EntryClosed(entry_id));
        }

        // Atomic Open → Closing; the loser of a near-simultaneous race
        // observes the insertion and backs off.
        if !self.begin_closing(entry_id) {
            return Err(CloseError::EntryClosed(entry_id));
        }

        let result = self.run_closure(&entry).await;
        self.end_closing(entry_id);
        result
    }

    /// The closure broadcast: final tally, single status write, terminal
    /// captions everywhere, submitter notice.
    async fn run_closure(&self, entry: &Entry) -> Result<CloseOutcome, CloseError> {
        // Recomputed from the ledger, never from a cached verdict. A vote
        // changed after the close control appeared must still count.
        let tally = self.store.tally(entry.id).await?;
        let panel_size = self.config.panel().len();

        let Verdict::Decidable(status) = self.config.rule().verdict(&tally, panel_size) else {
            debug!(
                "Close requested on entry {} but tally {}/{} is not decidable",
                entry.id, tally.approve, tally.reject
            );
            return Err(CloseError::NotDecidable(entry.id));
        };

        // Single authoritative status write; the compare-and-set is a
        // durable backstop behind the in-process closing guard.
        if !self.store.finalize_entry(entry.id, status).await? {
            return Err(CloseError::EntryClosed(entry.id));
        }

        info!(
            "Entry {} closed: {} ({} approve, {} reject)",
            entry.id, status, tally.approve, tally.reject
        );

        let notice = render_final_notice(entry, &tally, status);
        let failed_updates = self.broadcast(entry.id, &notice).await?;

        if let Err(e) = self
            .messenger
            .notify(entry.submitter, submitter_outcome(status))
            .await
        {
            warn!(
                "Terminal notice to submitter {} for entry {} failed: {}",
                entry.submitter, entry.id, e
            );
        }

        self.audit.record(AuditEvent::new(
            "voting_closed",
            json!({
                "entry": entry.id.value(),
                "status": status.as_str(),
                "approve": tally.approve,
                "reject": tally.reject,
            }),
        ));

        Ok(CloseOutcome {
            status,
            tally,
            failed_updates,
        })
    }

    /// Push `notice` to every registered handle concurrently, collecting a
    /// result per handle. A broken handle is logged and skipped; it never
    /// cancels or blocks its siblings. Returns the number of failures.
    async fn broadcast(&self, entry_id: EntryId, notice: &Notice) -> Result<usize, StoreError> {
        let handles = self.store.handles_for(entry_id).await?;

        let mut join_set = JoinSet::new();
        for handle in handles {
            let messenger = Arc::clone(&self.messenger);
            let notice = notice.clone();

            join_set.spawn(async move {
                let result = messenger.update(&handle.message, &notice).await;
                (handle, result)
            });
        }

        let mut failed = 0;
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((_, Ok(()))) => {}
                Ok((handle, Err(e))) => {
                    warn!(
                        "Tally update for reviewer {} on entry {} failed: {}",
                        handle.reviewer, entry_id, e
                    );
                    failed += 1;
                }
                Err(e) => {
                    warn!("Broadcast task join error: {}", e);
                    failed += 1;
                }
            }
        }

        Ok(failed)
    }

    fn lock_for(&self, entry: EntryId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .entry_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            locks
                .entry(entry)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }

    fn begin_closing(&self, entry: EntryId) -> bool {
        self.closing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entry)
    }

    fn end_closing(&self, entry: EntryId) {
        self.closing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&entry);
    }
}
