//! libSQL-backed review store.
//!
//! Embedded SQLite via the `libsql` crate. The vote ledger's uniqueness
//! constraint lives in the schema (`PRIMARY KEY (entry_id, reviewer_id)`)
//! and re-votes go through an `ON CONFLICT ... DO UPDATE` upsert; the
//! terminal status write is a compare-and-set `UPDATE ... WHERE status =
//! 'Pending'` so a second closure attempt can never overwrite the first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conclave_application::{NewEntry, NewIdea, ReviewStore, StoreError};
use conclave_domain::{
    Category, Entry, EntryId, EntryStatus, Idea, IdeaId, MediaKind, MediaRef, MessageRef,
    NotificationHandle, Tally, UserId, VoteValue,
};
use libsql::{Builder, params};
use tracing::debug;

const MIGRATION_001: &str = include_str!("../../migrations/001_initial.sql");

/// Review store on an embedded libSQL database.
pub struct SqliteReviewStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SqliteReviewStore {
    /// Open (or create) a local database at the given path and run the
    /// embedded migrations.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(backend)?;
        let conn = db.connect().map_err(backend)?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(backend)?;

        conn.execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Backend(format!("migration 001_initial: {e}")))?;

        debug!("Review store opened at {}", path);
        Ok(Self { db, conn })
    }

    async fn entry_row(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, submitter_id, username, caption, media_ref, media_kind, status, submitted_at
                 FROM entries WHERE id = ?1",
                params![id.value()],
            )
            .await
            .map_err(backend)?;

        match rows.next().await.map_err(backend)? {
            Some(row) => Ok(Some(parse_entry(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ReviewStore for SqliteReviewStore {
    async fn insert_entry(&self, draft: NewEntry) -> Result<Entry, StoreError> {
        let submitted_at = Utc::now();
        self.conn
            .execute(
                "INSERT INTO entries (submitter_id, username, caption, media_ref, media_kind, status, submitted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'Pending', ?6)",
                params![
                    draft.submitter.value(),
                    draft.username.as_deref(),
                    draft.caption.as_deref(),
                    draft.media.as_str(),
                    draft.kind.as_str(),
                    submitted_at.to_rfc3339()
                ],
            )
            .await
            .map_err(backend)?;

        let mut rows = self
            .conn
            .query("SELECT last_insert_rowid()", ())
            .await
            .map_err(backend)?;
        let row = rows
            .next()
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend("no row id after insert".to_string()))?;
        let id: i64 = row.get(0).map_err(backend)?;

        Ok(Entry {
            id: EntryId::new(id),
            submitter: draft.submitter,
            username: draft.username,
            caption: draft.caption,
            media: draft.media,
            kind: draft.kind,
            status: EntryStatus::Pending,
            submitted_at,
        })
    }

    async fn entry(&self, id: EntryId) -> Result<Entry, StoreError> {
        self.entry_row(id)
            .await?
            .ok_or(StoreError::EntryNotFound(id))
    }

    async fn entries(&self) -> Result<Vec<Entry>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, submitter_id, username, caption, media_ref, media_kind, status, submitted_at
                 FROM entries ORDER BY id",
                (),
            )
            .await
            .map_err(backend)?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await.map_err(backend)? {
            entries.push(parse_entry(&row)?);
        }
        Ok(entries)
    }

    async fn finalize_entry(&self, id: EntryId, status: EntryStatus) -> Result<bool, StoreError> {
        if !status.is_terminal() {
            return Err(StoreError::Backend(format!(
                "refusing to finalize entry {id} to non-terminal status {status}"
            )));
        }

        // Compare-and-set: only a pending entry can be finalized, and the
        // row reports whether this call performed the write.
        let affected = self
            .conn
            .execute(
                "UPDATE entries SET status = ?1 WHERE id = ?2 AND status = 'Pending'",
                params![status.as_str(), id.value()],
            )
            .await
            .map_err(backend)?;

        Ok(affected > 0)
    }

    async fn record_vote(
        &self,
        entry: EntryId,
        reviewer: UserId,
        value: VoteValue,
    ) -> Result<bool, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT value FROM votes WHERE entry_id = ?1 AND reviewer_id = ?2",
                params![entry.value(), reviewer.value()],
            )
            .await
            .map_err(backend)?;

        if let Some(row) = rows.next().await.map_err(backend)? {
            let current: String = row.get(0).map_err(backend)?;
            if current == value.as_str() {
                return Ok(false);
            }
        }

        self.conn
            .execute(
                "INSERT INTO votes (entry_id, reviewer_id, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(entry_id, reviewer_id) DO UPDATE SET value = excluded.value",
                params![entry.value(), reviewer.value(), value.as_str()],
            )
            .await
            .map_err(backend)?;

        Ok(true)
    }

    async fn tally(&self, entry: EntryId) -> Result<Tally, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT value, COUNT(*) FROM votes WHERE entry_id = ?1 GROUP BY value",
                params![entry.value()],
            )
            .await
            .map_err(backend)?;

        let mut tally = Tally::default();
        while let Some(row) = rows.next().await.map_err(backend)? {
            let value: String = row.get(0).map_err(backend)?;
            let count: i64 = row.get(1).map_err(backend)?;
            match value.parse::<VoteValue>() {
                Ok(VoteValue::Approve) => tally.approve = count as usize,
                Ok(VoteValue::Reject) => tally.reject = count as usize,
                Err(e) => return Err(StoreError::Backend(e)),
            }
        }
        Ok(tally)
    }

    async fn register_handles(
        &self,
        entry: EntryId,
        handles: Vec<NotificationHandle>,
    ) -> Result<(), StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*) FROM handles WHERE entry_id = ?1",
                params![entry.value()],
            )
            .await
            .map_err(backend)?;
        let row = rows
            .next()
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend("count query returned no row".to_string()))?;
        let existing: i64 = row.get(0).map_err(backend)?;
        if existing > 0 {
            return Err(StoreError::AlreadyRegistered(entry));
        }

        for handle in handles {
            self.conn
                .execute(
                    "INSERT INTO handles (entry_id, reviewer_id, destination, message)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        entry.value(),
                        handle.reviewer.value(),
                        handle.message.destination,
                        handle.message.message
                    ],
                )
                .await
                .map_err(backend)?;
        }
        Ok(())
    }

    async fn handles_for(&self, entry: EntryId) -> Result<Vec<NotificationHandle>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT reviewer_id, destination, message FROM handles
                 WHERE entry_id = ?1 ORDER BY reviewer_id",
                params![entry.value()],
            )
            .await
            .map_err(backend)?;

        let mut handles = Vec::new();
        while let Some(row) = rows.next().await.map_err(backend)? {
            let reviewer: i64 = row.get(0).map_err(backend)?;
            let destination: i64 = row.get(1).map_err(backend)?;
            let message: i64 = row.get(2).map_err(backend)?;
            handles.push(NotificationHandle::new(
                entry,
                UserId::new(reviewer),
                MessageRef::new(destination, message),
            ));
        }
        Ok(handles)
    }

    async fn insert_idea(&self, draft: NewIdea) -> Result<Idea, StoreError> {
        let submitted_at = Utc::now();
        self.conn
            .execute(
                "INSERT INTO ideas (submitter_id, username, idea, submitted_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    draft.submitter.value(),
                    draft.username.as_deref(),
                    draft.text.as_str(),
                    submitted_at.to_rfc3339()
                ],
            )
            .await
            .map_err(backend)?;

        let mut rows = self
            .conn
            .query("SELECT last_insert_rowid()", ())
            .await
            .map_err(backend)?;
        let row = rows
            .next()
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend("no row id after insert".to_string()))?;
        let id: i64 = row.get(0).map_err(backend)?;

        Ok(Idea {
            id: IdeaId::new(id),
            submitter: draft.submitter,
            username: draft.username,
            text: draft.text,
            submitted_at,
        })
    }

    async fn ideas(&self) -> Result<Vec<Idea>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, submitter_id, username, idea, submitted_at FROM ideas ORDER BY id",
                (),
            )
            .await
            .map_err(backend)?;

        let mut ideas = Vec::new();
        while let Some(row) = rows.next().await.map_err(backend)? {
            let id: i64 = row.get(0).map_err(backend)?;
            let submitter: i64 = row.get(1).map_err(backend)?;
            let username: Option<String> = row.get(2).map_err(backend)?;
            let text: String = row.get(3).map_err(backend)?;
            let submitted_at: String = row.get(4).map_err(backend)?;
            ideas.push(Idea {
                id: IdeaId::new(id),
                submitter: UserId::new(submitter),
                username,
                text,
                submitted_at: parse_datetime(&submitted_at)?,
            });
        }
        Ok(ideas)
    }

    async fn wipe(&self, category: Category) -> Result<(), StoreError> {
        match category {
            Category::Entries => {
                // Explicit cascade: votes and handles share the entry key.
                self.conn
                    .execute("DELETE FROM votes", ())
                    .await
                    .map_err(backend)?;
                self.conn
                    .execute("DELETE FROM handles", ())
                    .await
                    .map_err(backend)?;
                self.conn
                    .execute("DELETE FROM entries", ())
                    .await
                    .map_err(backend)?;
            }
            Category::Ideas => {
                self.conn
                    .execute("DELETE FROM ideas", ())
                    .await
                    .map_err(backend)?;
            }
        }
        debug!("Wiped category {}", category);
        Ok(())
    }
}

fn backend(e: libsql::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn parse_entry(row: &libsql::Row) -> Result<Entry, StoreError> {
    let id: i64 = row.get(0).map_err(backend)?;
    let submitter: i64 = row.get(1).map_err(backend)?;
    let username: Option<String> = row.get(2).map_err(backend)?;
    let caption: Option<String> = row.get(3).map_err(backend)?;
    let media_ref: String = row.get(4).map_err(backend)?;
    let media_kind: String = row.get(5).map_err(backend)?;
    let status: String = row.get(6).map_err(backend)?;
    let submitted_at: String = row.get(7).map_err(backend)?;

    Ok(Entry {
        id: EntryId::new(id),
        submitter: UserId::new(submitter),
        username,
        caption,
        media: MediaRef::new(media_ref),
        kind: media_kind.parse::<MediaKind>().map_err(StoreError::Backend)?,
        status: status.parse::<EntryStatus>().map_err(StoreError::Backend)?,
        submitted_at: parse_datetime(&submitted_at)?,
    })
}

/// Parse a stored timestamp; accepts RFC 3339 and SQLite's default format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Backend(format!("failed to parse datetime '{s}': {e}")))
}
