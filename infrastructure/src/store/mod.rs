//! Durable review store adapters

pub mod sqlite;

pub use sqlite::SqliteReviewStore;
