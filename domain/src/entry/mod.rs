//! Entities under review: submitted entries and free-text ideas

pub mod entities;

pub use entities::{Category, Entry, EntryId, EntryStatus, Idea, IdeaId, MediaKind, MediaRef};
