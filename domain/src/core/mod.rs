//! Core domain types shared across modules

pub mod error;
pub mod identity;

pub use error::DomainError;
pub use identity::{ReviewerPanel, UserId};
