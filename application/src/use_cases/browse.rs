//! Panel-only listing of stored entries and ideas.
//!
//! Returns data; rendering and delivery are the command dispatcher's
//! concern.

use crate::config::PanelConfig;
use crate::ports::store::{ReviewStore, StoreError};
use conclave_domain::{Entry, Idea, UserId};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("Identity {0} is not on the reviewer panel")]
    NotAuthorized(UserId),

    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}

pub struct BrowseUseCase<S> {
    store: Arc<S>,
    config: PanelConfig,
}

impl<S: ReviewStore> BrowseUseCase<S> {
    pub fn new(store: Arc<S>, config: PanelConfig) -> Self {
        Self { store, config }
    }

    pub async fn entries(&self, caller: UserId) -> Result<Vec<Entry>, BrowseError> {
        if !self.config.panel().contains(caller) {
            return Err(BrowseError::NotAuthorized(caller));
        }
        Ok(self.store.entries().await?)
    }

    pub async fn ideas(&self, caller: UserId) -> Result<Vec<Idea>, BrowseError> {
        if !self.config.panel().contains(caller) {
            return Err(BrowseError::NotAuthorized(caller));
        }
        Ok(self.store.ideas().await?)
    }
}
