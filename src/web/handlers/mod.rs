//! API handlers for Filebay.

pub mod files;

pub use files::*;

use crate::store::FileStore;

/// Shared application state for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The file store backing all operations.
    pub store: FileStore,
}

impl AppState {
    /// Create application state around a file store.
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
}
