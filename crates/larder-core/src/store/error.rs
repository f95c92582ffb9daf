use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a [`DocumentStore`](super::DocumentStore) backend.
///
/// These propagate through the core unmodified; nothing above the store
/// retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("database JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("collection name '{name}' is reserved")]
    ReservedCollection { name: String },

    #[error("database lock poisoned by a panicked writer")]
    Poisoned,
}
