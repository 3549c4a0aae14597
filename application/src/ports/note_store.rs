//! Note store port
//!
//! Defines the interface for the durable flashcard collection.
//!
//! # Implementations
//!
//! - **AnkiConnect**: remote flashcard store (infrastructure layer)
//! - **Local files**: `front;back` export plus a markdown notebook
//!   (infrastructure layer)
//!
//! Operations that only make sense for one backend have no-op defaults.

use async_trait::async_trait;
use thiserror::Error;
use tutor_domain::{NoteId, ReviewCard, StoredNote};

/// Errors raised by a note store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend rejected note '{0}'")]
    Rejected(String),

    #[error("Note '{0}' has no backend id")]
    MissingId(String),

    #[error("Note '{0}' not found in store")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for notes
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Human-readable backend name for logs and banners
    fn name(&self) -> &str;

    /// Prepare the backend (e.g., create the target deck). Called once at startup.
    async fn ensure_ready(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Load every stored note, used to populate the session cache
    async fn load_notes(&self) -> Result<Vec<StoredNote>, StoreError>;

    /// Append a new note. Returns the backend id, if the backend assigns one.
    async fn add_note(&self, note: &StoredNote) -> Result<Option<NoteId>, StoreError>;

    /// Replace the back of an existing note
    async fn update_note(&self, existing: &StoredNote, back: &str) -> Result<(), StoreError>;

    /// Keep a full item block (including grammar items) in the narrative log
    async fn archive_block(&self, _block: &str) -> Result<(), StoreError> {
        Ok(())
    }

    /// Cards carrying `tag`, for batch review
    async fn notes_by_tag(&self, _tag: &str) -> Result<Vec<ReviewCard>, StoreError> {
        Ok(Vec::new())
    }

    /// Remove `tag` from the given notes
    async fn remove_tag(&self, _ids: &[NoteId], _tag: &str) -> Result<(), StoreError> {
        Ok(())
    }
}
