//! Duplicate resolver port for proposed notes that collide with stored ones.
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`DuplicateResolver`] - defined here in application layer
//! - **Adapter**: `InteractiveDuplicateResolver` - implemented in presentation layer
//!
//! # Flow
//!
//! ```text
//! proposed front already in cache
//!        ↓
//! DuplicateResolver::decide(existing, proposed)
//!        ↓
//! User decides: Keep / Overwrite
//! ```
//!
//! The decision must depend only on the two notes it is given, so the
//! reconciliation engine can be tested without a terminal.

use async_trait::async_trait;
use tutor_domain::{DuplicateDecision, StoredNote};

/// Error type for duplicate resolution.
///
/// These errors represent failures while asking, not decisions.
#[derive(Debug, Clone)]
pub enum ResolverError {
    /// User cancelled the prompt (e.g., end of input).
    Cancelled,
    /// Terminal read/write failure.
    IoError(String),
}

impl std::fmt::Display for ResolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverError::Cancelled => write!(f, "Decision cancelled"),
            ResolverError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ResolverError {}

/// Port for resolving a duplicate key conflict.
#[async_trait]
pub trait DuplicateResolver: Send + Sync {
    async fn decide(
        &self,
        existing: &StoredNote,
        proposed: &StoredNote,
    ) -> Result<DuplicateDecision, ResolverError>;
}

/// Always keeps the stored note.
pub struct KeepExisting;

#[async_trait]
impl DuplicateResolver for KeepExisting {
    async fn decide(
        &self,
        _existing: &StoredNote,
        _proposed: &StoredNote,
    ) -> Result<DuplicateDecision, ResolverError> {
        Ok(DuplicateDecision::Keep)
    }
}

/// Always replaces the stored note with the proposed one.
pub struct OverwriteExisting;

#[async_trait]
impl DuplicateResolver for OverwriteExisting {
    async fn decide(
        &self,
        _existing: &StoredNote,
        _proposed: &StoredNote,
    ) -> Result<DuplicateDecision, ResolverError> {
        Ok(DuplicateDecision::Overwrite)
    }
}
