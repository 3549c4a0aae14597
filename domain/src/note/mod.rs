//! Note domain.
//!
//! - [`entities`]: proposed items, classification results, stored notes
//! - [`parsing`]: splitting tutor responses and classifying blocks
//! - [`cache`]: the session's reconciliation cache
//! - [`reconcile`]: duplicate decisions and reconciliation outcomes

pub mod cache;
pub mod entities;
pub mod parsing;
pub mod reconcile;

pub use cache::ReconciliationCache;
pub use entities::{ClassifiedItem, NoteId, NoteKind, ProposedItem, ReviewCard, StoredNote};
pub use reconcile::{DuplicateDecision, ReconcileOutcome};
pub use parsing::{SplitResponse, classify, classify_block, extract_front, split_response};
