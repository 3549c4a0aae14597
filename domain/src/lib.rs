//! Domain layer for study-tutor
//!
//! This crate contains the note-extraction and reconciliation logic.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Pipeline
//!
//! A tutor answer flows through:
//!
//! 1. **Split**: [`split_response`] cuts the answer into a preamble and tagged blocks
//! 2. **Classify**: [`classify_block`] labels each block vocabulary / grammar / malformed
//! 3. **Extract**: vocabulary blocks yield a front key and a display-markup back
//! 4. **Reconcile**: the front is looked up in the [`ReconciliationCache`]
//!
//! ## Markup
//!
//! Answers use light markup (`**bold**`, `*italic*`, lists); the flashcard
//! backend stores display markup (`<b>`, `<i>`, `<br>`, `&nbsp;`). See [`markup`].

pub mod core;
pub mod markup;
pub mod note;
pub mod prompt;
pub mod retry;
pub mod session;

// Re-export commonly used types
pub use core::error::DomainError;
pub use markup::{to_display_markup, to_light_markup};
pub use note::{
    ClassifiedItem, DuplicateDecision, NoteId, NoteKind, ProposedItem, ReconcileOutcome,
    ReconciliationCache, ReviewCard, SplitResponse, StoredNote, classify, classify_block,
    extract_front, split_response,
};
pub use prompt::TutorPromptTemplate;
pub use retry::{RetryCause, RetryPolicy, RetryState, RetryStep};
pub use session::{CARD_FEEDBACK_TAG, PROPOSED_NOTE_TAG, SessionMode};
