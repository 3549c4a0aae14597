//! Application layer for the German study tutor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_REVIEW_TAG, SessionParams};
pub use ports::{
    answer_gateway::{AnswerGateway, GatewayError, SERVICE_UNAVAILABLE},
    duplicate_resolver::{DuplicateResolver, KeepExisting, OverwriteExisting, ResolverError},
    note_store::{NoteStore, StoreError},
    progress::{NoRetryProgress, RetryEvent, RetryNotifier},
};
pub use use_cases::ask_tutor::{AskError, AskTutorUseCase};
pub use use_cases::review_cards::{
    DEFAULT_BATCH_SIZE, ReviewBatch, ReviewCardsError, ReviewCardsUseCase, feedback_items,
};
pub use use_cases::save_note::{SaveNoteError, SaveNoteUseCase, SavedBlock};
