//! Infrastructure layer for study-tutor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod anki;
pub mod config;
pub mod gemini;
pub mod local;

// Re-export commonly used types
pub use anki::AnkiConnectStore;
pub use config::{
    API_KEY_ENV, ConfigLoader, ConfigValidationError, FileAnkiConfig, FileConfig,
    FileGeminiConfig, FileLocalConfig, FileRetryConfig, FileReviewConfig, StorageBackend,
};
pub use gemini::GeminiAnswerGateway;
pub use local::LocalFileStore;
