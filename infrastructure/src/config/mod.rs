//! Configuration file loading for study-tutor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `STUDY_TUTOR_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./study-tutor.toml` or `./.study-tutor.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/study-tutor/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    API_KEY_ENV, ConfigValidationError, FileAnkiConfig, FileConfig, FileGeminiConfig,
    FileLocalConfig, FileRetryConfig, FileReviewConfig, FileStorageConfig, StorageBackend,
};
pub use loader::ConfigLoader;
