//! Raw TOML configuration data types
//!
//! These structs mirror the layout of the TOML config file and are
//! deserialized directly.

use crate::anki::DEFAULT_URL as DEFAULT_ANKI_URL;
use crate::gemini::DEFAULT_ENDPOINT;
use crate::local::{DEFAULT_EXPORT_FILE, DEFAULT_NOTES_FILE};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Environment variable consulted when `gemini.api_key` is unset
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("retry.max_attempts cannot be 0")]
    ZeroRetryAttempts,

    #[error("review.batch_size cannot be 0")]
    ZeroBatchSize,

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),
}

/// Raw Gemini configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Model answering questions
    pub model: String,
    /// Model reviewing tagged cards
    pub review_model: String,
    /// REST endpoint
    pub endpoint: String,
    /// API key (falls back to `GOOGLE_API_KEY`)
    pub api_key: Option<String>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            review_model: "gemini-2.5-flash-lite".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

impl FileGeminiConfig {
    /// The configured key, or the one from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())
    }
}

fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| from_env.filter(|k| !k.trim().is_empty()))
}

/// Which note store to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Anki,
    Local,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Anki => write!(f, "anki"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Raw storage selection from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: StorageBackend,
}

/// Raw AnkiConnect configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnkiConfig {
    pub url: String,
    pub deck: String,
    /// Note type with `Front` and `Back` fields
    pub note_model: String,
    /// Tag attached to every added note
    pub tag: String,
}

impl Default for FileAnkiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ANKI_URL.to_string(),
            deck: "Default".to_string(),
            note_model: "Basic".to_string(),
            tag: "german_tutor".to_string(),
        }
    }
}

/// Raw local file store configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLocalConfig {
    pub notes_file: String,
    pub export_file: String,
}

impl Default for FileLocalConfig {
    fn default() -> Self {
        Self {
            notes_file: DEFAULT_NOTES_FILE.to_string(),
            export_file: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}

/// Raw retry configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Attempt budget shared by empty answers and outages
    pub max_attempts: u32,
    pub empty_delay_secs: u64,
    pub backoff_base_secs: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            empty_delay_secs: 2,
            backoff_base_secs: 1,
        }
    }
}

/// Raw card review configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReviewConfig {
    pub tag: String,
    pub batch_size: usize,
}

impl Default for FileReviewConfig {
    fn default() -> Self {
        Self {
            tag: "yomitan".to_string(),
            batch_size: 10,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub gemini: FileGeminiConfig,
    pub storage: FileStorageConfig,
    pub anki: FileAnkiConfig,
    pub local: FileLocalConfig,
    pub retry: FileRetryConfig,
    pub review: FileReviewConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigValidationError::ZeroRetryAttempts);
        }
        if self.review.batch_size == 0 {
            return Err(ConfigValidationError::ZeroBatchSize);
        }

        let required = [
            ("gemini.model", &self.gemini.model),
            ("gemini.review_model", &self.gemini.review_model),
            ("review.tag", &self.review.tag),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyValue(field));
            }
        }

        match self.storage.backend {
            StorageBackend::Anki if self.anki.deck.trim().is_empty() => {
                Err(ConfigValidationError::EmptyValue("anki.deck"))
            }
            StorageBackend::Local if self.local.export_file.trim().is_empty() => {
                Err(ConfigValidationError::EmptyValue("local.export_file"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[gemini]
model = "gemini-2.5-pro"
review_model = "gemini-2.5-flash"
api_key = "secret"

[storage]
backend = "local"

[anki]
deck = "Deutsch"

[local]
export_file = "cards.csv"

[retry]
max_attempts = 5
empty_delay_secs = 1

[review]
tag = "b1"
batch_size = 20
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.anki.deck, "Deutsch");
        assert_eq!(config.anki.note_model, "Basic");
        assert_eq!(config.local.export_file, "cards.csv");
        assert_eq!(config.local.notes_file, DEFAULT_NOTES_FILE);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.empty_delay_secs, 1);
        assert_eq!(config.retry.backoff_base_secs, 1);
        assert_eq!(config.review.tag, "b1");
        assert_eq!(config.review.batch_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.storage.backend, StorageBackend::Anki);
        assert_eq!(config.anki.url, "http://localhost:8765");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_attempts() {
        let config: FileConfig = toml::from_str("[retry]\nmax_attempts = 0\n").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroRetryAttempts)
        );
    }

    #[test]
    fn test_validate_zero_batch() {
        let config: FileConfig = toml::from_str("[review]\nbatch_size = 0\n").unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroBatchSize));
    }

    #[test]
    fn test_validate_empty_values() {
        let config: FileConfig = toml::from_str("[gemini]\nmodel = \" \"\n").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyValue("gemini.model"))
        );

        let config: FileConfig = toml::from_str("[anki]\ndeck = \"\"\n").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyValue("anki.deck"))
        );

        // An empty deck does not matter for the local backend
        let config: FileConfig =
            toml::from_str("[storage]\nbackend = \"local\"\n[anki]\ndeck = \"\"\n").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[storage]\nbackend = \"sqlite\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_api_key() {
        assert_eq!(
            resolve_api_key(Some("cfg"), Some("env".to_string())).as_deref(),
            Some("cfg")
        );
        assert_eq!(
            resolve_api_key(Some("  "), Some("env".to_string())).as_deref(),
            Some("env")
        );
        assert_eq!(resolve_api_key(None, None), None);
        assert_eq!(resolve_api_key(None, Some(String::new())), None);
    }
}
