//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Where saved notes go
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// AnkiConnect on a running Anki instance
    Anki,
    /// Local `front;back` export plus a markdown notebook
    Local,
}

/// CLI arguments for study-tutor
#[derive(Parser, Debug)]
#[command(name = "study-tutor")]
#[command(author, version, about = "German tutor that turns answers into flashcards")]
#[command(long_about = r#"
Study Tutor answers questions about German and proposes flashcards for the
vocabulary it explains. Each proposal can be saved to Anki (via AnkiConnect)
or to local files; duplicates prompt you to keep or overwrite.

Inside the session:
  quit | exit        Leave the session
  check [tag]        Review cards carrying a tag (default: yomitan)

Configuration files are loaded from (in priority order):
1. STUDY_TUTOR_* environment variables
2. --config <path>             Explicit config file
3. ./study-tutor.toml          Project-level config
4. ~/.config/study-tutor/config.toml   Global config

The API key is read from [gemini] api_key or GOOGLE_API_KEY.
"#)]
pub struct Cli {
    /// Storage backend (overrides [storage] backend)
    #[arg(short, long, value_enum, value_name = "BACKEND")]
    pub backend: Option<BackendArg>,

    /// Anki deck to use (overrides [anki] deck)
    #[arg(long, value_name = "DECK")]
    pub deck: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
