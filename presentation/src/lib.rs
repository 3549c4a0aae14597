//! Presentation layer for study-tutor
//!
//! This crate contains CLI definitions, console output, progress
//! reporters, and the interactive tutoring session.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;
pub mod review;

// Re-export commonly used types
pub use chat::TutorRepl;
pub use cli::commands::{BackendArg, Cli};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use review::InteractiveDuplicateResolver;
