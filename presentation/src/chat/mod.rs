//! Interactive tutoring session

pub mod prompt;
pub mod repl;

pub use repl::{ReplCommand, TutorRepl, parse_command};
