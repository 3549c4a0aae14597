//! Interactive duplicate resolution for the terminal.
//!
//! When a proposed note's front already exists, both versions are shown
//! and the user picks one:
//!
//! ```text
//! --- Existing Note ---
//! die Ankunft
//!
//! (fem.): arrival
//! --------------------
//!
//! --- New Note ---
//! die Ankunft
//!
//! (fem.): arrival, coming
//! --------------------
//! Duplicate! (k)eep existing or (o)verwrite with new?
//! ```

use crate::chat::prompt::ask_until_valid;
use crate::output::console::ConsoleFormatter;
use async_trait::async_trait;
use colored::Color;
use std::io;
use tutor_application::ports::duplicate_resolver::{DuplicateResolver, ResolverError};
use tutor_domain::{DuplicateDecision, StoredNote};

const QUESTION: &str = "Duplicate! (k)eep existing or (o)verwrite with new? ";
const HINT: &str = "Please enter 'k' or 'o'.";

/// Terminal-based [`DuplicateResolver`].
pub struct InteractiveDuplicateResolver;

impl InteractiveDuplicateResolver {
    pub fn new() -> Self {
        Self
    }

    fn display(existing: &StoredNote, proposed: &StoredNote) {
        println!(
            "{}",
            ConsoleFormatter::stored_note(
                "Existing Note",
                &existing.front,
                &existing.back,
                Color::Yellow
            )
        );
        println!(
            "{}",
            ConsoleFormatter::stored_note("New Note", &proposed.front, &proposed.back, Color::Green)
        );
    }
}

impl Default for InteractiveDuplicateResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DuplicateResolver for InteractiveDuplicateResolver {
    async fn decide(
        &self,
        existing: &StoredNote,
        proposed: &StoredNote,
    ) -> Result<DuplicateDecision, ResolverError> {
        Self::display(existing, proposed);

        let stdin = io::stdin();
        ask_until_valid(
            &mut stdin.lock(),
            &mut io::stdout(),
            QUESTION,
            HINT,
            DuplicateDecision::from_answer,
        )
        .map_err(|e| ResolverError::IoError(e.to_string()))?
        .ok_or(ResolverError::Cancelled)
    }
}
