//! Value objects of the duplicate reconciliation step.

use std::fmt;

/// Decision taken when a proposed note collides with a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateDecision {
    /// Leave the stored note untouched
    Keep,
    /// Replace the stored back with the proposed one
    Overwrite,
}

impl DuplicateDecision {
    /// Parse a `k`/`o` answer (case-insensitive, whitespace tolerant).
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "k" | "keep" => Some(DuplicateDecision::Keep),
            "o" | "overwrite" => Some(DuplicateDecision::Overwrite),
            _ => None,
        }
    }
}

/// Result of reconciling one proposed item. Exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// New key: appended to the backend, cache grew by one
    Inserted,
    /// Existing key overwritten on user request
    Updated,
    /// Existing key kept on user request
    Kept,
    /// No key (grammar or malformed item)
    Skipped,
}

impl ReconcileOutcome {
    /// Whether the outcome wrote something to the backend.
    pub fn is_saved(&self) -> bool {
        matches!(self, ReconcileOutcome::Inserted | ReconcileOutcome::Updated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Inserted => "inserted",
            ReconcileOutcome::Updated => "updated",
            ReconcileOutcome::Kept => "kept",
            ReconcileOutcome::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
