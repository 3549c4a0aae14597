//! Session mode: which kind of tagged items the tutor is asked to produce.

use std::fmt;

/// Tag that starts each proposed note in an answer.
pub const PROPOSED_NOTE_TAG: &str = "[PROPOSED_NOTE]:";

/// Tag that starts each feedback item in a card review answer.
pub const CARD_FEEDBACK_TAG: &str = "[CARD_FEEDBACK]:";

/// Mode of a tutor exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// Free-form question; answer ends with proposed notes
    #[default]
    Ask,
    /// Batch review of stored cards; answer is a list of feedback items
    CardReview,
}

impl SessionMode {
    pub fn tag(&self) -> &'static str {
        match self {
            SessionMode::Ask => PROPOSED_NOTE_TAG,
            SessionMode::CardReview => CARD_FEEDBACK_TAG,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Ask => "ask",
            SessionMode::CardReview => "card_review",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
