//! Tutor session domain.
//!
//! - [`mode::SessionMode`]: ask vs. card review, and the tag each one uses

pub mod mode;

pub use mode::{CARD_FEEDBACK_TAG, PROPOSED_NOTE_TAG, SessionMode};
