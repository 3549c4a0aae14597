//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ask_tutor;
pub mod review_cards;
pub mod save_note;
