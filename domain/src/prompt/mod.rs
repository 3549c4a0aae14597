//! Prompt domain
//!
//! System instruction and review prompts sent to the tutor.

mod template;

pub use template::TutorPromptTemplate;
