//! Gemini REST adapter for the answer gateway port

pub mod gateway;
pub mod protocol;

pub use gateway::{DEFAULT_ENDPOINT, GeminiAnswerGateway};
