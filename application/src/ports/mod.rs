//! Port definitions (interfaces for external adapters)

pub mod answer_gateway;
pub mod duplicate_resolver;
pub mod note_store;
pub mod progress;
