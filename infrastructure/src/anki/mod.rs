//! AnkiConnect adapter for the note store port

pub mod protocol;
pub mod store;

pub use store::{AnkiConnectStore, DEFAULT_URL};
