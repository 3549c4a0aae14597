//! Local file adapter for the note store port

pub mod store;

pub use store::{DEFAULT_EXPORT_FILE, DEFAULT_NOTES_FILE, LocalFileStore};
