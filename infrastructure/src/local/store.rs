//! Local file note store
//!
//! Keeps two files side by side:
//!
//! - an export of `front;back` rows (display markup, no header), importable
//!   into flashcard tools;
//! - a markdown notebook receiving every saved block verbatim.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use tutor_application::ports::note_store::{NoteStore, StoreError};
use tutor_domain::{NoteId, StoredNote};

pub const DEFAULT_NOTES_FILE: &str = "my_german_notes.md";
pub const DEFAULT_EXPORT_FILE: &str = "my_german_notes.csv";

const DELIMITER: u8 = b';';
const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Note store backed by local files
pub struct LocalFileStore {
    notes_file: PathBuf,
    export_file: PathBuf,
}

impl LocalFileStore {
    pub fn new(notes_file: impl Into<PathBuf>, export_file: impl Into<PathBuf>) -> Self {
        Self {
            notes_file: notes_file.into(),
            export_file: export_file.into(),
        }
    }

    pub fn notes_file(&self) -> &Path {
        &self.notes_file
    }

    pub fn export_file(&self) -> &Path {
        &self.export_file
    }

    async fn read_rows(&self) -> Result<Vec<(String, String)>, StoreError> {
        let bytes = match tokio::fs::read(&self.export_file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        parse_rows(&bytes)
    }

    async fn append(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }
}

fn parse_rows(bytes: &[u8]) -> Result<Vec<(String, String)>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::Backend(e.to_string()))?;
        match (record.get(0), record.get(1)) {
            (Some(front), Some(back)) => rows.push((front.to_string(), back.to_string())),
            _ => debug!(fields = record.len(), "Skipping short export row"),
        }
    }
    Ok(rows)
}

fn encode_rows<'a>(
    rows: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());

    for (front, back) in rows {
        writer
            .write_record([front, back])
            .map_err(|e| StoreError::Backend(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| StoreError::Backend(e.to_string()))
}

#[async_trait]
impl NoteStore for LocalFileStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn load_notes(&self) -> Result<Vec<StoredNote>, StoreError> {
        let notes: Vec<StoredNote> = self
            .read_rows()
            .await?
            .into_iter()
            .filter_map(|(front, back)| {
                let front = front.trim();
                (!front.is_empty()).then(|| StoredNote::new(front, back))
            })
            .collect();

        info!(file = %self.export_file.display(), notes = notes.len(), "Loaded local notes");
        Ok(notes)
    }

    async fn add_note(&self, note: &StoredNote) -> Result<Option<NoteId>, StoreError> {
        let row = encode_rows([(note.front.as_str(), note.back.as_str())])?;
        Self::append(&self.export_file, &row).await?;
        info!(file = %self.export_file.display(), front = %note.front, "Appended note");
        Ok(None)
    }

    async fn update_note(&self, existing: &StoredNote, back: &str) -> Result<(), StoreError> {
        let mut rows = self.read_rows().await?;
        let mut found = false;
        for row in rows.iter_mut().filter(|(front, _)| front.trim() == existing.front) {
            row.1 = back.to_string();
            found = true;
        }
        if !found {
            return Err(StoreError::NotFound(existing.front.clone()));
        }

        let bytes = encode_rows(rows.iter().map(|(f, b)| (f.as_str(), b.as_str())))?;
        tokio::fs::write(&self.export_file, bytes).await?;
        info!(file = %self.export_file.display(), front = %existing.front, "Rewrote note");
        Ok(())
    }

    async fn archive_block(&self, block: &str) -> Result<(), StoreError> {
        let entry = format!("{}{}", block.trim(), BLOCK_SEPARATOR);
        Self::append(&self.notes_file, entry.as_bytes()).await?;
        debug!(file = %self.notes_file.display(), "Archived block");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalFileStore {
        LocalFileStore::new(
            dir.path().join("notes.md"),
            dir.path().join("notes.csv"),
        )
    }

    #[tokio::test]
    async fn test_missing_export_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let back = "(fem.): arrival<br>Example: <i>Die Ankunft ist um 14:30 Uhr.</i>";
        let id = store
            .add_note(&StoredNote::new("die Ankunft", back))
            .await
            .unwrap();
        assert!(id.is_none());
        store
            .add_note(&StoredNote::new("laufen", "to run; to walk"))
            .await
            .unwrap();

        let notes = store.load_notes().await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], StoredNote::new("die Ankunft", back));
        // The delimiter inside a field survives quoting
        assert_eq!(notes[1].back, "to run; to walk");
    }

    #[tokio::test]
    async fn test_export_format() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .add_note(&StoredNote::new("der Wal", "(masc.): whale"))
            .await
            .unwrap();

        let content = std::fs::read_to_string(store.export_file()).unwrap();
        assert_eq!(content, "der Wal;(masc.): whale\n");
    }

    #[tokio::test]
    async fn test_update_rewrites_row() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add_note(&StoredNote::new("a", "1")).await.unwrap();
        store.add_note(&StoredNote::new("b", "2")).await.unwrap();

        store
            .update_note(&StoredNote::new("b", "2"), "two")
            .await
            .unwrap();

        let notes = store.load_notes().await.unwrap();
        assert_eq!(notes[0].back, "1");
        assert_eq!(notes[1].back, "two");
    }

    #[tokio::test]
    async fn test_update_unknown_front() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add_note(&StoredNote::new("a", "1")).await.unwrap();

        let err = store
            .update_note(&StoredNote::new("zzz", "x"), "y")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(front) if front == "zzz"));
    }

    #[tokio::test]
    async fn test_load_skips_short_and_blank_rows() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.export_file(), "lonely\n ;x\nok;fine\n").unwrap();

        let notes = store.load_notes().await.unwrap();
        assert_eq!(notes, vec![StoredNote::new("ok", "fine")]);
    }

    #[tokio::test]
    async fn test_archive_appends_blocks() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.archive_block("## Grammar: Dativ\nmit + Dat.").await.unwrap();
        store.archive_block("  * **der Wal** (masc.): whale  ").await.unwrap();

        let content = std::fs::read_to_string(store.notes_file()).unwrap();
        assert_eq!(
            content,
            "## Grammar: Dativ\nmit + Dat.\n\n---\n\n* **der Wal** (masc.): whale\n\n---\n\n"
        );
    }
}
