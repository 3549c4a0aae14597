//! AnkiConnect note store
//!
//! Talks to the AnkiConnect add-on over its local JSON endpoint. Notes use
//! a model with `Front` and `Back` fields; cards imported from dictionary
//! tools may carry `Word` and `Glossary` instead, which review falls back to.

use super::protocol::{AnkiRequest, AnkiResponse, NoteInfo};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};
use tutor_application::ports::note_store::{NoteStore, StoreError};
use tutor_domain::{NoteId, ReviewCard, StoredNote};

pub const DEFAULT_URL: &str = "http://localhost:8765";

/// Notes fetched per `notesInfo` call
const NOTES_INFO_CHUNK: usize = 100;
const CHUNK_PAUSE: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const FRONT_FIELD: &str = "Front";
const BACK_FIELD: &str = "Back";

/// Note store backed by a running Anki instance
pub struct AnkiConnectStore {
    client: reqwest::Client,
    url: String,
    deck: String,
    note_model: String,
    tag: String,
    chunk_pause: Duration,
}

impl AnkiConnectStore {
    pub fn new(url: impl Into<String>, deck: impl Into<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            deck: deck.into(),
            note_model: "Basic".to_string(),
            tag: "german_tutor".to_string(),
            chunk_pause: CHUNK_PAUSE,
        })
    }

    pub fn with_note_model(mut self, note_model: impl Into<String>) -> Self {
        self.note_model = note_model.into();
        self
    }

    /// Tag attached to every note this store adds
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Pause between `notesInfo` chunks
    pub fn with_chunk_pause(mut self, pause: Duration) -> Self {
        self.chunk_pause = pause;
        self
    }

    pub fn deck(&self) -> &str {
        &self.deck
    }

    async fn invoke(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, StoreError> {
        debug!(action, "AnkiConnect request");

        let response = self
            .client
            .post(&self.url)
            .json(&AnkiRequest::new(action, params))
            .send()
            .await
            .map_err(|e| StoreError::Connection(format!("{}: {}", action, e)))?;

        let envelope: AnkiResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("{}: {}", action, e)))?;

        if let Some(error) = envelope.error {
            return Err(StoreError::Backend(format!("{}: {}", action, error)));
        }
        Ok(envelope.result)
    }

    async fn invoke_as<T: DeserializeOwned>(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<T, StoreError> {
        let value = self.invoke(action, params).await?;
        serde_json::from_value(value)
            .map_err(|e| StoreError::InvalidResponse(format!("{}: {}", action, e)))
    }

    async fn find_notes(&self, query: &str) -> Result<Vec<i64>, StoreError> {
        let ids: Option<Vec<i64>> = self.invoke_as("findNotes", json!({ "query": query })).await?;
        Ok(ids.unwrap_or_default())
    }

    /// `notesInfo` in fixed-size chunks with a pause between them
    async fn notes_info(&self, ids: &[i64]) -> Result<Vec<NoteInfo>, StoreError> {
        let mut infos = Vec::with_capacity(ids.len());
        let mut chunks = ids.chunks(NOTES_INFO_CHUNK).peekable();

        while let Some(chunk) = chunks.next() {
            let batch: Option<Vec<NoteInfo>> =
                self.invoke_as("notesInfo", json!({ "notes": chunk })).await?;
            infos.extend(batch.unwrap_or_default());

            if chunks.peek().is_some() && !self.chunk_pause.is_zero() {
                tokio::time::sleep(self.chunk_pause).await;
            }
        }
        Ok(infos)
    }
}

#[async_trait]
impl NoteStore for AnkiConnectStore {
    fn name(&self) -> &str {
        "anki"
    }

    async fn ensure_ready(&self) -> Result<(), StoreError> {
        let decks: Option<Vec<String>> = self.invoke_as("deckNames", json!({})).await?;
        if decks.unwrap_or_default().iter().any(|d| d == &self.deck) {
            return Ok(());
        }

        info!(deck = %self.deck, "Deck not found, creating it");
        self.invoke("createDeck", json!({ "deck": self.deck })).await?;
        Ok(())
    }

    async fn load_notes(&self) -> Result<Vec<StoredNote>, StoreError> {
        let ids = self.find_notes(&format!("deck:\"{}\"", self.deck)).await?;
        let infos = self.notes_info(&ids).await?;

        let notes: Vec<StoredNote> = infos
            .into_iter()
            .filter_map(|info| {
                let front = info.field(FRONT_FIELD)?.trim();
                let back = info.field(BACK_FIELD)?;
                if front.is_empty() {
                    return None;
                }
                let note = StoredNote::new(front, back);
                Some(match info.note_id {
                    Some(id) => note.with_id(NoteId(id)),
                    None => note,
                })
            })
            .collect();

        info!(deck = %self.deck, found = ids.len(), loaded = notes.len(), "Loaded notes from Anki");
        Ok(notes)
    }

    async fn add_note(&self, note: &StoredNote) -> Result<Option<NoteId>, StoreError> {
        let params = json!({
            "note": {
                "deckName": self.deck,
                "modelName": self.note_model,
                "fields": { FRONT_FIELD: note.front, BACK_FIELD: note.back },
                "options": { "allowDuplicate": false },
                "tags": [self.tag],
            }
        });

        let id: Option<i64> = self.invoke_as("addNote", params).await?;
        match id {
            Some(id) => {
                info!(id, deck = %self.deck, "Added note to Anki");
                Ok(Some(NoteId(id)))
            }
            None => {
                warn!(front = %note.front, "AnkiConnect returned no id for new note");
                Err(StoreError::Rejected(note.front.clone()))
            }
        }
    }

    async fn update_note(&self, existing: &StoredNote, back: &str) -> Result<(), StoreError> {
        let id = existing
            .external_id
            .ok_or_else(|| StoreError::MissingId(existing.front.clone()))?;

        let params = json!({
            "note": {
                "id": id.0,
                "fields": { FRONT_FIELD: existing.front, BACK_FIELD: back },
            }
        });
        self.invoke("updateNoteFields", params).await?;
        info!(id = id.0, "Updated note in Anki");
        Ok(())
    }

    async fn notes_by_tag(&self, tag: &str) -> Result<Vec<ReviewCard>, StoreError> {
        let ids = self.find_notes(&format!("tag:{}", tag)).await?;
        let infos = self.notes_info(&ids).await?;

        Ok(infos
            .iter()
            .map(|info| ReviewCard::from_fields(info.note_id.map(NoteId), &info.field_values()))
            .collect())
    }

    async fn remove_tag(&self, ids: &[NoteId], tag: &str) -> Result<(), StoreError> {
        let notes: Vec<i64> = ids.iter().map(|id| id.0).collect();
        // Tags are a space-separated string
        self.invoke("removeTags", json!({ "notes": notes, "tags": tag }))
            .await?;
        Ok(())
    }
}
