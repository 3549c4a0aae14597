//! AnkiConnect request/response envelope (API version 6).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: u32 = 6;

/// `{ "action": ..., "version": 6, "params": {...} }`
#[derive(Debug, Clone, Serialize)]
pub struct AnkiRequest<'a> {
    pub action: &'a str,
    pub version: u32,
    pub params: serde_json::Value,
}

impl<'a> AnkiRequest<'a> {
    pub fn new(action: &'a str, params: serde_json::Value) -> Self {
        Self {
            action,
            version: API_VERSION,
            params,
        }
    }
}

/// `{ "result": ..., "error": ... }`; exactly one is non-null on success.
#[derive(Debug, Clone, Deserialize)]
pub struct AnkiResponse {
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub value: String,
}

/// One entry of a `notesInfo` result
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    #[serde(default)]
    pub note_id: Option<i64>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl NoteInfo {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }

    /// Field values keyed by field name
    pub fn field_values(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(name, f)| (name.clone(), f.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope() {
        let request = AnkiRequest::new("deckNames", serde_json::json!({}));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["action"], "deckNames");
        assert_eq!(json["version"], 6);
    }

    #[test]
    fn test_note_info() {
        let body = r#"{
            "noteId": 1502298033753,
            "modelName": "Basic",
            "tags": ["german_tutor"],
            "fields": {
                "Front": {"value": "die Ankunft", "order": 0},
                "Back": {"value": "arrival", "order": 1}
            }
        }"#;
        let info: NoteInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.note_id, Some(1502298033753));
        assert_eq!(info.field("Front"), Some("die Ankunft"));
        assert_eq!(info.field("Glossary"), None);
        assert_eq!(info.field_values().len(), 2);
    }

    #[test]
    fn test_empty_note_info() {
        let info: NoteInfo = serde_json::from_str("{}").unwrap();
        assert!(info.note_id.is_none());
        assert!(info.fields.is_empty());
    }
}
