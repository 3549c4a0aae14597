//! Note entities: proposed items, classification results and stored notes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque handle assigned to a note by the storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tagged segment of a tutor response, as produced by the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedItem {
    raw_block: String,
}

impl ProposedItem {
    pub fn new(raw_block: impl Into<String>) -> Self {
        Self {
            raw_block: raw_block.into(),
        }
    }

    pub fn raw_block(&self) -> &str {
        &self.raw_block
    }

    pub fn into_raw_block(self) -> String {
        self.raw_block
    }
}

/// Classification kind of a proposed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Vocabulary,
    Grammar,
    Malformed,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Vocabulary => "vocabulary",
            NoteKind::Grammar => "grammar",
            NoteKind::Malformed => "malformed",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a proposed item.
///
/// Only [`ClassifiedItem::Vocabulary`] carries a front/back pair, so a
/// grammar or malformed block can never yield one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedItem {
    /// A vocabulary card. `back` is already in display markup.
    Vocabulary { front: String, back: String },
    /// A grammar explanation; archived verbatim, never deduplicated.
    Grammar,
    /// Matches neither pattern; the caller skips it.
    Malformed,
}

impl ClassifiedItem {
    pub fn kind(&self) -> NoteKind {
        match self {
            ClassifiedItem::Vocabulary { .. } => NoteKind::Vocabulary,
            ClassifiedItem::Grammar => NoteKind::Grammar,
            ClassifiedItem::Malformed => NoteKind::Malformed,
        }
    }

    pub fn front(&self) -> Option<&str> {
        match self {
            ClassifiedItem::Vocabulary { front, .. } => Some(front),
            _ => None,
        }
    }

    pub fn back(&self) -> Option<&str> {
        match self {
            ClassifiedItem::Vocabulary { back, .. } => Some(back),
            _ => None,
        }
    }
}

/// A note held by the storage backend (and mirrored in the session cache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNote {
    /// Unique key within the collection
    pub front: String,
    /// Display-markup text
    pub back: String,
    /// Backend handle, if the backend assigns one
    pub external_id: Option<NoteId>,
}

impl StoredNote {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            external_id: None,
        }
    }

    pub fn with_id(mut self, id: NoteId) -> Self {
        self.external_id = Some(id);
        self
    }
}

/// A stored card selected for batch review.
///
/// Cards imported from dictionary tools may use `Word`/`Glossary` fields
/// instead of `Front`/`Back`; [`ReviewCard::from_fields`] resolves either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    pub id: Option<NoteId>,
    pub word: String,
    /// Display markup
    pub explanation: String,
}

impl ReviewCard {
    pub const MISSING_WORD: &'static str = "No Word/Front";
    pub const MISSING_EXPLANATION: &'static str = "No Back/Glossary";

    pub fn from_fields(id: Option<NoteId>, fields: &BTreeMap<String, String>) -> Self {
        let pick = |primary: &str, fallback: &str, missing: &str| {
            fields
                .get(primary)
                .filter(|v| !v.is_empty())
                .or_else(|| fields.get(fallback))
                .cloned()
                .unwrap_or_else(|| missing.to_string())
        };

        Self {
            id,
            word: pick("Front", "Word", Self::MISSING_WORD),
            explanation: pick("Back", "Glossary", Self::MISSING_EXPLANATION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_item_accessors() {
        let vocab = ClassifiedItem::Vocabulary {
            front: "der Wal".to_string(),
            back: "(masc.): whale".to_string(),
        };
        assert_eq!(vocab.kind(), NoteKind::Vocabulary);
        assert_eq!(vocab.front(), Some("der Wal"));
        assert_eq!(vocab.back(), Some("(masc.): whale"));

        for item in [ClassifiedItem::Grammar, ClassifiedItem::Malformed] {
            assert!(item.front().is_none());
            assert!(item.back().is_none());
        }
    }

    #[test]
    fn test_review_card_prefers_front_back() {
        let mut fields = BTreeMap::new();
        fields.insert("Front".to_string(), "laufen".to_string());
        fields.insert("Back".to_string(), "to run".to_string());
        fields.insert("Word".to_string(), "ignored".to_string());

        let card = ReviewCard::from_fields(Some(NoteId(7)), &fields);
        assert_eq!(card.word, "laufen");
        assert_eq!(card.explanation, "to run");
    }

    #[test]
    fn test_review_card_falls_back_to_dictionary_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("Front".to_string(), String::new());
        fields.insert("Word".to_string(), "die Brücke".to_string());

        let card = ReviewCard::from_fields(None, &fields);
        assert_eq!(card.word, "die Brücke");
        assert_eq!(card.explanation, ReviewCard::MISSING_EXPLANATION);
    }

    #[test]
    fn test_note_id_display() {
        assert_eq!(NoteId(1496198395707).to_string(), "1496198395707");
    }
}
