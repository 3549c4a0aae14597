//! Splitting tutor responses into proposed items and classifying them.
//!
//! These functions are pure text processing: no I/O and no failure modes.
//! Anything that does not look like a note degrades to
//! [`ClassifiedItem::Malformed`] instead of raising an error.
//!
//! Classification runs an ordered list of matchers and stops at the first
//! hit:
//!
//! | Priority | Matcher | Result |
//! |----------|---------|--------|
//! | 1 | `Grammar:` heading in the first 3 lines | [`ClassifiedItem::Grammar`] |
//! | 2 | `- **front** rest` on line 1 | [`ClassifiedItem::Vocabulary`] |
//! | 3 | fallback | [`ClassifiedItem::Malformed`] |

use super::entities::{ClassifiedItem, ProposedItem};
use crate::markup::to_display_markup;
use regex::Regex;
use std::sync::LazyLock;

/// Number of leading lines inspected for a grammar heading.
pub const GRAMMAR_SCAN_LINES: usize = 3;

static GRAMMAR_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#*\s*grammar:").expect("valid regex"));

static GRAMMAR_FIRST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#+\s*grammar\b").expect("valid regex"));

static VOCABULARY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[*-]\s+\*\*(.*?)\*\*(.*)").expect("valid regex"));

/// A tutor response split on the proposal tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResponse {
    /// Text before the first tag (the tutor's answer), trimmed
    pub preamble: String,
    /// Non-empty, trimmed proposal blocks in order
    pub blocks: Vec<ProposedItem>,
}

impl SplitResponse {
    pub fn has_proposals(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// Split `text` on every literal occurrence of `tag`.
///
/// # Examples
///
/// ```
/// use tutor_domain::note::parsing::split_response;
///
/// let split = split_response("Answer.\n[TAG]: one\n[TAG]:   \n[TAG]: two", "[TAG]:");
/// assert_eq!(split.preamble, "Answer.");
/// assert_eq!(split.blocks.len(), 2);
/// assert_eq!(split.blocks[1].raw_block(), "two");
/// ```
pub fn split_response(text: &str, tag: &str) -> SplitResponse {
    if tag.is_empty() {
        return SplitResponse {
            preamble: text.trim().to_string(),
            blocks: Vec::new(),
        };
    }

    let mut parts = text.split(tag);
    let preamble = parts.next().unwrap_or_default().trim().to_string();
    let blocks = parts
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(ProposedItem::new)
        .collect();

    SplitResponse { preamble, blocks }
}

type Matcher = fn(&[&str]) -> Option<ClassifiedItem>;

const MATCHERS: [Matcher; 2] = [match_grammar, match_vocabulary];

/// Classify a single proposal block.
///
/// Grammar detection takes priority over vocabulary detection, even when
/// the first line also looks like a vocabulary header.
pub fn classify_block(block: &str) -> ClassifiedItem {
    let lines: Vec<&str> = block.trim().split('\n').collect();

    MATCHERS
        .iter()
        .find_map(|matcher| matcher(&lines))
        .unwrap_or(ClassifiedItem::Malformed)
}

/// Classify a [`ProposedItem`], consuming it.
pub fn classify(item: ProposedItem) -> ClassifiedItem {
    classify_block(item.raw_block())
}

/// Front key of a block if it is a vocabulary note.
pub fn extract_front(block: &str) -> Option<String> {
    match classify_block(block) {
        ClassifiedItem::Vocabulary { front, .. } => Some(front),
        _ => None,
    }
}

fn match_grammar(lines: &[&str]) -> Option<ClassifiedItem> {
    let first = lines.first()?;
    if GRAMMAR_FIRST_LINE.is_match(first) {
        return Some(ClassifiedItem::Grammar);
    }

    lines
        .iter()
        .take(GRAMMAR_SCAN_LINES)
        .any(|line| GRAMMAR_HEADING.is_match(line))
        .then_some(ClassifiedItem::Grammar)
}

fn match_vocabulary(lines: &[&str]) -> Option<ClassifiedItem> {
    let (first, rest) = lines.split_first()?;
    let caps = VOCABULARY_HEADER.captures(first)?;

    let front = caps.get(1).map_or("", |m| m.as_str()).trim();
    if front.is_empty() {
        return None;
    }

    let header_rest = caps.get(2).map_or("", |m| m.as_str()).trim();
    let body = rest.join("\n");
    let full_back = format!("{}\n{}", header_rest, body.trim());

    Some(ClassifiedItem::Vocabulary {
        front: front.to_string(),
        back: to_display_markup(full_back.trim()),
    })
}
