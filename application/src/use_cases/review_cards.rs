//! Review Cards use case
//!
//! Batch review of stored cards carrying a marker tag (cards imported from
//! dictionary tools are tagged `yomitan`). Each batch is sent to the tutor,
//! which answers with one `[CARD_FEEDBACK]:` item per card; once the user
//! has seen the feedback, the tag is removed from the batch.

use super::ask_tutor::{AskError, AskTutorUseCase};
use crate::ports::answer_gateway::AnswerGateway;
use crate::ports::note_store::{NoteStore, StoreError};
use crate::ports::progress::RetryNotifier;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use tutor_domain::{
    NoteId, ReviewCard, SessionMode, TutorPromptTemplate, split_response, to_light_markup,
};

/// Default number of cards per review request
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Errors that can occur during card review
#[derive(Error, Debug)]
pub enum ReviewCardsError {
    #[error("Storage backend error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ask(#[from] AskError),
}

/// One batch of cards to review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewBatch {
    /// Zero-based batch number
    pub index: usize,
    /// Number of batches in this review run
    pub total: usize,
    pub cards: Vec<ReviewCard>,
}

impl ReviewBatch {
    pub fn note_ids(&self) -> Vec<NoteId> {
        self.cards.iter().filter_map(|c| c.id).collect()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// Use case for reviewing tagged cards with the tutor
pub struct ReviewCardsUseCase<G: AnswerGateway + 'static, S: NoteStore + 'static> {
    ask: AskTutorUseCase<G>,
    store: Arc<S>,
    batch_size: usize,
}

impl<G: AnswerGateway + 'static, S: NoteStore + 'static> ReviewCardsUseCase<G, S> {
    pub fn new(ask: AskTutorUseCase<G>, store: Arc<S>) -> Self {
        Self {
            ask,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Fetch the cards carrying `tag`, split into batches.
    pub async fn fetch_batches(&self, tag: &str) -> Result<Vec<ReviewBatch>, ReviewCardsError> {
        let cards = self.store.notes_by_tag(tag).await?;
        info!(tag, cards = cards.len(), "Fetched cards for review");

        let total = cards.len().div_ceil(self.batch_size);
        Ok(cards
            .chunks(self.batch_size)
            .enumerate()
            .map(|(index, chunk)| ReviewBatch {
                index,
                total,
                cards: chunk.to_vec(),
            })
            .collect())
    }

    /// Ask the tutor to review one batch; returns the feedback items in order.
    pub async fn review_batch(
        &self,
        batch: &ReviewBatch,
        progress: &dyn RetryNotifier,
    ) -> Result<Vec<String>, ReviewCardsError> {
        let cards: Vec<(String, String)> = batch
            .cards
            .iter()
            .map(|c| (c.word.clone(), to_light_markup(&c.explanation)))
            .collect();

        let mode = SessionMode::CardReview;
        let prompt = TutorPromptTemplate::review_batch_prompt(&cards);
        let system_instruction = TutorPromptTemplate::system_instruction(mode);
        let answer = self
            .ask
            .execute_with_progress(&prompt, &system_instruction, progress)
            .await?;

        Ok(feedback_items(&answer, mode.tag()))
    }

    /// Remove `tag` from every card of a reviewed batch.
    ///
    /// Returns the number of notes the tag was removed from.
    pub async fn finish_batch(
        &self,
        batch: &ReviewBatch,
        tag: &str,
    ) -> Result<usize, ReviewCardsError> {
        let ids = batch.note_ids();
        if ids.is_empty() {
            return Ok(0);
        }

        self.store.remove_tag(&ids, tag).await.inspect_err(|e| {
            warn!(tag, notes = ids.len(), "Failed to remove tag: {}", e);
        })?;
        info!(tag, notes = ids.len(), "Removed review tag");
        Ok(ids.len())
    }
}

/// Split a review answer into feedback items.
///
/// A non-empty introduction before the first tag is kept as the first item.
pub fn feedback_items(answer: &str, tag: &str) -> Vec<String> {
    let split = split_response(answer, tag);
    let mut items = Vec::with_capacity(split.blocks.len() + 1);
    if !split.preamble.is_empty() {
        items.push(split.preamble);
    }
    items.extend(split.blocks.into_iter().map(|b| b.into_raw_block()));
    items
}
