//! Save Note use case
//!
//! Reconciles a classified item against the session cache and writes the
//! result to the note store.
//!
//! | Cache state | Decision | Store call | Cache change | Outcome |
//! |-------------|----------|------------|--------------|---------|
//! | no key | - | - | - | `Skipped` |
//! | key absent | - | `add_note` | +1 | `Inserted` |
//! | key present | Overwrite | `update_note` | back replaced | `Updated` |
//! | key present | Keep | - | - | `Kept` |
//!
//! The store is written before the cache, so a failed write leaves the
//! cache exactly as it was.
//!
//! [`SaveNoteUseCase::save_block`] routes a whole accepted block: grammar
//! goes to the narrative log, vocabulary is reconciled and logged only when
//! the backend changed, malformed blocks have no effect at all.

use crate::ports::duplicate_resolver::{DuplicateResolver, ResolverError};
use crate::ports::note_store::{NoteStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use tutor_domain::{
    ClassifiedItem, DuplicateDecision, ReconcileOutcome, ReconciliationCache, StoredNote,
};
use tutor_domain::note::cache::normalize_front;

/// Errors that can occur while saving a note
#[derive(Error, Debug)]
pub enum SaveNoteError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] StoreError),

    #[error("Duplicate resolution failed: {0}")]
    Resolver(#[from] ResolverError),
}

/// What saving one accepted block did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedBlock {
    pub outcome: ReconcileOutcome,
    /// Whether the block was appended to the narrative log
    pub archived: bool,
}

impl SavedBlock {
    fn untouched(outcome: ReconcileOutcome) -> Self {
        Self {
            outcome,
            archived: false,
        }
    }
}

/// Use case for reconciling proposed notes with the stored collection
pub struct SaveNoteUseCase<S: NoteStore + 'static, R: DuplicateResolver + 'static> {
    store: Arc<S>,
    resolver: Arc<R>,
}

impl<S: NoteStore + 'static, R: DuplicateResolver + 'static> SaveNoteUseCase<S, R> {
    pub fn new(store: Arc<S>, resolver: Arc<R>) -> Self {
        Self { store, resolver }
    }

    /// Load the stored collection into a fresh cache.
    pub async fn load_cache(&self) -> Result<ReconciliationCache, SaveNoteError> {
        let notes = self.store.load_notes().await?;
        let cache = ReconciliationCache::from_notes(notes);
        info!(
            backend = self.store.name(),
            notes = cache.len(),
            "Loaded note cache"
        );
        Ok(cache)
    }

    /// Reconcile a classified item.
    ///
    /// Grammar and malformed items have no key and are skipped here; route
    /// whole blocks through [`Self::save_block`] instead.
    pub async fn reconcile(
        &self,
        cache: &mut ReconciliationCache,
        item: &ClassifiedItem,
    ) -> Result<ReconcileOutcome, SaveNoteError> {
        match item {
            ClassifiedItem::Vocabulary { front, back } => {
                self.reconcile_parts(cache, front, back).await
            }
            ClassifiedItem::Grammar => {
                debug!("Grammar item has no front, skipping");
                Ok(ReconcileOutcome::Skipped)
            }
            ClassifiedItem::Malformed => {
                warn!("Item matched no note format, skipping");
                Ok(ReconcileOutcome::Skipped)
            }
        }
    }

    /// Save one accepted block according to its classification.
    ///
    /// Grammar blocks are archived. Vocabulary blocks are reconciled and
    /// archived only when the outcome wrote to the backend. Malformed blocks
    /// are skipped without touching the store or the cache.
    pub async fn save_block(
        &self,
        cache: &mut ReconciliationCache,
        item: &ClassifiedItem,
        block: &str,
    ) -> Result<SavedBlock, SaveNoteError> {
        match item {
            ClassifiedItem::Grammar => {
                self.archive_block(block).await?;
                info!("Archived grammar note");
                Ok(SavedBlock {
                    outcome: ReconcileOutcome::Skipped,
                    archived: true,
                })
            }
            ClassifiedItem::Malformed => {
                let first_line = block.lines().next().unwrap_or_default().trim();
                warn!(first_line, "Item matched no note format, skipping");
                Ok(SavedBlock::untouched(ReconcileOutcome::Skipped))
            }
            ClassifiedItem::Vocabulary { front, back } => {
                let outcome = self.reconcile_parts(cache, front, back).await?;
                if !outcome.is_saved() {
                    return Ok(SavedBlock::untouched(outcome));
                }

                // The backend already holds the note; a lost log entry is not fatal
                let archived = match self.store.archive_block(block).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(front = %front, "Failed to archive block: {}", e);
                        false
                    }
                };
                Ok(SavedBlock { outcome, archived })
            }
        }
    }

    /// Reconcile a raw `(key, back)` pair.
    pub async fn reconcile_parts(
        &self,
        cache: &mut ReconciliationCache,
        key: &str,
        new_back: &str,
    ) -> Result<ReconcileOutcome, SaveNoteError> {
        let key = normalize_front(key);
        if key.is_empty() {
            return Ok(ReconcileOutcome::Skipped);
        }

        let proposed = StoredNote::new(key, new_back);

        let Some(existing) = cache.get(key).cloned() else {
            return self.insert(cache, proposed).await;
        };

        match self.resolver.decide(&existing, &proposed).await? {
            DuplicateDecision::Keep => {
                info!(front = key, "Keeping existing note");
                Ok(ReconcileOutcome::Kept)
            }
            DuplicateDecision::Overwrite => {
                self.store.update_note(&existing, new_back).await?;
                cache.overwrite_back(key, new_back);
                info!(front = key, id = ?existing.external_id, "Updated existing note");
                Ok(ReconcileOutcome::Updated)
            }
        }
    }

    /// Append a full item block to the store's narrative log.
    pub async fn archive_block(&self, block: &str) -> Result<(), SaveNoteError> {
        self.store.archive_block(block).await?;
        Ok(())
    }

    async fn insert(
        &self,
        cache: &mut ReconciliationCache,
        proposed: StoredNote,
    ) -> Result<ReconcileOutcome, SaveNoteError> {
        let id = self.store.add_note(&proposed).await.inspect_err(|e| {
            warn!(front = %proposed.front, "Failed to add note: {}", e);
        })?;

        info!(front = %proposed.front, id = ?id, "Added new note");
        let note = match id {
            Some(id) => proposed.with_id(id),
            None => proposed,
        };
        cache.insert(note);
        Ok(ReconcileOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::duplicate_resolver::{KeepExisting, OverwriteExisting};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tutor_domain::{NoteId, classify_block};

    /// Mock store recording every write
    #[derive(Default)]
    struct MockStore {
        added: Mutex<Vec<StoredNote>>,
        updated: Mutex<Vec<(Option<NoteId>, String)>>,
        archived: Mutex<Vec<String>>,
        fail_writes: bool,
    }

    impl MockStore {
        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl NoteStore for MockStore {
        fn name(&self) -> &str {
            "mock"
        }

        async fn load_notes(&self) -> Result<Vec<StoredNote>, StoreError> {
            Ok(vec![
                StoredNote::new("der Tisch", "(masc.): table").with_id(NoteId(1)),
            ])
        }

        async fn add_note(&self, note: &StoredNote) -> Result<Option<NoteId>, StoreError> {
            if self.fail_writes {
                return Err(StoreError::Connection("refused".to_string()));
            }
            let mut added = self.added.lock().unwrap();
            added.push(note.clone());
            Ok(Some(NoteId(100 + added.len() as i64)))
        }

        async fn update_note(&self, existing: &StoredNote, back: &str) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Connection("refused".to_string()));
            }
            self.updated
                .lock()
                .unwrap()
                .push((existing.external_id, back.to_string()));
            Ok(())
        }

        async fn archive_block(&self, block: &str) -> Result<(), StoreError> {
            self.archived.lock().unwrap().push(block.to_string());
            Ok(())
        }
    }

    /// Resolver that counts calls and returns a fixed decision
    struct CountingResolver {
        decision: DuplicateDecision,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl CountingResolver {
        fn new(decision: DuplicateDecision) -> Self {
            Self {
                decision,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DuplicateResolver for CountingResolver {
        async fn decide(
            &self,
            existing: &StoredNote,
            proposed: &StoredNote,
        ) -> Result<DuplicateDecision, ResolverError> {
            self.calls
                .lock()
                .unwrap()
                .push((existing.back.clone(), proposed.back.clone()));
            Ok(self.decision)
        }
    }

    fn table_cache() -> ReconciliationCache {
        ReconciliationCache::from_notes([
            StoredNote::new("der Tisch", "(masc.): table").with_id(NoteId(1)),
        ])
    }

    #[tokio::test]
    async fn test_load_cache() {
        let use_case = SaveNoteUseCase::new(Arc::new(MockStore::default()), Arc::new(KeepExisting));
        let cache = use_case.load_cache().await.unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("der Tisch"));
    }

    #[tokio::test]
    async fn test_insert_new_key() {
        let store = Arc::new(MockStore::default());
        let resolver = Arc::new(CountingResolver::new(DuplicateDecision::Keep));
        let use_case = SaveNoteUseCase::new(store.clone(), resolver.clone());
        let mut cache = table_cache();

        let item = classify_block("- **die Ankunft** (fem.): arrival");
        let outcome = use_case.reconcile(&mut cache, &item).await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::Inserted);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("die Ankunft").unwrap().external_id, Some(NoteId(101)));
        assert_eq!(store.added.lock().unwrap().len(), 1);
        assert_eq!(resolver.call_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_invokes_resolver_once_and_does_not_insert() {
        let store = Arc::new(MockStore::default());
        let resolver = Arc::new(CountingResolver::new(DuplicateDecision::Keep));
        let use_case = SaveNoteUseCase::new(store.clone(), resolver.clone());
        let mut cache = table_cache();

        let outcome = use_case
            .reconcile_parts(&mut cache, "der Tisch", "(masc.): desk")
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Kept);
        assert_eq!(resolver.call_count(), 1);
        assert_eq!(
            resolver.calls.lock().unwrap()[0],
            ("(masc.): table".to_string(), "(masc.): desk".to_string())
        );
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("der Tisch").unwrap().back, "(masc.): table");
        assert!(store.added.lock().unwrap().is_empty());
        assert!(store.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_updates_store_and_cache() {
        let store = Arc::new(MockStore::default());
        let use_case = SaveNoteUseCase::new(store.clone(), Arc::new(OverwriteExisting));
        let mut cache = table_cache();

        let outcome = use_case
            .reconcile_parts(&mut cache, "  der Tisch ", "(masc.): desk")
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Updated);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("der Tisch").unwrap().back, "(masc.): desk");
        assert_eq!(
            store.updated.lock().unwrap()[0],
            (Some(NoteId(1)), "(masc.): desk".to_string())
        );
    }

    #[tokio::test]
    async fn test_grammar_and_malformed_are_skipped() {
        let store = Arc::new(MockStore::default());
        let resolver = Arc::new(CountingResolver::new(DuplicateDecision::Overwrite));
        let use_case = SaveNoteUseCase::new(store.clone(), resolver.clone());
        let mut cache = table_cache();

        for block in ["### Grammar: der Tisch", "just some text"] {
            let item = classify_block(block);
            let outcome = use_case.reconcile(&mut cache, &item).await.unwrap();
            assert_eq!(outcome, ReconcileOutcome::Skipped);
        }

        let outcome = use_case
            .reconcile_parts(&mut cache, "   ", "back")
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::Skipped);

        assert_eq!(cache.len(), 1);
        assert_eq!(resolver.call_count(), 0);
        assert!(store.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_leaves_cache_untouched() {
        let store = Arc::new(MockStore::failing());
        let use_case = SaveNoteUseCase::new(store, Arc::new(OverwriteExisting));
        let mut cache = table_cache();

        let err = use_case
            .reconcile_parts(&mut cache, "die Ankunft", "arrival")
            .await
            .unwrap_err();
        assert!(matches!(err, SaveNoteError::Backend(StoreError::Connection(_))));
        assert_eq!(cache.len(), 1);

        let err = use_case
            .reconcile_parts(&mut cache, "der Tisch", "desk")
            .await
            .unwrap_err();
        assert!(matches!(err, SaveNoteError::Backend(_)));
        assert_eq!(cache.get("der Tisch").unwrap().back, "(masc.): table");
    }

    #[tokio::test]
    async fn test_archive_block_routes_to_store() {
        let store = Arc::new(MockStore::default());
        let use_case = SaveNoteUseCase::new(store.clone(), Arc::new(KeepExisting));

        use_case
            .archive_block("### Grammar: Dativ\n- after *mit*")
            .await
            .unwrap();
        assert_eq!(store.archived.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_block_malformed_and_kept_leave_log_untouched() {
        let store = Arc::new(MockStore::default());
        let resolver = Arc::new(CountingResolver::new(DuplicateDecision::Keep));
        let use_case = SaveNoteUseCase::new(store.clone(), resolver.clone());
        let mut cache = table_cache();

        for block in ["just some text\nwith two lines", "- **der Tisch** (masc.): desk"] {
            let item = classify_block(block);
            let saved = use_case.save_block(&mut cache, &item, block).await.unwrap();
            assert!(!saved.archived);
            assert!(!saved.outcome.is_saved());
        }

        assert!(store.archived.lock().unwrap().is_empty());
        assert!(store.added.lock().unwrap().is_empty());
        assert!(store.updated.lock().unwrap().is_empty());
        assert_eq!(resolver.call_count(), 1);
        assert_eq!(cache.get("der Tisch").unwrap().back, "(masc.): table");
    }

    #[tokio::test]
    async fn test_save_block_archives_grammar_and_saved_vocabulary() {
        let store = Arc::new(MockStore::default());
        let use_case = SaveNoteUseCase::new(store.clone(), Arc::new(OverwriteExisting));
        let mut cache = table_cache();

        let grammar = "### Grammar: Dativ\n- after *mit*";
        let saved = use_case
            .save_block(&mut cache, &classify_block(grammar), grammar)
            .await
            .unwrap();
        assert_eq!(
            saved,
            SavedBlock {
                outcome: ReconcileOutcome::Skipped,
                archived: true
            }
        );
        assert_eq!(cache.len(), 1);

        let new_word = "- **die Ankunft** (fem.): arrival";
        let saved = use_case
            .save_block(&mut cache, &classify_block(new_word), new_word)
            .await
            .unwrap();
        assert_eq!(saved.outcome, ReconcileOutcome::Inserted);
        assert!(saved.archived);

        let overwrite = "- **der Tisch** (masc.): desk";
        let saved = use_case
            .save_block(&mut cache, &classify_block(overwrite), overwrite)
            .await
            .unwrap();
        assert_eq!(saved.outcome, ReconcileOutcome::Updated);
        assert!(saved.archived);

        assert_eq!(
            *store.archived.lock().unwrap(),
            vec![grammar.to_string(), new_word.to_string(), overwrite.to_string()]
        );
    }

    #[tokio::test]
    async fn test_cache_size_changes_only_on_insert() {
        let store = Arc::new(MockStore::default());
        let use_case = SaveNoteUseCase::new(store, Arc::new(KeepExisting));
        let mut cache = table_cache();

        let cases = [
            ("der Tisch", ReconcileOutcome::Kept, 0),
            ("der Stuhl", ReconcileOutcome::Inserted, 1),
            ("", ReconcileOutcome::Skipped, 0),
            ("der Stuhl", ReconcileOutcome::Kept, 0),
        ];

        for (key, expected, growth) in cases {
            let before = cache.len();
            let outcome = use_case.reconcile_parts(&mut cache, key, "x").await.unwrap();
            assert_eq!(outcome, expected);
            assert_eq!(cache.len(), before + growth);
        }
    }
}
