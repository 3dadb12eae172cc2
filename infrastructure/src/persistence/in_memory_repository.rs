// ./infrastructure/src/persistence/in_memory_repository.rs
use crate::search::matcher::matches;
use application::{DocumentRepository, PrepareFn, SearchRequest};
use domain::{Document, DocumentId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Insertion-ordered document storage.
///
/// `documents` is keyed by a monotonically increasing sequence number, which
/// gives the iteration order; `positions` maps each id to its current
/// sequence number for constant-time lookup.
#[derive(Debug, Default)]
struct Entries {
    next_seq: u64,
    documents: BTreeMap<u64, Document>,
    positions: HashMap<DocumentId, u64>,
}

impl Entries {
    fn get(&self, id: &str) -> Option<&Document> {
        self.positions
            .get(id)
            .and_then(|seq| self.documents.get(seq))
    }

    /// Removes the stored document with this id, if any.
    fn remove(&mut self, id: &str) -> Option<Document> {
        let seq = self.positions.remove(id)?;
        self.documents.remove(&seq)
    }

    /// Appends at the end of the iteration order. The id must not be present.
    fn push(&mut self, document: Document) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.positions.insert(document.id().clone(), seq);
        self.documents.insert(seq, document);
    }
}

// --- Document Repository Implementation ---

/// In-memory document store. Clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document, prepare), fields(doc_id = %document.id()))]
    fn upsert_with(&self, document: Document, prepare: &PrepareFn<'_>) -> Document {
        let mut entries = self.entries.write();

        let existing = entries.remove(document.id().as_str());
        if existing.is_some() {
            debug!("Replacing stored document");
        }
        let id = document.id().clone();
        let stored = prepare(document, existing.as_ref());
        debug_assert_eq!(stored.id(), &id, "prepare must not change the document id");

        entries.push(stored.clone());
        trace!(count = entries.documents.len(), "Document stored in-memory");
        stored
    }

    #[instrument(skip(self))]
    fn find_by_id(&self, id: &str) -> Option<Document> {
        self.entries.read().get(id).cloned()
    }

    #[instrument(skip(self, request))]
    fn search(&self, request: &SearchRequest) -> Vec<Document> {
        let entries = self.entries.read();
        let hits: Vec<Document> = entries
            .documents
            .values()
            .filter(|doc| matches(doc, request))
            .cloned()
            .collect();
        debug!(
            scanned = entries.documents.len(),
            hits = hits.len(),
            "In-memory search finished."
        );
        hits
    }

    fn count(&self) -> usize {
        self.entries.read().documents.len()
    }
}
