use chrono::Utc;
use domain::{Document, DocumentId, Timestamp};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

// --- Search Request ---

/// Criteria for `DocumentService::search`.
///
/// Every field is optional; `None` and an empty list both mean the criterion
/// is not part of the request. The present criteria are OR-combined: a
/// document matches when it satisfies any one of them, and a request with no
/// criteria at all matches nothing.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SearchRequest {
    /// Title must start with one of these (case-sensitive).
    pub title_prefixes: Option<Vec<String>>,
    /// Content must contain one of these (case-sensitive).
    pub contains_contents: Option<Vec<String>>,
    /// Author id must be one of these.
    pub author_ids: Option<Vec<String>>,
    /// Inclusive lower bound on `created`.
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on `created`.
    pub created_to: Option<Timestamp>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_contains_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_contents = Some(contents.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_author_ids<I, S>(mut self, author_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_ids = Some(author_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_created_from(mut self, from: Timestamp) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn with_created_to(mut self, to: Timestamp) -> Self {
        self.created_to = Some(to);
        self
    }

    /// Non-empty title prefixes, if that criterion is present.
    pub fn title_prefixes(&self) -> Option<&[String]> {
        non_empty(&self.title_prefixes)
    }

    /// Non-empty content substrings, if that criterion is present.
    pub fn contains_contents(&self) -> Option<&[String]> {
        non_empty(&self.contains_contents)
    }

    /// Non-empty author ids, if that criterion is present.
    pub fn author_ids(&self) -> Option<&[String]> {
        non_empty(&self.author_ids)
    }

    /// True when no criterion is present, i.e. the request can match nothing.
    pub fn is_unconstrained(&self) -> bool {
        self.title_prefixes().is_none()
            && self.contains_contents().is_none()
            && self.author_ids().is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }
}

fn non_empty(list: &Option<Vec<String>>) -> Option<&[String]> {
    list.as_deref().filter(|items| !items.is_empty())
}

// --- Infrastructure Interfaces (Traits) ---

/// Prepares the incoming document for storage, given the stored one with the same id (if any).
pub type PrepareFn<'a> = dyn Fn(Document, Option<&Document>) -> Document + 'a;

/// Interface for the document store.
///
/// Implementations keep documents in a stable iteration order and are shared
/// across callers, so every method takes `&self`.
pub trait DocumentRepository: Send + Sync {
    /// Inserts or replaces the document keyed by its id.
    ///
    /// `prepare` sees the incoming document and the currently stored one under
    /// the same id; whatever it returns is stored (moved to the end of the
    /// iteration order) and handed back. `prepare` must keep the id. The
    /// lookup and the write happen atomically.
    fn upsert_with(&self, document: Document, prepare: &PrepareFn<'_>) -> Document;

    /// Retrieves a copy of the document with exactly this id.
    fn find_by_id(&self, id: &str) -> Option<Document>;

    /// Copies of every document matching the request, in iteration order.
    fn search(&self, request: &SearchRequest) -> Vec<Document>;

    /// Number of stored documents.
    fn count(&self) -> usize;
}

/// Source of the `created` timestamp for newly stored documents.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

// --- Application Services (Use Cases) ---

/// Front door of the document store: upsert, lookup by id, and search.
pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    clock: Arc<dyn Clock>,
}

impl DocumentService {
    pub fn new(repository: Arc<dyn DocumentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Service stamping `created` from the system clock.
    pub fn with_system_clock(repository: Arc<dyn DocumentRepository>) -> Self {
        Self::new(repository, Arc::new(SystemClock))
    }

    /// Upserts a document and returns what was stored.
    ///
    /// A missing (empty) id is replaced with a generated one. `created` is
    /// taken from the document already stored under the same id whenever there
    /// is one, even if the incoming document carries its own; on a first save
    /// the incoming value is kept, or stamped from the clock when absent. Every
    /// other field is last-write-wins.
    #[instrument(skip(self, document), fields(doc_id = %document.id()))]
    pub fn save(&self, mut document: Document) -> Document {
        if !document.has_id() {
            let id = DocumentId::generate();
            debug!(doc_id = %id, "Assigned generated id");
            document.set_id(id);
        }

        let stored = self.repository.upsert_with(document, &|mut incoming, existing| {
            let created = existing
                .and_then(Document::created)
                .or(incoming.created())
                .unwrap_or_else(|| self.clock.now());
            incoming.set_created(created);
            incoming
        });

        info!(doc_id = %stored.id(), "Document saved");
        stored
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: &str) -> Option<Document> {
        let found = self.repository.find_by_id(id);
        debug!(found = found.is_some(), "Looked up document");
        found
    }

    #[instrument(skip(self, request))]
    pub fn search(&self, request: &SearchRequest) -> Vec<Document> {
        if request.is_unconstrained() {
            debug!("Search request has no criteria; nothing can match");
        }
        let documents = self.repository.search(request);
        info!(hits = documents.len(), "Search finished");
        documents
    }

    pub fn count(&self) -> usize {
        self.repository.count()
    }
}
