use async_trait::async_trait;
use domain::{Document, DocumentId, SearchRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing and retrieving documents.
///
/// Implementations keep documents in insertion order; that order is the
/// order `search` returns them in.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts the document, or replaces the stored one with the same id in place.
    /// The document must already carry a non-empty id.
    async fn save(&self, document: Document) -> Result<Document, ApplicationError>;
    /// Retrieves a document by its ID.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError>;
    /// Returns every stored document matching the request, in storage order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError>;
    /// Returns the number of stored documents.
    async fn count(&self) -> Result<usize, ApplicationError>;
}

// --- Application Services (Use Cases) ---

/// Upsert, lookup and search over a [`DocumentRepository`].
pub struct DocumentStore {
    doc_repo: Arc<dyn DocumentRepository>,
}

impl DocumentStore {
    pub fn new(doc_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { doc_repo }
    }

    /// Saves a document, assigning a fresh id when it has none (or an empty one).
    ///
    /// With an id, an existing record is fully replaced at its position and an
    /// unknown id is inserted as given.
    #[instrument(skip(self, document))]
    pub async fn save(&self, document: Document) -> Result<Document, ApplicationError> {
        let generated = document.assigned_id().is_none();
        let document = if generated {
            let id = DocumentId::generate();
            debug!(doc_id = %id, "Generated id for new document");
            // New record: every other field is carried over from the input
            Document {
                id: Some(id),
                ..document
            }
        } else {
            document
        };

        let saved = self.doc_repo.save(document).await?;
        if let Some(id) = saved.assigned_id() {
            info!(doc_id = %id, generated, "Document saved");
        }
        Ok(saved)
    }

    /// Returns all documents satisfying every set criterion, in storage order.
    #[instrument(skip(self, request))]
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        debug!(
            title_prefixes = request.title_prefixes.is_some(),
            contains_contents = request.contains_contents.is_some(),
            author_ids = request.author_ids.is_some(),
            created_from = ?request.created_from,
            created_to = ?request.created_to,
            "Searching documents"
        );
        let hits = self.doc_repo.search(request).await?;
        info!(hits = hits.len(), "Search finished");
        Ok(hits)
    }

    /// Looks up a document by exact id. An unknown id is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, ApplicationError> {
        let found = self.doc_repo.find_by_id(&DocumentId::from(id)).await?;
        debug!(doc_id = %id, found = found.is_some(), "Looked up document");
        Ok(found)
    }

    /// Number of documents currently stored.
    pub async fn len(&self) -> Result<usize, ApplicationError> {
        self.doc_repo.count().await
    }

    pub async fn is_empty(&self) -> Result<bool, ApplicationError> {
        Ok(self.len().await? == 0)
    }
}
