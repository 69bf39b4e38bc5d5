// ./infrastructure/src/persistence/in_memory_repository.rs
use application::{ApplicationError, DocumentRepository};
use async_trait::async_trait;
use domain::{Document, DocumentId, SearchRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Documents in insertion order plus an id -> position index.
/// Both are only ever touched together under the same lock.
#[derive(Debug, Default)]
struct DocumentStorage {
    documents: Vec<Document>,
    positions: HashMap<DocumentId, usize>,
}

/// Ordered in-memory document store. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    storage: Arc<RwLock<DocumentStorage>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(DocumentStorage::default())),
        }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    async fn save(&self, document: Document) -> Result<Document, ApplicationError> {
        let id = document.assigned_id().cloned().ok_or_else(|| {
            ApplicationError::InvalidInput(
                "Document must have a non-empty id before it is stored".to_string(),
            )
        })?;

        let mut guard = self.storage.write().await;
        let storage = &mut *guard;
        match storage.positions.get(&id) {
            Some(&position) => {
                debug!(doc_id = %id, position, "Replacing document in in-memory store");
                if let Some(slot) = storage.documents.get_mut(position) {
                    *slot = document.clone();
                }
            }
            None => {
                let position = storage.documents.len();
                debug!(doc_id = %id, position, "Appending document to in-memory store");
                storage.positions.insert(id, position);
                storage.documents.push(document.clone());
            }
        }
        Ok(document)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        let storage = self.storage.read().await;
        let doc = storage
            .positions
            .get(id)
            .and_then(|&position| storage.documents.get(position))
            .cloned();
        Ok(doc)
    }

    #[instrument(skip(self, request))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        let storage = self.storage.read().await;
        let hits: Vec<Document> = storage
            .documents
            .iter()
            .filter(|doc| request.matches(doc))
            .cloned()
            .collect();
        trace!(
            scanned = storage.documents.len(),
            hits = hits.len(),
            "In-memory search finished"
        );
        Ok(hits)
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.storage.read().await.documents.len())
    }
}
