use tracing::{info, warn};

use crate::api::{ApiResult, CommentApi};
use crate::models::Document;

/// Lookup and visibility changes for documents attached to comments,
/// applications and decisions.
pub struct DocumentService<'a, A> {
    api: &'a A,
}

impl<'a, A: CommentApi> DocumentService<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn list_by_comment(&self, comment_id: &str) -> ApiResult<Vec<Document>> {
        self.api.fetch_documents_by_comment(comment_id).await
    }

    pub async fn list_by_application(&self, application_id: &str) -> ApiResult<Vec<Document>> {
        self.api.fetch_documents_by_application(application_id).await
    }

    pub async fn list_by_decision(&self, decision_id: &str) -> ApiResult<Vec<Document>> {
        self.api.fetch_documents_by_decision(decision_id).await
    }

    /// Returns `None` when no document has this id.
    pub async fn get_by_id(&self, document_id: &str) -> ApiResult<Option<Document>> {
        Ok(self.api.fetch_document(document_id).await?.into_iter().next())
    }

    pub async fn publish(&self, document: &mut Document) -> ApiResult<()> {
        self.set_published(document, true).await
    }

    pub async fn unpublish(&self, document: &mut Document) -> ApiResult<()> {
        self.set_published(document, false).await
    }

    /// The local flag only changes once the server has accepted the change.
    async fn set_published(&self, document: &mut Document, published: bool) -> ApiResult<()> {
        match self.api.set_document_published(document, published).await {
            Ok(stored) => {
                document.is_published = stored.is_published;
                info!(document_id = ?document.id(), published, "document visibility changed");
                Ok(())
            }
            Err(err) => {
                warn!(document_id = ?document.id(), published, error = %err, "document visibility change failed");
                Err(err)
            }
        }
    }
}
