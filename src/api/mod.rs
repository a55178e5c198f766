//! Contracts of the remote comment API and its implementations.

mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod http;

pub use error::{ApiError, ApiResult, normalize_error};
pub use http::HttpApi;

use async_trait::async_trait;

use crate::models::{Comment, CommentPeriod, Document};
use crate::wire::CommentPayload;

/// Comment and document endpoints the review workflow depends on.
#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn fetch_comments_by_period(
        &self,
        period_id: &str,
        page: u32,
        page_size: u32,
        sort_by: Option<&str>,
    ) -> ApiResult<Vec<Comment>>;

    async fn count_comments_by_period(&self, period_id: &str) -> ApiResult<u64>;

    /// Zero or one record.
    async fn fetch_comment(&self, id: &str) -> ApiResult<Vec<Comment>>;

    async fn create_comment(&self, payload: &CommentPayload) -> ApiResult<Comment>;

    async fn update_comment(&self, payload: &CommentPayload) -> ApiResult<Comment>;

    async fn set_comment_published(&self, comment: &Comment, published: bool)
    -> ApiResult<Comment>;

    async fn fetch_documents_by_comment(&self, comment_id: &str) -> ApiResult<Vec<Document>>;

    async fn fetch_documents_by_application(
        &self,
        application_id: &str,
    ) -> ApiResult<Vec<Document>>;

    async fn fetch_documents_by_decision(&self, decision_id: &str) -> ApiResult<Vec<Document>>;

    /// Zero or one record.
    async fn fetch_document(&self, id: &str) -> ApiResult<Vec<Document>>;

    async fn set_document_published(
        &self,
        document: &Document,
        published: bool,
    ) -> ApiResult<Document>;
}

/// Lookup of the comment periods opened for an application.
#[async_trait]
pub trait PeriodDirectory: Send + Sync {
    /// Periods in server order; the first one is the current period.
    async fn fetch_periods_by_application(
        &self,
        application_id: &str,
    ) -> ApiResult<Vec<CommentPeriod>>;
}
