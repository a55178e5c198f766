use futures::future::try_join_all;
use tracing::{debug, info};

use crate::api::{ApiResult, CommentApi, PeriodDirectory};
use crate::models::{Comment, Document};
use crate::wire::CommentPayload;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination, ordering and expansion options for comment listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub expand_documents: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            expand_documents: false,
        }
    }
}

impl ListQuery {
    pub fn with_documents(mut self) -> Self {
        self.expand_documents = true;
        self
    }
}

/// Retrieval and persistence of comments on top of a [`CommentApi`].
pub struct CommentService<A> {
    api: A,
}

impl<A: CommentApi> CommentService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// One page of comments for a period, in server order.
    ///
    /// With `expand_documents` every comment's documents are fetched
    /// concurrently and the call only completes once all of them have. A
    /// single failed fetch fails the whole listing.
    pub async fn list_by_period(&self, period_id: &str, query: &ListQuery) -> ApiResult<Vec<Comment>> {
        let mut comments = self
            .api
            .fetch_comments_by_period(
                period_id,
                query.page,
                query.page_size,
                query.sort_by.as_deref(),
            )
            .await?;
        debug!(period_id, count = comments.len(), "fetched comment page");

        if query.expand_documents {
            self.attach_documents(&mut comments).await?;
        }
        Ok(comments)
    }

    /// Returns `None` when no comment has this id.
    pub async fn get_by_id(&self, comment_id: &str, expand_documents: bool) -> ApiResult<Option<Comment>> {
        let Some(mut comment) = self.api.fetch_comment(comment_id).await?.into_iter().next() else {
            debug!(comment_id, "comment not found");
            return Ok(None);
        };

        if expand_documents {
            let documents = self.documents_for(&comment).await?;
            comment.documents.extend(documents);
        }
        Ok(Some(comment))
    }

    pub async fn count_by_period(&self, period_id: &str) -> ApiResult<u64> {
        self.api.count_comments_by_period(period_id).await
    }

    /// Creates a comment; the server assigns its id.
    pub async fn add(&self, comment: &Comment) -> ApiResult<Comment> {
        let created = self
            .api
            .create_comment(&CommentPayload::for_create(comment))
            .await?;
        info!(comment_id = ?created.id(), "created comment");
        Ok(created)
    }

    pub async fn update(&self, comment: &Comment) -> ApiResult<Comment> {
        self.api
            .update_comment(&CommentPayload::for_update(comment))
            .await
    }

    pub async fn publish(&self, comment: &Comment) -> ApiResult<Comment> {
        self.api.set_comment_published(comment, true).await
    }

    pub async fn unpublish(&self, comment: &Comment) -> ApiResult<Comment> {
        self.api.set_comment_published(comment, false).await
    }

    async fn documents_for(&self, comment: &Comment) -> ApiResult<Vec<Document>> {
        match comment.id() {
            Some(id) => self.api.fetch_documents_by_comment(id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Joins on every fetch before touching any comment, so callers never see
    /// a page with only some documents attached.
    async fn attach_documents(&self, comments: &mut [Comment]) -> ApiResult<()> {
        let batches = try_join_all(comments.iter().map(|c| self.documents_for(c))).await?;

        for (comment, documents) in comments.iter_mut().zip(batches) {
            comment.documents.extend(documents);
        }
        Ok(())
    }
}

impl<A: CommentApi + PeriodDirectory> CommentService<A> {
    /// Comments of the application's current comment period.
    ///
    /// Only the first period is considered, even when the application has
    /// several. No periods means no comments.
    pub async fn list_by_application(
        &self,
        application_id: &str,
        query: &ListQuery,
    ) -> ApiResult<Vec<Comment>> {
        let periods = self.api.fetch_periods_by_application(application_id).await?;

        let Some(current) = periods.first() else {
            debug!(application_id, "application has no comment periods");
            return Ok(Vec::new());
        };
        if periods.len() > 1 {
            debug!(
                application_id,
                periods = periods.len(),
                period_id = %current.id,
                "using first comment period only"
            );
        }

        self.list_by_period(&current.id, query).await
    }
}
