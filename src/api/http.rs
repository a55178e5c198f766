use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, ApiResult, CommentApi, PeriodDirectory, normalize_error};
use crate::models::{Comment, CommentPeriod, Document};
use crate::wire::CommentPayload;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// REST client for the comment API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(normalize_error)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<reqwest::Response> {
        request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(normalize_error)
    }

    /// An empty body counts as an empty list.
    async fn read_list<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<Vec<T>> {
        let body = self.send(request).await?.text().await.map_err(normalize_error)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn read_one<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.send(request).await?.text().await.map_err(normalize_error)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET api/document?<owner_key>=<owner_id>`.
    async fn documents_owned_by(&self, owner_key: &str, owner_id: &str) -> ApiResult<Vec<Document>> {
        self.read_list(
            self.client
                .get(self.endpoint("document"))
                .query(&[(owner_key, owner_id)]),
        )
        .await
    }

    fn visibility_path(kind: &str, id: &str, published: bool) -> String {
        let action = if published { "publish" } else { "unpublish" };
        format!("{kind}/{id}/{action}")
    }
}

#[async_trait]
impl CommentApi for HttpApi {
    async fn fetch_comments_by_period(
        &self,
        period_id: &str,
        page: u32,
        page_size: u32,
        sort_by: Option<&str>,
    ) -> ApiResult<Vec<Comment>> {
        let mut query = vec![
            ("_commentPeriod", period_id.to_string()),
            ("pageNum", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(sort_by) = sort_by {
            query.push(("sortBy", sort_by.to_string()));
        }

        debug!(period_id, page, page_size, "fetching comments");
        self.read_list(self.client.get(self.endpoint("comment")).query(&query))
            .await
    }

    async fn count_comments_by_period(&self, period_id: &str) -> ApiResult<u64> {
        let request = self
            .client
            .head(self.endpoint("comment"))
            .query(&[("_commentPeriod", period_id)]);
        let response = self.send(request).await?;

        let header = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .ok_or(ApiError::MissingHeader(TOTAL_COUNT_HEADER))?;
        header
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .ok_or_else(|| ApiError::Decode(format!("bad {TOTAL_COUNT_HEADER} header")))
    }

    async fn fetch_comment(&self, id: &str) -> ApiResult<Vec<Comment>> {
        self.read_list(self.client.get(self.endpoint(&format!("comment/{id}"))))
            .await
    }

    async fn create_comment(&self, payload: &CommentPayload) -> ApiResult<Comment> {
        self.read_one(self.client.post(self.endpoint("comment")).json(payload))
            .await
    }

    async fn update_comment(&self, payload: &CommentPayload) -> ApiResult<Comment> {
        let id = payload.id.as_deref().ok_or(ApiError::MissingId("comment"))?;
        self.read_one(
            self.client
                .put(self.endpoint(&format!("comment/{id}")))
                .json(payload),
        )
        .await
    }

    async fn set_comment_published(
        &self,
        comment: &Comment,
        published: bool,
    ) -> ApiResult<Comment> {
        let id = comment.id().ok_or(ApiError::MissingId("comment"))?;
        let path = Self::visibility_path("comment", id, published);
        self.read_one(self.client.put(self.endpoint(&path))).await
    }

    async fn fetch_documents_by_comment(&self, comment_id: &str) -> ApiResult<Vec<Document>> {
        self.documents_owned_by("_comment", comment_id).await
    }

    async fn fetch_documents_by_application(
        &self,
        application_id: &str,
    ) -> ApiResult<Vec<Document>> {
        self.documents_owned_by("_application", application_id).await
    }

    async fn fetch_documents_by_decision(&self, decision_id: &str) -> ApiResult<Vec<Document>> {
        self.documents_owned_by("_decision", decision_id).await
    }

    async fn fetch_document(&self, id: &str) -> ApiResult<Vec<Document>> {
        self.read_list(self.client.get(self.endpoint(&format!("document/{id}"))))
            .await
    }

    async fn set_document_published(
        &self,
        document: &Document,
        published: bool,
    ) -> ApiResult<Document> {
        let id = document.id().ok_or(ApiError::MissingId("document"))?;
        let path = Self::visibility_path("document", id, published);
        self.read_one(self.client.put(self.endpoint(&path))).await
    }
}

#[async_trait]
impl PeriodDirectory for HttpApi {
    async fn fetch_periods_by_application(
        &self,
        application_id: &str,
    ) -> ApiResult<Vec<CommentPeriod>> {
        self.read_list(
            self.client
                .get(self.endpoint("commentperiod"))
                .query(&[("_application", application_id)]),
        )
        .await
    }
}
