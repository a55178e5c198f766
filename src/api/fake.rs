//! In-memory stand-in for the comment API used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ApiError, ApiResult, CommentApi, PeriodDirectory};
use crate::models::{Comment, CommentPeriod, Document};
use crate::wire::CommentPayload;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    FetchPeriods(String),
    FetchComments(String),
    CountComments(String),
    FetchComment(String),
    Create(CommentPayload),
    Update(CommentPayload),
    SetCommentPublished(String, bool),
    FetchDocuments(String),
    FetchApplicationDocuments(String),
    FetchDecisionDocuments(String),
    FetchDocument(String),
    SetDocumentPublished(String, bool),
}

#[derive(Default)]
struct State {
    periods: HashMap<String, Vec<CommentPeriod>>,
    comments: Vec<Comment>,
    documents: HashMap<String, Vec<Document>>,
    /// Documents owned by an application or a decision rather than a comment.
    owned_documents: Vec<Document>,
    document_delays: HashMap<String, Duration>,
    failing_documents: HashSet<String>,
    fail_update: bool,
    fail_publish: bool,
    fail_everything: bool,
    calls: Vec<Call>,
    documents_completed: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with_state(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub(crate) fn with_period(self, application_id: &str, period_id: &str) -> Self {
        self.with_state(|s| {
            s.periods
                .entry(application_id.to_string())
                .or_default()
                .push(CommentPeriod {
                    id: period_id.to_string(),
                    application: Some(application_id.to_string()),
                    ..CommentPeriod::default()
                });
        })
    }

    pub(crate) fn with_comment(self, comment: Comment) -> Self {
        self.with_state(|s| s.comments.push(comment))
    }

    pub(crate) fn with_documents(self, comment_id: &str, names: &[&str]) -> Self {
        let documents = names
            .iter()
            .map(|name| Document {
                id: Some(format!("{comment_id}-{name}")),
                comment: Some(comment_id.to_string()),
                display_name: (*name).to_string(),
                ..Document::default()
            })
            .collect();
        self.with_state(|s| {
            s.documents.insert(comment_id.to_string(), documents);
        })
    }

    pub(crate) fn with_application_documents(self, application_id: &str, names: &[&str]) -> Self {
        self.with_owned_documents(names, |document| {
            document.id = Some(format!("{application_id}-{}", document.display_name));
            document.application = Some(application_id.to_string());
        })
    }

    pub(crate) fn with_decision_documents(self, decision_id: &str, names: &[&str]) -> Self {
        self.with_owned_documents(names, |document| {
            document.id = Some(format!("{decision_id}-{}", document.display_name));
            document.decision = Some(decision_id.to_string());
        })
    }

    fn with_owned_documents(self, names: &[&str], owner: impl Fn(&mut Document)) -> Self {
        self.with_state(|s| {
            for name in names {
                let mut document = Document {
                    display_name: (*name).to_string(),
                    ..Document::default()
                };
                owner(&mut document);
                s.owned_documents.push(document);
            }
        })
    }

    pub(crate) fn with_document_delay(self, comment_id: &str, millis: u64) -> Self {
        self.with_state(|s| {
            s.document_delays
                .insert(comment_id.to_string(), Duration::from_millis(millis));
        })
    }

    pub(crate) fn failing_documents(self, comment_id: &str) -> Self {
        self.with_state(|s| {
            s.failing_documents.insert(comment_id.to_string());
        })
    }

    pub(crate) fn failing_update(self) -> Self {
        self.with_state(|s| s.fail_update = true)
    }

    pub(crate) fn failing_publish(self) -> Self {
        self.with_state(|s| s.fail_publish = true)
    }

    pub(crate) fn failing_everything(self) -> Self {
        self.with_state(|s| s.fail_everything = true)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Comment ids in the order their document fetches finished.
    pub(crate) fn documents_completed(&self) -> Vec<String> {
        self.state.lock().unwrap().documents_completed.clone()
    }

    pub(crate) fn stored(&self, id: &str) -> Option<Comment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .iter()
            .find(|c| c.id() == Some(id))
            .cloned()
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_everything {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

/// What the server would store: escaped text, no documents.
fn from_payload(payload: &CommentPayload) -> Comment {
    serde_json::from_value(serde_json::to_value(payload).unwrap()).unwrap()
}

#[async_trait]
impl CommentApi for FakeApi {
    async fn fetch_comments_by_period(
        &self,
        period_id: &str,
        page: u32,
        page_size: u32,
        _sort_by: Option<&str>,
    ) -> ApiResult<Vec<Comment>> {
        self.record(Call::FetchComments(period_id.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|c| c.comment_period.as_deref() == Some(period_id))
            .skip((page * page_size) as usize)
            .take(page_size as usize)
            .map(|c| Comment {
                documents: Vec::new(),
                ..c.clone()
            })
            .collect())
    }

    async fn count_comments_by_period(&self, period_id: &str) -> ApiResult<u64> {
        self.record(Call::CountComments(period_id.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|c| c.comment_period.as_deref() == Some(period_id))
            .count() as u64)
    }

    async fn fetch_comment(&self, id: &str) -> ApiResult<Vec<Comment>> {
        self.record(Call::FetchComment(id.to_string()))?;
        Ok(self.stored(id).into_iter().collect())
    }

    async fn create_comment(&self, payload: &CommentPayload) -> ApiResult<Comment> {
        self.record(Call::Create(payload.clone()))?;
        let mut state = self.state.lock().unwrap();
        let mut created = from_payload(payload);
        created.id = Some(format!("c{}", state.comments.len() + 1));
        state.comments.push(created.clone());
        Ok(created)
    }

    async fn update_comment(&self, payload: &CommentPayload) -> ApiResult<Comment> {
        self.record(Call::Update(payload.clone()))?;
        let mut state = self.state.lock().unwrap();
        if state.fail_update {
            return Err(ApiError::server_error());
        }
        let updated = from_payload(payload);
        let slot = state
            .comments
            .iter_mut()
            .find(|c| c.id == updated.id)
            .ok_or(ApiError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn set_comment_published(
        &self,
        comment: &Comment,
        published: bool,
    ) -> ApiResult<Comment> {
        let id = comment.id().ok_or(ApiError::MissingId("comment"))?;
        self.record(Call::SetCommentPublished(id.to_string(), published))?;
        let mut state = self.state.lock().unwrap();
        if state.fail_publish {
            return Err(ApiError::server_error());
        }
        let slot = state
            .comments
            .iter_mut()
            .find(|c| c.id() == Some(id))
            .ok_or(ApiError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })?;
        slot.is_published = published;
        Ok(slot.clone())
    }

    async fn fetch_documents_by_comment(&self, comment_id: &str) -> ApiResult<Vec<Document>> {
        self.record(Call::FetchDocuments(comment_id.to_string()))?;
        let delay = self
            .state
            .lock()
            .unwrap()
            .document_delays
            .get(comment_id)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if state.failing_documents.contains(comment_id) {
            return Err(ApiError::Status {
                status: 503,
                reason: "Service Unavailable".to_string(),
            });
        }
        state.documents_completed.push(comment_id.to_string());
        Ok(state.documents.get(comment_id).cloned().unwrap_or_default())
    }

    async fn fetch_documents_by_application(
        &self,
        application_id: &str,
    ) -> ApiResult<Vec<Document>> {
        self.record(Call::FetchApplicationDocuments(application_id.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .owned_documents
            .iter()
            .filter(|d| d.application.as_deref() == Some(application_id))
            .cloned()
            .collect())
    }

    async fn fetch_documents_by_decision(&self, decision_id: &str) -> ApiResult<Vec<Document>> {
        self.record(Call::FetchDecisionDocuments(decision_id.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .owned_documents
            .iter()
            .filter(|d| d.decision.as_deref() == Some(decision_id))
            .cloned()
            .collect())
    }

    async fn fetch_document(&self, id: &str) -> ApiResult<Vec<Document>> {
        self.record(Call::FetchDocument(id.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .documents
            .values()
            .flatten()
            .chain(&state.owned_documents)
            .filter(|d| d.id() == Some(id))
            .cloned()
            .collect())
    }

    async fn set_document_published(
        &self,
        document: &Document,
        published: bool,
    ) -> ApiResult<Document> {
        let id = document.id().ok_or(ApiError::MissingId("document"))?;
        self.record(Call::SetDocumentPublished(id.to_string(), published))?;
        let mut state = self.state.lock().unwrap();
        if state.fail_publish {
            return Err(ApiError::server_error());
        }
        let State {
            documents,
            owned_documents,
            ..
        } = &mut *state;
        let slot = documents
            .values_mut()
            .flatten()
            .chain(owned_documents.iter_mut())
            .find(|d| d.id() == Some(id))
            .ok_or(ApiError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })?;
        slot.is_published = published;
        Ok(slot.clone())
    }
}

#[async_trait]
impl PeriodDirectory for FakeApi {
    async fn fetch_periods_by_application(
        &self,
        application_id: &str,
    ) -> ApiResult<Vec<CommentPeriod>> {
        self.record(Call::FetchPeriods(application_id.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .periods
            .get(application_id)
            .cloned()
            .unwrap_or_default())
    }
}
