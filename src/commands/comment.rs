use anyhow::{Context, Result, anyhow};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::api::{CommentApi, PeriodDirectory};
use crate::models::Comment;
use crate::save::SaveReport;
use crate::service::{CommentService, ListQuery};
use crate::session::ReviewSession;
use crate::status::CommentStatus;

/// Where a listing reads its comments from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Application(String),
    Period(String),
}

impl Scope {
    pub fn describe(&self) -> String {
        match self {
            Self::Application(id) => format!("application {id}"),
            Self::Period(id) => format!("comment period {id}"),
        }
    }
}

/// Result of a review action: the comment as it now stands, and what the save
/// did. `report` is `None` when nothing needed saving.
#[derive(Debug)]
pub struct ReviewOutcome {
    pub comment: Comment,
    pub report: Option<SaveReport>,
}

/// Serialized as `{ comment, saved, problems }`.
impl Serialize for ReviewOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let problems = self
            .report
            .as_ref()
            .map_or(&[][..], |report| report.diagnostics.failures());

        let mut state = serializer.serialize_struct("ReviewOutcome", 3)?;
        state.serialize_field("comment", &self.comment)?;
        state.serialize_field("saved", &self.report.is_some())?;
        state.serialize_field("problems", problems)?;
        state.end()
    }
}

impl ReviewOutcome {
    /// Accumulated save failures, if any.
    pub fn problems(&self) -> Option<String> {
        self.report
            .as_ref()
            .filter(|report| !report.is_clean())
            .map(|report| report.diagnostics.to_string())
    }
}

pub async fn list<A: CommentApi + PeriodDirectory>(
    scope: &Scope,
    query: &ListQuery,
    service: &CommentService<A>,
) -> Result<Vec<Comment>> {
    let comments = match scope {
        Scope::Application(id) => service.list_by_application(id, query).await,
        Scope::Period(id) => service.list_by_period(id, query).await,
    };
    comments.with_context(|| format!("Failed to fetch comments for {}", scope.describe()))
}

pub async fn count<A: CommentApi>(period_id: &str, service: &CommentService<A>) -> Result<u64> {
    service
        .count_by_period(period_id)
        .await
        .with_context(|| format!("Failed to count comments for comment period {period_id}"))
}

pub async fn show<A: CommentApi>(
    comment_id: &str,
    documents: bool,
    service: &CommentService<A>,
) -> Result<Comment> {
    service
        .get_by_id(comment_id, documents)
        .await
        .with_context(|| format!("Failed to fetch comment {comment_id}"))?
        .ok_or_else(|| anyhow!("Comment not found: {comment_id}"))
}

pub async fn add<A: CommentApi>(
    period_id: String,
    text: String,
    service: &CommentService<A>,
) -> Result<Comment> {
    if text.trim().is_empty() {
        return Err(anyhow!("Comment text cannot be empty"));
    }

    service
        .add(&Comment::new(period_id, text))
        .await
        .context("Failed to submit comment")
}

pub async fn set_status<A: CommentApi>(
    comment_id: &str,
    status: CommentStatus,
    service: &CommentService<A>,
) -> Result<ReviewOutcome> {
    let comment = show(comment_id, false, service).await?;
    let mut session = ReviewSession::new(service, comment);

    let report = session.move_to(status).await;
    Ok(ReviewOutcome {
        comment: session.into_comment(),
        report,
    })
}

pub async fn notes<A: CommentApi>(
    comment_id: &str,
    text: String,
    service: &CommentService<A>,
) -> Result<ReviewOutcome> {
    let comment = show(comment_id, false, service).await?;
    let mut session = ReviewSession::new(service, comment);

    session.set_working_notes(text);
    let report = session.commit_notes().await;
    Ok(ReviewOutcome {
        comment: session.into_comment(),
        report,
    })
}
