//! Persisting a reviewed comment.
//!
//! A save is two dependent steps run in order: update the record, then bring
//! the published flag in line with the requested visibility. A failing step
//! never stops the next one; every failure is collected into [`Diagnostics`]
//! so one save reports all of its problems at once.

use std::fmt;

use jiff::Timestamp;
use tracing::{debug, warn};

use crate::api::{ApiError, CommentApi};
use crate::models::Comment;
use crate::service::CommentService;
use crate::status::PublishAction;

/// Failures accumulated over a single save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    failures: Vec<String>,
}

impl Diagnostics {
    pub fn push(&mut self, step: &str, err: &ApiError) {
        self.failures.push(format!("{step}: {err}"));
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn clear(&mut self) {
        self.failures.clear();
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.failures.join("; "))
    }
}

/// What a save managed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub diagnostics: Diagnostics,
    /// The update step succeeded and the server snapshot was taken.
    pub updated: bool,
    /// Visibility change that reached the server, if one was needed.
    pub visibility: Option<PublishAction>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Saves `comment`, then applies `intent` if the flag does not already match.
///
/// `on_change` sees the comment every time a fresh server snapshot replaces
/// it. Never fails: problems end up in the returned report.
pub async fn save<A, F>(
    service: &CommentService<A>,
    comment: &mut Comment,
    intent: Option<PublishAction>,
    mut on_change: F,
) -> SaveReport
where
    A: CommentApi,
    F: FnMut(&Comment),
{
    let mut report = SaveReport::default();
    comment.review.reviewer_date = Some(Timestamp::now());

    match service.update(comment).await {
        Ok(snapshot) => {
            comment.supersede(snapshot);
            report.updated = true;
            on_change(comment);
        }
        Err(err) => {
            warn!(comment_id = ?comment.id(), error = %err, "comment update failed");
            report.diagnostics.push("save", &err);
        }
    }

    let pending = match intent {
        Some(PublishAction::Publish) if !comment.is_published => Some(PublishAction::Publish),
        Some(PublishAction::Unpublish) if comment.is_published => Some(PublishAction::Unpublish),
        _ => None,
    };
    let Some(action) = pending else {
        return report;
    };

    let (step, result) = match action {
        PublishAction::Publish => ("publish", service.publish(comment).await),
        PublishAction::Unpublish => ("unpublish", service.unpublish(comment).await),
    };
    match result {
        Ok(snapshot) => {
            comment.supersede(snapshot);
            report.visibility = Some(action);
            debug!(comment_id = ?comment.id(), step, "visibility updated");
            on_change(comment);
        }
        Err(err) => {
            warn!(comment_id = ?comment.id(), step, error = %err, "visibility change failed");
            report.diagnostics.push(step, &err);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};
    use crate::models::Document;
    use crate::status::CommentStatus;
    use rstest::rstest;

    fn stored(status: CommentStatus, is_published: bool) -> Comment {
        Comment {
            id: Some("c1".to_string()),
            comment_period: Some("p1".to_string()),
            comment: "text".to_string(),
            comment_status: Some(status),
            is_published,
            ..Comment::default()
        }
    }

    fn service(api: FakeApi, status: CommentStatus, is_published: bool) -> CommentService<FakeApi> {
        CommentService::new(api.with_comment(stored(status, is_published)))
    }

    fn visibility_calls(api: &FakeApi) -> Vec<Call> {
        api.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::SetCommentPublished(..)))
            .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn accepted_comment_is_saved_then_published() {
        let service = service(FakeApi::new(), CommentStatus::Pending, false);
        let mut comment = stored(CommentStatus::Accepted, false);
        let mut seen = Vec::new();

        let report = save(&service, &mut comment, Some(PublishAction::Publish), |c| {
            seen.push(c.is_published)
        })
        .await;

        assert!(report.is_clean());
        assert!(report.updated);
        assert_eq!(report.visibility, Some(PublishAction::Publish));
        assert!(comment.is_published);
        assert_eq!(seen, vec![false, true]);
        assert_eq!(
            service.api().stored("c1").unwrap().status(),
            Some(CommentStatus::Accepted)
        );
    }

    // Update fails, publish succeeds: both outcomes must be visible.
    #[rstest]
    #[tokio::test]
    async fn failed_update_does_not_stop_publish() {
        let service = service(FakeApi::new().failing_update(), CommentStatus::Pending, false);
        let mut comment = stored(CommentStatus::Accepted, false);

        let report = save(&service, &mut comment, Some(PublishAction::Publish), |_| {}).await;

        assert!(!report.updated);
        assert_eq!(report.diagnostics.to_string(), "save: 500 - Internal Server Error");
        assert_eq!(report.visibility, Some(PublishAction::Publish));
        assert!(comment.is_published);
    }

    #[rstest]
    #[tokio::test]
    async fn every_failure_is_reported() {
        let service = service(
            FakeApi::new().failing_update().failing_publish(),
            CommentStatus::Accepted,
            true,
        );
        let mut comment = stored(CommentStatus::Rejected, true);

        let report = save(&service, &mut comment, Some(PublishAction::Unpublish), |_| {}).await;

        assert_eq!(
            report.diagnostics.failures(),
            [
                "save: 500 - Internal Server Error",
                "unpublish: 500 - Internal Server Error"
            ]
        );
        assert!(comment.is_published);
        assert_eq!(comment.status(), Some(CommentStatus::Rejected));
    }

    // The visibility step reads the snapshot returned by the update, not the
    // flag the caller started with.
    #[rstest]
    #[tokio::test]
    async fn visibility_reads_the_fresh_snapshot() {
        let service = service(FakeApi::new(), CommentStatus::Accepted, false);
        // Caller believes the comment is published; the update echoes that
        // back, so no publish is needed.
        let mut comment = stored(CommentStatus::Accepted, true);

        let report = save(&service, &mut comment, Some(PublishAction::Publish), |_| {}).await;

        assert!(report.is_clean());
        assert_eq!(report.visibility, None);
        assert!(visibility_calls(service.api()).is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn no_intent_only_updates() {
        let service = service(FakeApi::new(), CommentStatus::Pending, false);
        let mut comment = stored(CommentStatus::Pending, false);
        comment.review.reviewer_notes = "looks fine\nsecond thought".to_string();

        let report = save(&service, &mut comment, None, |_| {}).await;

        assert!(report.is_clean());
        assert!(visibility_calls(service.api()).is_empty());
        // The server copy holds the escaped form.
        assert_eq!(
            service.api().stored("c1").unwrap().reviewer_notes(),
            "looks fine\\nsecond thought"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn reviewer_date_is_stamped_even_when_update_fails() {
        let service = service(FakeApi::new().failing_update(), CommentStatus::Pending, false);
        let mut comment = stored(CommentStatus::Pending, false);
        let before = Timestamp::now();

        save(&service, &mut comment, None, |_| {}).await;

        let stamped = comment.review.reviewer_date.unwrap();
        assert!(stamped >= before);
        let calls = service.api().calls();
        let Call::Update(payload) = &calls[0] else {
            panic!("expected an update call");
        };
        assert_eq!(payload.review.reviewer_date, Some(stamped));
    }

    #[rstest]
    #[tokio::test]
    async fn attached_documents_survive_the_snapshot() {
        let service = service(FakeApi::new(), CommentStatus::Pending, false);
        let mut comment = stored(CommentStatus::Pending, false);
        comment.documents.push(Document {
            id: Some("d1".to_string()),
            ..Document::default()
        });

        save(&service, &mut comment, None, |_| {}).await;

        assert_eq!(comment.documents.len(), 1);
        let calls = service.api().calls();
        let Call::Update(payload) = &calls[0] else {
            panic!("expected an update call");
        };
        assert!(!serde_json::to_value(payload).unwrap().as_object().unwrap().contains_key("documents"));
    }

    #[rstest]
    fn diagnostics_join_in_order() {
        let mut diagnostics = Diagnostics::default();
        assert_eq!(diagnostics.to_string(), "");

        diagnostics.push("save", &ApiError::Transport("timed out".to_string()));
        diagnostics.push("publish", &ApiError::server_error());
        assert_eq!(
            diagnostics.to_string(),
            "save: timed out; publish: 500 - Internal Server Error"
        );

        diagnostics.clear();
        assert!(diagnostics.is_empty());
    }
}
