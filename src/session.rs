use tokio::sync::watch;
use tracing::debug;

use crate::api::CommentApi;
use crate::models::Comment;
use crate::save::{self, Diagnostics, SaveReport};
use crate::service::CommentService;
use crate::status::{self, CommentStatus, PublishAction};

/// Review session over a single comment.
///
/// Holds a working copy of the reviewer notes that only reaches the comment
/// on [`commit_notes`](Self::commit_notes). Every snapshot the server hands
/// back is published on the channel returned by [`subscribe`](Self::subscribe).
pub struct ReviewSession<'a, A> {
    service: &'a CommentService<A>,
    comment: Comment,
    working_notes: String,
    network_msg: Diagnostics,
    changes: watch::Sender<Comment>,
}

impl<'a, A: CommentApi> ReviewSession<'a, A> {
    pub fn new(service: &'a CommentService<A>, comment: Comment) -> Self {
        let (changes, _) = watch::channel(comment.clone());
        Self {
            service,
            working_notes: comment.review.reviewer_notes.clone(),
            comment,
            network_msg: Diagnostics::default(),
            changes,
        }
    }

    /// Points the session at another comment, or at a newer copy of the same
    /// one. Unsaved note edits are dropped.
    pub fn bind(&mut self, comment: Comment) {
        self.working_notes = comment.review.reviewer_notes.clone();
        self.comment = comment;
    }

    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn into_comment(self) -> Comment {
        self.comment
    }

    /// Receives the latest comment after each successful server round trip.
    pub fn subscribe(&self) -> watch::Receiver<Comment> {
        self.changes.subscribe()
    }

    /// Failures from the most recent save; empty after a clean one.
    pub fn network_msg(&self) -> &Diagnostics {
        &self.network_msg
    }

    pub fn working_notes(&self) -> &str {
        &self.working_notes
    }

    pub fn set_working_notes(&mut self, notes: impl Into<String>) {
        self.working_notes = notes.into();
    }

    pub fn is_notes_pristine(&self) -> bool {
        self.working_notes == self.comment.review.reviewer_notes
    }

    /// Writes the working notes into the comment and saves. Does nothing when
    /// the notes are unchanged.
    pub async fn commit_notes(&mut self) -> Option<SaveReport> {
        if self.is_notes_pristine() {
            debug!(comment_id = ?self.comment.id(), "notes unchanged, nothing to save");
            return None;
        }

        self.comment.review.reviewer_notes = self.working_notes.clone();
        Some(self.save(None).await)
    }

    pub fn discard_notes(&mut self) {
        self.working_notes = self.comment.review.reviewer_notes.clone();
    }

    pub async fn accept(&mut self) -> Option<SaveReport> {
        self.move_to(CommentStatus::Accepted).await
    }

    pub async fn set_pending(&mut self) -> Option<SaveReport> {
        self.move_to(CommentStatus::Pending).await
    }

    pub async fn reject(&mut self) -> Option<SaveReport> {
        self.move_to(CommentStatus::Rejected).await
    }

    /// Moves to `target` and saves. `None` means the comment was already
    /// there and nothing was sent.
    pub async fn move_to(&mut self, target: CommentStatus) -> Option<SaveReport> {
        let action = status::transition_to(&mut self.comment, target)?;
        Some(self.save(Some(action)).await)
    }

    async fn save(&mut self, intent: Option<PublishAction>) -> SaveReport {
        self.network_msg.clear();

        let changes = &self.changes;
        let report = save::save(self.service, &mut self.comment, intent, |snapshot| {
            changes.send_replace(snapshot.clone());
        })
        .await;

        // The snapshot may carry notes the server normalized.
        if report.updated {
            self.working_notes = self.comment.review.reviewer_notes.clone();
        }
        self.network_msg = report.diagnostics.clone();
        report
    }
}
