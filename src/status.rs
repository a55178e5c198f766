use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::models::Comment;

/// Review state of a comment. Serialized with the canonical capitalized labels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CommentStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Visibility change implied by a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Publish,
    Unpublish,
}

impl CommentStatus {
    /// Accepted comments are public; everything else is hidden.
    pub fn publish_action(self) -> PublishAction {
        match self {
            Self::Accepted => PublishAction::Publish,
            Self::Pending | Self::Rejected => PublishAction::Unpublish,
        }
    }
}

/// Normalizes whatever the server sent. Case variants map onto the canonical
/// value; unknown labels and nulls become `None`.
pub(crate) fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<CommentStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|label| match label.trim().parse() {
        Ok(status) => Some(status),
        Err(_) => {
            tracing::warn!(status = %label, "ignoring unrecognized comment status");
            None
        }
    }))
}

fn has_status(comment: Option<&Comment>, status: CommentStatus) -> bool {
    comment.and_then(Comment::status) == Some(status)
}

pub fn is_accepted(comment: Option<&Comment>) -> bool {
    has_status(comment, CommentStatus::Accepted)
}

pub fn is_pending(comment: Option<&Comment>) -> bool {
    has_status(comment, CommentStatus::Pending)
}

pub fn is_rejected(comment: Option<&Comment>) -> bool {
    has_status(comment, CommentStatus::Rejected)
}

/// Moves `comment` into `target`.
///
/// Returns `None` and leaves the comment untouched when it is already in
/// `target`. Otherwise the status is overwritten and the visibility change the
/// new status calls for is returned; the caller decides when to persist it.
pub fn transition_to(comment: &mut Comment, target: CommentStatus) -> Option<PublishAction> {
    if comment.comment_status == Some(target) {
        return None;
    }

    comment.comment_status = Some(target);
    Some(target.publish_action())
}
