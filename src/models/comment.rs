use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Document, null_as_default};
use crate::status::{CommentStatus, deserialize_status};

/// Reviewer-only annotations attached to a comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviewer_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_date: Option<Timestamp>,
}

/// A public comment submitted during a comment period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_commentPeriod", default, skip_serializing_if = "Option::is_none")]
    pub comment_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(
        default,
        deserialize_with = "deserialize_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub comment_status: Option<CommentStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review: Review,
    /// Filled in only when documents were explicitly requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
}

impl Comment {
    /// A fresh, unsaved comment for the given period.
    pub fn new(comment_period: String, comment: String) -> Self {
        Self {
            comment_period: Some(comment_period),
            comment,
            comment_status: Some(CommentStatus::Pending),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn status(&self) -> Option<CommentStatus> {
        self.comment_status
    }

    pub fn reviewer_notes(&self) -> &str {
        &self.review.reviewer_notes
    }

    /// Takes a server snapshot in place of this one. Documents are a separate
    /// relation the server does not echo back, so an already populated set
    /// survives a snapshot that carries none.
    pub fn supersede(&mut self, mut snapshot: Comment) {
        if snapshot.documents.is_empty() {
            snapshot.documents = std::mem::take(&mut self.documents);
        }
        *self = snapshot;
    }
}
