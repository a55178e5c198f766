//! Outbound representation of a comment.
//!
//! The server stores free text with line breaks encoded as the two characters
//! `\` and `n`. Payloads are built from a borrowed [`Comment`] so the entity
//! being edited is never touched while a request is in flight.

use jiff::Timestamp;
use serde::Serialize;

use crate::models::{Comment, Review};
use crate::status::CommentStatus;

/// Encodes raw line breaks as a literal `\n`.
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}

/// Turns every literal `\n` back into a line break.
///
/// The encoding is ambiguous: text that already held a backslash followed by
/// `n` comes back with a line break in its place. Only text without literal
/// `\n` survives an escape/unescape round trip unchanged.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub reviewer_notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_date: Option<Timestamp>,
}

/// Transmission-safe copy of a comment. Documents are a server-owned relation
/// and are never part of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_commentPeriod", skip_serializing_if = "Option::is_none")]
    pub comment_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<Timestamp>,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_status: Option<CommentStatus>,
    pub is_published: bool,
    pub review: ReviewPayload,
}

impl CommentPayload {
    /// Payload for updating an existing comment.
    pub fn for_update(comment: &Comment) -> Self {
        let Review {
            reviewer_notes,
            reviewer_date,
        } = &comment.review;

        Self {
            id: comment.id.clone(),
            comment_period: comment.comment_period.clone(),
            comment_number: comment.comment_number,
            date_added: comment.date_added,
            comment: escape_newlines(&comment.comment),
            comment_status: comment.comment_status,
            is_published: comment.is_published,
            review: ReviewPayload {
                reviewer_notes: escape_newlines(reviewer_notes),
                reviewer_date: *reviewer_date,
            },
        }
    }

    /// Payload for creating a comment. The server assigns the id.
    pub fn for_create(comment: &Comment) -> Self {
        Self {
            id: None,
            ..Self::for_update(comment)
        }
    }
}
