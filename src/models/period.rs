use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Window during which comments are accepted for an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPeriod {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_application", default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Timestamp>,
}
