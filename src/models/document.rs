use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A file attached to a comment, an application or a decision. Visibility is
/// toggled independently of whatever it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "_application", default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(rename = "_decision", default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_file_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub internal_original_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_uploaded: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
}

impl Document {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Best human-readable name available for listings.
    pub fn label(&self) -> &str {
        [
            &self.display_name,
            &self.document_file_name,
            &self.internal_original_name,
        ]
        .into_iter()
        .find(|name| !name.is_empty())
        .map_or("(unnamed)", String::as_str)
    }
}
