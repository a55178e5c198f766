use anyhow::{Context, Result, anyhow};

use crate::api::CommentApi;
use crate::documents::DocumentService;
use crate::models::Document;

/// What a document listing is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Comment(String),
    Application(String),
    Decision(String),
}

impl Owner {
    pub fn describe(&self) -> String {
        match self {
            Self::Comment(id) => format!("comment {id}"),
            Self::Application(id) => format!("application {id}"),
            Self::Decision(id) => format!("decision {id}"),
        }
    }
}

pub async fn list<A: CommentApi>(owner: &Owner, documents: &DocumentService<'_, A>) -> Result<Vec<Document>> {
    let listed = match owner {
        Owner::Comment(id) => documents.list_by_comment(id).await,
        Owner::Application(id) => documents.list_by_application(id).await,
        Owner::Decision(id) => documents.list_by_decision(id).await,
    };
    listed.with_context(|| format!("Failed to fetch documents for {}", owner.describe()))
}

/// Sets a document's visibility and returns it as the server now has it.
pub async fn set_published<A: CommentApi>(
    document_id: &str,
    published: bool,
    documents: &DocumentService<'_, A>,
) -> Result<Document> {
    let mut document = documents
        .get_by_id(document_id)
        .await
        .with_context(|| format!("Failed to fetch document {document_id}"))?
        .ok_or_else(|| anyhow!("Document not found: {document_id}"))?;

    let action = if published { "publish" } else { "unpublish" };
    let result = if published {
        documents.publish(&mut document).await
    } else {
        documents.unpublish(&mut document).await
    };
    result.with_context(|| format!("Failed to {action} document {document_id}"))?;

    Ok(document)
}
