use clap::{Args, Parser, Subcommand};

use crate::helpers::parse_status;
use crate::status::CommentStatus;

#[derive(Parser)]
#[command(name = "crv")]
#[command(about = "Review and publish public comments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize comment review in the current project
    Init {
        /// Base URL of the comment API
        #[arg(long)]
        api_url: String,

        /// Initialize without committing to the repo (adds .review to .gitignore or .git/info/exclude)
        #[arg(long)]
        stealth: bool,
    },

    /// Show the active configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect and review comments
    #[command(subcommand)]
    Comment(CommentCommands),

    /// Inspect and publish comment documents
    #[command(subcommand)]
    Document(DocumentCommands),
}

/// Where to list comments from. Exactly one must be given.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ScopeArgs {
    /// Application ID (its first comment period is used)
    #[arg(long = "app")]
    pub application: Option<String>,

    /// Comment period ID
    #[arg(long)]
    pub period: Option<String>,
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// List one page of comments
    List {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Comments per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,

        /// Sort expression passed to the server, e.g. "-dateAdded"
        #[arg(long)]
        sort_by: Option<String>,

        /// Also fetch each comment's documents
        #[arg(long)]
        documents: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count the comments of a comment period
    Count {
        /// The comment period ID
        period_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single comment
    Show {
        /// The comment ID
        comment_id: String,

        /// Also fetch the comment's documents
        #[arg(long)]
        documents: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a new comment to a comment period
    Add {
        /// The comment period ID
        period_id: String,

        /// The comment text
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a comment to pending, accepted or rejected
    Status {
        /// The comment ID
        comment_id: String,

        /// Target status
        #[arg(value_parser = parse_status)]
        status: CommentStatus,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the internal reviewer notes of a comment
    Notes {
        /// The comment ID
        comment_id: String,

        /// The new notes
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Whose documents to list. Exactly one must be given.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct DocumentOwnerArgs {
    /// The comment ID
    pub comment_id: Option<String>,

    /// Application ID
    #[arg(long = "app")]
    pub application: Option<String>,

    /// Decision ID
    #[arg(long)]
    pub decision: Option<String>,
}

#[derive(Subcommand)]
pub enum DocumentCommands {
    /// List the documents attached to a comment, an application or a decision
    List {
        #[command(flatten)]
        owner: DocumentOwnerArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Make a document publicly visible
    Publish {
        /// The document ID
        document_id: String,
    },

    /// Hide a document from the public
    Unpublish {
        /// The document ID
        document_id: String,
    },
}
