#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod documents;
pub mod helpers;
pub mod models;
pub mod output;
pub mod save;
pub mod service;
pub mod session;
pub mod status;
pub mod wire;

use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;

use api::HttpApi;
use cli::{Cli, CommentCommands, Commands, DocumentCommands};
use commands::comment::{ReviewOutcome, Scope};
use commands::document::Owner;
use config::Config;
use documents::DocumentService;
use output::Output;
use service::{CommentService, ListQuery};

pub const REVIEW_DIR: &str = ".review";
pub const REDIRECT_FILE: &str = "redirect";

/// Finds the `.review/` directory by walking up from the current directory.
pub fn find_review_dir() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    let mut dir = current_dir.as_path();

    loop {
        let review_path = dir.join(REVIEW_DIR);
        if review_path.is_dir() {
            return Some(review_path);
        }

        dir = dir.parent()?;
    }
}

/// Resolves the final review directory, following any redirect file.
/// A redirect file contains a path (absolute or relative) to another `.review/` directory.
pub fn resolve_review_dir() -> Option<PathBuf> {
    let review_dir = find_review_dir()?;
    let redirect_path = review_dir.join(REDIRECT_FILE);

    if redirect_path.is_file() {
        let target = std::fs::read_to_string(&redirect_path).ok()?;
        let target = PathBuf::from(target.trim());

        let target_path = if target.is_absolute() {
            target
        } else {
            review_dir.parent()?.join(target)
        };

        if target_path.is_dir() {
            return Some(target_path);
        }
        tracing::warn!(
            redirect = %redirect_path.display(),
            "redirect target is not a directory, ignoring"
        );
    }

    Some(review_dir)
}

fn ensure_initialized() -> Result<Config> {
    let review_dir = resolve_review_dir()
        .ok_or_else(|| anyhow!("Comment review not initialized. Run 'crv init' first."))?;
    tracing::debug!(dir = %review_dir.display(), "using review directory");

    Config::load(&review_dir).context("Failed to load configuration")
}

/// Prints the outcome and turns accumulated save failures into an error.
fn finish_review(outcome: &ReviewOutcome, json: bool) -> Result<()> {
    Output::new(json).review_outcome(outcome)?;
    if let Some(problems) = outcome.problems() {
        bail!("Save incomplete: {problems}");
    }
    Ok(())
}

async fn run_comment(
    comment_cmd: CommentCommands,
    config: &Config,
    service: &CommentService<HttpApi>,
) -> Result<()> {
    match comment_cmd {
        CommentCommands::List {
            scope,
            page,
            page_size,
            sort_by,
            documents,
            json,
        } => {
            let scope = match (scope.application, scope.period) {
                (Some(application), _) => Scope::Application(application),
                (None, Some(period)) => Scope::Period(period),
                (None, None) => bail!("Either --app or --period is required"),
            };
            let query = ListQuery {
                page,
                page_size: page_size.unwrap_or(config.page_size),
                sort_by,
                expand_documents: documents,
            };
            let comments = commands::comment::list(&scope, &query, service).await?;
            Output::new(json).comment_list(&comments, &scope, page)
        }
        CommentCommands::Count { period_id, json } => {
            let count = commands::comment::count(&period_id, service).await?;
            Output::new(json).comment_count(&period_id, count)
        }
        CommentCommands::Show {
            comment_id,
            documents,
            json,
        } => {
            let comment = commands::comment::show(&comment_id, documents, service).await?;
            Output::new(json).comment_detail(&comment)
        }
        CommentCommands::Add {
            period_id,
            text,
            json,
        } => {
            let comment = commands::comment::add(period_id, text, service).await?;
            Output::new(json).comment_created(&comment)
        }
        CommentCommands::Status {
            comment_id,
            status,
            json,
        } => {
            let outcome = commands::comment::set_status(&comment_id, status, service).await?;
            finish_review(&outcome, json)
        }
        CommentCommands::Notes {
            comment_id,
            text,
            json,
        } => {
            let outcome = commands::comment::notes(&comment_id, text, service).await?;
            finish_review(&outcome, json)
        }
    }
}

async fn run_document(document_cmd: DocumentCommands, api: &HttpApi) -> Result<()> {
    let documents = DocumentService::new(api);
    match document_cmd {
        DocumentCommands::List { owner, json } => {
            let owner = match (owner.comment_id, owner.application, owner.decision) {
                (Some(id), _, _) => Owner::Comment(id),
                (None, Some(id), _) => Owner::Application(id),
                (None, None, Some(id)) => Owner::Decision(id),
                (None, None, None) => bail!("A comment ID, --app or --decision is required"),
            };
            let list = commands::document::list(&owner, &documents).await?;
            Output::new(json).document_list(&list, &owner)
        }
        DocumentCommands::Publish { document_id } => {
            let document = commands::document::set_published(&document_id, true, &documents).await?;
            Output::new(false).document_visibility(&document)
        }
        DocumentCommands::Unpublish { document_id } => {
            let document =
                commands::document::set_published(&document_id, false, &documents).await?;
            Output::new(false).document_visibility(&document)
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { api_url, stealth } => commands::init::run(api_url, stealth),
        Commands::Config { json } => {
            let config = ensure_initialized()?;
            Output::new(json).config(&config)
        }
        Commands::Comment(comment_cmd) => {
            let config = ensure_initialized()?;
            let service = CommentService::new(config.http_api()?);
            run_comment(comment_cmd, &config, &service).await
        }
        Commands::Document(document_cmd) => {
            let config = ensure_initialized()?;
            let api = config.http_api()?;
            run_document(document_cmd, &api).await
        }
    }
}
