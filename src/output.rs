use anyhow::Result;
use console::{Term, style};
use serde::Serialize;
use serde_json::json;

use crate::commands::comment::{ReviewOutcome, Scope};
use crate::commands::document::Owner;
use crate::config::Config;
use crate::models::{Comment, Document};
use crate::status::CommentStatus;
use crate::wire::unescape_newlines;

const INDENT: &str = "    ";

pub struct Output {
    term: Term,
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    fn width(&self) -> usize {
        usize::from(self.term.size().1).clamp(40, 100)
    }

    /// Comment text as the reviewer typed it, wrapped under an indent.
    fn body(&self, text: &str) -> String {
        let options = textwrap::Options::new(self.width())
            .initial_indent(INDENT)
            .subsequent_indent(INDENT);
        textwrap::fill(&unescape_newlines(text), options)
    }

    fn status_label(status: Option<CommentStatus>) -> String {
        let label: &str = status.as_ref().map_or("(no status)", |s| s.as_ref());
        match status {
            Some(CommentStatus::Accepted) => style(label).green().to_string(),
            Some(CommentStatus::Rejected) => style(label).red().to_string(),
            Some(CommentStatus::Pending) => style(label).yellow().to_string(),
            None => style(label).dim().to_string(),
        }
    }

    fn visibility_label(is_published: bool) -> String {
        if is_published {
            style("published").green().to_string()
        } else {
            style("unpublished").dim().to_string()
        }
    }

    pub fn config(&self, config: &Config) -> Result<()> {
        if self.json {
            return self.print_json(config);
        }

        self.term
            .write_line(&format!("API URL: {}", style(&config.api_url).cyan()))?;
        self.term
            .write_line(&format!("  Timeout: {}s", config.timeout_secs))?;
        self.term
            .write_line(&format!("  Page size: {}", config.page_size))?;
        Ok(())
    }

    pub fn comment_list(&self, comments: &[Comment], scope: &Scope, page: u32) -> Result<()> {
        if self.json {
            return self.print_json(comments);
        }

        self.term.write_line(&format!(
            "Comments for {} (page {})",
            style(scope.describe()).cyan().bold(),
            page
        ))?;
        self.term.write_line("")?;

        if comments.is_empty() {
            self.term.write_line("No comments found.")?;
            return Ok(());
        }

        for comment in comments {
            self.print_comment_summary(comment)?;
            self.term.write_line("")?;
        }
        Ok(())
    }

    fn print_comment_summary(&self, comment: &Comment) -> Result<()> {
        let number = comment
            .comment_number
            .map(|n| format!("#{n} "))
            .unwrap_or_default();
        self.term.write_line(&format!(
            "{}{} [{}] {}",
            number,
            style(comment.id().unwrap_or("(unsaved)")).cyan().bold(),
            Self::status_label(comment.status()),
            Self::visibility_label(comment.is_published)
        ))?;
        self.term.write_line(&self.body(&comment.comment))?;

        if !comment.documents.is_empty() {
            self.term
                .write_line(&format!("  Documents: ({})", comment.documents.len()))?;
            for document in &comment.documents {
                self.term.write_line(&format!("    - {}", document.label()))?;
            }
        }
        Ok(())
    }

    pub fn comment_detail(&self, comment: &Comment) -> Result<()> {
        if self.json {
            return self.print_json(comment);
        }

        self.term.write_line(&format!(
            "Comment: {} [{}]",
            style(comment.id().unwrap_or("(unsaved)")).cyan().bold(),
            Self::status_label(comment.status())
        ))?;
        if let Some(number) = comment.comment_number {
            self.term.write_line(&format!("  Number: {number}"))?;
        }
        if let Some(period) = &comment.comment_period {
            self.term.write_line(&format!("  Comment period: {period}"))?;
        }
        if let Some(added) = &comment.date_added {
            self.term.write_line(&format!("  Added: {added}"))?;
        }
        self.term.write_line(&format!(
            "  Visibility: {}",
            Self::visibility_label(comment.is_published)
        ))?;
        self.term.write_line("")?;
        self.term.write_line(&self.body(&comment.comment))?;

        self.term.write_line("")?;
        self.term
            .write_line(&style("Review:").bold().to_string())?;
        if comment.reviewer_notes().is_empty() {
            self.term
                .write_line(&format!("  Notes: {}", style("(none)").dim()))?;
        } else {
            self.term.write_line("  Notes:")?;
            self.term.write_line(&self.body(comment.reviewer_notes()))?;
        }
        if let Some(date) = &comment.review.reviewer_date {
            self.term
                .write_line(&format!("  Reviewed: {}", style(date).dim()))?;
        }

        if !comment.documents.is_empty() {
            self.term.write_line("")?;
            self.term
                .write_line(&style("Documents:").bold().to_string())?;
            for document in &comment.documents {
                self.print_document(document)?;
            }
        }
        Ok(())
    }

    pub fn comment_count(&self, period_id: &str, count: u64) -> Result<()> {
        if self.json {
            return self.print_json(&json!({ "period": period_id, "count": count }));
        }

        self.term.write_line(&format!(
            "{} comment(s) in comment period {}",
            style(count).green().bold(),
            style(period_id).cyan()
        ))?;
        Ok(())
    }

    pub fn comment_created(&self, comment: &Comment) -> Result<()> {
        if self.json {
            return self.print_json(comment);
        }

        self.term.write_line(&format!(
            "{} {}",
            style("Submitted comment:").green(),
            style(comment.id().unwrap_or("(no id returned)")).cyan().bold()
        ))?;
        self.term.write_line(&self.body(&comment.comment))?;
        Ok(())
    }

    pub fn review_outcome(&self, outcome: &ReviewOutcome) -> Result<()> {
        if self.json {
            return self.print_json(outcome);
        }

        let comment = &outcome.comment;
        let id = comment.id().unwrap_or("(unsaved)");

        match &outcome.report {
            None => {
                self.term.write_line(&format!(
                    "{} {}",
                    style("Nothing to save for comment:").dim(),
                    style(id).cyan().bold()
                ))?;
            }
            Some(report) if report.is_clean() => {
                self.term.write_line(&format!(
                    "{} {}",
                    style("Saved comment:").green(),
                    style(id).cyan().bold()
                ))?;
            }
            Some(_) => {
                self.term.write_line(&format!(
                    "{} {}",
                    style("Saved comment with errors:").red(),
                    style(id).cyan().bold()
                ))?;
            }
        }

        self.term.write_line(&format!(
            "  Status: {}",
            Self::status_label(comment.status())
        ))?;
        self.term.write_line(&format!(
            "  Visibility: {}",
            Self::visibility_label(comment.is_published)
        ))?;
        if !comment.reviewer_notes().is_empty() {
            self.term.write_line("  Notes:")?;
            self.term.write_line(&self.body(comment.reviewer_notes()))?;
        }
        Ok(())
    }

    fn print_document(&self, document: &Document) -> Result<()> {
        self.term.write_line(&format!(
            "  {} {} [{}]",
            style(document.id().unwrap_or("(no id)")).cyan(),
            document.label(),
            Self::visibility_label(document.is_published)
        ))?;
        Ok(())
    }

    pub fn document_list(&self, documents: &[Document], owner: &Owner) -> Result<()> {
        if self.json {
            return self.print_json(documents);
        }

        self.term.write_line(&format!(
            "Documents for {}",
            style(owner.describe()).cyan().bold()
        ))?;

        if documents.is_empty() {
            self.term.write_line("No documents found.")?;
            return Ok(());
        }

        for document in documents {
            self.print_document(document)?;
        }
        Ok(())
    }

    pub fn document_visibility(&self, document: &Document) -> Result<()> {
        let verb = if document.is_published {
            style("Published document:").green()
        } else {
            style("Unpublished document:").yellow()
        };
        self.term.write_line(&format!(
            "{} {}",
            verb,
            style(document.id().unwrap_or("(no id)")).cyan().bold()
        ))?;
        self.term
            .write_line(&format!("  Name: {}", document.label()))?;
        Ok(())
    }
}
