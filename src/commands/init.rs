use anyhow::{Context, Result, bail};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::REVIEW_DIR;
use crate::config::Config;

pub fn run(api_url: String, stealth: bool) -> Result<()> {
    let review_dir = std::path::PathBuf::from(REVIEW_DIR);

    if review_dir.exists() {
        println!("Comment review already initialized in {}", review_dir.display());
        return Ok(());
    }

    let api_url = api_url.trim().to_string();
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        bail!("API URL must start with http:// or https://: {api_url}");
    }

    fs::create_dir_all(&review_dir).context("Failed to create .review directory")?;
    Config::new(api_url).write(&review_dir)?;

    if stealth {
        add_to_gitignore()?;
    }

    println!("Initialized comment review in {}", review_dir.display());
    Ok(())
}

/// Adds `.review` to git exclusions.
/// Prefers `.git/info/exclude` if it exists (truly local), otherwise uses `.gitignore`.
fn add_to_gitignore() -> Result<()> {
    let exclude_path = Path::new(".git/info/exclude");
    let gitignore_path = Path::new(".gitignore");

    let target_path = if exclude_path.exists() {
        exclude_path
    } else if gitignore_path.exists() || Path::new(".git").is_dir() {
        gitignore_path
    } else {
        // Not a git repo, skip
        return Ok(());
    };

    let existing = fs::read_to_string(target_path).unwrap_or_default();
    if existing
        .lines()
        .any(|line| line.trim() == REVIEW_DIR || line.trim() == ".review/")
    {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(target_path)
        .context("Failed to open git exclusion file")?;

    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{REVIEW_DIR}")?;

    println!("Added {REVIEW_DIR} to {}", target_path.display());
    Ok(())
}
