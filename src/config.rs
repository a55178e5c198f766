use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::api::HttpApi;
use crate::service::DEFAULT_PAGE_SIZE;

pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Atomically write content to a file using a temporary file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp = path.with_extension("toml.tmp");
    let mut file = File::create(&temp)
        .with_context(|| format!("Failed to create temporary file: {}", temp.display()))?;
    file.lock_exclusive()
        .context("Failed to acquire file lock")?;
    file.write_all(content)
        .context("Failed to write file content")?;
    file.sync_all().context("Failed to sync file")?;
    file.unlock().context("Failed to unlock file")?;
    fs::rename(&temp, path).with_context(|| format!("Failed to rename to {}", path.display()))?;
    Ok(())
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Connection settings stored in `.review/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Config {
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn file_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load the config from an existing `.review/` directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::file_path(dir);
        if !path.exists() {
            bail!("Config file does not exist: {}", path.display());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if config.api_url.trim().is_empty() {
            bail!("api_url is empty in {}", path.display());
        }
        if config.page_size == 0 {
            bail!("page_size must be at least 1 in {}", path.display());
        }
        Ok(config)
    }

    pub fn write(&self, dir: &Path) -> Result<()> {
        let content = toml::to_string(self).context("Failed to serialize config")?;
        atomic_write(&Self::file_path(dir), content.as_bytes())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn http_api(&self) -> Result<HttpApi> {
        HttpApi::new(&self.api_url, self.timeout())
            .with_context(|| format!("Failed to build HTTP client for {}", self.api_url))
    }
}
