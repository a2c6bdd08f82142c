//! CLI configuration.
//!
//! Reads/writes `~/.pubfeed/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use pubfeed_format::{LOCALES, RelativeTimeFormatter};

/// Display preferences for rendered feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Catalog locale (en, zh-CN, ja, es).
    pub locale: String,

    /// Offset used for "Yesterday" and year boundaries, in minutes east of UTC.
    pub utc_offset_minutes: i32,

    /// Hide replies from the top-level feed.
    pub hide_replies: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            utc_offset_minutes: 0,
            hide_replies: true,
        }
    }
}

impl FeedConfig {
    /// Default config file path: ~/.pubfeed/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: FeedConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !LOCALES.contains(&self.locale.as_str()) {
            anyhow::bail!(
                "Unsupported locale \"{}\" (expected one of: {}).",
                self.locale,
                LOCALES.join(", ")
            );
        }
        self.formatter()?;
        Ok(())
    }

    /// Relative-time formatter at the configured offset.
    pub fn formatter(&self) -> anyhow::Result<RelativeTimeFormatter> {
        RelativeTimeFormatter::with_offset_minutes(self.utc_offset_minutes).ok_or_else(|| {
            anyhow::anyhow!("UTC offset out of range: {} minutes", self.utc_offset_minutes)
        })
    }
}

/// Return the pubfeed config directory (~/.pubfeed).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".pubfeed")
}
