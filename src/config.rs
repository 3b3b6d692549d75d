use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Title shown on the workspace root listing
    #[serde(default = "default_title")]
    pub title: String,

    /// syntect theme used for source previews
    #[serde(default = "default_highlight_theme")]
    pub highlight_theme: String,

    /// Largest file (in bytes) rendered as a text or Markdown preview
    #[serde(default = "default_preview_max_bytes")]
    pub preview_max_bytes: u64,
}

fn default_title() -> String {
    "Workspace".to_string()
}

fn default_highlight_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_preview_max_bytes() -> u64 {
    1024 * 1024 // 1 MB
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            highlight_theme: default_highlight_theme(),
            preview_max_bytes: default_preview_max_bytes(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}
