// src/config.rs
//! Adapter configuration. Batch size, poll interval, tag cap and the source
//! table are fixed in code and cannot be set here.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::feed::StalePolicy;

pub const ENV_CONFIG_PATH: &str = "LEGEND_FEED_CONFIG";
pub const ENV_API_BASE: &str = "LEGEND_FEED_API_BASE";
pub const ENV_BIND: &str = "LEGEND_FEED_BIND";
pub const ENV_LOG_FORMAT: &str = "LEGEND_FEED_LOG_FORMAT";
pub const DEFAULT_CONFIG_PATH: &str = "config/feed.toml";

/// Log line format of the binary: compact text (default) or JSON lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Origin of the article API.
    pub api_base: String,
    /// Listen address of the host-document server.
    pub bind: String,
    /// URL prefix under which `legend/<id>.png` accents live.
    pub asset_prefix: String,
    /// Directory served under `/static`, if any.
    pub static_dir: Option<PathBuf>,
    pub stale_policy: StalePolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            bind: "127.0.0.1:8080".to_string(),
            asset_prefix: "/static/images".to_string(),
            static_dir: None,
            stale_policy: StalePolicy::LastWriteWins,
        }
    }
}

impl FeedConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing feed config toml")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading feed config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// 1) $LEGEND_FEED_CONFIG (must exist)
    /// 2) config/feed.toml
    /// 3) built-in defaults
    ///
    /// `LEGEND_FEED_API_BASE` / `LEGEND_FEED_BIND` override the result.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load_from(Path::new(DEFAULT_CONFIG_PATH))?
        } else {
            Self::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = non_empty_env(ENV_API_BASE) {
            self.api_base = v;
        }
        if let Some(v) = non_empty_env(ENV_BIND) {
            self.bind = v;
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
