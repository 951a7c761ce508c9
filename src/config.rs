// Fetcher configuration, loaded from `config.toml` under the user's config
// directory and overridable through environment variables.

use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.rbxstats.xyz/api/";
pub const DEFAULT_USER_AGENT: &str = "rbxstats-api-fetcher/1.0 (Rust)";

pub const ENV_API_KEY: &str = "RBXSTATS_API_KEY";
pub const ENV_BASE_URL: &str = "RBXSTATS_BASE_URL";
pub const ENV_OUTPUT_ROOT: &str = "RBXSTATS_OUTPUT_ROOT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Base URL every endpoint is appended to.
    pub base_url: String,
    /// Sent as the `api` query parameter on every request.
    pub api_key: String,
    pub user_agent: String,
    /// Directory the timestamped snapshot folders are created in.
    pub output_root: PathBuf,
    /// Additional request headers, sent after `Accept` and `User-Agent`.
    pub extra_headers: BTreeMap<String, String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_root: PathBuf::from("."),
            extra_headers: BTreeMap::new(),
        }
    }
}

impl FetcherConfig {
    /// Headers sent with every fetch request.
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        for (k, v) in &self.extra_headers {
            headers.insert(k.clone(), v.clone());
        }
        headers
    }

    /// Apply environment overrides given a lookup function.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(root) = lookup(ENV_OUTPUT_ROOT).filter(|r| !r.trim().is_empty()) {
            self.output_root = PathBuf::from(root);
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or(FetchError::NoConfigDir)?;
    Ok(dir.join("rbxstats-fetcher").join("config.toml"))
}

/// Load configuration from disk, creating a default file if none exists,
/// then apply environment overrides.
pub fn load_or_init() -> Result<FetcherConfig> {
    let path = config_path()?;
    let mut cfg = load_or_init_at(&path)?;
    cfg.apply_overrides(|name| std::env::var(name).ok());
    Ok(cfg)
}

pub fn load_or_init_at(path: &std::path::Path) -> Result<FetcherConfig> {
    if !path.exists() {
        let default_cfg = FetcherConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(FetchError::io(parent))?;
        }
        fs::write(path, toml).map_err(FetchError::io(path))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).map_err(FetchError::io(path))?;
    let cfg: FetcherConfig = toml::from_str(&data).map_err(|source| FetchError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FetcherConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.api_key.is_empty());
        assert_eq!(cfg.output_root, PathBuf::from("."));
        let headers = cfg.headers();
        assert_eq!(headers["Accept"], "application/json");
        assert_eq!(headers["User-Agent"], DEFAULT_USER_AGENT);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml = r#"
            api_key = "secret"

            [extra_headers]
            X-Trace = "1"
        "#;
        let cfg: FetcherConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.api_key, "secret");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.headers()["X-Trace"], "1");
    }

    #[test]
    fn env_overrides_win_over_file() {
        let mut cfg = FetcherConfig::default();
        cfg.apply_overrides(|name| match name {
            ENV_API_KEY => Some("from-env".into()),
            ENV_BASE_URL => Some("   ".into()),
            ENV_OUTPUT_ROOT => Some("/tmp/snapshots".into()),
            _ => None,
        });
        assert_eq!(cfg.api_key, "from-env");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.output_root, PathBuf::from("/tmp/snapshots"));
    }

    #[test]
    fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg, FetcherConfig::default());
        assert!(path.exists());
        let reloaded = load_or_init_at(&path).unwrap();
        assert_eq!(reloaded, cfg);
    }

    #[test]
    fn load_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(matches!(err, FetchError::ConfigParse { .. }));
    }
}
