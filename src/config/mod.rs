use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Deserialize;

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable selecting the backend base URL
pub const API_URL_ENV: &str = "DATADASH_API_URL";

/// Environment variable holding a tracing filter directive
pub const LOG_FILTER_ENV: &str = "DATADASH_LOG";

static BASE_URL: OnceLock<String> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Backend base URL, overridden by the environment and CLI
    #[serde(default)]
    pub api_url: Option<String>,

    /// Whether the sidebar starts open
    #[serde(default)]
    pub sidebar_open: Option<bool>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub log_filter: Option<String>,
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

/// Parse a config document, falling back to defaults when it is malformed
pub fn parse(content: &str) -> Config {
    toml::from_str::<Config>(content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("DATADASH_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("datadash").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("datadash").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "datadash", "datadash")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("datadash"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("datadash"));
    }
    directories::ProjectDirs::from("io", "datadash", "datadash")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn default_log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("datadash.log"))
}

/// Pick the backend base URL: CLI flag, then environment, then config file,
/// then [`DEFAULT_API_URL`]. Empty or blank values count as unset.
pub fn resolve_base_url(cli: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    [cli, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

/// Fix the process-wide base URL. The first call wins; later calls return
/// the value already pinned.
pub fn pin_base_url(url: impl Into<String>) -> &'static str {
    let url = url.into();
    BASE_URL.get_or_init(|| url).as_str()
}

/// Process-wide base URL, resolved from the environment on first use if
/// nothing was pinned
pub fn base_url() -> &'static str {
    BASE_URL
        .get_or_init(|| {
            let env = std::env::var(API_URL_ENV).ok();
            resolve_base_url(None, env.as_deref(), None)
        })
        .as_str()
}
