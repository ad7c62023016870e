//! Runtime settings from the environment (and `.env`).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_STATE_FILE: &str = "data/aop_state.json";
pub const DEFAULT_UPDATED_BY: &str = "cli";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Local JSON state file, used when no remote server is configured.
    pub state_file: PathBuf,
    /// Base URL of the dashboard server, e.g. `http://localhost:3001`.
    pub remote_url: Option<String>,
    /// Actor recorded on save.
    pub updated_by: String,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            remote_url: None,
            updated_by: DEFAULT_UPDATED_BY.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_map(&vars)
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let remote_url = match non_empty("AOP_REMOTE_URL") {
            Some(url) => Some(parse_remote_url(&url)?),
            None => None,
        };

        let defaults = Settings::default();
        Ok(Self {
            state_file: non_empty("AOP_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
            remote_url,
            updated_by: non_empty("AOP_UPDATED_BY").unwrap_or(defaults.updated_by),
            log_filter: non_empty("AOP_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

/// Accept `http(s)://host[:port][/prefix]`; trailing slashes are dropped.
pub fn parse_remote_url(raw: &str) -> Result<String, AppError> {
    let url = raw.trim().trim_end_matches('/');
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    let host = url.split("://").nth(1).unwrap_or("");
    if !has_scheme || host.is_empty() {
        return Err(AppError::invalid_input(format!(
            "Invalid remote URL '{raw}': expected http(s)://host[:port]."
        )));
    }
    Ok(url.to_string())
}
