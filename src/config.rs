// src/config.rs

use anyhow::{bail, Context, Result};
use std::{env, fmt, path::PathBuf};
use url::Url;

use crate::sheets::client::DEFAULT_API_BASE;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// How the reader authenticates against the Sheets API.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Service-account key as a JSON string (`GOOGLE_CREDENTIALS`).
    Json(String),
    /// Pre-minted bearer token (`GOOGLE_ACCESS_TOKEN`).
    AccessToken(String),
    /// Service-account key file on disk.
    KeyFile(PathBuf),
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(_) => f.write_str("Json(<redacted>)"),
            Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
            Self::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Sheets {
        spreadsheet_id: String,
        api_base: Url,
        credentials: Credentials,
    },
    /// JSON file of tab → grid, served instead of the live spreadsheet.
    Fixture(PathBuf),
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub source: SourceConfig,
    /// Category tabs the category endpoint may read. Empty means any name
    /// that passes the syntactic checks.
    pub category_tabs: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {:?}", raw))?,
            None => DEFAULT_PORT,
        };
        let log_level = get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());

        let source = if let Some(path) = get("SHEETS_FIXTURE") {
            SourceConfig::Fixture(PathBuf::from(path))
        } else {
            let Some(spreadsheet_id) = get("GOOGLE_SHEETS_SPREADSHEET_ID") else {
                bail!("GOOGLE_SHEETS_SPREADSHEET_ID must be set (or SHEETS_FIXTURE for offline use)")
            };
            let api_base = get("SHEETS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
            let api_base = Url::parse(&api_base)
                .with_context(|| format!("SHEETS_API_BASE is not a URL: {:?}", api_base))?;
            let credentials = if let Some(json) = get("GOOGLE_CREDENTIALS") {
                Credentials::Json(json)
            } else if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
                Credentials::AccessToken(token)
            } else {
                Credentials::KeyFile(PathBuf::from(
                    get("GOOGLE_CREDENTIALS_FILE")
                        .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_owned()),
                ))
            };
            SourceConfig::Sheets {
                spreadsheet_id: spreadsheet_id.trim().to_owned(),
                api_base,
                credentials,
            }
        };

        let category_tabs = get("CATEGORY_TABS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port,
            log_level,
            source,
            category_tabs,
        })
    }
}
