// src/sheets/client.rs

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument};
use url::Url;
use yup_oauth2::authenticator::{Authenticator, DefaultHyperClient, HyperClientBuilder};
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use super::{Grid, SheetRange, SheetSource};

pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

type ServiceAccountAuth = Authenticator<<DefaultHyperClient as HyperClientBuilder>::Connector>;

/// Where bearer tokens for the Sheets API come from.
pub enum AccessTokens {
    /// Tokens minted (and refreshed) from a service-account key.
    ServiceAccount(ServiceAccountAuth),
    /// A token obtained elsewhere, used verbatim.
    Fixed(String),
}

impl AccessTokens {
    pub async fn service_account_json(json: &str) -> Result<Self> {
        let key = yup_oauth2::parse_service_account_key(json)
            .context("parsing service account credentials JSON")?;
        Self::from_key(key).await
    }

    pub async fn service_account_file(path: &Path) -> Result<Self> {
        let key = yup_oauth2::read_service_account_key(path)
            .await
            .with_context(|| format!("reading service account key {}", path.display()))?;
        Self::from_key(key).await
    }

    async fn from_key(key: ServiceAccountKey) -> Result<Self> {
        let auth = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .context("building service account authenticator")?;
        Ok(Self::ServiceAccount(auth))
    }

    async fn bearer(&self) -> Result<String> {
        match self {
            Self::Fixed(token) => Ok(token.clone()),
            Self::ServiceAccount(auth) => {
                let token = auth
                    .token(&[READONLY_SCOPE])
                    .await
                    .context("requesting Sheets access token")?;
                token
                    .token()
                    .map(str::to_owned)
                    .context("token response carried no access token")
            }
        }
    }
}

/// Body of `spreadsheets.values.get`. `values` is omitted entirely when the
/// range is empty.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Reads ranges from one spreadsheet through the Sheets v4 REST API.
pub struct SheetsClient {
    http: Client,
    api_base: Url,
    spreadsheet_id: String,
    tokens: AccessTokens,
}

impl SheetsClient {
    pub fn new(http: Client, api_base: Url, spreadsheet_id: String, tokens: AccessTokens) -> Self {
        Self {
            http,
            api_base,
            spreadsheet_id,
            tokens,
        }
    }

    fn values_url(&self, range: &SheetRange) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base {} cannot carry a path", self.api_base))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                range.to_a1().as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for SheetsClient {
    #[instrument(level = "info", skip(self), fields(range = %range))]
    async fn values(&self, range: &SheetRange) -> Result<Grid> {
        let url = self.values_url(range)?;
        let token = self.tokens.bearer().await?;
        debug!(%url, "fetching values");

        let body: ValueRange = self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .json()
            .await
            .with_context(|| format!("Decoding values from {}", url))?;

        let grid = Grid::new(
            body.values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
        );
        debug!(rows = grid.len(), "fetched values");
        Ok(grid)
    }
}

/// Formatted values arrive as strings, but unformatted renders can carry
/// numbers, booleans or nulls.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_owned(),
        Value::Bool(false) => "FALSE".to_owned(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
