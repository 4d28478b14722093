// src/sheets/mod.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::{Credentials, SourceConfig};

pub mod client;
pub mod memory;
pub mod range;

pub use client::{AccessTokens, SheetsClient};
pub use memory::MemorySource;
pub use range::SheetRange;

/// A fetched range: ordered rows of ordered string cells.
///
/// The upstream trims trailing empty cells and may drop rows that carry no
/// cells at all, so rows are ragged. An absent cell and an empty cell are
/// both "no value" as far as [`cell`] is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Builds a grid from anything that looks like rows of string-ish cells.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// Index of the first row at or after `start` matching `pred`.
    pub fn position_from<P>(&self, start: usize, pred: P) -> Option<usize>
    where
        P: Fn(&[String]) -> bool,
    {
        self.rows
            .iter()
            .skip(start)
            .position(|row| pred(row.as_slice()))
            .map(|offset| start + offset)
    }

    /// Index of the first row matching `pred`.
    pub fn position<P>(&self, pred: P) -> Option<usize>
    where
        P: Fn(&[String]) -> bool,
    {
        self.position_from(0, pred)
    }
}

/// The cell at `idx`, or `None` when it is absent or empty.
pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str).filter(|c| !c.is_empty())
}

/// Anything that can hand back a range of a spreadsheet as a [`Grid`].
///
/// Failures are opaque: the caller only learns that the fetch did not
/// succeed. Implementations never retry and never return partial grids.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn values(&self, range: &SheetRange) -> Result<Grid>;
}

/// Build the reader described by `config`. Called once at startup; the
/// returned handle is shared by every request.
pub async fn connect(config: &SourceConfig) -> Result<Arc<dyn SheetSource>> {
    match config {
        SourceConfig::Fixture(path) => {
            info!(path = %path.display(), "using fixture reader");
            let source = MemorySource::from_json_file(path)?;
            Ok(Arc::new(source))
        }
        SourceConfig::Sheets {
            spreadsheet_id,
            api_base,
            credentials,
        } => {
            let tokens = match credentials {
                Credentials::Json(json) => AccessTokens::service_account_json(json).await?,
                Credentials::KeyFile(path) => AccessTokens::service_account_file(path).await?,
                Credentials::AccessToken(token) => AccessTokens::Fixed(token.clone()),
            };
            let http = reqwest::Client::builder()
                .gzip(true)
                .build()
                .context("building HTTP client")?;
            info!(%spreadsheet_id, api_base = %api_base, "using Google Sheets reader");
            Ok(Arc::new(SheetsClient::new(
                http,
                api_base.clone(),
                spreadsheet_id.clone(),
                tokens,
            )))
        }
    }
}
