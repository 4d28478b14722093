// src/sheets/memory.rs

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::{collections::HashMap, fs, path::Path};
use tracing::{debug, instrument};

use super::{Grid, SheetRange, SheetSource};

/// An in-memory spreadsheet: tab name → grid.
///
/// Backs offline development (`SHEETS_FIXTURE`) and the handler tests. The
/// column span of a range is ignored; the whole tab is returned.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tabs: HashMap<String, Grid>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(mut self, tab: impl Into<String>, grid: Grid) -> Self {
        self.insert(tab, grid);
        self
    }

    pub fn insert(&mut self, tab: impl Into<String>, grid: Grid) {
        self.tabs.insert(tab.into(), grid);
    }

    /// Load `{ "<tab>": [[cell, …], …], … }` from disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let tabs: HashMap<String, Grid> = serde_json::from_str(&text)
            .with_context(|| format!("parsing fixture {}", path.display()))?;
        debug!(tabs = tabs.len(), "loaded fixture");
        Ok(Self { tabs })
    }
}

#[async_trait]
impl SheetSource for MemorySource {
    #[instrument(level = "debug", skip(self), fields(range = %range))]
    async fn values(&self, range: &SheetRange) -> Result<Grid> {
        self.tabs
            .get(range.tab())
            .cloned()
            .ok_or_else(|| anyhow!("Unable to parse range: {}", range))
    }
}
