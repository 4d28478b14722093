// src/report.rs

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::extract::{
    extract_category, extract_dashboard, extract_flat_table, CategoryBundle, DashboardSummary,
    FlatTable, COMPETITOR_LABELS, METRIC_LABELS,
};
use crate::sheets::{Grid, SheetRange, SheetSource};

pub const DASHBOARD_TAB: &str = "Main Dashboard";
pub const COMPETITORS_TAB: &str = "Competitors";
pub const METRICS_TAB: &str = "Metrics";

/// One of the dashboard's reports: which tab to read and how to parse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    MainDashboard,
    Competitors,
    Metrics,
    /// A category tab, named by the category itself.
    Category(String),
}

/// An extracted report, serialized as its bare record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportBody {
    Dashboard(DashboardSummary),
    Table(FlatTable),
    Category(CategoryBundle),
}

impl Report {
    pub fn range(&self) -> SheetRange {
        match self {
            Self::MainDashboard => SheetRange::full_width(DASHBOARD_TAB),
            Self::Competitors => SheetRange::full_width(COMPETITORS_TAB),
            Self::Metrics => SheetRange::full_width(METRICS_TAB),
            Self::Category(name) => SheetRange::full_width(name.as_str()),
        }
    }

    pub fn extract(&self, grid: &Grid) -> ReportBody {
        match self {
            Self::MainDashboard => ReportBody::Dashboard(extract_dashboard(grid)),
            Self::Competitors => ReportBody::Table(extract_flat_table(grid, &COMPETITOR_LABELS)),
            Self::Metrics => ReportBody::Table(extract_flat_table(grid, &METRIC_LABELS)),
            Self::Category(_) => ReportBody::Category(extract_category(grid)),
        }
    }

    /// Fetch a fresh grid and extract it. Only the fetch can fail.
    #[instrument(level = "info", skip(source))]
    pub async fn load(&self, source: &dyn SheetSource) -> Result<ReportBody> {
        let range = self.range();
        let grid = source
            .values(&range)
            .await
            .with_context(|| format!("fetching {}", range))?;
        debug!(rows = grid.len(), "extracting");
        Ok(self.extract(&grid))
    }
}
