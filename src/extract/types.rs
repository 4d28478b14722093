// src/extract/types.rs

use indexmap::IndexMap;
use serde::Serialize;

/// `/api/main-dashboard` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub overall_rate: f64,
    pub overall_change: f64,
    pub competitors: Vec<CompetitorRate>,
    pub chart_data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorRate {
    pub name: String,
    pub rate: f64,
}

/// One day of the mention-rate trend. `day` is the 1-based row ordinal below
/// the chart header, as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub day: String,
    pub user: f64,
    pub competitor: f64,
}

/// `/api/category/:categoryName` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBundle {
    /// Normalized header → raw value, in header order.
    pub metadata: IndexMap<String, String>,
    pub competitor_data: Vec<CompetitorTotal>,
    pub phrases: Vec<PhraseVisibility>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorTotal {
    pub name: String,
    pub value: f64,
    #[serde(rename = "color")]
    pub color_tag: ColorTag,
}

/// Chart color for a competitor series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorTag {
    #[serde(rename = "#ff6600")]
    Orange,
    #[serde(rename = "#004990")]
    Blue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseVisibility {
    pub phrase: String,
    pub user_visibility: f64,
    pub competitor_visibility: f64,
}

/// One data row of a flat table, keyed by the header row's cells.
pub type FlatRow = IndexMap<String, String>;

/// `/api/competitors` and `/api/metrics` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatTable {
    pub data: Vec<FlatRow>,
}
