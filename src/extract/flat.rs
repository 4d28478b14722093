// src/extract/flat.rs

use tracing::{debug, instrument};

use super::section::{SectionScan, Step};
use super::types::{FlatRow, FlatTable};
use crate::sheets::{cell, Grid};

/// First-cell labels that mark a row as layout rather than data.
#[derive(Debug, Clone, Copy)]
pub struct TableLabels {
    pub name: &'static str,
    pub non_data: &'static [&'static str],
}

pub const COMPETITOR_LABELS: TableLabels = TableLabels {
    name: "competitors",
    non_data: &["COMPETITOR INFORMATION", "NOTES:", "Competitor Name"],
};

pub const METRIC_LABELS: TableLabels = TableLabels {
    name: "metrics",
    non_data: &["METRICS DATA", "METRIC VALUES", "NOTES:", "Metric Name"],
};

impl TableLabels {
    /// Blank rows, bullet lines and known labels carry no data.
    fn is_non_data(&self, row: &[String]) -> bool {
        match cell(row, 0) {
            None => true,
            Some(first) => first.starts_with('-') || self.non_data.contains(&first),
        }
    }
}

/// Row 0 is taken as the header row, whatever it holds. Every later row
/// that survives the filters becomes one object with a field per header
/// cell; cells past the end of a short row read as `""`.
#[instrument(
    level = "debug",
    skip(grid, labels),
    fields(rows = grid.len(), table = labels.name)
)]
pub fn extract_flat_table(grid: &Grid, labels: &TableLabels) -> FlatTable {
    let Some(headers) = grid.row(0) else {
        debug!("empty grid; no table");
        return FlatTable::default();
    };

    let data = SectionScan::new(grid, labels.name, |_: &[String]| true)
        .collect(|_, row| {
            if labels.is_non_data(row) || row == headers {
                return Step::Skip;
            }
            let obj: FlatRow = headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    (header.clone(), row.get(idx).cloned().unwrap_or_default())
                })
                .collect();
            Step::Take(obj)
        })
        .rows;

    FlatTable { data }
}
