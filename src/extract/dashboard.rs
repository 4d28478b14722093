// src/extract/dashboard.rs

use tracing::{debug, instrument};

use super::section::{SectionScan, Step};
use super::types::{ChartPoint, CompetitorRate, DashboardSummary};
use super::{first_cell_is, number_or, parse_number};
use crate::sheets::{cell, Grid};

pub const OVERALL_RATE_LABEL: &str = "Overall Mention Rate (%)";
pub const OVERALL_CHANGE_LABEL: &str = "Overall Mention Rate Change (%)";
pub const COMPETITOR_HEADER: &str = "Competitor Name";
pub const CHART_DATA_LABEL: &str = "CHART DATA";

/// The account's own brand; first chart series.
pub const USER_BRAND: &str = "Lowe's";
/// The tracked competitor; second chart series.
pub const COMPETITOR_BRAND: &str = "Home Depot";

const TRACKED_BRANDS: [&str; 2] = [USER_BRAND, COMPETITOR_BRAND];

const DEFAULT_OVERALL_RATE: f64 = 22.0;
const DEFAULT_OVERALL_CHANGE: f64 = 7.0;

/// Used when the competitor section yields nothing. The chart series has no
/// such fallback and stays empty.
fn fallback_competitors() -> Vec<CompetitorRate> {
    vec![
        CompetitorRate {
            name: COMPETITOR_BRAND.to_owned(),
            rate: 84.0,
        },
        CompetitorRate {
            name: USER_BRAND.to_owned(),
            rate: 56.0,
        },
    ]
}

/// Parse the "Main Dashboard" tab.
#[instrument(level = "debug", skip(grid), fields(rows = grid.len()))]
pub fn extract_dashboard(grid: &Grid) -> DashboardSummary {
    let overall_rate = value_below(grid, OVERALL_RATE_LABEL, 0, DEFAULT_OVERALL_RATE);
    let overall_change = value_below(grid, OVERALL_CHANGE_LABEL, 1, DEFAULT_OVERALL_CHANGE);

    let mut competitors = competitor_rates(grid);
    if competitors.is_empty() {
        debug!("no competitor rates found; using fallback pair");
        competitors = fallback_competitors();
    }

    DashboardSummary {
        overall_rate,
        overall_change,
        competitors,
        chart_data: chart_points(grid),
    }
}

/// Number in column `col` of the row directly below the row labelled `label`.
fn value_below(grid: &Grid, label: &str, col: usize, default: f64) -> f64 {
    let value = grid
        .position(|row| first_cell_is(row, label))
        .and_then(|idx| grid.row(idx + 1))
        .and_then(|row| cell(row, col));
    if value.is_none() {
        debug!(label, default, "labelled value missing; using default");
    }
    number_or(value, default)
}

/// Rows after the `Competitor Name` header. Only tracked brands are read; any
/// other name, a blank, or `CHART DATA` ends the section.
fn competitor_rates(grid: &Grid) -> Vec<CompetitorRate> {
    SectionScan::new(grid, "competitors", |row: &[String]| {
        first_cell_is(row, COMPETITOR_HEADER)
    })
    .collect(|_, row| match cell(row, 0) {
        Some(name) if TRACKED_BRANDS.contains(&name) => Step::Take(CompetitorRate {
            name: name.to_owned(),
            rate: number_or(cell(row, 1), 0.0),
        }),
        _ => Step::Stop,
    })
    .rows
}

/// Rows after the `[USER_BRAND, COMPETITOR_BRAND]` header, while both cells
/// are numbers. The first row that is not ends the series.
fn chart_points(grid: &Grid) -> Vec<ChartPoint> {
    SectionScan::new(grid, "chart data", |row: &[String]| {
        cell(row, 0) == Some(USER_BRAND) && cell(row, 1) == Some(COMPETITOR_BRAND)
    })
    .collect(|ordinal, row| {
        let user = cell(row, 0).and_then(parse_number);
        let competitor = cell(row, 1).and_then(parse_number);
        match (user, competitor) {
            (Some(user), Some(competitor)) => Step::Take(ChartPoint {
                day: ordinal.to_string(),
                user,
                competitor,
            }),
            _ => Step::Stop,
        }
    })
    .rows
}
