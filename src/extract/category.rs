// src/extract/category.rs

use indexmap::IndexMap;
use tracing::{debug, instrument};

use super::dashboard::COMPETITOR_BRAND;
use super::section::{SectionScan, Step};
use super::types::{CategoryBundle, ColorTag, CompetitorTotal, PhraseVisibility};
use super::{first_cell_is, has_marker, normalize_key, number_or};
use crate::sheets::{cell, Grid};

pub const METADATA_MARKER: &str = "CATEGORY METADATA";
pub const TOTALS_MARKER: &str = "COMPETITOR TOTALS";
pub const PROMPTS_MARKER: &str = "PROMPT QUESTIONS";

const TOTALS_HEADER: &str = "Competitor Name";
const PROMPTS_HEADER: &str = "Prompt Question";
const NOTES_MARKER: &str = "NOTES";

/// Parse a category tab. The three sections are independent; any of them
/// may be missing and comes back empty.
#[instrument(level = "debug", skip(grid), fields(rows = grid.len()))]
pub fn extract_category(grid: &Grid) -> CategoryBundle {
    CategoryBundle {
        metadata: metadata(grid),
        competitor_data: competitor_totals(grid),
        phrases: phrases(grid),
    }
}

/// Header names sit two rows below the marker and their values one row
/// below that. Empty headers are dropped; missing values become `""`.
fn metadata(grid: &Grid) -> IndexMap<String, String> {
    let Some(marker) = grid.position(|row| has_marker(row, METADATA_MARKER)) else {
        debug!("no category metadata section");
        return IndexMap::new();
    };
    let headers = grid.row(marker + 2).unwrap_or_default();
    let values = grid.row(marker + 3).unwrap_or_default();

    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.is_empty())
        .map(|(idx, header)| {
            let value = values.get(idx).cloned().unwrap_or_default();
            (normalize_key(header), value)
        })
        .collect()
}

/// Rows after the `Competitor Name` sub-header below the totals marker,
/// until a blank first cell or the prompts marker.
fn competitor_totals(grid: &Grid) -> Vec<CompetitorTotal> {
    let Some(marker) = grid.position(|row| has_marker(row, TOTALS_MARKER)) else {
        debug!("no competitor totals section");
        return Vec::new();
    };

    SectionScan::new(grid, "competitor totals", |row: &[String]| {
        first_cell_is(row, TOTALS_HEADER)
    })
    .starting_at(marker + 1)
    .collect(|_, row| match cell(row, 0) {
        None | Some(PROMPTS_MARKER) => Step::Stop,
        Some(name) => Step::Take(CompetitorTotal {
            name: name.to_owned(),
            value: number_or(cell(row, 1), 0.0),
            color_tag: color_for(name),
        }),
    })
    .rows
}

fn color_for(name: &str) -> ColorTag {
    if name == COMPETITOR_BRAND {
        ColorTag::Orange
    } else {
        ColorTag::Blue
    }
}

/// Rows after the `Prompt Question` sub-header below the prompts marker,
/// until a blank first cell or one mentioning `NOTES`.
fn phrases(grid: &Grid) -> Vec<PhraseVisibility> {
    let Some(marker) = grid.position(|row| has_marker(row, PROMPTS_MARKER)) else {
        debug!("no prompt questions section");
        return Vec::new();
    };

    SectionScan::new(grid, "prompt questions", |row: &[String]| {
        first_cell_is(row, PROMPTS_HEADER)
    })
    .starting_at(marker + 1)
    .collect(|_, row| match cell(row, 0) {
        Some(phrase) if !phrase.contains(NOTES_MARKER) => Step::Take(PhraseVisibility {
            phrase: phrase.to_owned(),
            user_visibility: number_or(cell(row, 1), 0.0),
            competitor_visibility: number_or(cell(row, 2), 0.0),
        }),
        _ => Step::Stop,
    })
    .rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows(vec![
            vec!["CATEGORY METADATA"],
            vec!["Outdoor Living"],
            vec![
                "Brand Visibility (%)",
                "Brand Visibility Change (%)",
                "",
                "Keywords",
                "Links Clicked",
            ],
            vec!["42", "5", "ignored", "120"],
            vec![],
            vec!["COMPETITOR TOTALS"],
            vec!["Competitor Name", "Total"],
            vec!["Home Depot", "84"],
            vec!["Lowe's", "56"],
            vec!["Menards", "x"],
            vec!["PROMPT QUESTIONS"],
            vec!["Prompt Question", "Lowe's", "Home Depot"],
            vec!["best patio furniture", "40", "60"],
            vec!["outdoor rugs", "35"],
            vec!["NOTES: refreshed weekly"],
            vec!["not a phrase", "1", "2"],
        ])
    }

    #[test]
    fn extracts_all_three_sections() {
        let bundle = extract_category(&sample());

        let keys: Vec<_> = bundle.metadata.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "brandvisibility",
                "brandvisibilitychange",
                "keywords",
                "linksclicked"
            ]
        );
        assert_eq!(bundle.metadata["brandvisibility"], "42");
        assert_eq!(bundle.metadata["keywords"], "120");
        assert_eq!(bundle.metadata["linksclicked"], "");

        assert_eq!(
            bundle.competitor_data,
            vec![
                CompetitorTotal {
                    name: "Home Depot".into(),
                    value: 84.0,
                    color_tag: ColorTag::Orange
                },
                CompetitorTotal {
                    name: "Lowe's".into(),
                    value: 56.0,
                    color_tag: ColorTag::Blue
                },
                CompetitorTotal {
                    name: "Menards".into(),
                    value: 0.0,
                    color_tag: ColorTag::Blue
                },
            ]
        );

        assert_eq!(
            bundle.phrases,
            vec![
                PhraseVisibility {
                    phrase: "best patio furniture".into(),
                    user_visibility: 40.0,
                    competitor_visibility: 60.0
                },
                PhraseVisibility {
                    phrase: "outdoor rugs".into(),
                    user_visibility: 35.0,
                    competitor_visibility: 0.0
                },
            ]
        );
    }

    #[test]
    fn missing_sections_are_empty_not_errors() {
        let bundle = extract_category(&Grid::from_rows(vec![vec!["just a title"]]));
        assert!(bundle.metadata.is_empty());
        assert!(bundle.competitor_data.is_empty());
        assert!(bundle.phrases.is_empty());

        let bundle = extract_category(&Grid::default());
        assert!(bundle.metadata.is_empty());
    }

    #[test]
    fn sections_do_not_depend_on_each_other() {
        let grid = Grid::from_rows(vec![
            vec!["Prompt Questions for Kitchen"],
            vec!["Prompt Question"],
            vec!["kitchen faucets", "12", "30"],
        ]);
        let bundle = extract_category(&grid);
        assert!(bundle.metadata.is_empty());
        assert!(bundle.competitor_data.is_empty());
        assert_eq!(bundle.phrases.len(), 1);
        assert_eq!(bundle.phrases[0].competitor_visibility, 30.0);
    }

    #[test]
    fn metadata_marker_without_rows_is_empty() {
        let grid = Grid::from_rows(vec![vec!["CATEGORY METADATA"], vec!["desc"]]);
        assert!(extract_category(&grid).metadata.is_empty());
    }

    #[test]
    fn totals_stop_at_blank_row() {
        let grid = Grid::from_rows(vec![
            vec!["COMPETITOR TOTALS"],
            vec!["Competitor Name"],
            vec!["Home Depot", "10"],
            vec![],
            vec!["Lowe's", "20"],
        ]);
        assert_eq!(extract_category(&grid).competitor_data.len(), 1);
    }

    #[test]
    fn totals_stop_only_on_the_exact_prompts_label() {
        let grid = Grid::from_rows(vec![
            vec!["COMPETITOR TOTALS"],
            vec!["Competitor Name"],
            vec!["Home Depot", "10"],
            vec!["Prompt Questions for Kitchen"],
            vec!["Prompt Question"],
            vec!["faucets", "12", "30"],
        ]);
        let bundle = extract_category(&grid);
        let names: Vec<_> = bundle
            .competitor_data
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Home Depot",
                "Prompt Questions for Kitchen",
                "Prompt Question",
                "faucets"
            ]
        );
        // The prompts section still finds its own marker by containment.
        assert_eq!(bundle.phrases.len(), 1);
        assert_eq!(bundle.phrases[0].phrase, "faucets");
    }

    #[test]
    fn totals_header_before_marker_is_ignored() {
        let grid = Grid::from_rows(vec![
            vec!["Competitor Name"],
            vec!["Stray", "1"],
            vec!["COMPETITOR TOTALS"],
            vec!["Competitor Name"],
            vec!["Home Depot", "10"],
        ]);
        let totals = extract_category(&grid).competitor_data;
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].name, "Home Depot");
    }

    #[test]
    fn color_tags_serialize_as_hex() {
        let json = serde_json::to_string(&CompetitorTotal {
            name: "Home Depot".into(),
            value: 1.0,
            color_tag: ColorTag::Orange,
        })
        .unwrap();
        assert_eq!(json, r##"{"name":"Home Depot","value":1.0,"color":"#ff6600"}"##);
    }
}
