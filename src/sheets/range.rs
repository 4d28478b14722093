// src/sheets/range.rs

use std::fmt;

/// A tab plus a column span, rendered in A1 notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    tab: String,
    first_column: String,
    last_column: String,
}

impl SheetRange {
    pub fn columns(tab: impl Into<String>, first: &str, last: &str) -> Self {
        Self {
            tab: tab.into(),
            first_column: first.to_owned(),
            last_column: last.to_owned(),
        }
    }

    /// Columns `A` through `Z` of `tab`.
    pub fn full_width(tab: impl Into<String>) -> Self {
        Self::columns(tab, "A", "Z")
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    /// `'<tab>'!<first>:<last>`, with quotes inside the tab name doubled so
    /// the name can never terminate the quoted section early.
    pub fn to_a1(&self) -> String {
        format!(
            "'{}'!{}:{}",
            self.tab.replace('\'', "''"),
            self.first_column,
            self.last_column
        )
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}
