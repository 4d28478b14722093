// src/lib.rs

//! Read-only backend for the brand-visibility dashboard.
//!
//! A spreadsheet tab is fetched as a [`sheets::Grid`], the labelled sections
//! inside it are recovered by the extractors in [`extract`], and the records
//! are served as JSON by [`server`].

pub mod config;
pub mod extract;
pub mod report;
pub mod server;
pub mod sheets;

pub use config::Config;
pub use report::{Report, ReportBody};
pub use sheets::{Grid, SheetRange, SheetSource};
