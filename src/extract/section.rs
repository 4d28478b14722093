// src/extract/section.rs

use tracing::trace;

use crate::sheets::Grid;

/// Verdict for one row inside a section.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    /// Emit a record and keep scanning.
    Take(T),
    /// Ignore this row and keep scanning.
    Skip,
    /// The section ends here; this row is not consumed.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    SeekingHeader,
    InSection { header: usize },
    Done,
}

/// Rows collected from one section, plus where its header was found.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRows<T> {
    pub header: Option<usize>,
    pub rows: Vec<T>,
}

/// Walks a grid as `SeekingHeader → InSection → Done`.
///
/// The first row at or after `start` accepted by `is_header` opens the
/// section. Each following row is handed to the step function together with
/// its 1-based ordinal below the header, and the returned [`Step`] decides
/// whether it is taken, skipped, or closes the section. Running off the end
/// of the grid also closes it.
pub struct SectionScan<'g, H> {
    grid: &'g Grid,
    name: &'static str,
    start: usize,
    is_header: H,
}

impl<'g, H> SectionScan<'g, H>
where
    H: Fn(&[String]) -> bool,
{
    pub fn new(grid: &'g Grid, name: &'static str, is_header: H) -> Self {
        Self {
            grid,
            name,
            start: 0,
            is_header,
        }
    }

    /// Only look for the header at or after row `start`.
    pub fn starting_at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn collect<T, F>(self, mut step: F) -> SectionRows<T>
    where
        F: FnMut(usize, &'g [String]) -> Step<T>,
    {
        let rows = self.grid.rows();
        let mut state = ScanState::SeekingHeader;
        let mut header = None;
        let mut out = Vec::new();
        let mut idx = self.start;

        while state != ScanState::Done {
            let Some(row) = rows.get(idx) else {
                trace!(section = self.name, ?state, "end of grid");
                break;
            };
            state = match state {
                ScanState::SeekingHeader if (self.is_header)(row.as_slice()) => {
                    trace!(section = self.name, row = idx, "header found");
                    header = Some(idx);
                    ScanState::InSection { header: idx }
                }
                ScanState::SeekingHeader => ScanState::SeekingHeader,
                ScanState::InSection { header: opened } => {
                    match step(idx - opened, row.as_slice()) {
                        Step::Take(item) => {
                            out.push(item);
                            state
                        }
                        Step::Skip => {
                            trace!(section = self.name, row = idx, "skipped row");
                            state
                        }
                        Step::Stop => {
                            trace!(section = self.name, row = idx, "section closed");
                            ScanState::Done
                        }
                    }
                }
                ScanState::Done => ScanState::Done,
            };
            idx += 1;
        }

        SectionRows { header, rows: out }
    }
}
