/// Layout detection
///
/// BCV spreadsheets are maintained by hand: header rows come and go and the
/// data start shifts between revisions. The only thing treated as a stable
/// contract is the shape of the date tokens (DD/MM/YYYY), so both probes
/// search for that shape instead of trusting fixed offsets.
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use super::error::{CellParseWarning, ExtractError};
use super::grid::CellGrid;
use super::profile::{Orientation, TableProfile};
use super::series::PeriodRecord;

static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}").expect("date token pattern is valid"));

/// True if the text starts with a DD/MM/YYYY token (leading whitespace ignored)
pub fn is_date_token(text: &str) -> bool {
    DATE_TOKEN.is_match(text.trim())
}

/// The leading DD/MM/YYYY token, without whatever annotation follows it
pub fn date_token(text: &str) -> Option<&str> {
    DATE_TOKEN.find(text.trim()).map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    RowOriented,
    ColumnOriented,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::RowOriented => write!(f, "row-oriented"),
            LayoutKind::ColumnOriented => write!(f, "column-oriented"),
        }
    }
}

/// One way of walking a grid to produce candidate records
///
/// Implementations yield one entry per candidate row or column, newest
/// first. Candidates that cannot be read come back as warnings so the
/// caller can keep going with the rest of the series.
pub trait LayoutStrategy {
    fn kind(&self) -> LayoutKind;

    fn candidates(
        &self,
        grid: &dyn CellGrid,
        profile: &TableProfile,
    ) -> Vec<Result<PeriodRecord, CellParseWarning>>;
}

/// Dates down column 0, one week per row, newest at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOriented {
    pub data_start_row: usize,
}

impl RowOriented {
    /// First row whose column-0 cell is a date token. Unbounded scan.
    pub fn probe(grid: &dyn CellGrid) -> Option<Self> {
        (0..grid.row_count())
            .find(|&row| grid.text(row, 0).is_some_and(is_date_token))
            .map(|data_start_row| Self { data_start_row })
    }
}

/// Dates across a header row, values in a labelled totals row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOriented {
    pub dates_row: usize,
    pub total_row: usize,
}

impl ColumnOriented {
    pub fn probe(grid: &dyn CellGrid, profile: &TableProfile) -> Result<Self, String> {
        let label = profile
            .total_row_label
            .as_deref()
            .ok_or_else(|| "no total-row label configured".to_string())?;

        match (
            find_dates_row(grid, profile.date_scan_rows),
            find_total_row(grid, label),
        ) {
            (Some(dates_row), Some(total_row)) => Ok(Self {
                dates_row,
                total_row,
            }),
            (dates_row, total_row) => {
                let mut missing = Vec::new();
                if dates_row.is_none() {
                    missing.push(format!(
                        "no date header in the first {} rows",
                        profile.date_scan_rows
                    ));
                }
                if total_row.is_none() {
                    missing.push(format!("no '{label}' total row in column 0"));
                }
                Err(missing.join(", "))
            }
        }
    }
}

/// First row among the top `scan_rows` with a date token from column 1 onward
fn find_dates_row(grid: &dyn CellGrid, scan_rows: usize) -> Option<usize> {
    (0..scan_rows.min(grid.row_count())).find(|&row| {
        (1..grid.col_count()).any(|col| grid.text(row, col).is_some_and(is_date_token))
    })
}

/// First row whose column-0 text is `label`, or starts with `label:`, ignoring case
fn find_total_row(grid: &dyn CellGrid, label: &str) -> Option<usize> {
    let wanted = label.trim().to_uppercase();
    let with_colon = format!("{wanted}:");

    (0..grid.row_count()).find(|&row| {
        grid.text(row, 0).is_some_and(|text| {
            let text = text.trim().to_uppercase();
            text == wanted || text.starts_with(&with_colon)
        })
    })
}

/// A detected layout, ready to extract from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Rows(RowOriented),
    Columns(ColumnOriented),
}

impl Layout {
    pub fn kind(&self) -> LayoutKind {
        self.strategy().kind()
    }

    pub fn strategy(&self) -> &dyn LayoutStrategy {
        match self {
            Layout::Rows(rows) => rows,
            Layout::Columns(columns) => columns,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Rows(rows) => write!(f, "row-oriented (data from row {})", rows.data_start_row),
            Layout::Columns(columns) => write!(
                f,
                "column-oriented (dates at row {}, totals at row {})",
                columns.dates_row, columns.total_row
            ),
        }
    }
}

/// Run the probes allowed by the profile and return the first layout found
///
/// In `Auto` mode a profile with a totals-row label tries the column probe
/// first: it needs both a dates header and the totals row, so a stray dated
/// footnote in column 0 cannot claim the sheet as row-oriented.
pub fn detect_layout(grid: &dyn CellGrid, profile: &TableProfile) -> Result<Layout, ExtractError> {
    let probes: &[LayoutKind] = match profile.orientation {
        Orientation::Rows => &[LayoutKind::RowOriented],
        Orientation::Columns => &[LayoutKind::ColumnOriented],
        Orientation::Auto if profile.total_row_label.is_some() => {
            &[LayoutKind::ColumnOriented, LayoutKind::RowOriented]
        }
        Orientation::Auto => &[LayoutKind::RowOriented, LayoutKind::ColumnOriented],
    };

    let mut reasons = Vec::new();
    for kind in probes {
        match probe(*kind, grid, profile) {
            Ok(layout) => {
                debug!("Detected {}", layout);
                return Ok(layout);
            }
            Err(reason) => reasons.push(reason),
        }
    }

    Err(ExtractError::LayoutNotFound {
        reason: reasons.join("; "),
    })
}

fn probe(kind: LayoutKind, grid: &dyn CellGrid, profile: &TableProfile) -> Result<Layout, String> {
    match kind {
        LayoutKind::RowOriented => RowOriented::probe(grid)
            .map(Layout::Rows)
            .ok_or_else(|| "no DD/MM/YYYY date in column 0".to_string()),
        LayoutKind::ColumnOriented => ColumnOriented::probe(grid, profile).map(Layout::Columns),
    }
}
