/// Series extraction
///
/// Walks the axis picked by layout detection and turns each candidate row or
/// column into a `PeriodRecord`. Records come out newest first.
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::error::{CellParseWarning, CellPosition, WarningKind};
use super::grid::{Cell, CellGrid};
use super::layout::{
    date_token, is_date_token, ColumnOriented, LayoutKind, LayoutStrategy, RowOriented,
};
use super::profile::TableProfile;
use crate::utils::{clean_period_label, parse_decimal, parse_period_date, round2};

static NEGATIVE_VARIATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d+[.,]\d+)\)").expect("negative variation pattern is valid")
});
static POSITIVE_VARIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+[.,]\d+)").expect("positive variation pattern is valid"));

/// Whether a variation figure was read from the sheet or computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationSource {
    Reported,
    Derived,
}

/// One observation of the tracked magnitude
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRecord {
    pub period_label: String,
    pub primary_value: Option<f64>,
    pub secondary_value: Option<f64>,
    pub variation_pct: Option<f64>,
    pub variation_source: Option<VariationSource>,
    #[serde(skip)]
    pub source: CellPosition,
}

impl PeriodRecord {
    /// The label as a calendar date, when it is one
    pub fn period_date(&self) -> Option<NaiveDate> {
        parse_period_date(&self.period_label)
    }
}

/// Newest-first sequence of records with unique labels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    records: Vec<PeriodRecord>,
}

impl Series {
    /// Build a series from extracted records
    ///
    /// Duplicate labels keep their first occurrence. Records are ordered by
    /// date, newest first; the sort is stable so labels that are not real
    /// calendar dates keep their relative order after the dated ones.
    /// The result never holds more than `window_size` records.
    pub fn from_records(
        records: Vec<PeriodRecord>,
        window_size: usize,
    ) -> (Self, Vec<CellParseWarning>) {
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        let mut unique = Vec::with_capacity(records.len());

        for record in records {
            if seen.insert(record.period_label.clone()) {
                unique.push(record);
            } else {
                warnings.push(CellParseWarning::new(
                    record.source,
                    WarningKind::DuplicateLabel(record.period_label),
                ));
            }
        }

        unique.sort_by_key(|record| std::cmp::Reverse(record.period_date()));
        unique.truncate(window_size);

        (Self { records: unique }, warnings)
    }

    pub(crate) fn from_resolved(records: Vec<PeriodRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&PeriodRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodRecord> {
        self.records.iter()
    }
}

impl LayoutStrategy for RowOriented {
    fn kind(&self) -> LayoutKind {
        LayoutKind::RowOriented
    }

    fn candidates(
        &self,
        grid: &dyn CellGrid,
        profile: &TableProfile,
    ) -> Vec<Result<PeriodRecord, CellParseWarning>> {
        let end = (self.data_start_row + profile.window_size).min(grid.row_count());
        let variation_col = profile
            .variation_col
            .filter(|&col| col < grid.col_count());

        (self.data_start_row..end)
            .map(|row| -> Result<PeriodRecord, CellParseWarning> {
                let position = CellPosition::Row(row);
                let label = read_label(grid, row, 0, position)?;

                Ok(PeriodRecord {
                    period_label: label,
                    primary_value: grid.number(row, profile.primary_col).map(round2),
                    secondary_value: profile
                        .secondary_col
                        .and_then(|col| grid.number(row, col))
                        .map(round2),
                    variation_pct: variation_col
                        .and_then(|col| parse_variation_cell(grid.cell(row, col))),
                    variation_source: None,
                    source: position,
                })
                .map(mark_reported)
            })
            .collect()
    }
}

impl LayoutStrategy for ColumnOriented {
    fn kind(&self) -> LayoutKind {
        LayoutKind::ColumnOriented
    }

    fn candidates(
        &self,
        grid: &dyn CellGrid,
        profile: &TableProfile,
    ) -> Vec<Result<PeriodRecord, CellParseWarning>> {
        // Oldest week is on the left
        let date_cols: Vec<usize> = (1..grid.col_count())
            .filter(|&col| grid.text(self.dates_row, col).is_some_and(is_date_token))
            .collect();
        let recent = &date_cols[date_cols.len().saturating_sub(profile.window_size)..];

        recent
            .iter()
            .rev()
            .map(|&col| -> Result<PeriodRecord, CellParseWarning> {
                let position = CellPosition::Column(col);
                let label = read_label(grid, self.dates_row, col, position)?;

                let value = match grid.cell(self.total_row, col) {
                    Cell::Number(v) if v >= profile.value_floor => v,
                    Cell::Number(v) => {
                        return Err(CellParseWarning::new(position, WarningKind::BelowFloor(v)))
                    }
                    _ => return Err(CellParseWarning::new(position, WarningKind::NonNumeric)),
                };

                Ok(PeriodRecord {
                    period_label: label,
                    primary_value: Some(round2(value)),
                    secondary_value: None,
                    variation_pct: None,
                    variation_source: None,
                    source: position,
                })
            })
            .collect()
    }
}

/// Read a date label, rejecting empty cells and non-dates
///
/// Only the DD/MM/YYYY token is kept, so "09/01/2026 (p)" labels the same
/// week as "09/01/2026".
fn read_label(
    grid: &dyn CellGrid,
    row: usize,
    col: usize,
    position: CellPosition,
) -> Result<String, CellParseWarning> {
    let raw = grid
        .text(row, col)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CellParseWarning::new(position, WarningKind::EmptyLabel))?;

    let label = clean_period_label(raw);
    match date_token(&label) {
        Some(token) => Ok(token.to_string()),
        None => Err(CellParseWarning::new(position, WarningKind::NotADate(label))),
    }
}

fn mark_reported(mut record: PeriodRecord) -> PeriodRecord {
    if record.variation_pct.is_some() {
        record.variation_source = Some(VariationSource::Reported);
    }
    record
}

/// Read a reported variation figure
///
/// Numeric cells are taken as-is (rounded); an exact zero means the sheet
/// left the figure blank. Text cells use the accounting convention where a
/// parenthesised number is negative: "(12.34)" → -12.34, "5.67" → 5.67.
pub fn parse_variation_cell(cell: Cell<'_>) -> Option<f64> {
    match cell {
        Cell::Number(v) if v != 0.0 => Some(round2(v)),
        Cell::Number(_) | Cell::Empty => None,
        Cell::Text(text) => parse_variation_text(text),
    }
}

pub fn parse_variation_text(text: &str) -> Option<f64> {
    if let Some(caps) = NEGATIVE_VARIATION.captures(text) {
        return parse_decimal(&caps[1]).map(|v| -v);
    }
    POSITIVE_VARIATION
        .captures(text)
        .and_then(|caps| parse_decimal(&caps[1]))
}
