// Tabular time-series extraction
//
// Turns a decoded indicator spreadsheet into a newest-first series of weekly
// observations:
// - grid:      typed cell access over a decoded sheet
// - layout:    content-driven detection of row- vs column-oriented tables
// - series:    per-layout walking of the table into period records
// - variation: backward-looking percent change for records missing one
// - snapshot:  thousands → billions, latest + history

pub mod error;
pub mod grid;
pub mod layout;
pub mod profile;
pub mod series;
pub mod snapshot;
pub mod variation;

pub use error::{CellParseWarning, CellPosition, ExtractError, WarningKind};
pub use grid::{Cell, CellGrid};
pub use layout::{detect_layout, Layout, LayoutKind, LayoutStrategy};
pub use profile::{IndicatorTable, Orientation, TableProfile};
pub use series::{PeriodRecord, Series, VariationSource};
pub use snapshot::{Snapshot, SnapshotEntry, VariationDirection};

use tracing::{debug, instrument, warn};

/// Result of a successful extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub layout: Layout,
    pub series: Series,
    /// Rows/columns that were skipped, in the order they were met
    pub warnings: Vec<CellParseWarning>,
}

/// Stateless extractor for one kind of indicator table
///
/// Holds only the table profile; every call is a pure function of the grid,
/// so one engine per table can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    profile: TableProfile,
}

impl ExtractionEngine {
    pub fn new(profile: TableProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &TableProfile {
        &self.profile
    }

    /// Detect the layout, extract the window of recent periods and resolve
    /// missing variations
    ///
    /// Fails with `LayoutNotFound` when neither probe matches and with
    /// `InsufficientData` when a layout was found but no record survived.
    #[instrument(skip(self, grid), fields(table = %self.profile.name, rows = grid.row_count(), cols = grid.col_count()))]
    pub fn extract(&self, grid: &dyn CellGrid) -> Result<Extraction, ExtractError> {
        let layout = detect_layout(grid, &self.profile)?;
        debug!("Using {} layout", layout);

        let (records, mut warnings) = layout
            .strategy()
            .candidates(grid, &self.profile)
            .into_iter()
            .fold((Vec::new(), Vec::new()), |(mut ok, mut skipped), candidate| {
                match candidate {
                    Ok(record) => ok.push(record),
                    Err(warning) => skipped.push(warning),
                }
                (ok, skipped)
            });

        let (series, duplicates) = Series::from_records(records, self.profile.window_size);
        warnings.extend(duplicates);

        for warning in &warnings {
            warn!("Skipping {} in {}: {}", warning.position, self.profile.name, warning.kind);
        }

        if series.is_empty() {
            return Err(ExtractError::InsufficientData {
                layout: layout.kind(),
                warnings,
            });
        }

        let series = variation::resolve_variations(&series);
        debug!(
            "Extracted {} periods ({} skipped), latest {}",
            series.len(),
            warnings.len(),
            series.latest().map(|r| r.period_label.as_str()).unwrap_or("-")
        );

        Ok(Extraction {
            layout,
            series,
            warnings,
        })
    }

    /// Extract and normalize into the published latest + history view
    pub fn snapshot(&self, grid: &dyn CellGrid) -> Result<Snapshot, ExtractError> {
        let extraction = self.extract(grid)?;
        let layout = extraction.layout.kind();

        Snapshot::from_series(&extraction.series, self.profile.history_len).ok_or(
            ExtractError::InsufficientData {
                layout,
                warnings: extraction.warnings,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Range};

    #[test]
    fn test_empty_grid_has_no_layout() {
        let range: Range<Data> = Range::empty();
        let engine = ExtractionEngine::new(TableProfile::liquidity());
        assert!(matches!(
            engine.extract(&range),
            Err(ExtractError::LayoutNotFound { .. })
        ));
    }

    #[test]
    fn test_forced_columns_ignores_row_dates() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 7));
        range.set_value((3, 0), Data::String("02/01/2026".to_string()));
        let profile = TableProfile::base_monetaria().with_orientation(Orientation::Columns);
        let engine = ExtractionEngine::new(profile);

        assert!(matches!(
            engine.extract(&range),
            Err(ExtractError::LayoutNotFound { .. })
        ));
    }

    #[test]
    fn test_column_layout_with_only_placeholders_is_insufficient() {
        let mut range: Range<Data> = Range::new((0, 0), (4, 3));
        range.set_value((1, 1), Data::String("26/12/2025".to_string()));
        range.set_value((1, 2), Data::String("02/01/2026".to_string()));
        range.set_value((4, 0), Data::String("USOS".to_string()));
        range.set_value((4, 1), Data::Float(1.0));
        range.set_value((4, 2), Data::String("-".to_string()));

        let engine = ExtractionEngine::new(TableProfile::base_monetaria());
        match engine.extract(&range) {
            Err(ExtractError::InsufficientData { layout, warnings }) => {
                assert_eq!(layout, LayoutKind::ColumnOriented);
                assert_eq!(warnings.len(), 2);
            }
            other => panic!("Expected InsufficientData, got {other:?}"),
        }
    }
}
