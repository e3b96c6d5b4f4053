use std::fmt;

use super::layout::LayoutKind;

/// Document-level extraction failures. Either one means "no data" for the
/// document; the caller decides whether to keep what it published before.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("No recognizable table layout: {reason}")]
    LayoutNotFound { reason: String },

    #[error("{layout} layout found but no valid records extracted ({} skipped)", .warnings.len())]
    InsufficientData {
        layout: LayoutKind,
        warnings: Vec<CellParseWarning>,
    },
}

/// Where a candidate record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellPosition {
    Row(usize),
    Column(usize),
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellPosition::Row(row) => write!(f, "row {row}"),
            CellPosition::Column(col) => write!(f, "column {col}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WarningKind {
    #[error("label cell is empty or not text")]
    EmptyLabel,

    #[error("label '{0}' is not a DD/MM/YYYY date")]
    NotADate(String),

    #[error("duplicate period label '{0}'")]
    DuplicateLabel(String),

    #[error("value cell is not numeric")]
    NonNumeric,

    #[error("value {0} is below the placeholder floor")]
    BelowFloor(f64),
}

/// A single row or column that could not be turned into a record.
/// Collected for diagnostics, never fatal to the series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{position}: {kind}")]
pub struct CellParseWarning {
    pub position: CellPosition,
    pub kind: WarningKind,
}

impl CellParseWarning {
    pub fn new(position: CellPosition, kind: WarningKind) -> Self {
        Self { position, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = CellParseWarning::new(CellPosition::Column(12), WarningKind::BelowFloor(3.5));
        assert_eq!(
            warning.to_string(),
            "column 12: value 3.5 is below the placeholder floor"
        );
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = ExtractError::InsufficientData {
            layout: LayoutKind::RowOriented,
            warnings: vec![CellParseWarning::new(
                CellPosition::Row(4),
                WarningKind::EmptyLabel,
            )],
        };
        assert_eq!(
            err.to_string(),
            "row-oriented layout found but no valid records extracted (1 skipped)"
        );
    }
}
