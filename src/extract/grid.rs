/// Cell grid accessor
///
/// The extraction engine only needs three things from a decoded spreadsheet:
/// its height, its width and a typed view of a single cell. Anything that can
/// answer those questions can be fed to the engine; calamine ranges are the
/// implementation used in production.
use calamine::{Data, Range};

/// Typed view of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Empty,
    Number(f64),
    Text(&'a str),
}

/// Read-only 2D cell accessor, addressed by absolute (row, col) from the top-left
pub trait CellGrid {
    fn row_count(&self) -> usize;

    fn col_count(&self) -> usize;

    /// Out-of-bounds lookups return `Cell::Empty`
    fn cell(&self, row: usize, col: usize) -> Cell<'_>;

    /// Text content of a cell, if it is a text cell
    fn text(&self, row: usize, col: usize) -> Option<&str> {
        match self.cell(row, col) {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content of a cell, if it is a numeric cell
    fn number(&self, row: usize, col: usize) -> Option<f64> {
        match self.cell(row, col) {
            Cell::Number(n) => Some(n),
            _ => None,
        }
    }
}

// calamine trims leading empty rows/columns off a worksheet range, so all
// lookups go through absolute positions to keep row 0 meaning the sheet's
// first row.
impl CellGrid for Range<Data> {
    fn row_count(&self) -> usize {
        self.end().map(|(row, _)| row as usize + 1).unwrap_or(0)
    }

    fn col_count(&self) -> usize {
        self.end().map(|(_, col)| col as usize + 1).unwrap_or(0)
    }

    fn cell(&self, row: usize, col: usize) -> Cell<'_> {
        let (Ok(row), Ok(col)) = (u32::try_from(row), u32::try_from(col)) else {
            return Cell::Empty;
        };

        match self.get_value((row, col)) {
            Some(Data::Float(f)) => Cell::Number(*f),
            Some(Data::Int(i)) => Cell::Number(*i as f64),
            Some(Data::DateTime(dt)) => Cell::Number(dt.as_f64()),
            Some(Data::Bool(b)) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            Some(Data::String(s)) | Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => {
                Cell::Text(s)
            }
            _ => Cell::Empty,
        }
    }
}
