use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook: {0}")]
    Open(String),

    #[error("Failed to read worksheet: {0}")]
    Sheet(String),

    #[error("Workbook has no worksheets")]
    NoSheets,
}

/// Helper to wrap downloaded bytes for in-memory decoding
pub fn bytes_to_cursor(bytes: Vec<u8>) -> Cursor<Vec<u8>> {
    Cursor::new(bytes)
}

/// Decode a downloaded workbook (.xls, .xlsx, .ods) and return its first sheet
///
/// BCV publishes each indicator table as the first worksheet of its file.
/// Decoding is synchronous; async callers should use spawn_blocking.
pub fn first_sheet_from_bytes(bytes: Vec<u8>) -> Result<Range<Data>, WorkbookError> {
    debug!("Decoding workbook from {} bytes", bytes.len());
    let mut workbook = open_workbook_auto_from_rs(bytes_to_cursor(bytes))
        .map_err(|e| WorkbookError::Open(e.to_string()))?;

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(WorkbookError::Sheet(e.to_string())),
        None => Err(WorkbookError::NoSheets),
    }
}

/// Open a workbook on disk and return its first sheet
pub fn first_sheet_from_path(path: impl AsRef<Path>) -> Result<Range<Data>, WorkbookError> {
    let path = path.as_ref();
    debug!("Opening workbook {}", path.display());
    let mut workbook = open_workbook_auto(path).map_err(|e| WorkbookError::Open(e.to_string()))?;

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(WorkbookError::Sheet(e.to_string())),
        None => Err(WorkbookError::NoSheets),
    }
}
