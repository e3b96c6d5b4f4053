//! Spreadsheet download and decoding for the BCV weekly indicator tables

pub mod downloader;
pub mod workbook;

// Re-export commonly used items
pub use downloader::{BcvDownloader, DownloadError};
pub use workbook::{first_sheet_from_bytes, first_sheet_from_path, WorkbookError};
