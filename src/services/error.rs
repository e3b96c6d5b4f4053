use crate::extract::ExtractError;
use crate::importers::{DownloadError, WorkbookError};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),
    #[error("Workbook could not be decoded: {0}")]
    Workbook(#[from] WorkbookError),
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Required {0} rate is unavailable")]
    MissingRate(&'static str),
}
