use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::store::{IndicatorsDocument, StoreError};

pub const INDICATORS_FILE_NAME: &str = "bcv-liquidity.json";

/// File-backed store for the published indicators document
#[derive(Clone)]
pub struct IndicatorsRepository {
    path: PathBuf,
}

impl IndicatorsRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(INDICATORS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last published document, `None` when nothing was published yet
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Option<IndicatorsDocument>, StoreError> {
        read_json(&self.path).await
    }

    #[instrument(skip(self, document), fields(path = %self.path.display(), latest = %document.latest.date))]
    pub async fn save(&self, document: &IndicatorsDocument) -> Result<(), StoreError> {
        write_json(&self.path, document).await?;
        info!(
            "Published indicators for {} ({} history entries)",
            document.latest.date,
            document.history.len()
        );
        Ok(())
    }
}

/// Read a JSON document; a missing file is `Ok(None)`
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(Some(serde_json::from_slice(&bytes)?))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("No published document at {}", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Write pretty-printed UTF-8 JSON through a temporary file and rename it
/// into place so readers never see a partial document
pub(crate) async fn write_json<T: Serialize>(path: &Path, document: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut json = serde_json::to_vec_pretty(document)?;
    json.push(b'\n');

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}
