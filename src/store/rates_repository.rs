use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use super::indicators_repository::{read_json, write_json};
use crate::store::{RatesDocument, StoreError};

pub const RATES_FILE_NAME: &str = "bcv-rates.json";

#[derive(Clone)]
pub struct RatesRepository {
    path: PathBuf,
}

impl RatesRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(RATES_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Option<RatesDocument>, StoreError> {
        read_json(&self.path).await
    }

    #[instrument(skip(self, document), fields(path = %self.path.display()))]
    pub async fn save(&self, document: &RatesDocument) -> Result<(), StoreError> {
        write_json(&self.path, document).await?;
        info!(
            "Published rates: EUR {} USD {} USDT {}",
            document.eur.rate,
            document.usd.rate,
            document
                .usdt
                .as_ref()
                .map(|r| r.rate.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        Ok(())
    }
}
