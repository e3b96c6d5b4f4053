use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::extract::{ExtractionEngine, IndicatorTable, Snapshot};
use crate::importers::{first_sheet_from_bytes, BcvDownloader};
use crate::services::PublishError;
use crate::store::{
    merge_history, BaseMonetariaHistoryEntry, BaseMonetariaSection, IndicatorsDocument,
    IndicatorsRepository, LiquidityHistoryEntry, LiquidityLatest,
};

pub const DEFAULT_HISTORY_RETENTION: usize = 26;

/// Download → extract → publish pipeline for the monetary indicators
#[derive(Clone)]
pub struct IndicatorsService {
    downloader: BcvDownloader,
    repo: IndicatorsRepository,
    retention: usize,
}

impl IndicatorsService {
    pub fn new(downloader: BcvDownloader, repo: IndicatorsRepository, retention: usize) -> Self {
        Self {
            downloader,
            repo,
            retention,
        }
    }

    pub fn repository(&self) -> &IndicatorsRepository {
        &self.repo
    }

    /// Download both tables, extract them and publish the merged document
    ///
    /// A liquidity failure aborts the run and leaves the published file
    /// untouched. A base monetaria failure only keeps the previous section.
    #[instrument(skip(self), fields(base_url = %self.downloader.base_url()))]
    pub async fn refresh(&self) -> Result<IndicatorsDocument, PublishError> {
        let (liquidity_bytes, base_bytes) = tokio::join!(
            self.downloader.download_table(IndicatorTable::Liquidity),
            self.downloader.download_table(IndicatorTable::BaseMonetaria),
        );

        let liquidity = snapshot_table(IndicatorTable::Liquidity, liquidity_bytes?).await?;

        let base = match base_bytes {
            Ok(bytes) => snapshot_table(IndicatorTable::BaseMonetaria, bytes).await,
            Err(e) => Err(e.into()),
        };
        let base = base
            .inspect_err(|e| warn!("Base monetaria unavailable, carrying previous section: {}", e))
            .ok();

        self.publish(&liquidity, base.as_ref()).await
    }

    /// Merge fresh snapshots with the published document and write it
    #[instrument(skip(self, liquidity, base), fields(latest = %liquidity.latest.date))]
    pub async fn publish(
        &self,
        liquidity: &Snapshot,
        base: Option<&Snapshot>,
    ) -> Result<IndicatorsDocument, PublishError> {
        let previous = match self.repo.load().await {
            Ok(previous) => previous,
            Err(e) => {
                warn!("Ignoring unreadable published document: {}", e);
                None
            }
        };

        let document =
            assemble_document(liquidity, base, previous.as_ref(), self.retention, Utc::now());
        self.repo.save(&document).await?;
        Ok(document)
    }
}

/// Decode a downloaded workbook and extract the table's snapshot
///
/// Decoding and extraction are CPU-bound and run on the blocking pool.
pub async fn snapshot_table(table: IndicatorTable, bytes: Vec<u8>) -> Result<Snapshot, PublishError> {
    let snapshot = tokio::task::spawn_blocking(move || -> Result<Snapshot, PublishError> {
        let range = first_sheet_from_bytes(bytes)?;
        let engine = ExtractionEngine::new(table.profile());
        Ok(engine.snapshot(&range)?)
    })
    .await??;

    info!(
        "Extracted {} table: latest {} ({} history entries)",
        table,
        snapshot.latest.date,
        snapshot.history.len()
    );
    Ok(snapshot)
}

/// Build the published document from fresh snapshots and the previous one
pub fn assemble_document(
    liquidity: &Snapshot,
    base: Option<&Snapshot>,
    previous: Option<&IndicatorsDocument>,
    retention: usize,
    now: DateTime<Utc>,
) -> IndicatorsDocument {
    let fresh_history: Vec<LiquidityHistoryEntry> =
        liquidity.history.iter().map(Into::into).collect();
    let history = merge_history(
        &fresh_history,
        previous.map(|p| p.history.as_slice()).unwrap_or_default(),
        retention,
    );

    let previous_base = previous.and_then(|p| p.base_monetaria.as_ref());
    let base_monetaria = match base {
        Some(snapshot) => {
            let mut section = BaseMonetariaSection::from(snapshot);
            let prior: &[BaseMonetariaHistoryEntry] = previous_base
                .map(|b| b.history.as_slice())
                .unwrap_or_default();
            section.history = merge_history(&section.history, prior, retention);
            Some(section)
        }
        None => previous_base.cloned(),
    };

    IndicatorsDocument {
        last_updated: now,
        latest: LiquidityLatest::from(&liquidity.latest),
        history,
        base_monetaria,
    }
}
