use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::fetcher::{RatesFetcher, RatesSnapshot};
use crate::services::PublishError;
use crate::store::{RatesDocument, RatesRepository};

#[derive(Clone)]
pub struct RatesService {
    fetcher: RatesFetcher,
    repo: RatesRepository,
}

impl RatesService {
    pub fn new(fetcher: RatesFetcher, repo: RatesRepository) -> Self {
        Self { fetcher, repo }
    }

    /// Fetch and publish bcv-rates.json. Fails without writing when EUR or
    /// USD could not be fetched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RatesDocument, PublishError> {
        let snapshot = self.fetcher.fetch_all().await;
        let document = rates_document(snapshot, Utc::now())?;
        self.repo.save(&document).await?;
        Ok(document)
    }

    /// Fetch all rates on demand, USDT flagged as live
    pub async fn live(&self) -> RatesSnapshot {
        let mut snapshot = self.fetcher.fetch_all().await;
        if let Some(usdt) = snapshot.usdt.as_mut() {
            usdt.live = Some(true);
        }
        snapshot
    }
}

pub fn rates_document(
    snapshot: RatesSnapshot,
    now: DateTime<Utc>,
) -> Result<RatesDocument, PublishError> {
    Ok(RatesDocument {
        last_updated: now,
        eur: snapshot.eur.ok_or(PublishError::MissingRate("EUR"))?,
        usd: snapshot.usd.ok_or(PublishError::MissingRate("USD"))?,
        usdt: snapshot.usdt,
    })
}
