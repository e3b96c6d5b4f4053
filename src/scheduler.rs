use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, instrument, warn};

use crate::services::{IndicatorsService, RatesService};

#[instrument(skip(service), fields(interval_minutes = %interval_minutes))]
pub async fn start_indicators_scheduler(service: IndicatorsService, interval_minutes: u64) {
    let mut interval = time::interval(Duration::from_secs(interval_minutes * 60));

    info!("Indicators scheduler started with {} minute interval", interval_minutes);

    loop {
        interval.tick().await;
        debug!("Scheduler tick - refreshing monetary indicators");

        match service.refresh().await {
            Ok(document) => {
                info!(
                    "Published indicators for {} (base monetaria: {})",
                    document.latest.date,
                    document
                        .base_monetaria
                        .as_ref()
                        .map(|b| b.latest.date.as_str())
                        .unwrap_or("none")
                );
            }
            Err(e) => {
                error!("Failed to refresh monetary indicators: {}", e);
            }
        }
    }
}

#[instrument(skip(service), fields(interval_minutes = %interval_minutes))]
pub async fn start_rates_scheduler(service: RatesService, interval_minutes: u64) {
    let mut interval = time::interval(Duration::from_secs(interval_minutes * 60));

    info!("Rates scheduler started with {} minute interval", interval_minutes);

    loop {
        interval.tick().await;
        debug!("Scheduler tick - refreshing exchange rates");

        match service.refresh().await {
            Ok(document) => {
                if document.usdt.is_none() {
                    warn!("Published rates without USDT");
                } else {
                    debug!("Published all exchange rates");
                }
            }
            Err(e) => {
                error!("Failed to refresh exchange rates: {}", e);
            }
        }
    }
}
