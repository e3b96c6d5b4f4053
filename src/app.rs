use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::fetcher::RatesFetcher;
use crate::importers::BcvDownloader;
use crate::scheduler;
use crate::services::{IndicatorsService, RatesService};
use crate::store::{IndicatorsRepository, RatesRepository};

/// Application with all spawned background tasks and server
///
/// This struct holds handles to all running tasks. Tasks run indefinitely.
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
    pub indicators_scheduler_handle: JoinHandle<()>,
    pub rates_scheduler_handle: JoinHandle<()>,
}

impl Application {
    /// Build and initialize the application
    ///
    /// This creates the repositories, services and fetchers, and spawns:
    /// - HTTP API server (Axum)
    /// - Indicators scheduler (12 h interval by default)
    /// - Rates scheduler (3 h interval by default)
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        tokio::fs::create_dir_all(&config.data_dir).await?;

        // Create repositories
        let indicators_repo = IndicatorsRepository::new(&config.data_dir);
        let rates_repo = RatesRepository::new(&config.data_dir);

        // Create fetchers
        let downloader = BcvDownloader::with_base_url_and_tls(
            config.bcv_base_url.clone(),
            config.accept_invalid_certs,
        );
        let rates_fetcher = RatesFetcher::new(
            config.eur_rate_url.clone(),
            config.usd_rate_url.clone(),
            config.usdt_rate_url.clone(),
        );

        // Create services
        let indicators_service =
            IndicatorsService::new(downloader, indicators_repo.clone(), config.history_retention);
        let rates_service = RatesService::new(rates_fetcher, rates_repo);

        info!("Spawning background schedulers");

        let indicators_scheduler_handle = {
            let service = indicators_service.clone();
            let interval = config.indicators_interval_minutes;

            tokio::spawn(async move {
                scheduler::start_indicators_scheduler(service, interval).await;
            })
        };

        let rates_scheduler_handle = {
            let service = rates_service.clone();
            let interval = config.rates_interval_minutes;

            tokio::spawn(async move {
                scheduler::start_rates_scheduler(service, interval).await;
            })
        };

        // Create API router
        let app_state = AppState {
            indicators_repo,
            rates_service,
        };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        // Spawn server
        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self {
            server_handle,
            indicators_scheduler_handle,
            rates_scheduler_handle,
        })
    }

    /// Run until the server stops (which runs indefinitely unless error)
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
