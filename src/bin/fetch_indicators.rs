use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use bcv_indicators::extract::{IndicatorTable, Snapshot};
use bcv_indicators::importers::downloader::DEFAULT_BASE_URL;
use bcv_indicators::importers::BcvDownloader;
use bcv_indicators::services::indicators_service::{
    assemble_document, snapshot_table, DEFAULT_HISTORY_RETENTION,
};
use bcv_indicators::services::{IndicatorsService, PublishError};
use bcv_indicators::store::{IndicatorsDocument, IndicatorsRepository};

#[derive(Parser)]
#[command(name = "fetch-indicators")]
#[command(about = "Download the BCV weekly monetary tables and publish bcv-liquidity.json", long_about = None)]
struct Cli {
    /// Directory holding the published JSON documents
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Base URL the spreadsheet file names are appended to
    #[arg(long, env = "BCV_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Maximum number of history entries kept in the published document
    #[arg(long, env = "HISTORY_RETENTION", default_value_t = DEFAULT_HISTORY_RETENTION)]
    retention: usize,

    /// Use a local liquidity workbook instead of downloading it
    #[arg(long)]
    liquidity_file: Option<PathBuf>,

    /// Use a local base monetaria workbook instead of downloading it
    #[arg(long)]
    base_monetaria_file: Option<PathBuf>,

    /// Verify the BCV TLS certificate chain
    #[arg(long)]
    strict_tls: bool,

    /// Print the document instead of writing it
    #[arg(long)]
    dry_run: bool,
}

async fn load_table(
    downloader: &BcvDownloader,
    table: IndicatorTable,
    local: Option<&PathBuf>,
) -> Result<Snapshot, PublishError> {
    let bytes = match local {
        Some(path) => {
            info!("Reading {} table from {}", table, path.display());
            tokio::fs::read(path)
                .await
                .map_err(|e| PublishError::Store(e.into()))?
        }
        None => downloader.download_table(table).await?,
    };
    snapshot_table(table, bytes).await
}

fn print_summary(document: &IndicatorsDocument) {
    let latest = &document.latest;
    println!("\n✓ Monetary indicators for {}", latest.date);
    if let Some(m2) = latest.m2_billions {
        println!("  M2 (liquidez): {m2} millardos Bs.");
    }
    if let Some(variation) = latest.variation_pct {
        println!(
            "  Variación M2: {} {}%",
            latest.variation_direction.arrow(),
            variation.abs()
        );
    }
    if let Some(base) = &document.base_monetaria {
        if let Some(value) = base.latest.value_billions {
            println!("  Base monetaria ({}): {value} millardos Bs.", base.latest.date);
        }
        if let Some(variation) = base.latest.variation_pct {
            println!(
                "  Variación BM: {} {}%",
                base.latest.variation_direction.arrow(),
                variation.abs()
            );
        }
    }
    println!("  History entries: {}", document.history.len());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let downloader = BcvDownloader::with_base_url_and_tls(cli.base_url.clone(), !cli.strict_tls);
    let repo = IndicatorsRepository::new(&cli.data_dir);

    let (liquidity, base) = tokio::join!(
        load_table(&downloader, IndicatorTable::Liquidity, cli.liquidity_file.as_ref()),
        load_table(&downloader, IndicatorTable::BaseMonetaria, cli.base_monetaria_file.as_ref()),
    );

    let liquidity = liquidity.inspect_err(|e| {
        error!("Failed to get liquidity data, published document left untouched: {}", e);
    })?;
    let base = base
        .inspect_err(|e| warn!("Base monetaria unavailable: {}", e))
        .ok();

    let document = if cli.dry_run {
        let previous = repo.load().await?;
        let document = assemble_document(
            &liquidity,
            base.as_ref(),
            previous.as_ref(),
            cli.retention,
            chrono::Utc::now(),
        );
        println!("{}", serde_json::to_string_pretty(&document)?);
        document
    } else {
        let service = IndicatorsService::new(downloader, repo, cli.retention);
        let document = service.publish(&liquidity, base.as_ref()).await?;
        info!("Wrote {}", service.repository().path().display());
        document
    };

    print_summary(&document);
    Ok(())
}
