use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use bcv_indicators::fetcher::{RatesFetcher, DEFAULT_EUR_URL, DEFAULT_USDT_URL, DEFAULT_USD_URL};
use bcv_indicators::services::RatesService;
use bcv_indicators::store::RatesRepository;

#[derive(Parser)]
#[command(name = "fetch-rates")]
#[command(about = "Fetch EUR, USD and USDT rates and publish bcv-rates.json", long_about = None)]
struct Cli {
    /// Directory holding the published JSON documents
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, env = "EUR_RATE_URL", default_value = DEFAULT_EUR_URL)]
    eur_url: String,

    #[arg(long, env = "USD_RATE_URL", default_value = DEFAULT_USD_URL)]
    usd_url: String,

    #[arg(long, env = "USDT_RATE_URL", default_value = DEFAULT_USDT_URL)]
    usdt_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let fetcher = RatesFetcher::new(cli.eur_url, cli.usd_url, cli.usdt_url);
    let service = RatesService::new(fetcher, RatesRepository::new(&cli.data_dir));

    let document = service
        .refresh()
        .await
        .inspect_err(|e| error!("Rates not published: {}", e))?;

    println!("\n✓ Exchange rates");
    for rate in [Some(&document.eur), Some(&document.usd), document.usdt.as_ref()]
        .into_iter()
        .flatten()
    {
        println!("  {} {:.4} ({})", rate.symbol, rate.rate, rate.date);
    }

    Ok(())
}
