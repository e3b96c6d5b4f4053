use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;

use crate::fetch_error::FetchError;
use crate::utils::parse_decimal;

pub const DEFAULT_EUR_URL: &str = "https://bcvapi.tech/api/v1/euro/public";
pub const DEFAULT_USD_URL: &str = "https://bcvapi.tech/api/v1/dolar/public";
pub const DEFAULT_USDT_URL: &str = "https://ve.dolarapi.com/v1/dolares/paralelo";

/// One published exchange rate (bolívares per unit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeRate {
    pub rate: f64,
    /// Source publication date, YYYY-MM-DD when the source gives one
    pub date: String,
    pub symbol: String,
    /// Set on rates fetched on demand rather than read from the published file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,
}

/// Result of fetching every rate source; a failed source is `None`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatesSnapshot {
    pub eur: Option<ExchangeRate>,
    pub usd: Option<ExchangeRate>,
    pub usdt: Option<ExchangeRate>,
}

/// Which JSON shape a rate source returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFormat {
    /// bcvapi.tech: `{"tasa": "36,52", "fecha": "2026-01-09"}`
    BcvApi,
    /// DolarApi: `{"promedio": 52.1, "fechaActualizacion": "2026-01-09T12:00:00.000Z"}`
    DolarApi,
}

#[derive(Clone)]
pub struct RatesFetcher {
    client: reqwest::Client,
    eur_url: String,
    usd_url: String,
    usdt_url: String,
}

impl RatesFetcher {
    pub fn new(eur_url: String, usd_url: String, usdt_url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            eur_url,
            usd_url,
            usdt_url,
        }
    }

    /// Fetch all three rates concurrently. Individual failures are logged and
    /// come back as `None`.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> RatesSnapshot {
        let (eur, usd, usdt) = tokio::join!(
            self.fetch_rate(&self.eur_url, QuoteFormat::BcvApi, "€"),
            self.fetch_rate(&self.usd_url, QuoteFormat::BcvApi, "$"),
            self.fetch_rate(&self.usdt_url, QuoteFormat::DolarApi, "₮"),
        );

        RatesSnapshot {
            eur: log_failure("EUR", eur),
            usd: log_failure("USD", usd),
            usdt: log_failure("USDT", usdt),
        }
    }

    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_rate(
        &self,
        url: &str,
        format: QuoteFormat,
        symbol: &str,
    ) -> Result<ExchangeRate, FetchError> {
        debug!("Sending HTTP request to rate source");
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!("Received HTTP response with status: {}", response.status());

        let body = response.text().await?;
        let today = chrono::Local::now().date_naive();
        parse_quote(&body, format, symbol, today)
    }
}

fn log_failure(name: &str, result: Result<ExchangeRate, FetchError>) -> Option<ExchangeRate> {
    match result {
        Ok(rate) => {
            debug!("{} rate: {} ({})", name, rate.rate, rate.date);
            Some(rate)
        }
        Err(e) => {
            warn!("Failed to fetch {} rate: {}", name, e);
            None
        }
    }
}

/// Parse a rate payload
///
/// Dates fall back to `today` when the source omits them; ISO timestamps are
/// cut down to their date part.
pub fn parse_quote(
    body: &str,
    format: QuoteFormat,
    symbol: &str,
    today: NaiveDate,
) -> Result<ExchangeRate, FetchError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| FetchError::ParseError(e.to_string()))?;

    let (rate_field, date_field) = match format {
        QuoteFormat::BcvApi => ("tasa", "fecha"),
        QuoteFormat::DolarApi => ("promedio", "fechaActualizacion"),
    };

    let rate = match json.get(rate_field) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| FetchError::NumberError(n.to_string()))?,
        Some(Value::String(s)) => {
            parse_decimal(s).ok_or_else(|| FetchError::NumberError(s.clone()))?
        }
        Some(other) => return Err(FetchError::NumberError(other.to_string())),
        None => return Err(FetchError::MissingField(rate_field)),
    };

    let date = json
        .get(date_field)
        .and_then(Value::as_str)
        .map(|s| s.split('T').next().unwrap_or(s).to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

    Ok(ExchangeRate {
        rate,
        date,
        symbol: symbol.to_string(),
        live: None,
    })
}
