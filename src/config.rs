use std::env;

use crate::fetcher::{DEFAULT_EUR_URL, DEFAULT_USDT_URL, DEFAULT_USD_URL};
use crate::importers::downloader::DEFAULT_BASE_URL;
use crate::services::indicators_service::DEFAULT_HISTORY_RETENTION;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub bcv_base_url: String,
    pub accept_invalid_certs: bool,
    pub eur_rate_url: String,
    pub usd_rate_url: String,
    pub usdt_rate_url: String,
    pub data_dir: String,
    pub indicators_interval_minutes: u64,
    pub rates_interval_minutes: u64,
    pub history_retention: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            bcv_base_url: env::var("BCV_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            accept_invalid_certs: env::var("ACCEPT_INVALID_CERTS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            eur_rate_url: env::var("EUR_RATE_URL").unwrap_or_else(|_| DEFAULT_EUR_URL.to_string()),
            usd_rate_url: env::var("USD_RATE_URL").unwrap_or_else(|_| DEFAULT_USD_URL.to_string()),
            usdt_rate_url: env::var("USDT_RATE_URL")
                .unwrap_or_else(|_| DEFAULT_USDT_URL.to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            indicators_interval_minutes: env::var("INDICATORS_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "720".to_string())
                .parse::<u64>()
                .unwrap_or(720)
                .max(1),
            rates_interval_minutes: env::var("RATES_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "180".to_string())
                .parse::<u64>()
                .unwrap_or(180)
                .max(1),
            history_retention: env::var("HISTORY_RETENTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HISTORY_RETENTION),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
