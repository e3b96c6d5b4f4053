use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::extract::IndicatorTable;

pub const DEFAULT_BASE_URL: &str =
    "https://www.bcv.org.ve/sites/default/files/indicadores_sector_monetario/";

// The BCV site rejects requests without a browser-like user agent
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("File not found (404): {0}")]
    NotFound(String),

    #[error("Server error (5xx): {0}")]
    ServerError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Downloader for the BCV weekly indicator spreadsheets
#[derive(Clone)]
pub struct BcvDownloader {
    client: Client,
    base_url: String,
}

impl BcvDownloader {
    /// Create a new downloader
    /// Default base URL: https://www.bcv.org.ve/sites/default/files/indicadores_sector_monetario/
    ///
    /// `accept_invalid_certs` exists because bcv.org.ve has served an
    /// incomplete certificate chain for years.
    pub fn new(accept_invalid_certs: bool) -> Self {
        Self::with_base_url_and_tls(DEFAULT_BASE_URL.to_string(), accept_invalid_certs)
    }

    /// Create a downloader against another base URL (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_base_url_and_tls(base_url.into(), false)
    }

    pub fn with_base_url_and_tls(base_url: String, accept_invalid_certs: bool) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .default_headers(headers)
                .danger_accept_invalid_certs(accept_invalid_certs)
                .build()
                .expect("Failed to create HTTP client"),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download the spreadsheet for one indicator table
    /// Example: IndicatorTable::BaseMonetaria downloads base_monetaria_semanal.xls
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn download_table(&self, table: IndicatorTable) -> Result<Vec<u8>, DownloadError> {
        let filename = table.file_name();
        let url = self.url_for(filename)?;

        info!("Downloading {} spreadsheet: {}", table, url);
        self.download_file(&url, filename).await
    }

    fn url_for(&self, filename: &str) -> Result<String, DownloadError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DownloadError::InvalidUrl(self.base_url.clone()));
        }

        if self.base_url.ends_with('/') {
            Ok(format!("{}{filename}", self.base_url))
        } else {
            Ok(format!("{}/{filename}", self.base_url))
        }
    }

    /// Internal helper to download a file from a URL
    async fn download_file(&self, url: &str, filename: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            debug!("Downloaded {filename} ({} bytes)", bytes.len());
            Ok(bytes.to_vec())
        } else if status.as_u16() == 404 {
            Err(DownloadError::NotFound(format!(
                "{filename} not found on server"
            )))
        } else if status.is_server_error() {
            Err(DownloadError::ServerError(format!(
                "Server error {status} while downloading {filename}"
            )))
        } else {
            // error_for_status always errors on a non-success status
            match response.error_for_status() {
                Err(e) => Err(DownloadError::HttpError(e)),
                Ok(_) => Err(DownloadError::ServerError(format!(
                    "Unexpected status {status} while downloading {filename}"
                ))),
            }
        }
    }
}

impl Default for BcvDownloader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_with_trailing_slash() {
        let downloader = BcvDownloader::with_base_url("https://example.org/files/");
        assert_eq!(
            downloader.url_for("base_monetaria_semanal.xls").unwrap(),
            "https://example.org/files/base_monetaria_semanal.xls"
        );
    }

    #[test]
    fn test_url_for_without_trailing_slash() {
        let downloader = BcvDownloader::with_base_url("http://127.0.0.1:9000");
        assert_eq!(
            downloader.url_for("x.xls").unwrap(),
            "http://127.0.0.1:9000/x.xls"
        );
    }

    #[test]
    fn test_url_for_rejects_non_http() {
        let downloader = BcvDownloader::with_base_url("ftp://bcv.org.ve/");
        assert!(matches!(
            downloader.url_for("x.xls"),
            Err(DownloadError::InvalidUrl(_))
        ));
    }
}
