#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to parse rate payload: {0}")]
    ParseError(String),
    #[error("Failed to parse number: {0}")]
    NumberError(String),
    #[error("Missing field in rate payload: {0}")]
    MissingField(&'static str),
}
