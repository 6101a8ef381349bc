use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid proxy address {proxy}: {source}")]
    Proxy {
        proxy: String,
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("request to {operation} failed: {source}")]
    Request {
        operation: String,
        source: reqwest::Error,
    },

    #[error("{operation} returned HTTP {status}")]
    Status {
        operation: String,
        status: StatusCode,
    },

    #[error("could not parse {operation} response: {source}")]
    Parse {
        operation: String,
        source: reqwest::Error,
    },
}
