mod error;

pub use error::ApiError;

use reqwest::blocking::{Client, Response};
use serde_json::Value;

use crate::config::Config;

/// Remote endpoint of the scanning service. Implementations perform one
/// HTTP round-trip per call and return the decoded JSON payload.
pub trait ApiClient {
    fn get(&self, operation: &str, params: &[(&str, &str)]) -> Result<Value, ApiError>;

    fn post(
        &self,
        operation: &str,
        query: &[(&str, &str)],
        form: &[(&str, &str)],
    ) -> Result<Value, ApiError>;
}

/// Blocking client for the HTTP Observatory API.
pub struct ObservatoryClient {
    base_url: String,
    http: Client,
}

impl ObservatoryClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("observatory/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = &config.proxy {
            let proxy_url = proxy_url(proxy);
            let proxy = reqwest::Proxy::all(&proxy_url).map_err(|source| ApiError::Proxy {
                proxy: proxy.clone(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(ApiError::Build)?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }

    fn read(operation: &str, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                operation: operation.to_string(),
                status,
            });
        }

        response.json().map_err(|source| ApiError::Parse {
            operation: operation.to_string(),
            source,
        })
    }
}

impl ApiClient for ObservatoryClient {
    fn get(&self, operation: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        tracing::debug!(operation, ?params, "sending GET request");
        let response = self
            .http
            .get(self.endpoint(operation))
            .query(params)
            .send()
            .map_err(|source| ApiError::Request {
                operation: operation.to_string(),
                source,
            })?;
        Self::read(operation, response)
    }

    fn post(
        &self,
        operation: &str,
        query: &[(&str, &str)],
        form: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        tracing::debug!(operation, ?query, "sending POST request");
        let response = self
            .http
            .post(self.endpoint(operation))
            .query(query)
            .form(form)
            .send()
            .map_err(|source| ApiError::Request {
                operation: operation.to_string(),
                source,
            })?;
        Self::read(operation, response)
    }
}

/// Proxy files usually hold a bare `host:port`; reqwest wants a URL.
fn proxy_url(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{proxy}")
    }
}
