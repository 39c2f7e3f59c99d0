use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{ApiError, HistoryResponse, PredictionResponse};

/// HTTP client for the stock prediction service
pub struct PredictorClient {
    http_client: HttpClient,
    base_url: String,
}

impl PredictorClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000";

    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/data?ticker=<symbol>
    ///
    /// Full close-price history for a ticker. The ticker is percent-encoded
    /// by the query builder.
    pub async fn fetch_history(&self, ticker: &str) -> Result<HistoryResponse, ApiError> {
        self.get_envelope("/api/data", ticker).await
    }

    /// GET /api/predict?ticker=<symbol>
    ///
    /// Model predictions for the next 3 months, plus the model names used.
    pub async fn fetch_predictions(&self, ticker: &str) -> Result<PredictionResponse, ApiError> {
        self.get_envelope("/api/predict", ticker).await
    }

    /// Fetch and decode one envelope. The backend wraps errors in the same
    /// JSON envelope on 4xx/5xx statuses, so the body is decoded before the
    /// status is consulted; a non-envelope body on a failed status maps to
    /// an HTTP error instead of a parse error.
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        ticker: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ticker={}", url, ticker);

        let response = self
            .http_client
            .get(&url)
            .query(&[("ticker", ticker)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<T>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => {
                Err(ApiError::Http(status.as_u16(), truncate_body(&body)))
            }
            Err(e) => Err(ApiError::Deserialization(e)),
        }
    }
}

/// Keep error bodies short enough for a terminal line
fn truncate_body(body: &str) -> String {
    const MAX_LEN: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
