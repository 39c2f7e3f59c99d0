use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Fallback message when the backend reports failure without an error string
pub const HISTORY_FALLBACK_ERROR: &str = "Failed to fetch historical data";
pub const PREDICT_FALLBACK_ERROR: &str = "Failed to generate predictions";

/// Model name assumed when the backend omits `models_used`
pub const DEFAULT_MODEL: &str = "LSTM";

/// One close price as serialized by the backend (`date` is `YYYY-MM-DD`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Envelope from `GET /api/data`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub historical: Vec<RawClose>,
}

impl HistoryResponse {
    /// Unwrap the envelope, mapping `success: false` to a backend error
    pub fn into_result(self) -> Result<Vec<RawClose>, ApiError> {
        if self.success {
            Ok(self.historical)
        } else {
            Err(ApiError::Backend(
                self.error
                    .unwrap_or_else(|| HISTORY_FALLBACK_ERROR.to_string()),
            ))
        }
    }
}

/// Envelope from `GET /api/predict`
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub predictions: Vec<RawClose>,
    #[serde(default)]
    pub models_used: Vec<String>,
}

impl PredictionResponse {
    /// Unwrap the envelope into the prediction series and the model names,
    /// defaulting to a single fixed model name when the backend omits them
    pub fn into_result(self) -> Result<(Vec<RawClose>, Vec<String>), ApiError> {
        if !self.success {
            return Err(ApiError::Backend(
                self.error
                    .unwrap_or_else(|| PREDICT_FALLBACK_ERROR.to_string()),
            ));
        }
        let models = if self.models_used.is_empty() {
            vec![DEFAULT_MODEL.to_string()]
        } else {
            self.models_used
        };
        Ok((self.predictions, models))
    }
}

/// Errors from talking to the prediction service
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with `success: false`
    #[error("{0}")]
    Backend(String),

    /// Non-success HTTP status with a body that was not a valid envelope
    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Deserialization(#[from] serde_json::Error),
}
