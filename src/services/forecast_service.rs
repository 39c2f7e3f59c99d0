use thiserror::Error;
use tracing::{debug, info};

use crate::api::predictor::{ApiError, PredictorClient, RawClose};
use crate::models::{ForecastOutcome, PricePoint};
use crate::services::chart_service::ChartError;
use crate::session::TRAINING_STATUS;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no historical data returned for {0}")]
    EmptyHistory(String),

    #[error("no predictions returned for {0}")]
    EmptyPredictions(String),

    /// The last historical close is zero (or the division is otherwise
    /// non-finite), so an expected-change percentage cannot be shown
    #[error("current price for {ticker} is {price}; expected change is undefined")]
    DegenerateChange { ticker: String, price: f64 },

    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Expected change from `current` to `predicted`, in percent.
///
/// Returns `None` when the result is not a finite number (zero current
/// price), so callers must surface the condition instead of displaying a
/// non-numeric value.
pub fn percent_change(current: f64, predicted: f64) -> Option<f64> {
    let change = (predicted - current) / current * 100.0;
    change.is_finite().then_some(change)
}

fn reshape(series: Vec<RawClose>) -> Vec<PricePoint> {
    series
        .into_iter()
        .map(|raw| PricePoint::new(raw.date, raw.close))
        .collect()
}

/// Assemble the display outcome from the two fetched series.
///
/// Current price is the last historical close, predicted price the last
/// predicted close; both series must be non-empty and chronologically
/// ordered by the backend.
pub fn build_outcome(
    ticker: &str,
    historical: Vec<PricePoint>,
    predictions: Vec<PricePoint>,
    models_used: Vec<String>,
) -> Result<ForecastOutcome, ForecastError> {
    let current_price = historical
        .last()
        .ok_or_else(|| ForecastError::EmptyHistory(ticker.to_string()))?
        .close;
    let predicted_price = predictions
        .last()
        .ok_or_else(|| ForecastError::EmptyPredictions(ticker.to_string()))?
        .close;

    let expected_change_pct = percent_change(current_price, predicted_price).ok_or(
        ForecastError::DegenerateChange {
            ticker: ticker.to_string(),
            price: current_price,
        },
    )?;

    Ok(ForecastOutcome {
        ticker: ticker.to_string(),
        historical,
        predictions,
        current_price,
        predicted_price,
        expected_change_pct,
        models_used,
    })
}

/// Run the two sequential fetches and assemble the outcome.
///
/// The historical envelope is validated before the prediction request is
/// issued; a backend failure there aborts the flow without a second call.
/// `on_progress` fires once between the calls with the updated status line.
pub async fn load_forecast(
    client: &PredictorClient,
    ticker: &str,
    mut on_progress: impl FnMut(&str),
) -> Result<ForecastOutcome, ForecastError> {
    let history = client.fetch_history(ticker).await?.into_result()?;
    debug!("fetched {} historical closes for {}", history.len(), ticker);

    on_progress(TRAINING_STATUS);

    let (predictions, models_used) = client.fetch_predictions(ticker).await?.into_result()?;
    debug!(
        "fetched {} predicted closes for {} (models: {})",
        predictions.len(),
        ticker,
        models_used.join(" + ")
    );

    let outcome = build_outcome(ticker, reshape(history), reshape(predictions), models_used)?;
    info!(
        "forecast for {}: current {:.2}, predicted {:.2}, change {:+.2}%",
        ticker, outcome.current_price, outcome.predicted_price, outcome.expected_change_pct
    );
    Ok(outcome)
}
