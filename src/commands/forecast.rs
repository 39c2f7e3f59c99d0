use std::path::Path;

use tracing::{error, info, warn};

use crate::api::predictor::PredictorClient;
use crate::models::ForecastOutcome;
use crate::services::chart_service::{self, ChartDimensions};
use crate::services::forecast_service::{self, ForecastError};
use crate::session::{SessionView, ViewState};
use crate::utils::{format_currency, format_percent, Panel};

/// Normalize raw prompt input into a ticker symbol: trimmed and
/// upper-cased, `None` when nothing is left
pub fn normalize_ticker(input: &str) -> Option<String> {
    let ticker = input.trim().to_uppercase();
    if ticker.is_empty() {
        None
    } else {
        Some(ticker)
    }
}

/// Run the full forecast flow for one submission: loading state, the two
/// sequential fetches, stats assembly, chart render, ready state.
pub async fn execute(
    session: &mut SessionView,
    client: &PredictorClient,
    dimensions: ChartDimensions,
    input: &str,
) -> Result<(), String> {
    let Some(ticker) = normalize_ticker(input) else {
        // Validation stops here: no request goes out, the session keeps
        // whatever it was showing
        println!("⚠️  Please enter a stock ticker symbol");
        return Ok(());
    };

    info!("💹 Forecast requested for {}", ticker);
    let token = session.begin_flow(&ticker);
    if let ViewState::Loading { status } = session.state() {
        println!("⏳ {}", status);
    }

    let result = run_flow(client, &ticker, dimensions, |status| {
        println!("⏳ {}", status);
        session.set_status(&token, status);
    })
    .await;

    let (outcome, png) = match result {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Error loading forecast for {}: {}", ticker, e);
            session.fail(&token, e.to_string());
            return Err(e.to_string());
        }
    };

    let chart_path = match session.install_chart(&token, &ticker, &png) {
        Ok(Some(path)) => path,
        Ok(None) => {
            warn!("Forecast for {} was superseded; nothing to show", ticker);
            return Ok(());
        }
        Err(e) => {
            let message = format!("Failed to write chart file: {}", e);
            error!("{}", message);
            session.fail(&token, message.clone());
            return Err(message);
        }
    };

    if !session.complete(&token) {
        return Ok(());
    }

    info!(
        "✓ Forecast ready for {} ({} byte chart at {})",
        ticker,
        png.len(),
        chart_path.display()
    );
    print_outcome(&outcome, &chart_path);
    Ok(())
}

/// Fetch, assemble and render; everything past validation funnels into one
/// error type
async fn run_flow(
    client: &PredictorClient,
    ticker: &str,
    dimensions: ChartDimensions,
    on_progress: impl FnMut(&str),
) -> Result<(ForecastOutcome, Vec<u8>), ForecastError> {
    let outcome = forecast_service::load_forecast(client, ticker, on_progress).await?;
    let png = chart_service::render_forecast_chart(
        &outcome.historical,
        &outcome.predictions,
        ticker,
        dimensions,
    )?;
    Ok((outcome, png))
}

fn print_outcome(outcome: &ForecastOutcome, chart_path: &Path) {
    let change = format!(
        "{} {}",
        outcome.direction().marker(),
        format_percent(outcome.expected_change_pct)
    );

    let panel = Panel::new(format!("📊 {} Forecast", outcome.ticker))
        .field("Ticker", outcome.ticker.as_str())
        .field("Current Price", format_currency(outcome.current_price))
        .field(
            "Predicted Price (3 months)",
            format_currency(outcome.predicted_price),
        )
        .field("Expected Change", change)
        .field("Models Used", outcome.models_used.join(" + "))
        .field("Chart", chart_path.display().to_string());

    println!();
    println!("{}", panel.render());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker_trims_and_uppercases() {
        assert_eq!(normalize_ticker("  aapl \n"), Some("AAPL".to_string()));
        assert_eq!(normalize_ticker("msft"), Some("MSFT".to_string()));
    }

    #[test]
    fn test_normalize_ticker_rejects_blank_input() {
        // Blank submissions never reach the network
        assert_eq!(normalize_ticker(""), None);
        assert_eq!(normalize_ticker("   \t  "), None);
    }
}
