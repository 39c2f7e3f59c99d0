use std::fs;

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use thiserror::Error;

use crate::models::PricePoint;
use crate::utils::format::format_currency;

/// Solid series: historical closes (indigo)
const HISTORICAL_COLOR: RGBColor = RGBColor(0x66, 0x7e, 0xea);
/// Dashed series: predicted closes (pink)
const PREDICTED_COLOR: RGBColor = RGBColor(0xf0, 0x93, 0xfb);

/// Chart output size in pixels
#[derive(Debug, Clone, Copy)]
pub struct ChartDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        ChartDimensions {
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("not enough price data to generate chart (minimum 2 points required)")]
    NotEnoughData,

    #[error("failed to render chart: {0}")]
    Render(String),

    #[error("failed to read rendered chart: {0}")]
    Io(#[from] std::io::Error),
}

/// Lowest and highest close across all given series
pub fn price_bounds<'a>(series: impl IntoIterator<Item = &'a PricePoint>) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for point in series {
        bounds = Some(match bounds {
            None => (point.close, point.close),
            Some((min, max)) => (min.min(point.close), max.max(point.close)),
        });
    }
    bounds
}

/// Pad the price range by 10% on each side, clamping the floor at zero
pub fn padded_bounds(min: f64, max: f64) -> (f64, f64) {
    let range = (max - min).max(1e-8);
    let padding = range * 0.1;
    ((min - padding).max(0.0), max + padding)
}

/// Full date span covered by both series, first historical date to last
/// predicted date
pub fn date_span(
    historical: &[PricePoint],
    predictions: &[PricePoint],
) -> Option<(NaiveDate, NaiveDate)> {
    let start = historical.first().or_else(|| predictions.first())?.date;
    let end = predictions.last().or_else(|| historical.last())?.date;
    Some((start, end))
}

/// Render the dual-series forecast chart as PNG bytes.
///
/// Historical closes draw as a solid line with a light area fill,
/// predictions as a dashed line, both over a shared time axis with
/// currency-formatted price labels.
pub fn render_forecast_chart(
    historical: &[PricePoint],
    predictions: &[PricePoint],
    ticker: &str,
    dimensions: ChartDimensions,
) -> Result<Vec<u8>, ChartError> {
    if historical.len() < 2 {
        return Err(ChartError::NotEnoughData);
    }

    let (min_price, max_price) = price_bounds(historical.iter().chain(predictions.iter()))
        .ok_or(ChartError::NotEnoughData)?;
    let (y_min, y_max) = padded_bounds(min_price, max_price);
    let (x_min, x_max) = date_span(historical, predictions).ok_or(ChartError::NotEnoughData)?;

    let temp_file = std::env::temp_dir().join(format!(
        "tickerscope_chart_{}_{}.png",
        ticker,
        std::process::id()
    ));

    {
        let root = BitMapBackend::new(&temp_file, (dimensions.width, dimensions.height))
            .into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} Stock Price Prediction", ticker),
                ("sans-serif", 40.0).into_font(),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price ($)")
            .x_label_formatter(&|d: &NaiveDate| d.format("%b %d").to_string())
            .y_label_formatter(&|v: &f64| format_currency(*v))
            .draw()
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .draw_series(AreaSeries::new(
                historical.iter().map(|p| (p.date, p.close)),
                y_min,
                HISTORICAL_COLOR.mix(0.1),
            ))
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .draw_series(LineSeries::new(
                historical.iter().map(|p| (p.date, p.close)),
                HISTORICAL_COLOR.stroke_width(2),
            ))
            .map_err(|e| ChartError::Render(e.to_string()))?
            .label("Historical Price")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], HISTORICAL_COLOR.stroke_width(2))
            });

        if !predictions.is_empty() {
            chart
                .draw_series(AreaSeries::new(
                    predictions.iter().map(|p| (p.date, p.close)),
                    y_min,
                    PREDICTED_COLOR.mix(0.1),
                ))
                .map_err(|e| ChartError::Render(e.to_string()))?;

            chart
                .draw_series(DashedLineSeries::new(
                    predictions.iter().map(|p| (p.date, p.close)),
                    5,
                    5,
                    PREDICTED_COLOR.stroke_width(2),
                ))
                .map_err(|e| ChartError::Render(e.to_string()))?
                .label("Predicted Price (3 months)")
                .legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], PREDICTED_COLOR.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| ChartError::Render(e.to_string()))?;

        root.present()
            .map_err(|e| ChartError::Render(e.to_string()))?;
    }

    let image_data = fs::read(&temp_file)?;
    let _ = fs::remove_file(&temp_file);

    Ok(image_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint::new(date.parse().unwrap(), close)
    }

    #[test]
    fn test_price_bounds_across_series() {
        let historical = vec![point("2026-07-01", 100.0), point("2026-07-02", 95.0)];
        let predictions = vec![point("2026-07-03", 120.0)];
        let bounds = price_bounds(historical.iter().chain(predictions.iter()));
        assert_eq!(bounds, Some((95.0, 120.0)));
    }

    #[test]
    fn test_price_bounds_empty() {
        let empty: Vec<PricePoint> = Vec::new();
        assert_eq!(price_bounds(&empty), None);
    }

    #[test]
    fn test_padded_bounds() {
        let (min, max) = padded_bounds(100.0, 200.0);
        assert_eq!(min, 90.0);
        assert_eq!(max, 210.0);
    }

    #[test]
    fn test_padded_bounds_floor_clamps_at_zero() {
        let (min, max) = padded_bounds(0.0, 10.0);
        assert_eq!(min, 0.0);
        assert_eq!(max, 11.0);
    }

    #[test]
    fn test_date_span_covers_both_series() {
        let historical = vec![point("2026-01-01", 1.0), point("2026-06-01", 2.0)];
        let predictions = vec![point("2026-06-02", 3.0), point("2026-09-01", 4.0)];
        let (start, end) = date_span(&historical, &predictions).unwrap();
        assert_eq!(start.to_string(), "2026-01-01");
        assert_eq!(end.to_string(), "2026-09-01");
    }

    #[test]
    fn test_date_span_without_predictions() {
        let historical = vec![point("2026-01-01", 1.0), point("2026-06-01", 2.0)];
        let (start, end) = date_span(&historical, &[]).unwrap();
        assert_eq!(start.to_string(), "2026-01-01");
        assert_eq!(end.to_string(), "2026-06-01");
    }

    #[test]
    fn test_render_rejects_short_history() {
        let historical = vec![point("2026-07-01", 100.0)];
        let err = render_forecast_chart(&historical, &[], "AAPL", ChartDimensions::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::NotEnoughData));
    }
}
