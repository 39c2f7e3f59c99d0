use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod models;
mod services;
mod session;
mod utils;

use api::PredictorClient;
use services::chart_service::ChartDimensions;
use session::SessionView;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("tickerscope=info".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("📈 Starting tickerscope...");

    let base_url = std::env::var("PREDICTOR_API_URL")
        .unwrap_or_else(|_| PredictorClient::DEFAULT_BASE_URL.to_string());
    let chart_dir =
        std::env::var("CHART_OUTPUT_DIR").unwrap_or_else(|_| "charts".to_string());
    let defaults = ChartDimensions::default();
    let dimensions = ChartDimensions {
        width: env_u32("CHART_WIDTH", defaults.width),
        height: env_u32("CHART_HEIGHT", defaults.height),
    };

    let client = PredictorClient::new(base_url);
    let mut session = SessionView::new(chart_dir.clone());

    info!("Using prediction service at {}", client.base_url());
    info!("Charts will be written under {}/", chart_dir);

    println!(
        "tickerscope v{} - stock price predictions at the prompt",
        env!("CARGO_PKG_VERSION")
    );
    println!("Type a ticker symbol (e.g. AAPL), or `help` for commands.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("ticker> ");
        let _ = std::io::stdout().flush();

        match lines.next_line().await {
            Ok(Some(line)) => {
                let disposition =
                    commands::handle_line(&line, &mut session, &client, dimensions).await;
                if disposition == commands::Disposition::Quit {
                    break;
                }
                println!();
            }
            // EOF: piped input ran out
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    info!("👋 Exiting tickerscope");
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
