pub mod forecast;
pub mod help;

use tracing::error;

use crate::api::predictor::PredictorClient;
use crate::services::chart_service::ChartDimensions;
use crate::session::SessionView;

/// What the prompt loop should do after a line is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Continue,
    Quit,
}

/// Dispatch one prompt line. Anything that is not a built-in word is
/// treated as a ticker submission. Errors from the flow funnel into one
/// error display here, and the prompt always comes back.
pub async fn handle_line(
    line: &str,
    session: &mut SessionView,
    client: &PredictorClient,
    dimensions: ChartDimensions,
) -> Disposition {
    let input = line.trim();

    let result = match input.to_lowercase().as_str() {
        "quit" | "exit" => return Disposition::Quit,
        "help" | "?" => help::execute(),
        _ => forecast::execute(session, client, dimensions, input).await,
    };

    if let Err(e) = result {
        error!("❌ Error handling input '{}': {}", input, e);
        println!();
        println!("❌ Error: {}", e);
        println!("Please try a different ticker symbol.");
    }

    Disposition::Continue
}
