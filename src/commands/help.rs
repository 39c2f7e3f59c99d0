/// Print prompt usage
pub fn execute() -> Result<(), String> {
    println!("📖 tickerscope commands");
    println!();
    println!("  <TICKER>     Fetch price history and 3-month predictions,");
    println!("               render the forecast chart (e.g. AAPL)");
    println!("  help         Show this message");
    println!("  quit, exit   Leave the prompt");
    println!();
    println!("The chart is written as a PNG file and replaced on each new forecast.");
    Ok(())
}
