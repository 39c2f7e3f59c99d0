/// Format a price value with a leading dollar sign and two decimals
///
/// Examples: `0.0` -> `"$0.00"`, `1234.5` -> `"$1234.50"`
pub fn format_currency(value: f64) -> String {
    format!("${:.2}", value)
}

/// Format a percentage with two decimals and an explicit sign
///
/// Non-negative values (including zero) carry a leading `+`, negative
/// values keep the minus from numeric formatting.
/// Examples: `0.0` -> `"+0.00%"`, `-3.2` -> `"-3.20%"`
pub fn format_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}
