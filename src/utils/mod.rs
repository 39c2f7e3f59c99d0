pub mod format;
pub mod panel;

pub use format::{format_currency, format_percent};
pub use panel::Panel;
