//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budget` - Budget commands (show, set)
//! - `categories` - Category commands (list, add, delete)
//! - `core` - Init command and shared utilities (load_settings, open_ledger)
//! - `dashboard` - Monthly overview with insights
//! - `expenses` - Expense commands (add, list, edit, delete)
//! - `forecast` - Forecast commands (month, next)
//! - `import` - CSV/JSON import

pub mod budget;
pub mod categories;
pub mod core;
pub mod dashboard;
pub mod expenses;
pub mod forecast;
pub mod import;

// Re-export command functions for main.rs
pub use budget::*;
pub use categories::*;
pub use self::core::*;
pub use dashboard::*;
pub use expenses::*;
pub use forecast::*;
pub use import::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Text bar for a percentage, e.g. `[█████░░░░░]`
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
