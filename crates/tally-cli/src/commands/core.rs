//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_settings` / `ledger_path` / `open_ledger` - Shared setup used by every command
//! - `parse_now` / `parse_month` - Date argument parsing
//! - `cmd_init` - Create the ledger and seed default categories

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tally_core::{import::parse_date, Ledger, MonthKey, Settings};

/// Load settings from `--config`, the platform override, or built-in defaults
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    Settings::load(config).context("Failed to load settings")
}

/// `--ledger` wins over the configured path
pub fn ledger_path(cli_ledger: Option<&Path>, settings: &Settings) -> PathBuf {
    cli_ledger
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.ledger_path.clone())
}

pub fn open_ledger(path: &Path) -> Result<Ledger> {
    Ledger::open(path).with_context(|| format!("Failed to open ledger: {}", path.display()))
}

/// Parse a `--now`/`--date` argument, defaulting to the local wall clock
pub fn parse_now(value: Option<&str>) -> Result<NaiveDateTime> {
    match value {
        Some(s) => parse_date(s).with_context(|| format!("Invalid date: {}", s)),
        None => Ok(Local::now().naive_local()),
    }
}

/// Parse a `--month YYYY-MM` argument, defaulting to the month containing `now`
pub fn parse_month(value: Option<&str>, now: NaiveDateTime) -> Result<MonthKey> {
    match value {
        Some(s) => s.parse::<MonthKey>().map_err(|e| anyhow::anyhow!(e)),
        None => Ok(MonthKey::of(&now)),
    }
}

/// Budget in effect for `month`: the ledger's entry, else the settings default
pub fn effective_budget(ledger: &Ledger, settings: &Settings, month: MonthKey) -> f64 {
    ledger
        .budget_for(month)
        .unwrap_or(settings.monthly_budget)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn save_ledger(ledger: &Ledger) -> Result<()> {
    ledger.save().context("Failed to save ledger")
}

pub fn cmd_init(ledger: &mut Ledger, json: bool) -> Result<()> {
    let location = ledger
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());

    let seeded = ledger.seed_default_categories();
    save_ledger(ledger)?;

    if json {
        return print_json(&serde_json::json!({
            "ledger": location,
            "seededCategories": seeded,
            "categories": ledger.categories().len(),
        }));
    }

    println!("🔧 Initializing ledger at {}...", location);
    if seeded > 0 {
        println!("   Seeded {} default categories", seeded);
    } else {
        println!("   Default categories already present");
    }
    println!("✅ Ledger ready!");
    println!();
    println!("Next steps:");
    println!("  1. Import expenses: tally import --file expenses.csv");
    println!("  2. Set a budget:    tally budget set 2000");
    println!("  3. See the outlook: tally dashboard");

    Ok(())
}
