//! Category command implementations

use anyhow::Result;
use chrono::NaiveDateTime;
use tally_core::{Ledger, MonthKey, Settings};

use super::{print_json, save_ledger, truncate};

/// List categories with spending for the month containing `now`
pub fn cmd_categories_list(
    ledger: &Ledger,
    settings: &Settings,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let month = MonthKey::of(&now);
    let (from, to) = month
        .date_range()
        .ok_or_else(|| anyhow::anyhow!("Invalid month: {}", month))?;
    let totals = ledger.category_totals(from, to);

    if json {
        return print_json(&totals);
    }

    if totals.is_empty() {
        println!("No categories found. Run 'tally init' to seed the defaults.");
        return Ok(());
    }

    let symbol = settings.currency_symbol();

    println!();
    println!("🗂️  Categories ({})", month);
    println!("   ─────────────────────────────────────────────────────────────");

    for total in &totals {
        println!(
            "   • {:<20} [{}]  {:>10}  {:>5.1}%  ({} expenses)",
            truncate(&total.name, 20),
            total.color,
            format!("{}{:.2}", symbol, total.total_spent),
            total.percentage,
            total.expense_count
        );
    }

    Ok(())
}

pub fn cmd_categories_add(
    ledger: &mut Ledger,
    name: &str,
    color: Option<&str>,
    json: bool,
) -> Result<()> {
    let category = ledger.add_category(name, color)?.clone();
    save_ledger(ledger)?;

    if json {
        return print_json(&category);
    }

    println!("✅ Created category '{}' [{}]", category.name, category.color);
    Ok(())
}

/// Delete a category. Deleting one that still has expenses requires `confirmed`.
pub fn cmd_categories_delete(
    ledger: &mut Ledger,
    name: &str,
    confirmed: bool,
    json: bool,
) -> Result<()> {
    let canonical = ledger
        .category(name)
        .map(|c| c.name.clone())
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", name))?;

    let count = ledger
        .expenses()
        .iter()
        .filter(|e| e.category.eq_ignore_ascii_case(&canonical))
        .count();

    if count > 0 && !confirmed {
        anyhow::bail!(
            "Category '{}' has {} expenses that would be deleted with it.\n\
             Re-run with --yes to confirm.",
            canonical,
            count
        );
    }

    let removed = ledger.delete_category(&canonical)?;
    save_ledger(ledger)?;

    if json {
        return print_json(&serde_json::json!({
            "category": canonical,
            "expensesRemoved": removed,
        }));
    }

    println!("🗑️  Deleted category '{}'", canonical);
    if removed > 0 {
        println!("   Removed {} expenses", removed);
    }
    Ok(())
}
