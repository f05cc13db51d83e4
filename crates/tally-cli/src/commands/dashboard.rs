//! Dashboard command implementation

use anyhow::Result;
use chrono::NaiveDateTime;
use tally_core::{
    forecast_current_month, forecast_next_month, AnalysisContext, ExpenseRecord, InsightEngine,
    Ledger, MonthKey, Settings, Severity,
};

use super::{budget_status, print_json, progress_bar, truncate};

/// Number of categories shown in the breakdown
const TOP_CATEGORIES: usize = 5;

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Alert => "🚨",
        Severity::Warning => "⚠️ ",
        Severity::Attention => "👀",
        Severity::Info => "ℹ️ ",
    }
}

/// Context for the insight engine, resolving each month's budget from the
/// ledger with the settings default as fallback
pub fn analysis_context<'a>(
    ledger: &'a Ledger,
    settings: &Settings,
    records: &'a [ExpenseRecord],
    now: NaiveDateTime,
) -> AnalysisContext<'a> {
    AnalysisContext::new(records, now, settings.monthly_budget)
        .with_budgets(ledger.budgets())
        .with_currency_symbol(settings.currency_symbol())
}

pub fn cmd_dashboard(
    ledger: &Ledger,
    settings: &Settings,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let month = MonthKey::of(&now);
    let records = ledger.records();
    let symbol = settings.currency_symbol();

    let status = budget_status(ledger, settings, month);
    let month_end = forecast_current_month(&records, now);
    let next_month = forecast_next_month(&records);

    let (from, to) = month
        .date_range()
        .ok_or_else(|| anyhow::anyhow!("Invalid month: {}", month))?;
    let categories = ledger.category_totals(from, to);

    let ctx = analysis_context(ledger, settings, &records, now);
    let findings = InsightEngine::new().analyze_all(&ctx)?;

    if json {
        return print_json(&serde_json::json!({
            "month": month,
            "budget": status,
            "monthEnd": month_end,
            "nextMonth": next_month,
            "categories": categories,
            "insights": findings,
        }));
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Tally Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Month:           {}", month);
    println!(
        "  Spent:           {}{:.2} of {}{:.2}",
        symbol, status.spent, symbol, status.limit
    );
    println!(
        "  Budget used:     {} {:.0}%",
        progress_bar(status.percent_used, 20),
        status.percent_used
    );
    println!();
    println!(
        "  📈 Month-end projection: {}{:.0}",
        symbol, month_end.forecast
    );
    match &next_month {
        Some(forecast) => println!(
            "  🔮 Next month ({}):   {}{:.0}",
            forecast.target, symbol, forecast.forecast
        ),
        None => println!("  🔮 Next month:           (no history yet)"),
    }

    let spending: Vec<_> = categories
        .iter()
        .filter(|c| c.total_spent > 0.0)
        .take(TOP_CATEGORIES)
        .collect();
    if !spending.is_empty() {
        println!();
        println!("  Top categories");
        for category in spending {
            println!(
                "    {:<20} {:>10}  {:>5.1}%",
                truncate(&category.name, 20),
                format!("{}{:.2}", symbol, category.total_spent),
                category.percentage
            );
        }
    }

    println!();
    if findings.is_empty() {
        println!("  ✅ Nothing needs attention.");
    } else {
        println!("  Insights");
        for finding in &findings {
            println!("    {} {}", severity_icon(finding.severity), finding.summary);
            if let Some(detail) = &finding.detail {
                println!("       {}", detail);
            }
        }
    }
    println!();

    Ok(())
}
