//! Budget command implementations

use anyhow::Result;
use tally_core::{forecast_next_month, BudgetStatus, Ledger, MonthKey, Projection, Settings};

use super::{effective_budget, print_json, progress_bar, save_ledger};

/// Budget, spend and next-month outlook for `month`
pub fn budget_status(ledger: &Ledger, settings: &Settings, month: MonthKey) -> BudgetStatus {
    let limit = effective_budget(ledger, settings, month);
    let status = BudgetStatus::evaluate(month, limit, ledger.spent_in(month));

    match forecast_next_month(&ledger.records()) {
        Some(forecast) => status.with_projection(Projection::new(
            forecast.target,
            forecast.forecast,
            effective_budget(ledger, settings, forecast.target),
        )),
        None => status,
    }
}

pub fn cmd_budget_show(
    ledger: &Ledger,
    settings: &Settings,
    month: MonthKey,
    json: bool,
) -> Result<()> {
    let status = budget_status(ledger, settings, month);

    if json {
        return print_json(&status);
    }

    let symbol = settings.currency_symbol();
    let source = if ledger.budget_for(month).is_some() {
        "ledger"
    } else {
        "settings default"
    };

    println!();
    println!("💰 Budget for {}", month);
    println!("   ─────────────────────────────");
    println!("   Limit:     {}{:.2} ({})", symbol, status.limit, source);
    println!("   Spent:     {}{:.2}", symbol, status.spent);
    println!("   Remaining: {}{:.2}", symbol, status.remaining);
    println!(
        "   {} {:.0}%",
        progress_bar(status.percent_used, 20),
        status.percent_used
    );

    if status.is_over() {
        println!("   🚨 Over budget");
    } else if status.is_near_limit() {
        println!("   👀 Approaching the limit");
    }

    if let Some(projection) = &status.projection {
        println!();
        println!(
            "   Forecast for {}: {}{:.0} (budget {}{:.2})",
            projection.month, symbol, projection.forecast, symbol, projection.limit
        );
    }
    if let Some(message) = status.overrun_message(symbol) {
        println!("   ⚠️  {}", message);
    }

    Ok(())
}

pub fn cmd_budget_set(
    ledger: &mut Ledger,
    settings: &Settings,
    limit: f64,
    month: MonthKey,
    json: bool,
) -> Result<()> {
    ledger.set_budget(month, limit)?;
    save_ledger(ledger)?;

    if json {
        return print_json(&serde_json::json!({ "month": month, "limit": limit }));
    }

    println!(
        "✅ Budget for {} set to {}{:.2}",
        month,
        settings.currency_symbol(),
        limit
    );
    println!("   Later months without their own budget use this one.");
    Ok(())
}
