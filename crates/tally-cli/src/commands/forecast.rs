//! Forecast command implementations

use anyhow::Result;
use chrono::NaiveDateTime;
use tally_core::{
    forecast_current_month, forecast_next_month, CrossMonthBasis, Ledger, Projection, Settings,
};

use super::{effective_budget, print_json};

pub fn cmd_forecast_month(
    ledger: &Ledger,
    settings: &Settings,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let forecast = forecast_current_month(&ledger.records(), now);

    if json {
        return print_json(&forecast);
    }

    let symbol = settings.currency_symbol();
    let budget = effective_budget(ledger, settings, forecast.month);

    println!();
    println!("📈 Month-End Forecast ({})", forecast.month);
    println!("   ─────────────────────────────");
    println!(
        "   Spent so far: {}{:.2} (day {} of {})",
        symbol, forecast.current_total, forecast.today, forecast.days_in_month
    );
    println!("   Projected:    {}{:.0}", symbol, forecast.forecast);
    if let Some(slope) = forecast.slope {
        println!("   Trend:        {}{:.2}/day", symbol, slope);
    }
    if let Some(message) = &forecast.message {
        println!("   ℹ️  {}", message);
    }

    println!();
    if forecast.forecast > budget {
        println!(
            "   ⚠️  On pace to exceed the {}{:.2} budget by {}{:.2}",
            symbol,
            budget,
            symbol,
            forecast.forecast - budget
        );
    } else {
        println!("   ✅ On track for the {}{:.2} budget", symbol, budget);
    }

    Ok(())
}

pub fn cmd_forecast_next(ledger: &Ledger, settings: &Settings, json: bool) -> Result<()> {
    let Some(forecast) = forecast_next_month(&ledger.records()) else {
        if json {
            return print_json(&serde_json::Value::Null);
        }
        println!("No expenses yet. Import some with:");
        println!("  tally import --file expenses.csv");
        return Ok(());
    };

    if json {
        return print_json(&forecast);
    }

    let symbol = settings.currency_symbol();

    println!();
    println!("🔮 Next Month Forecast ({})", forecast.target);
    println!("   ─────────────────────────────");
    for (month, total) in &forecast.monthly_totals {
        println!("   {}  {:>12}", month, format!("{}{:.2}", symbol, total));
    }
    println!("   ─────────────────────────────");

    if forecast.basis != CrossMonthBasis::SingleMonth {
        if let Some(moving_average) = forecast.moving_average {
            println!("   Moving average: {}{:.0}", symbol, moving_average);
        }
        if let Some(median) = forecast.median {
            println!("   Median:         {}{:.0}", symbol, median);
        }
        if let (Some(slope), Some(intercept)) = (forecast.slope, forecast.intercept) {
            let next = (forecast.months.len() + 1) as f64;
            println!(
                "   Trend:          {}{:.0} ({:+.2}/month)",
                symbol,
                slope * next + intercept,
                slope
            );
        }
    }
    println!("   Forecast:       {}{:.0}", symbol, forecast.forecast);
    println!("   ℹ️  {}", forecast.message);

    let projection = Projection::new(
        forecast.target,
        forecast.forecast,
        effective_budget(ledger, settings, forecast.target),
    );
    if let Some(message) = projection.overrun_message(symbol) {
        println!("   ⚠️  {}", message);
    }

    Ok(())
}
