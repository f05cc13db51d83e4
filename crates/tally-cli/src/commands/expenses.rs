//! Expense command implementations (add, list, edit, delete)

use anyhow::Result;
use chrono::NaiveDateTime;
use tally_core::models::ExpenseUpdate;
use tally_core::{Ledger, MonthKey, NewExpense, Settings};

use super::{effective_budget, print_json, save_ledger, truncate};

pub fn cmd_add(
    ledger: &mut Ledger,
    settings: &Settings,
    amount: f64,
    category: &str,
    date: NaiveDateTime,
    description: &str,
    json: bool,
) -> Result<()> {
    let id = ledger.add_expense(NewExpense::new(date, category, amount, description))?;
    save_ledger(ledger)?;

    if json {
        return print_json(&ledger.expense(id));
    }

    let symbol = settings.currency_symbol();
    let category = ledger
        .expense(id)
        .map(|e| e.category.as_str())
        .unwrap_or(category);
    println!(
        "✅ Added expense #{}: {}{:.2} in {}",
        id, symbol, amount, category
    );

    let month = MonthKey::of(&date);
    let spent = ledger.spent_in(month);
    let budget = effective_budget(ledger, settings, month);
    println!(
        "   {} so far: {}{:.2} of {}{:.2}",
        month, symbol, spent, symbol, budget
    );
    if spent > budget {
        println!("   🚨 Over budget by {}{:.2}", symbol, spent - budget);
    }

    Ok(())
}

pub fn cmd_expenses_list(
    ledger: &Ledger,
    settings: &Settings,
    category: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    if let Some(name) = category {
        if ledger.category(name).is_none() {
            anyhow::bail!("Category not found: {}", name);
        }
    }

    let expenses = ledger.list_expenses(category, limit);

    if json {
        return print_json(&expenses);
    }

    if expenses.is_empty() {
        println!("No expenses found. Add one with:");
        println!("  tally add --amount 12.50 --category \"Food & Dining\"");
        return Ok(());
    }

    let symbol = settings.currency_symbol();

    println!();
    println!("📋 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>5}  {:<10}  {:<18}  {:>10}  Description",
        "ID", "Date", "Category", "Amount"
    );

    for expense in &expenses {
        println!(
            "   {:>5}  {:<10}  {:<18}  {:>10}  {}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            truncate(&expense.category, 18),
            format!("{}{:.2}", symbol, expense.amount),
            truncate(&expense.description, 30)
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {} shown, totalling {}{:.2}",
        expenses.len(),
        symbol,
        total
    );

    Ok(())
}

pub fn cmd_expenses_edit(
    ledger: &mut Ledger,
    id: i64,
    update: ExpenseUpdate,
    json: bool,
) -> Result<()> {
    if update.date.is_none()
        && update.category.is_none()
        && update.amount.is_none()
        && update.description.is_none()
    {
        anyhow::bail!(
            "Nothing to change. Pass at least one of --amount, --category, --date, --description"
        );
    }

    ledger.update_expense(id, update)?;
    save_ledger(ledger)?;

    if json {
        return print_json(&ledger.expense(id));
    }

    println!("✅ Updated expense #{}", id);
    Ok(())
}

pub fn cmd_expenses_delete(ledger: &mut Ledger, id: i64, json: bool) -> Result<()> {
    let removed = ledger.delete_expense(id)?;
    save_ledger(ledger)?;

    if json {
        return print_json(&removed);
    }

    println!(
        "🗑️  Deleted expense #{} ({} on {})",
        removed.id,
        removed.category,
        removed.date.format("%Y-%m-%d")
    );
    Ok(())
}
