//! Tally CLI - Local expense tracker with spending forecasts
//!
//! Usage:
//!   tally init                      Create the ledger with default categories
//!   tally import --file FILE        Import expenses (CSV or JSON)
//!   tally add --amount 12 -c Food   Record an expense
//!   tally forecast month            Project this month's total
//!   tally forecast next             Project next month's total
//!   tally dashboard                 Budget, forecasts and insights

mod cli;
mod commands;


use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tally_core::models::ExpenseUpdate;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let settings = commands::load_settings(cli.config.as_deref())?;
    let ledger_path = commands::ledger_path(cli.ledger.as_deref(), &settings);
    let mut ledger = commands::open_ledger(&ledger_path)?;
    let json = cli.json;

    match cli.command {
        Commands::Init => commands::cmd_init(&mut ledger, json),
        Commands::Import { file, format } => {
            commands::cmd_import(&mut ledger, &file, format.map(Into::into), json)
        }
        Commands::Add {
            amount,
            category,
            date,
            description,
        } => {
            let date = commands::parse_now(date.as_deref())?;
            commands::cmd_add(
                &mut ledger,
                &settings,
                amount,
                &category,
                date,
                &description,
                json,
            )
        }
        Commands::Expenses { action } => match action {
            None => commands::cmd_expenses_list(&ledger, &settings, None, 20, json),
            Some(ExpensesAction::List { category, limit }) => {
                commands::cmd_expenses_list(&ledger, &settings, category.as_deref(), limit, json)
            }
            Some(ExpensesAction::Edit {
                id,
                amount,
                category,
                date,
                description,
            }) => {
                let date = date
                    .as_deref()
                    .map(|d| commands::parse_now(Some(d)))
                    .transpose()?;
                let update = ExpenseUpdate {
                    date,
                    category,
                    amount,
                    description,
                };
                commands::cmd_expenses_edit(&mut ledger, id, update, json)
            }
            Some(ExpensesAction::Delete { id }) => {
                commands::cmd_expenses_delete(&mut ledger, id, json)
            }
        },
        Commands::Categories { action } => match action {
            None | Some(CategoriesAction::List) => {
                commands::cmd_categories_list(&ledger, &settings, Local::now().naive_local(), json)
            }
            Some(CategoriesAction::Add { name, color }) => {
                commands::cmd_categories_add(&mut ledger, &name, color.as_deref(), json)
            }
            Some(CategoriesAction::Delete { name, yes }) => {
                commands::cmd_categories_delete(&mut ledger, &name, yes, json)
            }
        },
        Commands::Budget { action } => {
            let now = Local::now().naive_local();
            match action {
                None => {
                    let month = commands::parse_month(None, now)?;
                    commands::cmd_budget_show(&ledger, &settings, month, json)
                }
                Some(BudgetAction::Show { month }) => {
                    let month = commands::parse_month(month.as_deref(), now)?;
                    commands::cmd_budget_show(&ledger, &settings, month, json)
                }
                Some(BudgetAction::Set { limit, month }) => {
                    let month = commands::parse_month(month.as_deref(), now)?;
                    commands::cmd_budget_set(&mut ledger, &settings, limit, month, json)
                }
            }
        }
        Commands::Forecast { action } => match action {
            ForecastAction::Month { now } => {
                let now = commands::parse_now(now.as_deref())?;
                commands::cmd_forecast_month(&ledger, &settings, now, json)
            }
            ForecastAction::Next => commands::cmd_forecast_next(&ledger, &settings, json),
        },
        Commands::Dashboard { now } => {
            let now = commands::parse_now(now.as_deref())?;
            commands::cmd_dashboard(&ledger, &settings, now, json)
        }
    }
}
