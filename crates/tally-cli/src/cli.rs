//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tally_core::ImportFormat;

/// Tally - Track expenses and see where the month is heading
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Local expense tracker with spending forecasts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file (defaults to `ledger.path` from settings)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Settings file (defaults to ~/.config/tally/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger and seed default categories
    Init,

    /// Import expenses from a CSV or JSON export
    Import {
        /// File to import
        #[arg(short, long)]
        file: PathBuf,

        /// File format (detected from the extension if not specified)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Record a single expense
    Add {
        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Category name (must already exist)
        #[arg(short, long)]
        category: String,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(short, long)]
        date: Option<String>,

        /// What the money was spent on
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Manage expenses (list, edit, delete)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage categories (list, add, delete)
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Show or set the monthly budget
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Forecast spending
    Forecast {
        #[command(subcommand)]
        action: ForecastAction,
    },

    /// Show this month at a glance: spending, budget, forecasts and insights
    Dashboard {
        /// Reference date (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Change fields of an expense
    Edit {
        /// Expense ID
        id: i64,

        #[arg(short, long)]
        amount: Option<f64>,

        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories with this month's spending
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// Hex colour (e.g., "#3B82F6"); the next palette colour if omitted
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category and every expense in it
    Delete {
        /// Category name
        name: String,

        /// Confirm deleting the category's expenses
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show the budget in effect and how this month compares
    Show {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Set the budget for a month
    Set {
        /// Spending limit
        limit: f64,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ForecastAction {
    /// Project the total for the month in progress
    Month {
        /// Reference date (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Project next month's total from monthly history
    Next,
}

/// Import file format
#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ImportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ImportFormat::Csv,
            FormatArg::Json => ImportFormat::Json,
        }
    }
}
