//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Spending forecast engine (current month and next month)
//! - JSON ledger of categories, expenses and monthly budgets
//! - CSV/JSON import with deduplication
//! - Budget status and dashboard insights
//! - Settings with embedded defaults and a platform override file

pub mod budget;
pub mod error;
pub mod forecast;
pub mod import;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod settings;

/// Record and date builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use budget::{budget_in_effect, BudgetStatus, Projection};
pub use error::{Error, Result};
pub use forecast::{
    forecast_current_month, forecast_current_month_now, forecast_next_month, CrossMonthBasis,
    CrossMonthForecast, IntraMonthBasis, IntraMonthForecast, LinearFit,
};
pub use import::{ImportFormat, ParsedImport};
pub use insights::{AnalysisContext, Finding, Insight, InsightEngine, InsightType, Severity};
pub use ledger::{ImportStats, Ledger};
pub use models::{
    Budget, Category, CategoryTotal, Expense, ExpenseRecord, ExpenseUpdate, MonthKey, NewExpense,
};
pub use settings::Settings;
