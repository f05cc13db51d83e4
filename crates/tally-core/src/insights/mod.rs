//! Insight Engine - Proactive Spending Insights
//!
//! A pluggable set of analyzers that look at the ledger and surface what is
//! worth knowing about the month in progress and the one ahead.
//!
//! ## Core Insight Types
//!
//! - **Budget Pace** - Spend so far against the monthly budget
//! - **Month-End Projection** - Where the current month will land
//! - **Next-Month Projection** - Forecast for the coming month
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::insights::{AnalysisContext, InsightEngine};
//!
//! let records = ledger.records();
//! let engine = InsightEngine::new();
//! let ctx = AnalysisContext::new(&records, now, settings.monthly_budget)
//!     .with_budgets(ledger.budgets());
//! let findings = engine.analyze_all(&ctx)?;
//! ```

pub mod budget_pace;
pub mod engine;
pub mod month_end_projection;
pub mod next_month_projection;
pub mod types;

pub use budget_pace::BudgetPaceInsight;
pub use engine::{AnalysisContext, Insight, InsightEngine};
pub use month_end_projection::MonthEndProjectionInsight;
pub use next_month_projection::NextMonthProjectionInsight;
pub use types::{Finding, InsightType, Severity};
