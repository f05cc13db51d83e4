//! Spending Forecast Engine
//!
//! Two independent, stateless forecasters over the same kind of input:
//!
//! - **Intra-month** - projects the current month's end-of-month total from
//!   the cumulative spend of the days elapsed so far
//! - **Cross-month** - projects next month's total from the history of
//!   monthly totals
//!
//! Both are pure functions of a record slice (plus a reference instant for
//! the intra-month forecaster). Nothing is cached; callers re-run them
//! whenever the underlying expenses change.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::forecast::{forecast_current_month, forecast_next_month};
//!
//! let records = ledger.records();
//! let this_month = forecast_current_month(&records, now);
//! let next_month = forecast_next_month(&records);
//! ```

pub mod cross_month;
pub mod intra_month;
pub mod series;
pub mod stats;

pub use cross_month::{forecast_next_month, CrossMonthBasis, CrossMonthForecast};
pub use intra_month::{
    forecast_current_month, forecast_current_month_now, IntraMonthBasis, IntraMonthForecast,
};
pub use stats::LinearFit;
