//! Current-month projection from daily cumulative spend
//!
//! Fits a line through the cumulative totals of the days elapsed so far and
//! blends its month-end value with a flat daily-average extrapolation. The
//! result never drops below what has already been spent.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ExpenseRecord, MonthKey};

use super::series::{cumulative, daily_totals};
use super::stats::{fit_line, round_half_up};

const INSUFFICIENT_DATA_MESSAGE: &str = "Insufficient data for daily trend. Showing current total.";

/// Which path produced an intra-month forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntraMonthBasis {
    /// Fewer than two elapsed days; the forecast is the running total
    InsufficientData,
    /// Average of the regression and daily-average estimates
    Blended,
    /// The blend came in under the running total and was raised to it
    ClampedToCurrent,
}

/// Projected total for the month containing the reference instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntraMonthForecast {
    pub month: MonthKey,
    pub forecast: f64,
    pub current_total: f64,
    pub today: u32,
    pub days_in_month: u32,
    pub daily_totals: Vec<f64>,
    pub cumulative: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept: Option<f64>,
    pub basis: IntraMonthBasis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Forecast the end-of-month total for the month containing `now`.
///
/// Records outside that month are ignored; an empty or unrelated collection
/// yields a current total of zero.
pub fn forecast_current_month(records: &[ExpenseRecord], now: NaiveDateTime) -> IntraMonthForecast {
    let month = MonthKey::of(&now);
    let days_in_month = month.days_in_month();
    let today = now.day();

    let daily = daily_totals(records, month);
    let cumulative = cumulative(&daily);
    let elapsed = &cumulative[..today as usize];
    let current_total = elapsed.last().copied().unwrap_or(0.0);

    if today < 2 {
        debug!(month = %month, current_total, "Intra-month forecast: insufficient data");
        return IntraMonthForecast {
            month,
            forecast: current_total,
            current_total,
            today,
            days_in_month,
            daily_totals: daily,
            cumulative,
            slope: None,
            intercept: None,
            basis: IntraMonthBasis::InsufficientData,
            message: Some(INSUFFICIENT_DATA_MESSAGE.to_string()),
        };
    }

    let x: Vec<f64> = (1..=today).map(f64::from).collect();
    let fit = fit_line(&x, elapsed);

    let regression = fit.predict(f64::from(days_in_month));
    let extrapolated = current_total / f64::from(today) * f64::from(days_in_month);
    let mut forecast = round_half_up((regression + extrapolated) / 2.0);
    let mut basis = IntraMonthBasis::Blended;

    if forecast < current_total {
        forecast = round_half_up(current_total);
        basis = IntraMonthBasis::ClampedToCurrent;
    }

    debug!(
        month = %month,
        today,
        current_total,
        regression,
        extrapolated,
        forecast,
        "Intra-month forecast"
    );

    IntraMonthForecast {
        month,
        forecast,
        current_total,
        today,
        days_in_month,
        daily_totals: daily,
        cumulative,
        slope: Some(fit.slope),
        intercept: Some(fit.intercept),
        basis,
        message: None,
    }
}

/// [`forecast_current_month`] against the local wall clock
pub fn forecast_current_month_now(records: &[ExpenseRecord]) -> IntraMonthForecast {
    forecast_current_month(records, chrono::Local::now().naive_local())
}
