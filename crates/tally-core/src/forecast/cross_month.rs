//! Next-month projection from monthly totals
//!
//! The estimate depends on how many months of history exist:
//! - 1 month: that month's total
//! - 2-3 months: average of the moving average and the median
//! - 4+ months: average of a linear trend, the moving average and the median

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ExpenseRecord, MonthKey};

use super::series::monthly_totals;
use super::stats::{fit_line, median, moving_average, round_half_up};

/// Number of most recent months in the moving average
pub const MOVING_AVERAGE_WINDOW: usize = 3;

/// Which estimator mix produced a cross-month forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossMonthBasis {
    SingleMonth,
    Blended,
    Ensemble,
}

/// Projected total for the month after the latest month in the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossMonthForecast {
    /// The month being forecast
    pub target: MonthKey,
    pub forecast: f64,
    pub months: Vec<MonthKey>,
    pub monthly_totals: BTreeMap<MonthKey, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    pub basis: CrossMonthBasis,
    pub message: String,
}

/// Forecast next month's total from every month in `records`.
///
/// Returns None for an empty collection.
pub fn forecast_next_month(records: &[ExpenseRecord]) -> Option<CrossMonthForecast> {
    let monthly_totals = monthly_totals(records);
    let months: Vec<MonthKey> = monthly_totals.keys().copied().collect();
    let totals: Vec<f64> = monthly_totals.values().copied().collect();
    let target = months.last()?.next();
    let n = totals.len();

    let mut result = CrossMonthForecast {
        target,
        forecast: 0.0,
        months,
        monthly_totals,
        slope: None,
        intercept: None,
        moving_average: None,
        median: None,
        basis: CrossMonthBasis::SingleMonth,
        message: String::new(),
    };

    if n == 1 {
        result.forecast = totals[0];
        result.message = "Only one month of data. Using last month's spending.".to_string();
        debug!(
            next_month = %target,
            forecast = result.forecast,
            "Cross-month forecast: single month"
        );
        return Some(result);
    }

    let avg = moving_average(&totals, MOVING_AVERAGE_WINDOW);
    let med = median(&totals);
    result.moving_average = Some(avg);
    result.median = Some(med);

    let forecast = if n <= 3 {
        result.basis = CrossMonthBasis::Blended;
        result.message = format!("Simple ML: Average of last {} months and median.", n);
        round_half_up((avg + med) / 2.0)
    } else {
        let x: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        let fit = fit_line(&x, &totals);
        let regression = fit.predict((n + 1) as f64);
        result.slope = Some(fit.slope);
        result.intercept = Some(fit.intercept);
        result.basis = CrossMonthBasis::Ensemble;
        result.message = "Ensemble of regression, moving average, and median.".to_string();
        round_half_up((regression + avg + med) / 3.0)
    };

    // A steep downward trend can extrapolate below zero
    result.forecast = forecast.max(0.0);

    debug!(
        next_month = %target,
        months = n,
        basis = ?result.basis,
        forecast = result.forecast,
        "Cross-month forecast"
    );

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{month, monthly_records, record};

    #[test]
    fn test_empty_returns_none() {
        assert!(forecast_next_month(&[]).is_none());
    }

    #[test]
    fn test_single_month_uses_total_exactly() {
        let records = vec![record(2024, 3, 2, 120.25), record(2024, 3, 20, 30.5)];
        let result = forecast_next_month(&records).unwrap();

        assert_eq!(result.forecast, 150.75);
        assert_eq!(result.basis, CrossMonthBasis::SingleMonth);
        assert_eq!(result.target, month(2024, 4));
        assert!(result.message.contains("Only one month"));
        assert!(result.slope.is_none());
    }

    #[test]
    fn test_three_months_blend() {
        let records = monthly_records(month(2024, 1), &[100.0, 200.0, 300.0]);
        let result = forecast_next_month(&records).unwrap();

        assert_eq!(result.moving_average, Some(200.0));
        assert_eq!(result.median, Some(200.0));
        assert_eq!(result.forecast, 200.0);
        assert_eq!(result.basis, CrossMonthBasis::Blended);
        assert_eq!(
            result.message,
            "Simple ML: Average of last 3 months and median."
        );
        assert!(result.slope.is_none());
    }

    #[test]
    fn test_two_months_blend() {
        let records = monthly_records(month(2024, 1), &[100.0, 201.0]);
        let result = forecast_next_month(&records).unwrap();

        // Both estimators round 150.5 up to 151
        assert_eq!(result.forecast, 151.0);
        assert_eq!(result.basis, CrossMonthBasis::Blended);
    }

    #[test]
    fn test_five_months_ensemble() {
        let records = monthly_records(month(2024, 1), &[100.0, 200.0, 300.0, 400.0, 500.0]);
        let result = forecast_next_month(&records).unwrap();

        assert!((result.slope.unwrap() - 100.0).abs() < 1e-9);
        assert!(result.intercept.unwrap().abs() < 1e-9);
        assert_eq!(result.moving_average, Some(400.0));
        assert_eq!(result.median, Some(300.0));
        // (600 + 400 + 300) / 3 = 433.33
        assert_eq!(result.forecast, 433.0);
        assert_eq!(result.basis, CrossMonthBasis::Ensemble);
        assert_eq!(result.target, month(2024, 6));
    }

    #[test]
    fn test_four_months_is_first_ensemble_case() {
        let records = monthly_records(month(2024, 1), &[100.0, 100.0, 100.0, 100.0]);
        let result = forecast_next_month(&records).unwrap();
        assert_eq!(result.basis, CrossMonthBasis::Ensemble);
        assert_eq!(result.forecast, 100.0);
    }

    #[test]
    fn test_orders_months_across_year_boundary() {
        // Records arrive newest first; grouping must still be chronological
        let records = vec![
            record(2024, 2, 1, 400.0),
            record(2024, 1, 1, 300.0),
            record(2023, 12, 1, 200.0),
            record(2023, 11, 1, 100.0),
            record(2023, 10, 1, 0.0),
        ];
        let result = forecast_next_month(&records).unwrap();
        let months: Vec<String> = result.months.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            months,
            vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]
        );
        assert_eq!(result.target, month(2024, 3));
        assert!(result.slope.unwrap() > 0.0);
    }

    #[test]
    fn test_gap_months_are_not_zero_filled() {
        let records = vec![record(2024, 1, 10, 100.0), record(2024, 6, 10, 300.0)];
        let result = forecast_next_month(&records).unwrap();
        assert_eq!(result.months.len(), 2);
        assert_eq!(result.target, month(2024, 7));
    }

    #[test]
    fn test_never_negative() {
        let records = monthly_records(month(2024, 1), &[5000.0, 3000.0, 1000.0, 0.0, 0.0]);
        let result = forecast_next_month(&records).unwrap();
        assert!(result.forecast >= 0.0);
    }

    #[test]
    fn test_outlier_is_damped() {
        let records = monthly_records(month(2024, 1), &[500.0, 520.0, 480.0, 510.0, 4000.0]);
        let result = forecast_next_month(&records).unwrap();
        // A single bad month pulls the forecast up, but well short of the outlier
        assert!(result.forecast < 4000.0);
        assert_eq!(result.median, Some(510.0));
    }

    #[test]
    fn test_idempotent() {
        let records = monthly_records(month(2024, 1), &[120.0, 80.0, 95.0, 130.0, 110.0, 90.0]);
        assert_eq!(forecast_next_month(&records), forecast_next_month(&records));
    }

    #[test]
    fn test_serializes_month_keys_as_strings() {
        let records = monthly_records(month(2024, 1), &[100.0, 200.0]);
        let json = serde_json::to_value(forecast_next_month(&records).unwrap()).unwrap();
        assert_eq!(json["months"][0], "2024-01");
        assert_eq!(json["monthlyTotals"]["2024-02"], 200.0);
        assert!(json.get("slope").is_none());
    }
}
