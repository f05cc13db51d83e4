//! Budget status for a month

use serde::{Deserialize, Serialize};

use crate::models::{Budget, MonthKey};

/// Share of the budget above which spending is worth flagging
pub const PACE_WARNING_PERCENT: f64 = 80.0;

/// The limit in effect for `month`: its own entry, else the most recent
/// earlier one
pub fn budget_in_effect(budgets: &[Budget], month: MonthKey) -> Option<f64> {
    budgets
        .iter()
        .filter(|b| b.month <= month)
        .max_by_key(|b| b.month)
        .map(|b| b.limit)
}

/// A forecast for some month measured against that month's own budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub month: MonthKey,
    pub forecast: f64,
    pub limit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrun: Option<f64>,
}

impl Projection {
    pub fn new(month: MonthKey, forecast: f64, limit: f64) -> Self {
        let overrun = (forecast > limit).then(|| forecast - limit);
        Self {
            month,
            forecast,
            limit,
            overrun,
        }
    }

    pub fn overrun_message(&self, currency_symbol: &str) -> Option<String> {
        self.overrun.map(|overrun| {
            format!(
                "Forecast exceeds budget by {}{:.2}",
                currency_symbol, overrun
            )
        })
    }
}

/// How a month's spending compares with its budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub month: MonthKey,
    pub limit: f64,
    pub spent: f64,
    /// Spent as a share of the limit, capped at 100
    pub percent_used: f64,
    /// Limit minus spent (negative when over)
    pub remaining: f64,
    /// Next-month forecast, checked against the budget of the forecast month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl BudgetStatus {
    pub fn evaluate(month: MonthKey, limit: f64, spent: f64) -> Self {
        let percent_used = if limit > 0.0 {
            (spent / limit * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            month,
            limit,
            spent,
            percent_used,
            remaining: limit - spent,
            projection: None,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }

    pub fn is_near_limit(&self) -> bool {
        self.percent_used >= PACE_WARNING_PERCENT
    }

    pub fn overrun(&self) -> Option<f64> {
        self.projection.as_ref().and_then(|p| p.overrun)
    }

    /// Message shown when the next-month forecast exceeds its budget
    pub fn overrun_message(&self, currency_symbol: &str) -> Option<String> {
        self.projection
            .as_ref()
            .and_then(|p| p.overrun_message(currency_symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::month;

    #[test]
    fn test_percent_used_is_capped() {
        let status = BudgetStatus::evaluate(month(2024, 5), 1000.0, 1500.0);
        assert_eq!(status.percent_used, 100.0);
        assert_eq!(status.remaining, -500.0);
        assert!(status.is_over());
    }

    #[test]
    fn test_zero_limit() {
        let status = BudgetStatus::evaluate(month(2024, 5), 0.0, 20.0);
        assert_eq!(status.percent_used, 0.0);
        assert!(status.is_over());
    }

    #[test]
    fn test_near_limit() {
        let status = BudgetStatus::evaluate(month(2024, 5), 1000.0, 850.0);
        assert!(status.is_near_limit());
        assert!(!status.is_over());
        assert!((status.percent_used - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_overrun_message() {
        let status = BudgetStatus::evaluate(month(2024, 5), 2000.0, 100.0)
            .with_projection(Projection::new(month(2024, 6), 2150.5, 2000.0));
        assert_eq!(status.overrun(), Some(150.5));
        assert_eq!(
            status.overrun_message("$").as_deref(),
            Some("Forecast exceeds budget by $150.50")
        );

        let under = BudgetStatus::evaluate(month(2024, 5), 2000.0, 100.0)
            .with_projection(Projection::new(month(2024, 6), 1999.0, 2000.0));
        assert!(under.overrun().is_none());
        assert!(under.overrun_message("$").is_none());
        assert!(BudgetStatus::evaluate(month(2024, 5), 2000.0, 100.0)
            .overrun_message("$")
            .is_none());
    }

    #[test]
    fn test_projection_uses_its_own_limit() {
        // This month's limit is tight, next month's is generous
        let status = BudgetStatus::evaluate(month(2024, 6), 1000.0, 600.0)
            .with_projection(Projection::new(month(2024, 7), 1500.0, 3000.0));
        assert!(status.overrun().is_none());

        let projection = Projection::new(month(2024, 7), 1500.0, 1000.0);
        assert_eq!(projection.overrun, Some(500.0));
    }

    #[test]
    fn test_budget_in_effect() {
        let budgets = vec![
            Budget {
                month: month(2024, 1),
                limit: 1600.0,
            },
            Budget {
                month: month(2024, 6),
                limit: 1800.0,
            },
        ];

        assert_eq!(budget_in_effect(&budgets, month(2023, 12)), None);
        assert_eq!(budget_in_effect(&budgets, month(2024, 5)), Some(1600.0));
        assert_eq!(budget_in_effect(&budgets, month(2024, 6)), Some(1800.0));
        assert_eq!(budget_in_effect(&[], month(2024, 6)), None);
    }
}
