//! Month-End Projection Insight
//!
//! Projects where the month in progress will land and flags it when the
//! projection is above the budget.

use crate::forecast::forecast_current_month;
use crate::Result;

use super::engine::{AnalysisContext, Insight};
use super::types::{Finding, InsightType, Severity};

pub struct MonthEndProjectionInsight;

impl MonthEndProjectionInsight {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MonthEndProjectionInsight {
    fn default() -> Self {
        Self::new()
    }
}

impl Insight for MonthEndProjectionInsight {
    fn id(&self) -> InsightType {
        InsightType::MonthEndProjection
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        let forecast = forecast_current_month(ctx.records, ctx.now);

        // Nothing spent yet this month
        if forecast.current_total <= 0.0 {
            return Ok(vec![]);
        }

        let symbol = ctx.currency_symbol;
        let budget = ctx.budget_for(forecast.month);
        let over_budget = budget > 0.0 && forecast.forecast > budget;
        let severity = if over_budget {
            Severity::Attention
        } else {
            Severity::Info
        };

        let summary = format!(
            "On track to spend {}{:.0} by the end of {} ({}{:.2} so far)",
            symbol, forecast.forecast, forecast.month, symbol, forecast.current_total
        );

        let detail = if over_budget {
            Some(format!(
                "Projected to exceed the {}{:.2} budget by {}{:.2}",
                symbol,
                budget,
                symbol,
                forecast.forecast - budget
            ))
        } else {
            forecast.message.clone()
        };

        let expires_at = forecast
            .month
            .date_range()
            .and_then(|(_, last)| last.and_hms_opt(23, 59, 59))
            .map(|end| end.and_utc());

        let mut finding = Finding::new(
            self.id(),
            forecast.month,
            severity,
            "Projected Month-End Spending",
            summary,
        )
        .with_data(serde_json::to_value(&forecast)?);

        if let Some(detail) = detail {
            finding = finding.with_detail(detail);
        }
        if let Some(expires_at) = expires_at {
            finding = finding.with_expiration(expires_at);
        }

        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, record};
    use crate::ExpenseRecord;

    fn steady_june() -> Vec<ExpenseRecord> {
        (1..=10).map(|d| record(2024, 6, d, 10.0)).collect()
    }

    #[test]
    fn test_no_spending_no_finding() {
        let records = vec![record(2024, 5, 20, 50.0)];
        let ctx = AnalysisContext::new(&records, at(2024, 6, 10), 2000.0);

        let findings = MonthEndProjectionInsight::new().analyze(&ctx).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_projection_within_budget() {
        let records = steady_june();
        let ctx = AnalysisContext::new(&records, at(2024, 6, 10), 500.0);

        let findings = MonthEndProjectionInsight::new().analyze(&ctx).unwrap();
        assert_eq!(findings.len(), 1);

        let finding = &findings[0];
        assert_eq!(finding.severity, Severity::Info);
        assert_eq!(finding.key, "month_end_projection:2024-06");
        assert_eq!(
            finding.summary,
            "On track to spend $300 by the end of 2024-06 ($100.00 so far)"
        );
        assert_eq!(finding.data["forecast"], 300.0);
        assert_eq!(finding.data["currentTotal"], 100.0);
        assert_eq!(
            finding.expires_at.unwrap().to_rfc3339(),
            "2024-06-30T23:59:59+00:00"
        );
    }

    #[test]
    fn test_projection_over_budget() {
        let records = steady_june();
        let ctx = AnalysisContext::new(&records, at(2024, 6, 10), 250.0)
            .with_currency_symbol("€");

        let findings = MonthEndProjectionInsight::new().analyze(&ctx).unwrap();
        let finding = &findings[0];

        assert_eq!(finding.severity, Severity::Attention);
        assert_eq!(
            finding.detail.as_deref(),
            Some("Projected to exceed the €250.00 budget by €50.00")
        );
    }

    #[test]
    fn test_first_day_carries_insufficient_data_message() {
        let records = vec![record(2024, 6, 1, 40.0)];
        let ctx = AnalysisContext::new(&records, at(2024, 6, 1), 2000.0);

        let findings = MonthEndProjectionInsight::new().analyze(&ctx).unwrap();
        assert_eq!(
            findings[0].detail.as_deref(),
            Some("Insufficient data for daily trend. Showing current total.")
        );
        assert_eq!(findings[0].data["forecast"], 40.0);
    }
}
