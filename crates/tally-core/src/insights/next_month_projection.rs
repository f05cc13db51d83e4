//! Next-Month Projection Insight
//!
//! Runs the cross-month forecast and warns when the coming month is expected
//! to overrun the budget.

use crate::budget::Projection;
use crate::forecast::forecast_next_month;
use crate::Result;

use super::engine::{AnalysisContext, Insight};
use super::types::{Finding, InsightType, Severity};

pub struct NextMonthProjectionInsight;

impl NextMonthProjectionInsight {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NextMonthProjectionInsight {
    fn default() -> Self {
        Self::new()
    }
}

impl Insight for NextMonthProjectionInsight {
    fn id(&self) -> InsightType {
        InsightType::NextMonthProjection
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        let Some(forecast) = forecast_next_month(ctx.records) else {
            return Ok(vec![]);
        };

        // Measured against the budget of the month being forecast
        let projection = Projection::new(
            forecast.target,
            forecast.forecast,
            ctx.budget_for(forecast.target),
        );
        let overrun = projection.overrun_message(ctx.currency_symbol);

        let severity = if overrun.is_some() {
            Severity::Warning
        } else {
            Severity::Info
        };

        let summary = format!(
            "Forecasted spending for {}: {}{:.0}",
            forecast.target, ctx.currency_symbol, forecast.forecast
        );

        let data = serde_json::json!({
            "forecast": serde_json::to_value(&forecast)?,
            "budget": serde_json::to_value(&projection)?,
        });

        let finding = Finding::new(
            self.id(),
            forecast.target,
            severity,
            "Next Month Forecast",
            summary,
        )
        .with_detail(overrun.unwrap_or_else(|| forecast.message.clone()))
        .with_data(data);

        Ok(vec![finding])
    }
}
