//! Budget Pace Insight
//!
//! Compares what has been spent so far this month with the budget.

use crate::budget::BudgetStatus;
use crate::Result;

use super::engine::{AnalysisContext, Insight};
use super::types::{Finding, InsightType, Severity};

pub struct BudgetPaceInsight;

impl BudgetPaceInsight {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BudgetPaceInsight {
    fn default() -> Self {
        Self::new()
    }
}

impl Insight for BudgetPaceInsight {
    fn id(&self) -> InsightType {
        InsightType::BudgetPace
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        let month = ctx.month();
        let limit = ctx.budget_for(month);

        // No budget to measure against
        if limit <= 0.0 {
            return Ok(vec![]);
        }

        let status = BudgetStatus::evaluate(month, limit, ctx.spent_this_month());
        let symbol = ctx.currency_symbol;

        let (severity, title, detail) = if status.is_over() {
            (
                Severity::Alert,
                "Over Budget",
                format!("Over by {}{:.2}", symbol, -status.remaining),
            )
        } else if status.is_near_limit() {
            (
                Severity::Attention,
                "Approaching Budget",
                format!("{}{:.2} left for {}", symbol, status.remaining, status.month),
            )
        } else {
            return Ok(vec![]);
        };

        let summary = format!(
            "Spent {}{:.2} of the {}{:.2} budget ({:.0}%)",
            symbol, status.spent, symbol, status.limit, status.percent_used
        );

        let finding = Finding::new(
            self.id(),
            status.month,
            severity,
            title,
            summary,
        )
        .with_detail(detail)
        .with_data(serde_json::to_value(&status)?);

        Ok(vec![finding])
    }
}
