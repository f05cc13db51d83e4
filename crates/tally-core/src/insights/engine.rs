//! Insight Engine - runs analyzers and orders their findings

use chrono::NaiveDateTime;

use crate::budget::budget_in_effect;
use crate::models::{Budget, ExpenseRecord, MonthKey};
use crate::Result;

use super::types::{Finding, InsightType};
use super::{BudgetPaceInsight, MonthEndProjectionInsight, NextMonthProjectionInsight};

/// Context provided to insight analyzers
pub struct AnalysisContext<'a> {
    /// Every valid expense record in the ledger
    pub records: &'a [ExpenseRecord],
    /// Reference instant; the current month is the one containing it
    pub now: NaiveDateTime,
    /// Limit for months with no budget entry
    pub default_budget: f64,
    /// Per-month budget entries, resolved with `budget_in_effect`
    pub budgets: &'a [Budget],
    /// Prefix for amounts in summaries
    pub currency_symbol: &'a str,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new analysis context
    pub fn new(records: &'a [ExpenseRecord], now: NaiveDateTime, default_budget: f64) -> Self {
        Self {
            records,
            now,
            default_budget,
            budgets: &[],
            currency_symbol: "$",
        }
    }

    pub fn with_budgets(mut self, budgets: &'a [Budget]) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: &'a str) -> Self {
        self.currency_symbol = symbol;
        self
    }

    /// Month containing `now`
    pub fn month(&self) -> MonthKey {
        MonthKey::of(&self.now)
    }

    /// Limit in effect for `month`
    pub fn budget_for(&self, month: MonthKey) -> f64 {
        budget_in_effect(self.budgets, month).unwrap_or(self.default_budget)
    }

    /// Total of records dated in the current month
    pub fn spent_this_month(&self) -> f64 {
        let month = self.month();
        self.records
            .iter()
            .filter(|r| r.month_key() == month)
            .map(|r| r.amount())
            .sum()
    }
}

/// Trait for insight analyzers
pub trait Insight: Send + Sync {
    /// Unique identifier for this insight type
    fn id(&self) -> InsightType;

    /// Analyze data and produce findings
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>>;
}

/// The main insight engine that orchestrates analysis
pub struct InsightEngine {
    insights: Vec<Box<dyn Insight>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create a new insight engine with built-in insight types
    pub fn new() -> Self {
        let mut engine = Self { insights: vec![] };

        engine.register(Box::new(BudgetPaceInsight::new()));
        engine.register(Box::new(MonthEndProjectionInsight::new()));
        engine.register(Box::new(NextMonthProjectionInsight::new()));

        engine
    }

    /// Create an engine with no analyzers registered
    pub fn empty() -> Self {
        Self { insights: vec![] }
    }

    /// Register an insight analyzer
    pub fn register(&mut self, insight: Box<dyn Insight>) {
        self.insights.push(insight);
    }

    /// Run all insight analyzers and collect findings
    pub fn analyze_all(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
        let mut all_findings = vec![];

        for insight in &self.insights {
            match insight.analyze(ctx) {
                Ok(findings) => {
                    tracing::debug!(
                        insight = insight.id().as_str(),
                        count = findings.len(),
                        "Insight analysis complete"
                    );
                    all_findings.extend(findings);
                }
                Err(e) => {
                    tracing::warn!(
                        insight = insight.id().as_str(),
                        error = %e,
                        "Insight analysis failed"
                    );
                }
            }
        }

        // Most urgent first, then most recent
        all_findings.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.detected_at.cmp(&a.detected_at))
        });

        Ok(all_findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Severity;
    use crate::test_utils::{at, month, monthly_records, record};
    use crate::Error;

    struct FailingInsight;

    impl Insight for FailingInsight {
        fn id(&self) -> InsightType {
            InsightType::BudgetPace
        }

        fn analyze(&self, _ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
            Err(Error::InvalidData("boom".into()))
        }
    }

    struct FixedInsight(Severity);

    impl Insight for FixedInsight {
        fn id(&self) -> InsightType {
            InsightType::MonthEndProjection
        }

        fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>> {
            Ok(vec![Finding::new(
                self.id(),
                ctx.month(),
                self.0,
                "Fixed",
                "Fixed finding",
            )])
        }
    }

    #[test]
    fn test_builtin_analyzers_all_report() {
        // 900 spent by the 10th against a 1000 limit, with two months of history
        let mut records = monthly_records(month(2024, 4), &[800.0, 950.0]);
        records.push(record(2024, 6, 2, 500.0));
        records.push(record(2024, 6, 9, 400.0));

        let ctx = AnalysisContext::new(&records, at(2024, 6, 10), 1000.0);
        let findings = InsightEngine::new().analyze_all(&ctx).unwrap();

        let mut types: Vec<InsightType> = findings.iter().map(|f| f.insight_type).collect();
        types.sort_by_key(|t| t.as_str());
        assert_eq!(
            types,
            vec![
                InsightType::BudgetPace,
                InsightType::MonthEndProjection,
                InsightType::NextMonthProjection
            ]
        );
    }

    #[test]
    fn test_analyze_empty_ledger() {
        let engine = InsightEngine::new();
        let ctx = AnalysisContext::new(&[], at(2024, 5, 10), 2000.0);

        let findings = engine.analyze_all(&ctx).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_failing_insight_is_skipped() {
        let mut engine = InsightEngine::empty();
        engine.register(Box::new(FailingInsight));
        engine.register(Box::new(FixedInsight(Severity::Info)));

        let ctx = AnalysisContext::new(&[], at(2024, 5, 10), 2000.0);
        let findings = engine.analyze_all(&ctx).unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].key, "month_end_projection:2024-05");
    }

    #[test]
    fn test_findings_sorted_by_severity() {
        let mut engine = InsightEngine::empty();
        engine.register(Box::new(FixedInsight(Severity::Info)));
        engine.register(Box::new(FixedInsight(Severity::Alert)));
        engine.register(Box::new(FixedInsight(Severity::Attention)));

        let ctx = AnalysisContext::new(&[], at(2024, 5, 10), 2000.0);
        let findings = engine.analyze_all(&ctx).unwrap();

        let severities: Vec<Severity> = findings.iter().map(|f| f.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Alert, Severity::Attention, Severity::Info]
        );
    }

    #[test]
    fn test_budget_for_resolves_per_month() {
        let budgets = vec![
            Budget {
                month: month(2024, 6),
                limit: 1000.0,
            },
            Budget {
                month: month(2024, 7),
                limit: 3000.0,
            },
        ];
        let ctx = AnalysisContext::new(&[], at(2024, 6, 10), 2000.0).with_budgets(&budgets);

        assert_eq!(ctx.budget_for(month(2024, 5)), 2000.0);
        assert_eq!(ctx.budget_for(month(2024, 6)), 1000.0);
        assert_eq!(ctx.budget_for(month(2024, 7)), 3000.0);
        assert_eq!(ctx.budget_for(month(2024, 12)), 3000.0);
    }

    #[test]
    fn test_spent_this_month_ignores_other_months() {
        let mut records = monthly_records(month(2024, 3), &[100.0, 200.0]);
        records.push(record(2024, 5, 2, 30.0));
        records.push(record(2024, 5, 9, 12.5));

        let ctx = AnalysisContext::new(&records, at(2024, 5, 10), 2000.0);
        assert_eq!(ctx.month().to_string(), "2024-05");
        assert_eq!(ctx.spent_this_month(), 42.5);
    }
}
