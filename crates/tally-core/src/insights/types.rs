//! Findings produced by the insight analyzers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

/// Which analyzer produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Projected total for the month in progress
    MonthEndProjection,
    /// Projected total for the coming month
    NextMonthProjection,
    /// Spending so far measured against the budget
    BudgetPace,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::MonthEndProjection => "month_end_projection",
            InsightType::NextMonthProjection => "next_month_projection",
            InsightType::BudgetPace => "budget_pace",
        }
    }

    /// Dedup key for a finding about `month`, e.g. `budget_pace:2024-06`
    pub fn key(&self, month: MonthKey) -> String {
        format!("{}:{}", self.as_str(), month)
    }
}

/// How urgent a finding is. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Attention,
    Warning,
    Alert,
}

/// Something an analyzer noticed about one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub insight_type: InsightType,
    /// Month the finding is about
    pub month: MonthKey,
    pub key: String,
    pub severity: Severity,
    pub title: String,
    pub summary: String,
    pub detail: Option<String>,
    /// Analyzer-specific payload (forecast, budget status)
    pub data: serde_json::Value,
    pub detected_at: DateTime<Utc>,
    /// After this the finding no longer describes the present
    pub expires_at: Option<DateTime<Utc>>,
}

impl Finding {
    pub fn new(
        insight_type: InsightType,
        month: MonthKey,
        severity: Severity,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            insight_type,
            month,
            key: insight_type.key(month),
            severity,
            title: title.into(),
            summary: summary.into(),
            detail: None,
            data: serde_json::Value::Null,
            detected_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}
