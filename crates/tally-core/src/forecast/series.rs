//! Aggregation of expense records into daily and monthly series

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::models::{ExpenseRecord, MonthKey};

/// Per-day spend for `month`; index 0 is day 1 and the length is always the
/// number of days in the month. Records from other months are ignored.
pub fn daily_totals(records: &[ExpenseRecord], month: MonthKey) -> Vec<f64> {
    let mut totals = vec![0.0; month.days_in_month() as usize];
    for record in records {
        let date = record.date();
        if month.contains(&date) {
            totals[date.day0() as usize] += record.amount();
        }
    }
    totals
}

/// Running sum of a series
pub fn cumulative(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .scan(0.0, |sum, value| {
            *sum += value;
            Some(*sum)
        })
        .collect()
}

/// Total spend per month across the whole collection, in chronological order.
/// Months without records are absent rather than zero.
pub fn monthly_totals(records: &[ExpenseRecord]) -> BTreeMap<MonthKey, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.month_key()).or_insert(0.0) += record.amount();
    }
    totals
}
