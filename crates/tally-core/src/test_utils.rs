//! Test utilities for tally-core
//!
//! Builders for dates and expense records so tests can describe fixtures in
//! one line. Panics on invalid input, which is what a test wants.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{ExpenseRecord, MonthKey, NewExpense};

pub fn month(year: i32, month: u32) -> MonthKey {
    MonthKey::new(year, month).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Noon on the given day
pub fn at(year: i32, month: u32, day_of_month: u32) -> NaiveDateTime {
    day(year, month, day_of_month).and_hms_opt(12, 0, 0).unwrap()
}

pub fn record(year: i32, month: u32, day_of_month: u32, amount: f64) -> ExpenseRecord {
    ExpenseRecord::new(at(year, month, day_of_month), amount).unwrap()
}

/// One record per month, starting at `start`, whose amounts are `totals`
pub fn monthly_records(start: MonthKey, totals: &[f64]) -> Vec<ExpenseRecord> {
    let mut key = start;
    let mut records = Vec::with_capacity(totals.len());
    for &total in totals {
        records.push(record(key.year(), key.month(), 15, total));
        key = key.next();
    }
    records
}

pub fn new_expense(
    year: i32,
    month: u32,
    day_of_month: u32,
    category: &str,
    amount: f64,
    description: &str,
) -> NewExpense {
    NewExpense::new(at(year, month, day_of_month), category, amount, description)
}

/// A small CSV export spanning three months and two categories
pub fn sample_csv() -> &'static str {
    "date,category,amount,description
2024-01-05,Food & Dining,45.50,Dinner at Italian Place
2024-01-18,Bills & Utilities,85.00,Electricity Bill
2024-02-03,Food & Dining,12.50,Coffee & Bagel
2024-02-20,Bills & Utilities,145.75,Internet Subscription
2024-03-11,Food & Dining,60.00,Groceries
2024-03-25,Bills & Utilities,90.25,Water Bill"
}
