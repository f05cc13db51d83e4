//! Domain models for Tally

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Palette offered for new categories, in assignment order
pub const CATEGORY_COLORS: [&str; 11] = [
    "#EF4444", // Red
    "#F97316", // Orange
    "#F59E0B", // Amber
    "#10B981", // Emerald
    "#06B6D4", // Cyan
    "#3B82F6", // Blue
    "#6366F1", // Indigo
    "#8B5CF6", // Violet
    "#D946EF", // Fuchsia
    "#EC4899", // Pink
    "#64748B", // Slate
];

/// Categories created by `tally init`, with their colours
pub const DEFAULT_CATEGORIES: [(&str, &str); 8] = [
    ("Food & Dining", "#EF4444"),
    ("Travel", "#06B6D4"),
    ("Bills & Utilities", "#F59E0B"),
    ("Shopping", "#EC4899"),
    ("Transportation", "#8B5CF6"),
    ("Health", "#10B981"),
    ("Rent", "#3B82F6"),
    ("Misc", "#64748B"),
];

/// A dated, amount-bearing record: the only input the forecast engine needs.
///
/// Construction rejects amounts that are negative or not finite, so a record
/// that exists is always safe to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpenseRecord {
    date: NaiveDateTime,
    amount: f64,
}

impl ExpenseRecord {
    pub fn new(date: NaiveDateTime, amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        Some(Self { date, amount })
    }

    /// Record at midnight of the given day
    pub fn on(date: NaiveDate, amount: f64) -> Option<Self> {
        Self::new(date.and_time(chrono::NaiveTime::MIN), amount)
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::of(&self.date)
    }
}

/// A calendar month (year + 1-based month).
///
/// Ordering is chronological, so `2023-12 < 2024-01`. Displays and
/// serializes as zero-padded `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns None unless `month` is in 1..=12 and the month is representable as a date
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days_in_month(&self) -> u32 {
        // Only December of chrono's last year has no following month
        self.date_range().map_or(31, |(_, last)| last.day())
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First and last day of the month (inclusive)
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some((first, last))
    }

    pub fn contains<D: Datelike>(&self, date: &D) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || format!("Invalid month: {} (expected YYYY-MM)", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An expense stored in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDateTime,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    /// SHA-256 over date, category, description and amount
    #[serde(default)]
    pub import_hash: String,
}

impl Expense {
    /// The engine view of this expense, or None if the stored amount is malformed
    pub fn record(&self) -> Option<ExpenseRecord> {
        ExpenseRecord::new(self.date, self.amount)
    }
}

/// An expense before it is assigned an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDateTime,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub import_hash: String,
}

impl NewExpense {
    pub fn new(
        date: NaiveDateTime,
        category: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        let category = category.into();
        let description = description.into();
        let import_hash = crate::import::expense_hash(&date, &category, &description, amount);
        Self {
            date,
            category,
            amount,
            description,
            import_hash,
        }
    }
}

/// Partial update to a stored expense
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDateTime>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
}

/// A user-defined spending category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
}

/// A monthly spending target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub month: MonthKey,
    pub limit: f64,
}

/// Spending in one category over a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub color: String,
    pub total_spent: f64,
    pub percentage: f64,
    pub expense_count: usize,
}
