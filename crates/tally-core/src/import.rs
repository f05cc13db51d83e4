//! Expense import from CSV and JSON exports
//!
//! Rows that cannot be turned into a valid expense (bad date, bad or negative
//! amount) are skipped and counted rather than failing the whole file.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{ExpenseRecord, NewExpense};

/// Category given to imported rows that don't name one
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Supported import file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl std::str::FromStr for ImportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown import format: {} (valid: csv, json)", s)),
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of parsing an import file
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub expenses: Vec<NewExpense>,
    /// Rows dropped because they had no usable date or amount
    pub skipped: usize,
}

/// Parse an export in the given format
pub fn parse<R: Read>(reader: R, format: ImportFormat) -> Result<ParsedImport> {
    match format {
        ImportFormat::Csv => parse_csv(reader),
        ImportFormat::Json => parse_json(reader),
    }
}

/// Find a column by (case-insensitive) header name
fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Parse CSV with a `date,category,amount,description` header.
///
/// Column order is taken from the header; `category` and `description` are
/// optional.
pub fn parse_csv<R: Read>(reader: R) -> Result<ParsedImport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_col =
        column(&headers, "date").ok_or_else(|| Error::Import("Missing 'date' column".into()))?;
    let amount_col = column(&headers, "amount")
        .ok_or_else(|| Error::Import("Missing 'amount' column".into()))?;
    let category_col = column(&headers, "category");
    let description_col = column(&headers, "description");

    let mut parsed = ParsedImport::default();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = index + 2;

        let date = match record.get(date_col).map(parse_date) {
            Some(Ok(date)) => date,
            _ => {
                warn!(line, "Skipping row with missing or invalid date");
                parsed.skipped += 1;
                continue;
            }
        };

        let amount = match record.get(amount_col).map(parse_amount) {
            Some(Ok(amount)) if ExpenseRecord::new(date, amount).is_some() => amount,
            _ => {
                warn!(line, "Skipping row with missing or invalid amount");
                parsed.skipped += 1;
                continue;
            }
        };

        let category = category_col
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let description = description_col.and_then(|i| record.get(i)).unwrap_or("");

        parsed
            .expenses
            .push(NewExpense::new(date, category, amount, description));
    }

    debug!(
        parsed = parsed.expenses.len(),
        skipped = parsed.skipped,
        "Parsed CSV expenses"
    );
    Ok(parsed)
}

/// Parse a JSON export: either an array of expense objects or an object with
/// an `expenses` array.
///
/// `date` may be a string or a `{ "seconds": .., "nanoseconds": .. }`
/// timestamp; `amount` may be a number or a numeric string.
pub fn parse_json<R: Read>(reader: R) -> Result<ParsedImport> {
    let value: Value = serde_json::from_reader(reader)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("expenses") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::Import("Expected an 'expenses' array".into())),
        },
        _ => return Err(Error::Import("Expected a JSON array of expenses".into())),
    };

    let mut parsed = ParsedImport::default();

    for (index, item) in items.iter().enumerate() {
        let Some(date) = item.get("date").and_then(json_date) else {
            warn!(index, "Skipping expense with missing or invalid date");
            parsed.skipped += 1;
            continue;
        };

        let amount = match item.get("amount").and_then(json_amount) {
            Some(amount) if ExpenseRecord::new(date, amount).is_some() => amount,
            _ => {
                warn!(index, "Skipping expense with missing or invalid amount");
                parsed.skipped += 1;
                continue;
            }
        };

        let category = item
            .get("category")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let description = item
            .get("description")
            .or_else(|| item.get("note"))
            .and_then(Value::as_str)
            .unwrap_or("");

        parsed
            .expenses
            .push(NewExpense::new(date, category, amount, description));
    }

    debug!(
        parsed = parsed.expenses.len(),
        skipped = parsed.skipped,
        "Parsed JSON expenses"
    );
    Ok(parsed)
}

fn json_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date(s).ok(),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))?
                .as_i64()?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let utc = DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)?;
            Some(utc.with_timezone(&Local).naive_local())
        }
        _ => None,
    }
}

fn json_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s).ok(),
        _ => None,
    }
}

/// Parse a date or date-time string in the common export formats.
///
/// Plain dates resolve to midnight; RFC 3339 timestamps convert to local time.
pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // 2024-01-15T10:30:00.000
        "%Y-%m-%d %H:%M:%S",    // 2024-01-15 10:30:00
    ];
    for fmt in datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(datetime);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Ok(datetime.with_timezone(&Local).naive_local());
    }

    let date_formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
    ];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and thousands separators
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '€', '£', '¥', '₹', ',', ' '], "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}

/// Generate a stable hash for deduplicating repeated imports
pub fn expense_hash(date: &NaiveDateTime, category: &str, description: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(category.as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.to_be_bytes());
    hex::encode(hasher.finalize())
}
