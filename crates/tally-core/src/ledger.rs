//! JSON-file ledger of categories, expenses and monthly budgets
//!
//! The whole ledger is loaded into memory, mutated, and written back
//! atomically (temp file in the same directory, then rename).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::budget::budget_in_effect;
use crate::error::{Error, Result};
use crate::import::{expense_hash, ParsedImport, DEFAULT_CATEGORY};
use crate::models::{
    Budget, Category, CategoryTotal, Expense, ExpenseRecord, ExpenseUpdate, MonthKey, NewExpense,
    CATEGORY_COLORS, DEFAULT_CATEGORIES,
};

/// On-disk shape of the ledger file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerData {
    #[serde(default)]
    next_id: i64,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Outcome of importing a batch of expenses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub imported: usize,
    /// Already present (same import hash)
    pub duplicates: usize,
    /// Dropped while parsing or for an invalid amount
    pub skipped: usize,
    /// Categories created because an imported expense referenced them
    pub new_categories: Vec<String>,
}

/// The expense ledger
#[derive(Debug, Clone)]
pub struct Ledger {
    path: Option<PathBuf>,
    data: LedgerData,
}

impl Ledger {
    /// Open a ledger file. A missing file gives an empty ledger that will be
    /// created on the first save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut data: LedgerData = serde_json::from_str(&content)?;
            // A hand-edited file may lack next_id or carry a stale one
            let max_id = data.expenses.iter().map(|e| e.id).max().unwrap_or(0);
            data.next_id = data.next_id.max(max_id);
            data
        } else {
            debug!(path = %path.display(), "Ledger file not found, starting empty");
            LedgerData::default()
        };
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// A ledger that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: LedgerData::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the ledger atomically. No-op for in-memory ledgers.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, &self.data)?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;

        info!(
            path = %path.display(),
            expenses = self.data.expenses.len(),
            "Ledger saved"
        );
        Ok(())
    }

    // ========== Categories ==========

    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    /// Case-insensitive lookup
    pub fn category(&self, name: &str) -> Option<&Category> {
        let name = name.trim();
        self.data
            .categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn next_color(&self) -> &'static str {
        CATEGORY_COLORS[self.data.categories.len() % CATEGORY_COLORS.len()]
    }

    /// Add a category. The colour defaults to the next palette entry.
    pub fn add_category(&mut self, name: &str, color: Option<&str>) -> Result<&Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Category name cannot be empty".into()));
        }
        if self.category(name).is_some() {
            return Err(Error::Duplicate(format!("Category '{}'", name)));
        }

        let color = color.unwrap_or_else(|| self.next_color()).to_string();
        self.data.categories.push(Category {
            name: name.to_string(),
            color,
        });
        debug!(category = name, "Added category");

        let index = self.data.categories.len() - 1;
        Ok(&self.data.categories[index])
    }

    /// Add whichever default categories are missing, returning how many were added
    pub fn seed_default_categories(&mut self) -> usize {
        let mut added = 0;
        for (name, color) in DEFAULT_CATEGORIES {
            if self.category(name).is_none() {
                self.data.categories.push(Category {
                    name: name.to_string(),
                    color: color.to_string(),
                });
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, "Seeded default categories");
        }
        added
    }

    /// Delete a category together with all of its expenses.
    ///
    /// Returns the number of expenses removed.
    pub fn delete_category(&mut self, name: &str) -> Result<usize> {
        let canonical = self
            .category(name)
            .map(|c| c.name.clone())
            .ok_or_else(|| Error::NotFound(format!("Category '{}'", name.trim())))?;

        self.data.categories.retain(|c| c.name != canonical);
        let before = self.data.expenses.len();
        self.data
            .expenses
            .retain(|e| !e.category.eq_ignore_ascii_case(&canonical));
        let removed = before - self.data.expenses.len();

        info!(category = %canonical, removed, "Deleted category");
        Ok(removed)
    }

    // ========== Expenses ==========

    pub fn expenses(&self) -> &[Expense] {
        &self.data.expenses
    }

    pub fn expense(&self, id: i64) -> Option<&Expense> {
        self.data.expenses.iter().find(|e| e.id == id)
    }

    fn resolve_category(&self, name: &str) -> Result<String> {
        self.category(name)
            .map(|c| c.name.clone())
            .ok_or_else(|| Error::NotFound(format!("Category '{}'", name.trim())))
    }

    fn validate_amount(amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Amount must be a non-negative number, got {}",
                amount
            )));
        }
        Ok(())
    }

    fn push_expense(&mut self, expense: NewExpense, category: String) -> i64 {
        self.data.next_id += 1;
        let id = self.data.next_id;
        self.data.expenses.push(Expense {
            id,
            date: expense.date,
            category,
            amount: expense.amount,
            description: expense.description,
            import_hash: expense.import_hash,
        });
        id
    }

    /// Add an expense to an existing category, returning its id
    pub fn add_expense(&mut self, expense: NewExpense) -> Result<i64> {
        Self::validate_amount(expense.amount)?;
        let category = self.resolve_category(&expense.category)?;
        let id = self.push_expense(expense, category);
        debug!(id, "Added expense");
        Ok(id)
    }

    /// Apply a partial update to an expense
    pub fn update_expense(&mut self, id: i64, update: ExpenseUpdate) -> Result<()> {
        if let Some(amount) = update.amount {
            Self::validate_amount(amount)?;
        }
        let category = update
            .category
            .as_deref()
            .map(|name| self.resolve_category(name))
            .transpose()?;

        let expense = self
            .data
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))?;

        if let Some(date) = update.date {
            expense.date = date;
        }
        if let Some(category) = category {
            expense.category = category;
        }
        if let Some(amount) = update.amount {
            expense.amount = amount;
        }
        if let Some(description) = update.description {
            expense.description = description;
        }
        expense.import_hash = expense_hash(
            &expense.date,
            &expense.category,
            &expense.description,
            expense.amount,
        );
        Ok(())
    }

    /// Remove an expense, returning it
    pub fn delete_expense(&mut self, id: i64) -> Result<Expense> {
        let index = self
            .data
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))?;
        Ok(self.data.expenses.remove(index))
    }

    /// Import parsed expenses, skipping ones already in the ledger and
    /// creating any categories they reference.
    pub fn import_expenses(&mut self, parsed: ParsedImport) -> ImportStats {
        let mut stats = ImportStats {
            skipped: parsed.skipped,
            ..Default::default()
        };
        let mut seen: HashSet<String> = self
            .data
            .expenses
            .iter()
            .map(|e| e.import_hash.clone())
            .collect();

        for expense in parsed.expenses {
            if Self::validate_amount(expense.amount).is_err() {
                stats.skipped += 1;
                continue;
            }
            if !seen.insert(expense.import_hash.clone()) {
                stats.duplicates += 1;
                continue;
            }

            let name = match expense.category.trim() {
                "" => DEFAULT_CATEGORY,
                name => name,
            };
            let category = match self.category(name) {
                Some(existing) => existing.name.clone(),
                None => {
                    let color = self.next_color().to_string();
                    self.data.categories.push(Category {
                        name: name.to_string(),
                        color,
                    });
                    stats.new_categories.push(name.to_string());
                    name.to_string()
                }
            };

            self.push_expense(expense, category);
            stats.imported += 1;
        }

        info!(
            imported = stats.imported,
            duplicates = stats.duplicates,
            skipped = stats.skipped,
            "Import complete"
        );
        stats
    }

    /// Expenses newest first, optionally restricted to one category
    pub fn list_expenses(&self, category: Option<&str>, limit: usize) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self
            .data
            .expenses
            .iter()
            .filter(|e| category.map_or(true, |c| e.category.eq_ignore_ascii_case(c.trim())))
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        expenses.truncate(limit);
        expenses
    }

    /// All expenses as forecast input. Malformed entries (e.g. a hand-edited
    /// negative amount) are left out.
    pub fn records(&self) -> Vec<ExpenseRecord> {
        let records: Vec<ExpenseRecord> = self
            .data
            .expenses
            .iter()
            .filter_map(Expense::record)
            .collect();
        let excluded = self.data.expenses.len() - records.len();
        if excluded > 0 {
            debug!(excluded, "Excluded malformed expenses from forecast input");
        }
        records
    }

    /// Total spent in a month
    pub fn spent_in(&self, month: MonthKey) -> f64 {
        self.records()
            .iter()
            .filter(|r| r.month_key() == month)
            .map(ExpenseRecord::amount)
            .sum()
    }

    /// Per-category spend between `from` and `to` (inclusive), largest first.
    ///
    /// Every category appears, even with nothing spent; expenses whose category
    /// no longer exists are left out.
    pub fn category_totals(&self, from: NaiveDate, to: NaiveDate) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = self
            .data
            .categories
            .iter()
            .map(|category| {
                let matching: Vec<f64> = self
                    .data
                    .expenses
                    .iter()
                    .filter(|e| e.category.eq_ignore_ascii_case(&category.name))
                    .filter(|e| {
                        let date = e.date.date();
                        date >= from && date <= to
                    })
                    .filter_map(|e| e.record().map(|r| r.amount()))
                    .collect();
                CategoryTotal {
                    name: category.name.clone(),
                    color: category.color.clone(),
                    total_spent: matching.iter().sum(),
                    percentage: 0.0,
                    expense_count: matching.len(),
                }
            })
            .collect();

        let grand_total: f64 = totals.iter().map(|t| t.total_spent).sum();
        if grand_total > 0.0 {
            for total in &mut totals {
                total.percentage = total.total_spent / grand_total * 100.0;
            }
        }

        totals.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
        totals
    }

    // ========== Budgets ==========

    pub fn budgets(&self) -> &[Budget] {
        &self.data.budgets
    }

    /// Set the spending limit for a month (replacing any existing one)
    pub fn set_budget(&mut self, month: MonthKey, limit: f64) -> Result<()> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(Error::InvalidData(format!(
                "Budget must be a non-negative number, got {}",
                limit
            )));
        }

        match self.data.budgets.iter_mut().find(|b| b.month == month) {
            Some(budget) => budget.limit = limit,
            None => {
                self.data.budgets.push(Budget { month, limit });
                self.data.budgets.sort_by_key(|b| b.month);
            }
        }
        debug!(month = %month, limit, "Budget set");
        Ok(())
    }

    /// The budget in effect for `month`: its own entry, else the most recent
    /// earlier one
    pub fn budget_for(&self, month: MonthKey) -> Option<f64> {
        budget_in_effect(&self.data.budgets, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_csv;
    use crate::test_utils::{day, month, new_expense, sample_csv};

    fn ledger_with_categories() -> Ledger {
        let mut ledger = Ledger::in_memory();
        ledger.add_category("Food & Dining", None).unwrap();
        ledger.add_category("Travel", Some("#06B6D4")).unwrap();
        ledger
    }

    #[test]
    fn test_add_category_assigns_palette_colors() {
        let ledger = ledger_with_categories();
        assert_eq!(ledger.categories()[0].color, CATEGORY_COLORS[0]);
        assert_eq!(ledger.categories()[1].color, "#06B6D4");
    }

    #[test]
    fn test_seed_default_categories_is_idempotent() {
        let mut ledger = ledger_with_categories();
        // Food & Dining and Travel already exist
        assert_eq!(ledger.seed_default_categories(), 6);
        assert_eq!(ledger.seed_default_categories(), 0);
        assert_eq!(ledger.categories().len(), 8);
        assert_eq!(ledger.category("rent").unwrap().color, "#3B82F6");
    }

    #[test]
    fn test_add_category_rejects_duplicates_and_blank() {
        let mut ledger = ledger_with_categories();
        assert!(matches!(
            ledger.add_category("food & dining", None),
            Err(Error::Duplicate(_))
        ));
        assert!(matches!(
            ledger.add_category("   ", None),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_add_expense_validates() {
        let mut ledger = ledger_with_categories();

        let id = ledger
            .add_expense(new_expense(2024, 1, 5, "travel", 120.0, "Train"))
            .unwrap();
        // Stored under the canonical category name
        assert_eq!(ledger.expense(id).unwrap().category, "Travel");

        assert!(matches!(
            ledger.add_expense(new_expense(2024, 1, 5, "Rent", 10.0, "")),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            ledger.add_expense(new_expense(2024, 1, 5, "Travel", -3.0, "")),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_ids_are_unique_after_delete() {
        let mut ledger = ledger_with_categories();
        let first = ledger
            .add_expense(new_expense(2024, 1, 5, "Travel", 1.0, "a"))
            .unwrap();
        ledger.delete_expense(first).unwrap();
        let second = ledger
            .add_expense(new_expense(2024, 1, 6, "Travel", 2.0, "b"))
            .unwrap();
        assert_ne!(first, second);
        assert!(matches!(
            ledger.delete_expense(first),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_update_expense() {
        let mut ledger = ledger_with_categories();
        let id = ledger
            .add_expense(new_expense(2024, 1, 5, "Travel", 10.0, "Bus"))
            .unwrap();
        let old_hash = ledger.expense(id).unwrap().import_hash.clone();

        ledger
            .update_expense(
                id,
                ExpenseUpdate {
                    amount: Some(12.5),
                    category: Some("Food & Dining".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let expense = ledger.expense(id).unwrap();
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category, "Food & Dining");
        assert_eq!(expense.description, "Bus");
        assert_ne!(expense.import_hash, old_hash);

        let bad = ledger.update_expense(
            id,
            ExpenseUpdate {
                amount: Some(f64::NAN),
                ..Default::default()
            },
        );
        assert!(matches!(bad, Err(Error::InvalidData(_))));
        assert!(ledger.update_expense(999, ExpenseUpdate::default()).is_err());
    }

    #[test]
    fn test_delete_category_removes_its_expenses() {
        let mut ledger = ledger_with_categories();
        ledger
            .add_expense(new_expense(2024, 1, 5, "Travel", 10.0, "a"))
            .unwrap();
        ledger
            .add_expense(new_expense(2024, 1, 6, "Travel", 20.0, "b"))
            .unwrap();
        ledger
            .add_expense(new_expense(2024, 1, 7, "Food & Dining", 5.0, "c"))
            .unwrap();

        assert_eq!(ledger.delete_category("TRAVEL").unwrap(), 2);
        assert_eq!(ledger.categories().len(), 1);
        assert_eq!(ledger.expenses().len(), 1);
        assert!(ledger.delete_category("Travel").is_err());
    }

    #[test]
    fn test_import_dedups_and_creates_categories() {
        let mut ledger = Ledger::in_memory();
        let stats = ledger.import_expenses(parse_csv(sample_csv().as_bytes()).unwrap());
        assert_eq!(stats.imported, 6);
        assert_eq!(stats.duplicates, 0);
        assert_eq!(
            stats.new_categories,
            vec!["Food & Dining".to_string(), "Bills & Utilities".to_string()]
        );

        let again = ledger.import_expenses(parse_csv(sample_csv().as_bytes()).unwrap());
        assert_eq!(again.imported, 0);
        assert_eq!(again.duplicates, 6);
        assert!(again.new_categories.is_empty());
        assert_eq!(ledger.expenses().len(), 6);
    }

    #[test]
    fn test_list_expenses_newest_first() {
        let mut ledger = Ledger::in_memory();
        ledger.import_expenses(parse_csv(sample_csv().as_bytes()).unwrap());

        let recent = ledger.list_expenses(None, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date.date(), day(2024, 3, 25));
        assert_eq!(recent[1].date.date(), day(2024, 3, 11));

        let food = ledger.list_expenses(Some("food & dining"), 100);
        assert_eq!(food.len(), 3);
    }

    #[test]
    fn test_records_and_monthly_spend() {
        let mut ledger = Ledger::in_memory();
        ledger.import_expenses(parse_csv(sample_csv().as_bytes()).unwrap());

        assert_eq!(ledger.records().len(), 6);
        assert!((ledger.spent_in(month(2024, 2)) - 158.25).abs() < 1e-9);
        assert_eq!(ledger.spent_in(month(2024, 4)), 0.0);
    }

    #[test]
    fn test_category_totals() {
        let mut ledger = Ledger::in_memory();
        ledger.import_expenses(parse_csv(sample_csv().as_bytes()).unwrap());
        ledger.add_category("Travel", None).unwrap();

        let totals = ledger.category_totals(day(2024, 1, 1), day(2024, 1, 31));
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].name, "Bills & Utilities");
        assert_eq!(totals[0].total_spent, 85.0);
        assert_eq!(totals[1].total_spent, 45.5);
        assert_eq!(totals[2].name, "Travel");
        assert_eq!(totals[2].expense_count, 0);

        let pct: f64 = totals.iter().map(|t| t.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_for_falls_back_to_earlier_month() {
        let mut ledger = Ledger::in_memory();
        ledger.set_budget(month(2024, 1), 1500.0).unwrap();
        ledger.set_budget(month(2024, 4), 1800.0).unwrap();
        ledger.set_budget(month(2024, 1), 1600.0).unwrap();

        assert_eq!(ledger.budgets().len(), 2);
        assert_eq!(ledger.budget_for(month(2023, 12)), None);
        assert_eq!(ledger.budget_for(month(2024, 1)), Some(1600.0));
        assert_eq!(ledger.budget_for(month(2024, 3)), Some(1600.0));
        assert_eq!(ledger.budget_for(month(2024, 9)), Some(1800.0));

        assert!(ledger.set_budget(month(2024, 2), -1.0).is_err());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        let mut ledger = Ledger::open(&path).unwrap();
        assert!(ledger.expenses().is_empty());
        ledger.import_expenses(parse_csv(sample_csv().as_bytes()).unwrap());
        ledger.set_budget(month(2024, 3), 900.0).unwrap();
        ledger.save().unwrap();

        let reopened = Ledger::open(&path).unwrap();
        assert_eq!(reopened.expenses().len(), 6);
        assert_eq!(reopened.categories().len(), 2);
        assert_eq!(reopened.budget_for(month(2024, 3)), Some(900.0));
        assert_eq!(reopened.expenses(), ledger.expenses());
    }

    #[test]
    fn test_open_without_next_id_keeps_ids_unique() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(
            &path,
            r##"{
  "categories": [{ "name": "Food", "color": "#FF6B6B" }],
  "expenses": [
    { "id": 1, "date": "2024-01-05T00:00:00", "category": "Food", "amount": 10.0 },
    { "id": 3, "date": "2024-01-06T00:00:00", "category": "Food", "amount": 20.0 },
    { "id": 2, "date": "2024-01-07T00:00:00", "category": "Food", "amount": 30.0 }
  ]
}"##,
        )
        .unwrap();

        let mut ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.expenses().len(), 3);

        let id = ledger
            .add_expense(new_expense(2024, 1, 8, "Food", 5.0, "Snack"))
            .unwrap();
        assert_eq!(id, 4);
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Ledger::open(&path), Err(Error::Json(_))));
    }
}
