//! Spending Report
//!
//! Generates spending analysis by category for a given date range.

use crate::error::{FintrackError, FintrackResult};
use crate::models::{CategoryId, Money};
use crate::storage::Storage;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Write;

/// Spending breakdown by category
#[derive(Debug, Clone)]
pub struct SpendingByCategory {
    /// `None` for uncategorized spending
    pub category_id: Option<CategoryId>,
    pub category_name: String,
    /// Total spending as a positive amount
    pub total_spending: Money,
    pub transaction_count: usize,
    /// Percentage of total spending
    pub percentage: f64,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Largest spending first
    pub categories: Vec<SpendingByCategory>,
    /// Total spending across all categories, positive
    pub total_spending: Money,
    /// Total income in the period
    pub total_income: Money,
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Generate a spending report for a date range
    pub fn generate(
        storage: &Storage,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> FintrackResult<Self> {
        let transactions = storage.transactions.get_by_date_range(start_date, end_date)?;
        let names: HashMap<CategoryId, String> = storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut by_category: HashMap<Option<CategoryId>, (Money, usize)> = HashMap::new();
        let mut total_income = Money::zero();
        let mut total_spending = Money::zero();

        for txn in &transactions {
            if txn.amount.is_positive() {
                total_income += txn.amount;
                continue;
            }
            let entry = by_category
                .entry(txn.category_id)
                .or_insert((Money::zero(), 0));
            entry.0 += -txn.amount;
            entry.1 += 1;
            total_spending += -txn.amount;
        }

        let mut categories: Vec<SpendingByCategory> = by_category
            .into_iter()
            .map(|(category_id, (spent, count))| SpendingByCategory {
                category_name: category_id
                    .and_then(|id| names.get(&id).cloned())
                    .unwrap_or_else(|| "Uncategorized".to_string()),
                category_id,
                total_spending: spent,
                transaction_count: count,
                percentage: spent.percent_of(total_spending),
            })
            .collect();

        categories.sort_by(|a, b| {
            b.total_spending
                .cmp(&a.total_spending)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });

        Ok(Self {
            start_date,
            end_date,
            categories,
            total_spending,
            total_income,
            total_transactions: transactions.len(),
        })
    }

    /// Get top spending categories
    pub fn top_categories(&self, limit: usize) -> &[SpendingByCategory] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Spending Report: {} to {}\n",
            self.start_date, self.end_date
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!("Total Spending: {}\n", self.total_spending));
        output.push_str(&format!("Total Income: {}\n", self.total_income));
        output.push_str(&format!("Total Transactions: {}\n\n", self.total_transactions));

        if self.categories.is_empty() {
            output.push_str("No spending in this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<28} {:>12} {:>6} {:>7}  {}\n",
            "Category", "Amount", "Count", "%", ""
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for category in &self.categories {
            output.push_str(&format!(
                "{:<28} {:>12} {:>6} {:>6.1}%  {}\n",
                crate::display::truncate(&category.category_name, 28),
                category.total_spending,
                category.transaction_count,
                category.percentage,
                crate::display::format_bar(category.percentage, 100.0, 14),
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>12}\n",
            "TOTAL SPENDING", self.total_spending
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FintrackResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "Start Date",
            "End Date",
            "Category",
            "Amount",
            "Transaction Count",
            "Percentage",
        ])?;

        let start = self.start_date.to_string();
        let end = self.end_date.to_string();
        for category in &self.categories {
            csv_writer.write_record([
                start.as_str(),
                end.as_str(),
                category.category_name.as_str(),
                category.total_spending.to_decimal_string().as_str(),
                category.transaction_count.to_string().as_str(),
                format!("{:.2}", category.percentage).as_str(),
            ])?;
        }

        csv_writer
            .flush()
            .map_err(|e| FintrackError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Account, AccountType, Transaction};
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn add(storage: &Storage, account: &Account, day: u32, cents: i64, category: Option<&str>) {
        let mut txn = Transaction::new(account.id, date(day), Money::from_cents(cents));
        txn.category_id =
            category.map(|name| storage.categories.get_by_name(name).unwrap().unwrap().id);
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_generate_spending_report() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::new("Checking", AccountType::Checking);
        storage.accounts.upsert(account.clone()).unwrap();

        add(&storage, &account, 10, -5_000, Some("Groceries"));
        add(&storage, &account, 12, -2_500, Some("Groceries"));
        add(&storage, &account, 15, -2_500, Some("Dining Out"));
        add(&storage, &account, 16, -1_000, None);
        add(&storage, &account, 1, 200_000, Some("Salary"));
        // Outside the range
        add(&storage, &account, 31, -9_999, Some("Dining Out"));

        let report = SpendingReport::generate(&storage, date(1), date(30)).unwrap();

        assert_eq!(report.total_spending.cents(), 11_000);
        assert_eq!(report.total_income.cents(), 200_000);
        assert_eq!(report.total_transactions, 5);
        assert_eq!(report.categories.len(), 3);

        let top = &report.categories[0];
        assert_eq!(top.category_name, "Groceries");
        assert_eq!(top.total_spending.cents(), 7_500);
        assert_eq!(top.transaction_count, 2);
        assert!((top.percentage - 68.18).abs() < 0.01);

        assert!(report
            .categories
            .iter()
            .any(|c| c.category_id.is_none() && c.category_name == "Uncategorized"));
        assert_eq!(report.top_categories(10).len(), 3);
        assert_eq!(report.top_categories(1).len(), 1);
    }

    #[test]
    fn test_format_and_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::new("Checking", AccountType::Checking);
        storage.accounts.upsert(account.clone()).unwrap();
        add(&storage, &account, 10, -4_200, Some("Groceries"));

        let report = SpendingReport::generate(&storage, date(1), date(31)).unwrap();
        assert!(report.format_terminal().contains("Groceries"));

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert!(csv.contains("2025-01-01,2025-01-31,Groceries,42.00,1,100.00"));
    }

    #[test]
    fn test_empty_period() {
        let (_temp_dir, storage) = create_test_storage();
        let report = SpendingReport::generate(&storage, date(1), date(31)).unwrap();
        assert!(report.categories.is_empty());
        assert!(report.format_terminal().contains("No spending"));
    }
}
