//! Budget Status Report
//!
//! Limit, carryover, spending and remaining amount for every budget of a
//! period.

use crate::error::{FintrackError, FintrackResult};
use crate::models::{BudgetPeriod, BudgetStatus, Money};
use crate::services::BudgetService;
use crate::storage::Storage;
use std::io::Write;

/// How far through its budget a category is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetHealth {
    OnTrack,
    Warning,
    Over,
}

impl BudgetHealth {
    pub fn of(status: &BudgetStatus, warning_percent: u32) -> Self {
        if status.is_over() {
            Self::Over
        } else if status.percent_used() >= warning_percent as f64 {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "",
            Self::Warning => "WARNING",
            Self::Over => "OVER",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BudgetStatusReport {
    pub period: BudgetPeriod,
    /// Sorted by category name
    pub rows: Vec<(BudgetStatus, BudgetHealth)>,
    pub total_available: Money,
    pub total_spent: Money,
}

impl BudgetStatusReport {
    pub fn generate(
        storage: &Storage,
        period: BudgetPeriod,
        warning_percent: u32,
    ) -> FintrackResult<Self> {
        let overview = BudgetService::new(storage).overview(period)?;

        let total_available = overview.statuses.iter().map(|s| s.available()).sum();
        let rows = overview
            .statuses
            .into_iter()
            .map(|status| {
                let health = BudgetHealth::of(&status, warning_percent);
                (status, health)
            })
            .collect();

        Ok(Self {
            period,
            rows,
            total_available,
            total_spent: overview.total_spent,
        })
    }

    pub fn total_remaining(&self) -> Money {
        self.total_available - self.total_spent
    }

    pub fn over_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|(_, health)| *health == BudgetHealth::Over)
            .count()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget Status: {}\n", self.period));
        output.push_str(&"=".repeat(86));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No budgets set for this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<22} {:>11} {:>11} {:>11} {:>11}  {:<12} {}\n",
            "Category", "Limit", "Carryover", "Spent", "Remaining", "", ""
        ));
        output.push_str(&"-".repeat(86));
        output.push('\n');

        for (status, health) in &self.rows {
            output.push_str(&format!(
                "{:<22} {:>11} {:>11} {:>11} {:>11}  {:<12} {}\n",
                crate::display::truncate(&status.category_name, 22),
                status.limit,
                status.carryover,
                status.spent,
                status.remaining(),
                crate::display::format_bar(status.percent_used().min(100.0), 100.0, 12),
                health.label(),
            ));
        }

        output.push_str(&"-".repeat(86));
        output.push('\n');
        output.push_str(&format!(
            "{:<22} {:>11} {:>11} {:>11} {:>11}\n",
            "TOTAL",
            "",
            "",
            self.total_spent,
            self.total_remaining()
        ));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> FintrackResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "Period",
            "Category",
            "Limit",
            "Carryover",
            "Spent",
            "Remaining",
            "Percent Used",
        ])?;
        for (status, _) in &self.rows {
            csv_writer.write_record([
                self.period.to_string(),
                status.category_name.clone(),
                status.limit.to_decimal_string(),
                status.carryover.to_decimal_string(),
                status.spent.to_decimal_string(),
                status.remaining().to_decimal_string(),
                format!("{:.1}", status.percent_used()),
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
    use crate::models::{AccountId, CategoryId, Transaction};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn category(storage: &Storage, name: &str) -> CategoryId {
        storage.categories.get_by_name(name).unwrap().unwrap().id
    }

    fn spend(storage: &Storage, category_id: CategoryId, cents: i64) {
        let mut txn = Transaction::new(
            AccountId::new(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            Money::from_cents(-cents),
        );
        txn.category_id = Some(category_id);
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_health_classification() {
        let (_temp_dir, storage) = create_test_storage();
        let period = BudgetPeriod::monthly(2025, 3);
        let service = BudgetService::new(&storage);

        let groceries = category(&storage, "Groceries");
        let dining = category(&storage, "Dining Out");
        let housing = category(&storage, "Housing");
        for id in [groceries, dining, housing] {
            service
                .set_limit(id, period, Money::from_cents(10_000), None)
                .unwrap();
        }
        spend(&storage, groceries, 5_000);
        spend(&storage, dining, 8_500);
        spend(&storage, housing, 12_000);

        let report = BudgetStatusReport::generate(&storage, period, 80).unwrap();
        let health: Vec<_> = report
            .rows
            .iter()
            .map(|(s, h)| (s.category_name.as_str(), *h))
            .collect();
        assert_eq!(
            health,
            vec![
                ("Dining Out", BudgetHealth::Warning),
                ("Groceries", BudgetHealth::OnTrack),
                ("Housing", BudgetHealth::Over),
            ]
        );
        assert_eq!(report.over_count(), 1);
        assert_eq!(report.total_spent.cents(), 25_500);
        assert_eq!(report.total_remaining().cents(), 4_500);
        assert!(report.format_terminal().contains("OVER"));
    }

    #[test]
    fn test_empty_period() {
        let (_temp_dir, storage) = create_test_storage();
        let report =
            BudgetStatusReport::generate(&storage, BudgetPeriod::monthly(2025, 1), 80).unwrap();
        assert!(report.format_terminal().contains("No budgets"));
    }
}
