//! Dashboard summary
//!
//! The headline figures shown at the top of the dashboard and fed to the
//! assistant as context.

use crate::error::FintrackResult;
use crate::models::{BudgetPeriod, Money};
use crate::reports::NetWorthReport;
use crate::services::SubscriptionService;
use crate::storage::Storage;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub as_of: NaiveDate,
    /// Month containing `as_of`
    pub month: BudgetPeriod,
    pub net_worth: Money,
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub investments: Money,
    pub debts: Money,
    pub month_income: Money,
    /// Positive amount spent this month
    pub month_expense: Money,
    pub subscriptions_monthly: Money,
    pub account_count: usize,
    pub transaction_count: usize,
    pub active_goals: usize,
    pub open_debts: usize,
    pub active_subscriptions: usize,
}

impl DashboardSummary {
    pub fn generate(storage: &Storage, today: NaiveDate) -> FintrackResult<Self> {
        let net_worth = NetWorthReport::generate(storage)?.summary;
        let month = BudgetPeriod::month_of(today);

        let mut month_income = Money::zero();
        let mut month_expense = Money::zero();
        for txn in storage
            .transactions
            .get_by_date_range(month.start_date(), month.end_date())?
        {
            if txn.amount.is_positive() {
                month_income += txn.amount;
            } else {
                month_expense += -txn.amount;
            }
        }

        let subscriptions = SubscriptionService::new(storage);

        Ok(Self {
            as_of: today,
            month,
            net_worth: net_worth.net_worth,
            total_assets: net_worth.total_assets,
            total_liabilities: net_worth.total_liabilities,
            investments: net_worth.investments,
            debts: net_worth.debts,
            month_income,
            month_expense,
            subscriptions_monthly: subscriptions.monthly_cost()?,
            account_count: storage.accounts.get_active()?.len(),
            transaction_count: storage.transactions.count()?,
            active_goals: storage
                .goals
                .get_all()?
                .iter()
                .filter(|g| !g.is_completed())
                .count(),
            open_debts: storage
                .debts
                .get_all()?
                .iter()
                .filter(|d| !d.is_paid_off())
                .count(),
            active_subscriptions: subscriptions.list(false)?.len(),
        })
    }

    pub fn month_net(&self) -> Money {
        self.month_income - self.month_expense
    }

    /// Share of this month's income not spent; `None` without income
    pub fn savings_rate(&self) -> Option<f64> {
        if !self.month_income.is_positive() {
            return None;
        }
        Some(self.month_net().percent_of(self.month_income))
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Summary as of {}\n", self.as_of));
        output.push_str(&"=".repeat(44));
        output.push('\n');
        output.push_str(&format!("Net Worth:            {:>20}\n", self.net_worth));
        output.push_str(&format!("  Assets:             {:>20}\n", self.total_assets));
        output.push_str(&format!("  Liabilities:        {:>20}\n", self.total_liabilities));
        output.push_str(&format!("  Investments:        {:>20}\n", self.investments));
        output.push_str(&format!("  Debts:              {:>20}\n", self.debts));
        output.push('\n');
        output.push_str(&format!("{} income:       {:>20}\n", self.month, self.month_income));
        output.push_str(&format!("{} expense:      {:>20}\n", self.month, self.month_expense));
        output.push_str(&format!("{} net:          {:>20}\n", self.month, self.month_net()));
        let rate = self
            .savings_rate()
            .map(|r| format!("{:.1}%", r))
            .unwrap_or_else(|| "n/a".to_string());
        output.push_str(&format!("Savings rate:         {:>20}\n", rate));
        output.push_str(&format!(
            "Subscriptions:        {:>20}\n",
            format!("{}/mo", self.subscriptions_monthly)
        ));
        output.push('\n');
        output.push_str(&format!(
            "{} accounts, {} transactions, {} goals, {} debts, {} subscriptions\n",
            self.account_count,
            self.transaction_count,
            self.active_goals,
            self.open_debts,
            self.active_subscriptions
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Account, AccountType, Goal, Transaction};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_month_figures_and_savings_rate() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::with_starting_balance(
            "Checking",
            AccountType::Checking,
            Money::from_cents(100_000),
        );
        storage.accounts.upsert(account.clone()).unwrap();

        for (d, cents) in [
            (date(4, 1), 400_000),
            (date(4, 3), -100_000),
            (date(3, 31), -50_000),
        ] {
            storage
                .transactions
                .upsert(Transaction::new(account.id, d, Money::from_cents(cents)))
                .unwrap();
        }
        storage
            .goals
            .upsert(Goal::new("Holiday", Money::from_cents(50_000)))
            .unwrap();

        let summary = DashboardSummary::generate(&storage, date(4, 15)).unwrap();
        assert_eq!(summary.month, BudgetPeriod::monthly(2025, 4));
        assert_eq!(summary.month_income.cents(), 400_000);
        assert_eq!(summary.month_expense.cents(), 100_000);
        assert_eq!(summary.savings_rate(), Some(75.0));
        assert_eq!(summary.net_worth.cents(), 350_000);
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.active_goals, 1);
        assert!(summary.format_terminal().contains("75.0%"));
    }

    #[test]
    fn test_no_income_has_no_rate() {
        let (_temp_dir, storage) = create_test_storage();
        let summary = DashboardSummary::generate(&storage, date(1, 1)).unwrap();
        assert_eq!(summary.savings_rate(), None);
        assert!(summary.format_terminal().contains("n/a"));
    }
}
