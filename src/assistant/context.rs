//! Financial summary sent to the model as context

use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::error::FintrackResult;
use crate::models::BudgetPeriod;
use crate::reports::{BudgetStatusReport, DashboardSummary, SpendingReport};
use crate::services::{AccountService, CategoryService, TransactionFilter, TransactionService};
use crate::storage::Storage;

const TOP_SPENDING: usize = 5;

/// Plain-text snapshot of the user's finances as of `today`
pub fn build_context(
    storage: &Storage,
    today: NaiveDate,
    recent_transactions: usize,
) -> FintrackResult<String> {
    let summary = DashboardSummary::generate(storage, today)?;
    let month = BudgetPeriod::month_of(today);
    let spending = SpendingReport::generate(storage, month.start_date(), month.end_date())?;
    let budgets = BudgetStatusReport::generate(storage, month, 80)?;

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "Today: {}", today);
    let _ = writeln!(out, "Net worth: {}", summary.net_worth);
    let _ = writeln!(
        out,
        "This month ({}): income {}, expenses {}, net {}",
        month,
        summary.month_income,
        summary.month_expense,
        summary.month_net()
    );
    let _ = writeln!(
        out,
        "Subscriptions: {} active, {}/month",
        summary.active_subscriptions, summary.subscriptions_monthly
    );

    out.push_str("\nAccounts:\n");
    for account in AccountService::new(storage).list_with_balances(false)? {
        let _ = writeln!(
            out,
            "- {} ({}): {}",
            account.account.name, account.account.account_type, account.balance
        );
    }

    let categories = CategoryService::new(storage).list()?;
    let _ = writeln!(
        out,
        "\nCategories: {}",
        categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    if !spending.categories.is_empty() {
        out.push_str("\nTop spending this month:\n");
        for category in spending.top_categories(TOP_SPENDING) {
            let _ = writeln!(
                out,
                "- {}: {} ({:.0}%)",
                category.category_name, category.total_spending, category.percentage
            );
        }
    }

    if !budgets.rows.is_empty() {
        out.push_str("\nBudgets this month:\n");
        for (status, _) in &budgets.rows {
            let _ = writeln!(
                out,
                "- {}: spent {} of {}",
                status.category_name,
                status.spent,
                status.available()
            );
        }
    }

    let names: HashMap<_, _> = categories.into_iter().map(|c| (c.id, c.name)).collect();
    let recent = TransactionService::new(storage)
        .list(TransactionFilter::new().limit(recent_transactions))?;
    if !recent.is_empty() {
        out.push_str("\nRecent transactions:\n");
        for txn in recent {
            let category = txn
                .category_id
                .and_then(|id| names.get(&id))
                .map(String::as_str)
                .unwrap_or("Uncategorized");
            let _ = writeln!(
                out,
                "- {} {} {} [{}]",
                txn.date, txn.description, txn.amount, category
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Account, AccountType, Money, Transaction};
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    #[test]
    fn test_context_mentions_accounts_and_recent_activity() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let account = Account::new("Everyday", AccountType::Checking);
        storage.accounts.upsert(account.clone()).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let mut txn = Transaction::new(account.id, today, Money::from_cents(-1_250));
        txn.description = "Bookshop".into();
        storage.transactions.upsert(txn).unwrap();

        let context = build_context(&storage, today, 10).unwrap();
        assert!(context.contains("Today: 2025-06-20"));
        assert!(context.contains("- Everyday (Checking): -$12.50"));
        assert!(context.contains("Bookshop"));
        assert!(context.contains("Groceries"));
        assert!(context.contains("Top spending this month"));
    }
}
