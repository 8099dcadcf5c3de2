//! CSV export
//!
//! Transactions get a spreadsheet-friendly layout with names resolved;
//! the other tables export their own columns.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::storage::Storage;

/// Tables that can be exported on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Accounts,
    Transactions,
    Categories,
    Budgets,
    Goals,
    Debts,
    Investments,
    Subscriptions,
}

impl ExportTable {
    pub const ALL: [ExportTable; 8] = [
        ExportTable::Accounts,
        ExportTable::Transactions,
        ExportTable::Categories,
        ExportTable::Budgets,
        ExportTable::Goals,
        ExportTable::Debts,
        ExportTable::Investments,
        ExportTable::Subscriptions,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "accounts" | "account" => Some(Self::Accounts),
            "transactions" | "transaction" | "txn" => Some(Self::Transactions),
            "categories" | "category" => Some(Self::Categories),
            "budgets" | "budget" => Some(Self::Budgets),
            "goals" | "goal" => Some(Self::Goals),
            "debts" | "debt" => Some(Self::Debts),
            "investments" | "investment" | "inv" => Some(Self::Investments),
            "subscriptions" | "subscription" | "sub" => Some(Self::Subscriptions),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Transactions => "transactions",
            Self::Categories => "categories",
            Self::Budgets => "budgets",
            Self::Goals => "goals",
            Self::Debts => "debts",
            Self::Investments => "investments",
            Self::Subscriptions => "subscriptions",
        }
    }
}

fn export_err(e: impl std::fmt::Display) -> FintrackError {
    FintrackError::Export(e.to_string())
}

/// Write one table as CSV with a header row
pub fn export_table_csv<W: Write>(
    storage: &Storage,
    table: ExportTable,
    writer: W,
) -> FintrackResult<usize> {
    let account_names: HashMap<_, _> = storage
        .accounts
        .get_all()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let category_names: HashMap<_, _> = storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let account = |id| account_names.get(&id).cloned().unwrap_or_default();
    let category = |id: Option<_>| {
        id.and_then(|id| category_names.get(&id).cloned())
            .unwrap_or_default()
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    let header: &[&str] = match table {
        ExportTable::Accounts => {
            for a in storage.accounts.get_all()? {
                rows.push(vec![
                    a.id.as_uuid().to_string(),
                    a.name,
                    a.account_type.to_string(),
                    a.starting_balance.to_decimal_string(),
                    a.archived.to_string(),
                    a.notes,
                ]);
            }
            &["id", "name", "type", "starting_balance", "archived", "notes"]
        }
        ExportTable::Transactions => {
            for t in storage.transactions.get_all()? {
                rows.push(vec![
                    t.date.to_string(),
                    account(t.account_id),
                    t.description.clone(),
                    category(t.category_id),
                    t.kind().to_string(),
                    t.amount.to_decimal_string(),
                    t.source.to_string(),
                ]);
            }
            &["date", "account", "description", "category", "kind", "amount", "source"]
        }
        ExportTable::Categories => {
            for c in storage.categories.get_all()? {
                rows.push(vec![
                    c.id.as_uuid().to_string(),
                    c.name,
                    c.kind.to_string(),
                    c.color.unwrap_or_default(),
                    c.archived.to_string(),
                ]);
            }
            &["id", "name", "kind", "color", "archived"]
        }
        ExportTable::Budgets => {
            for b in storage.budgets.get_all()? {
                rows.push(vec![
                    b.period.to_string(),
                    category(Some(b.category_id)),
                    b.limit.to_decimal_string(),
                    b.rollover.to_string(),
                ]);
            }
            &["period", "category", "limit", "rollover"]
        }
        ExportTable::Goals => {
            for g in storage.goals.get_all()? {
                rows.push(vec![
                    g.id.as_uuid().to_string(),
                    g.name,
                    g.target_amount.to_decimal_string(),
                    g.saved_amount.to_decimal_string(),
                    g.deadline.map(|d| d.to_string()).unwrap_or_default(),
                    g.completed_at.is_some().to_string(),
                ]);
            }
            &["id", "name", "target", "saved", "deadline", "completed"]
        }
        ExportTable::Debts => {
            for d in storage.debts.get_all()? {
                rows.push(vec![
                    d.id.as_uuid().to_string(),
                    d.name,
                    d.lender,
                    d.original_amount.to_decimal_string(),
                    d.balance.to_decimal_string(),
                    format!("{:.2}", d.interest_rate_bps as f64 / 100.0),
                    d.minimum_payment.to_decimal_string(),
                    d.due_day.map(|day| day.to_string()).unwrap_or_default(),
                ]);
            }
            &[
                "id",
                "name",
                "lender",
                "original_amount",
                "balance",
                "interest_rate",
                "minimum_payment",
                "due_day",
            ]
        }
        ExportTable::Investments => {
            for i in storage.investments.get_all()? {
                rows.push(vec![
                    i.id.as_uuid().to_string(),
                    i.name.clone(),
                    i.symbol.clone().unwrap_or_default(),
                    i.kind.to_string(),
                    i.quantity.to_string(),
                    i.cost_basis.to_decimal_string(),
                    i.current_price.to_decimal_string(),
                    i.market_value().to_decimal_string(),
                ]);
            }
            &[
                "id",
                "name",
                "symbol",
                "kind",
                "quantity",
                "cost_basis",
                "current_price",
                "market_value",
            ]
        }
        ExportTable::Subscriptions => {
            for s in storage.subscriptions.get_all()? {
                rows.push(vec![
                    s.id.as_uuid().to_string(),
                    s.name.clone(),
                    s.amount.to_decimal_string(),
                    s.frequency.to_string(),
                    account(s.account_id),
                    category(s.category_id),
                    s.next_billing_date.to_string(),
                    s.active.to_string(),
                ]);
            }
            &[
                "id",
                "name",
                "amount",
                "frequency",
                "account",
                "category",
                "next_billing_date",
                "active",
            ]
        }
    };

    if table == ExportTable::Transactions {
        rows.sort_by(|a, b| a[0].cmp(&b[0]));
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header).map_err(export_err)?;
    for row in &rows {
        csv_writer.write_record(row).map_err(export_err)?;
    }
    csv_writer.flush().map_err(export_err)?;

    tracing::info!(table = table.name(), rows = rows.len(), "exported table to CSV");
    Ok(rows.len())
}

/// Export all transactions, oldest first
pub fn export_transactions_csv<W: Write>(storage: &Storage, writer: W) -> FintrackResult<usize> {
    export_table_csv(storage, ExportTable::Transactions, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Account, AccountType, Category, CategoryKind, Goal, Money, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_transactions_csv() {
        let (_temp_dir, storage) = create_test_storage();

        let account = Account::new("Checking", AccountType::Checking);
        storage.accounts.upsert(account.clone()).unwrap();
        let cat = Category::new("Groceries", CategoryKind::Expense);
        storage.categories.upsert(cat.clone()).unwrap();

        for (day, cents, desc) in [(20, -5_000, "Market, downtown"), (5, 250_000, "Payroll")] {
            let txn = Transaction::with_details(
                account.id,
                NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
                Money::from_cents(cents),
                desc,
                if cents < 0 { Some(cat.id) } else { None },
                "",
            );
            storage.transactions.upsert(txn).unwrap();
        }

        let mut output = Vec::new();
        let count = export_transactions_csv(&storage, &mut output).unwrap();
        assert_eq!(count, 2);

        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,account,description,category,kind,amount,source");
        assert_eq!(lines[1], "2025-01-05,Checking,Payroll,,income,2500.00,manual");
        assert_eq!(
            lines[2],
            "2025-01-20,Checking,\"Market, downtown\",Groceries,expense,-50.00,manual"
        );
    }

    #[test]
    fn test_export_goals_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let mut goal = Goal::new("Trip", Money::from_cents(100_000));
        goal.deadline = NaiveDate::from_ymd_opt(2025, 12, 1);
        storage.goals.upsert(goal).unwrap();

        let mut output = Vec::new();
        export_table_csv(&storage, ExportTable::Goals, &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        assert!(csv.starts_with("id,name,target,saved,deadline,completed\n"));
        assert!(csv.contains(",Trip,1000.00,0.00,2025-12-01,false"));
    }

    #[test]
    fn test_parse_table() {
        assert_eq!(ExportTable::parse("Subs"), None);
        assert_eq!(ExportTable::parse("sub"), Some(ExportTable::Subscriptions));
        assert_eq!(ExportTable::parse("TRANSACTIONS"), Some(ExportTable::Transactions));
        for table in ExportTable::ALL {
            assert_eq!(ExportTable::parse(table.name()), Some(table));
        }
    }
}
