//! Transaction display formatting

use std::collections::HashMap;

use tabled::Tabled;

use super::report::{render_table, truncate};
use crate::error::FintrackResult;
use crate::models::{AccountId, CategoryId, Transaction};
use crate::storage::Storage;

/// Names used to label transaction rows
#[derive(Debug, Default)]
pub struct NameLookup {
    pub accounts: HashMap<AccountId, String>,
    pub categories: HashMap<CategoryId, String>,
}

impl NameLookup {
    pub fn from_storage(storage: &Storage) -> FintrackResult<Self> {
        Ok(Self {
            accounts: storage
                .accounts
                .get_all()?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect(),
            categories: storage
                .categories
                .get_all()?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect(),
        })
    }

    pub fn account(&self, id: &AccountId) -> String {
        self.accounts
            .get(id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn category(&self, id: Option<&CategoryId>) -> String {
        id.and_then(|id| self.categories.get(id))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Source")]
    source: String,
}

/// Format transactions as a register table
pub fn format_transaction_register(transactions: &[Transaction], names: &NameLookup) -> String {
    let rows = transactions
        .iter()
        .map(|txn| TransactionRow {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            account: names.account(&txn.account_id),
            description: truncate(&txn.description, 32),
            category: names.category(txn.category_id.as_ref()),
            amount: txn.amount.to_string(),
            source: txn.source.to_string(),
        })
        .collect();

    render_table(rows, "No transactions found.")
}

/// Format a single transaction's details
pub fn format_transaction_details(txn: &Transaction, names: &NameLookup) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("  Date:        {}\n", txn.date));
    output.push_str(&format!("  Account:     {}\n", names.account(&txn.account_id)));
    output.push_str(&format!("  Kind:        {}\n", txn.kind()));
    output.push_str(&format!("  Amount:      {}\n", txn.amount));

    if !txn.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", txn.description));
    }
    let category = names.category(txn.category_id.as_ref());
    if !category.is_empty() {
        output.push_str(&format!("  Category:    {}\n", category));
    }
    if !txn.memo.is_empty() {
        output.push_str(&format!("  Memo:        {}\n", txn.memo));
    }
    output.push_str(&format!("  Source:      {}\n", txn.source));
    if let Some(import_id) = &txn.import_id {
        output.push_str(&format!("  Import ID:   {}\n", import_id));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_register_uses_names() {
        let account = Account::new("Checking", AccountType::Checking);
        let mut names = NameLookup::default();
        names.accounts.insert(account.id, account.name.clone());

        let txn = Transaction::with_details(
            account.id,
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            Money::from_cents(-1_250),
            "Coffee beans",
            None,
            "",
        );
        let output = format_transaction_register(&[txn], &names);
        assert!(output.contains("2025-03-04"));
        assert!(output.contains("Checking"));
        assert!(output.contains("-$12.50"));
    }

    #[test]
    fn test_empty_register() {
        assert!(format_transaction_register(&[], &NameLookup::default())
            .contains("No transactions found"));
    }
}
