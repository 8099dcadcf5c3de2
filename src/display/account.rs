//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use tabled::Tabled;

use super::report::render_table;
use crate::models::Money;
use crate::services::AccountSummary;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Txns")]
    transactions: usize,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format a list of accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary]) -> String {
    if summaries.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let rows = summaries
        .iter()
        .map(|s| AccountRow {
            id: s.account.id.to_string(),
            name: s.account.name.clone(),
            account_type: s.account.account_type.to_string(),
            balance: s.balance.to_string(),
            transactions: s.transaction_count,
            status: if s.account.archived { "Archived" } else { "" },
        })
        .collect();

    let total: Money = summaries
        .iter()
        .filter(|s| !s.account.archived)
        .map(|s| s.balance)
        .sum();

    format!(
        "{}\nTotal: {}\n",
        render_table(rows, "No accounts found."),
        total
    )
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary) -> String {
    let account = &summary.account;

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:             {}\n", account.account_type));
    output.push_str(&format!("  ID:               {}\n", account.id));
    output.push_str(&format!(
        "  Archived:         {}\n",
        if account.archived { "Yes" } else { "No" }
    ));
    output.push('\n');
    output.push_str(&format!("  Starting Balance: {}\n", account.starting_balance));
    output.push_str(&format!("  Current Balance:  {}\n", summary.balance));
    output.push_str(&format!("  Transactions:     {}\n", summary.transaction_count));

    if !account.notes.is_empty() {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", account.notes));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        account.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType};

    fn summary(name: &str, balance: i64) -> AccountSummary {
        AccountSummary {
            account: Account::new(name, AccountType::Checking),
            balance: Money::from_cents(balance),
            transaction_count: 2,
        }
    }

    #[test]
    fn test_format_account_list() {
        let output = format_account_list(&[summary("Checking", 100_000), summary("Savings", 50_000)]);
        assert!(output.contains("Checking"));
        assert!(output.contains("Savings"));
        assert!(output.contains("Total: $1500.00"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_account_list(&[]).contains("No accounts found"));
    }

    #[test]
    fn test_format_account_details() {
        let output = format_account_details(&summary("My Account", 1_000));
        assert!(output.contains("My Account"));
        assert!(output.contains("Current Balance:  $10.00"));
    }
}
