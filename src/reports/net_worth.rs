//! Net Worth Report
//!
//! Account balances, investment holdings and debts rolled up into one
//! net worth figure.

use crate::error::FintrackResult;
use crate::models::{AccountType, Money};
use crate::services::{AccountService, DebtService, InvestmentService};
use crate::storage::Storage;
use std::collections::BTreeMap;
use std::io::Write;

/// What a net worth line represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NetWorthSection {
    Account,
    Investment,
    Debt,
}

/// One contributing line
#[derive(Debug, Clone)]
pub struct NetWorthLine {
    pub section: NetWorthSection,
    pub name: String,
    /// Account type, investment kind or lender
    pub detail: String,
    /// Signed contribution to net worth
    pub value: Money,
}

/// Net Worth Summary
#[derive(Debug, Clone, Default)]
pub struct NetWorthSummary {
    /// Positive balances of non-liability accounts
    pub total_assets: Money,
    /// Amount owed on credit and loan accounts, as a positive number
    pub total_liabilities: Money,
    /// Market value of all holdings
    pub investments: Money,
    /// Outstanding balance of tracked debts
    pub debts: Money,
    pub net_worth: Money,
}

/// Net Worth Report
#[derive(Debug, Clone)]
pub struct NetWorthReport {
    pub lines: Vec<NetWorthLine>,
    pub summary: NetWorthSummary,
    /// Totals per account type
    pub by_account_type: Vec<(AccountType, Money)>,
}

impl NetWorthReport {
    /// Generate a net worth report over active accounts
    pub fn generate(storage: &Storage) -> FintrackResult<Self> {
        let mut lines = Vec::new();
        let mut summary = NetWorthSummary::default();
        let mut by_type: BTreeMap<String, (AccountType, Money)> = BTreeMap::new();

        for account_summary in AccountService::new(storage).list_with_balances(false)? {
            let account = &account_summary.account;
            let balance = account_summary.balance;

            if account.account_type.is_liability() {
                // Liability balances are negative while money is owed
                summary.total_liabilities += -balance;
            } else {
                summary.total_assets += balance;
            }

            by_type
                .entry(account.account_type.to_string())
                .or_insert((account.account_type, Money::zero()))
                .1 += balance;

            lines.push(NetWorthLine {
                section: NetWorthSection::Account,
                name: account.name.clone(),
                detail: account.account_type.to_string(),
                value: balance,
            });
        }

        for holding in InvestmentService::new(storage).list()? {
            let value = holding.market_value();
            summary.investments += value;
            lines.push(NetWorthLine {
                section: NetWorthSection::Investment,
                name: holding.name.clone(),
                detail: holding.kind.to_string(),
                value,
            });
        }

        for debt in DebtService::new(storage).list(false)? {
            summary.debts += debt.balance;
            lines.push(NetWorthLine {
                section: NetWorthSection::Debt,
                name: debt.name.clone(),
                detail: debt.lender.clone(),
                value: -debt.balance,
            });
        }

        summary.net_worth =
            summary.total_assets - summary.total_liabilities + summary.investments - summary.debts;

        lines.sort_by(|a, b| a.section.cmp(&b.section).then(b.value.cmp(&a.value)));

        Ok(Self {
            lines,
            summary,
            by_account_type: by_type.into_values().collect(),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Net Worth Report\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Assets:       {:>15}\n", self.summary.total_assets));
        output.push_str(&format!("Liabilities:  {:>15}\n", self.summary.total_liabilities));
        output.push_str(&format!("Investments:  {:>15}\n", self.summary.investments));
        output.push_str(&format!("Debts:        {:>15}\n", self.summary.debts));
        output.push_str(&"-".repeat(30));
        output.push('\n');
        output.push_str(&format!("Net Worth:    {:>15}\n", self.summary.net_worth));

        let mut current = None;
        for line in &self.lines {
            if current != Some(line.section) {
                current = Some(line.section);
                let title = match line.section {
                    NetWorthSection::Account => "ACCOUNTS",
                    NetWorthSection::Investment => "INVESTMENTS",
                    NetWorthSection::Debt => "DEBTS",
                };
                output.push_str(&format!("\n{}\n", title));
            }
            output.push_str(&format!(
                "  {:<28} {:<14} {:>14}\n",
                line.name, line.detail, line.value
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FintrackResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["Section", "Name", "Detail", "Value"])?;
        for line in &self.lines {
            let section = match line.section {
                NetWorthSection::Account => "account",
                NetWorthSection::Investment => "investment",
                NetWorthSection::Debt => "debt",
            };
            csv_writer.write_record([
                section,
                line.name.as_str(),
                line.detail.as_str(),
                line.value.to_decimal_string().as_str(),
            ])?;
        }
        csv_writer.write_record([
            "total",
            "Net Worth",
            "",
            self.summary.net_worth.to_decimal_string().as_str(),
        ])?;
        csv_writer
            .flush()
            .map_err(|e| crate::error::FintrackError::Export(e.to_string()))?;
        Ok(())
    }
}
