//! JSON export of the whole store, with schema versioning

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FintrackError, FintrackResult};
use crate::models::{
    Account, Budget, Category, Debt, Goal, Investment, Plan, Subscription, Transaction,
};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Every table in one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub debts: Vec<Debt>,
    pub investments: Vec<Investment>,
    pub subscriptions: Vec<Subscription>,
    pub plan: Plan,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub account_count: usize,
    pub transaction_count: usize,
    pub category_count: usize,
    pub budget_count: usize,
    pub goal_count: usize,
    pub debt_count: usize,
    pub investment_count: usize,
    pub subscription_count: usize,
    pub earliest_transaction: Option<String>,
    pub latest_transaction: Option<String>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> FintrackResult<Self> {
        let accounts = storage.accounts.get_all()?;
        let categories = storage.categories.get_all()?;
        let transactions = storage.transactions.get_all()?;
        let budgets = storage.budgets.get_all()?;
        let goals = storage.goals.get_all()?;
        let debts = storage.debts.get_all()?;
        let investments = storage.investments.get_all()?;
        let subscriptions = storage.subscriptions.get_all()?;

        let metadata = ExportMetadata {
            account_count: accounts.len(),
            transaction_count: transactions.len(),
            category_count: categories.len(),
            budget_count: budgets.len(),
            goal_count: goals.len(),
            debt_count: debts.len(),
            investment_count: investments.len(),
            subscription_count: subscriptions.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            accounts,
            categories,
            transactions,
            budgets,
            goals,
            debts,
            investments,
            subscriptions,
            plan: storage.plan.get()?,
            metadata,
        })
    }

    /// Check schema version and references between tables
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let account_ids: HashSet<_> = self.accounts.iter().map(|a| a.id).collect();
        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id).collect();

        for txn in &self.transactions {
            if !account_ids.contains(&txn.account_id) {
                return Err(format!(
                    "Transaction {} references unknown account {}",
                    txn.id, txn.account_id
                ));
            }
            if let Some(cat_id) = txn.category_id {
                if !category_ids.contains(&cat_id) {
                    return Err(format!(
                        "Transaction {} references unknown category {}",
                        txn.id, cat_id
                    ));
                }
            }
        }

        for budget in &self.budgets {
            if !category_ids.contains(&budget.category_id) {
                return Err(format!(
                    "Budget for {} references unknown category {}",
                    budget.period, budget.category_id
                ));
            }
        }

        for sub in &self.subscriptions {
            if !account_ids.contains(&sub.account_id) {
                return Err(format!(
                    "Subscription {} references unknown account {}",
                    sub.id, sub.account_id
                ));
            }
        }

        Ok(())
    }
}

pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> FintrackResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FintrackError::Export(e.to_string()))?;

    tracing::info!(transactions = export.metadata.transaction_count, "exported JSON");
    Ok(())
}

/// Read an export back and check it
pub fn import_from_json(json_str: &str) -> FintrackResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| FintrackError::Import(e.to_string()))?;
    export.validate().map_err(FintrackError::Import)?;
    Ok(export)
}
