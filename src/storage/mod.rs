//! Storage layer for fintrack
//!
//! One JSON document per table under `data/`, written atomically, plus the
//! append-only audit log.

pub mod accounts;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod plan;
pub mod table;
pub mod transactions;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use plan::PlanStore;
pub use table::{Record, TableRepository};
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FintrackPaths;
use crate::error::FintrackError;
use crate::models::{Budget, Debt, Goal, Investment, Subscription};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FintrackPaths,
    audit: AuditLogger,
    pub accounts: AccountRepository,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: TableRepository<Budget>,
    pub goals: TableRepository<Goal>,
    pub debts: TableRepository<Debt>,
    pub investments: TableRepository<Investment>,
    pub subscriptions: TableRepository<Subscription>,
    pub plan: PlanStore,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: FintrackPaths) -> Result<Self, FintrackError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            accounts: AccountRepository::new(paths.accounts_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: TableRepository::new(paths.budgets_file()),
            goals: TableRepository::new(paths.goals_file()),
            debts: TableRepository::new(paths.debts_file()),
            investments: TableRepository::new(paths.investments_file()),
            subscriptions: TableRepository::new(paths.subscriptions_file()),
            plan: PlanStore::new(paths.billing_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &FintrackPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), FintrackError> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.categories.load()?;
        self.budgets.load()?;
        self.goals.load()?;
        self.debts.load()?;
        self.investments.load()?;
        self.subscriptions.load()?;
        self.plan.load()?;
        tracing::debug!(
            accounts = self.accounts.count()?,
            transactions = self.transactions.count()?,
            "storage loaded"
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FintrackError> {
        self.accounts.save()?;
        self.transactions.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        self.goals.save()?;
        self.debts.save()?;
        self.investments.save()?;
        self.subscriptions.save()?;
        self.plan.save()?;
        Ok(())
    }

    /// Check if fintrack has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), FintrackError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update with a field diff of the two snapshots
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), FintrackError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), FintrackError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Log several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> Result<(), FintrackError> {
        self.audit.log_batch(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_audit_helpers_write_entries() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let before = Account::new("Checking", AccountType::Checking);
        let mut after = before.clone();
        after.name = "Main Checking".into();

        storage
            .log_create(EntityType::Account, before.id.to_string(), None, &before)
            .unwrap();
        storage
            .log_update(EntityType::Account, after.id.to_string(), None, &before, &after)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[1]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("name: \"Checking\" -> \"Main Checking\""));
    }

    #[test]
    fn test_save_all_and_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage
            .accounts
            .upsert(Account::new("Cash", AccountType::Cash))
            .unwrap();
        storage.save_all().unwrap();

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.accounts.count().unwrap(), 1);
        assert!(temp_dir.path().join("data").join("subscriptions.json").exists());
    }
}
