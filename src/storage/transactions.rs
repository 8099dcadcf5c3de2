//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with
//! in-memory indexes by account, category and recurring signature.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::error::FintrackError;
use crate::models::{AccountId, CategoryId, SubscriptionId, Transaction, TransactionId, TransactionSource};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

#[derive(Default)]
struct Indexed {
    data: HashMap<TransactionId, Transaction>,
    by_account: HashMap<AccountId, Vec<TransactionId>>,
    by_category: HashMap<CategoryId, Vec<TransactionId>>,
    signatures: HashSet<String>,
}

impl Indexed {
    fn insert(&mut self, txn: Transaction) {
        self.remove(txn.id);
        self.by_account.entry(txn.account_id).or_default().push(txn.id);
        if let Some(cat_id) = txn.category_id {
            self.by_category.entry(cat_id).or_default().push(txn.id);
        }
        if let Some(sig) = &txn.recurring_signature {
            self.signatures.insert(sig.clone());
        }
        self.data.insert(txn.id, txn);
    }

    fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let old = self.data.remove(&id)?;
        if let Some(ids) = self.by_account.get_mut(&old.account_id) {
            ids.retain(|&tid| tid != id);
        }
        if let Some(cat_id) = old.category_id {
            if let Some(ids) = self.by_category.get_mut(&cat_id) {
                ids.retain(|&tid| tid != id);
            }
        }
        if let Some(sig) = &old.recurring_signature {
            self.signatures.remove(sig);
        }
        Some(old)
    }

    fn collect(&self, ids: Option<&Vec<TransactionId>>) -> Vec<Transaction> {
        let mut transactions: Vec<_> = ids
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.data.get(id).cloned())
            .collect();
        sort_newest_first(&mut transactions);
        transactions
    }
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    inner: RwLock<Indexed>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            inner: RwLock::new(Indexed::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Indexed>, FintrackError> {
        self.inner
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Indexed>, FintrackError> {
        self.inner
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut inner = self.write()?;
        *inner = Indexed::default();
        for txn in file_data.transactions {
            inner.insert(txn);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), FintrackError> {
        let transactions = self.get_all()?;
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, FintrackError> {
        Ok(self.read()?.data.get(&id).cloned())
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, FintrackError> {
        let mut transactions: Vec<_> = self.read()?.data.values().cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, FintrackError> {
        let inner = self.read()?;
        Ok(inner.collect(inner.by_account.get(&account_id)))
    }

    pub fn get_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Transaction>, FintrackError> {
        let inner = self.read()?;
        Ok(inner.collect(inner.by_category.get(&category_id)))
    }

    /// Transactions with `start <= date <= end`, newest first
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, FintrackError> {
        let mut transactions: Vec<_> = self
            .read()?
            .data
            .values()
            .filter(|t| t.date >= start && t.date <= end)
            .cloned()
            .collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Materialized charges for one subscription
    pub fn get_by_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<Transaction>, FintrackError> {
        let mut transactions: Vec<_> = self
            .read()?
            .data
            .values()
            .filter(|t| {
                matches!(t.source, TransactionSource::Recurring { subscription_id: s } if s == subscription_id)
            })
            .cloned()
            .collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    pub fn upsert(&self, txn: Transaction) -> Result<(), FintrackError> {
        self.write()?.insert(txn);
        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<bool, FintrackError> {
        Ok(self.write()?.remove(id).is_some())
    }

    pub fn find_by_import_id(&self, import_id: &str) -> Result<Option<Transaction>, FintrackError> {
        Ok(self
            .read()?
            .data
            .values()
            .find(|t| t.import_id.as_deref() == Some(import_id))
            .cloned())
    }

    /// Whether a materialized charge with this signature already exists
    pub fn has_signature(&self, signature: &str) -> Result<bool, FintrackError> {
        Ok(self.read()?.signatures.contains(signature))
    }

    pub fn count_by_account(&self, account_id: AccountId) -> Result<usize, FintrackError> {
        Ok(self
            .read()?
            .by_account
            .get(&account_id)
            .map_or(0, |ids| ids.len()))
    }

    pub fn count_by_category(&self, category_id: CategoryId) -> Result<usize, FintrackError> {
        Ok(self
            .read()?
            .by_category
            .get(&category_id)
            .map_or(0, |ids| ids.len()))
    }

    pub fn count(&self) -> Result<usize, FintrackError> {
        Ok(self.read()?.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::recurring_signature;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_indexes_follow_updates() {
        let (_temp_dir, repo) = create_test_repo();
        let account_a = AccountId::new();
        let account_b = AccountId::new();
        let category = CategoryId::new();

        let mut txn = Transaction::new(account_a, date(2025, 1, 15), Money::from_cents(-5000));
        txn.category_id = Some(category);
        repo.upsert(txn.clone()).unwrap();
        assert_eq!(repo.count_by_account(account_a).unwrap(), 1);
        assert_eq!(repo.count_by_category(category).unwrap(), 1);

        txn.account_id = account_b;
        txn.category_id = None;
        repo.upsert(txn).unwrap();
        assert_eq!(repo.count_by_account(account_a).unwrap(), 0);
        assert_eq!(repo.get_by_account(account_b).unwrap().len(), 1);
        assert_eq!(repo.count_by_category(category).unwrap(), 0);
    }

    #[test]
    fn test_signature_index_survives_reload() {
        let (temp_dir, repo) = create_test_repo();
        let sub_id = SubscriptionId::new();
        let sig = recurring_signature(&sub_id, date(2025, 2, 1));

        let mut txn = Transaction::new(AccountId::new(), date(2025, 2, 1), Money::from_cents(-999));
        txn.source = TransactionSource::Recurring {
            subscription_id: sub_id,
        };
        txn.recurring_signature = Some(sig.clone());
        let id = txn.id;
        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        reloaded.load().unwrap();
        assert!(reloaded.has_signature(&sig).unwrap());
        assert_eq!(reloaded.get_by_subscription(sub_id).unwrap().len(), 1);

        reloaded.delete(id).unwrap();
        assert!(!reloaded.has_signature(&sig).unwrap());
    }

    #[test]
    fn test_date_range_and_order() {
        let (_temp_dir, repo) = create_test_repo();
        let account = AccountId::new();
        for day in [5, 20, 10] {
            repo.upsert(Transaction::new(account, date(2025, 3, day), Money::from_cents(100)))
                .unwrap();
        }

        let in_range = repo
            .get_by_date_range(date(2025, 3, 6), date(2025, 3, 31))
            .unwrap();
        let days: Vec<_> = in_range.iter().map(|t| t.date).collect();
        assert_eq!(days, vec![date(2025, 3, 20), date(2025, 3, 10)]);
    }

    #[test]
    fn test_find_by_import_id() {
        let (_temp_dir, repo) = create_test_repo();
        let mut txn = Transaction::new(AccountId::new(), date(2025, 1, 1), Money::from_cents(100));
        txn.import_id = Some("FIT123".into());
        repo.upsert(txn).unwrap();

        assert!(repo.find_by_import_id("FIT123").unwrap().is_some());
        assert!(repo.find_by_import_id("FIT999").unwrap().is_none());
    }
}
