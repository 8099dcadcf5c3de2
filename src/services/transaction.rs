//! Transaction service
//!
//! Provides business logic for transaction management including CRUD
//! operations and filtering.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{
    AccountId, CategoryId, Money, Transaction, TransactionId, TransactionKind, TransactionSource,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    /// Case-insensitive match against description and memo
    pub search: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if self.account_id.is_some_and(|id| txn.account_id != id) {
            return false;
        }
        if self.category_id.is_some() && txn.category_id != self.category_id {
            return false;
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        if self.kind.is_some_and(|kind| txn.kind() != kind) {
            return false;
        }
        if let Some(text) = &self.search {
            let needle = text.to_lowercase();
            if !txn.description.to_lowercase().contains(&needle)
                && !txn.memo.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub account_id: AccountId,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub memo: Option<String>,
    pub source: TransactionSource,
}

impl CreateTransactionInput {
    pub fn new(account_id: AccountId, date: NaiveDate, amount: Money) -> Self {
        Self {
            account_id,
            date,
            amount,
            description: String::new(),
            category_id: None,
            memo: None,
            source: TransactionSource::Manual,
        }
    }
}

/// Optional field changes for `TransactionService::update`
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub description: Option<String>,
    /// `Some(None)` clears the category
    pub category_id: Option<Option<CategoryId>>,
    pub memo: Option<String>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> FintrackResult<Transaction> {
        let account = self
            .storage
            .accounts
            .get(input.account_id)?
            .ok_or_else(|| FintrackError::account_not_found(input.account_id.to_string()))?;

        if account.archived {
            return Err(FintrackError::Validation(
                "Cannot add transactions to an archived account".into(),
            ));
        }

        if let Some(cat_id) = input.category_id {
            self.storage
                .categories
                .get(cat_id)?
                .ok_or_else(|| FintrackError::category_not_found(cat_id.to_string()))?;
        }

        let mut txn = Transaction::with_details(
            input.account_id,
            input.date,
            input.amount,
            input.description.trim(),
            input.category_id,
            input.memo.unwrap_or_default(),
        );
        txn.source = input.source;

        txn.validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;

        tracing::info!(
            transaction = %txn.id,
            account = %txn.account_id,
            amount = txn.amount.cents(),
            source = %txn.source,
            "transaction created"
        );
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> FintrackResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or short display ID
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let identifier = identifier.trim();
        Ok(self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .find(|t| t.id.to_string() == identifier))
    }

    pub fn resolve(&self, identifier: &str) -> FintrackResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::transaction_not_found(identifier))
    }

    /// List transactions, newest first
    pub fn list(&self, filter: TransactionFilter) -> FintrackResult<Vec<Transaction>> {
        let mut transactions = if let Some(account_id) = filter.account_id {
            self.storage.transactions.get_by_account(account_id)?
        } else if let Some(category_id) = filter.category_id {
            self.storage.transactions.get_by_category(category_id)?
        } else if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            self.storage.transactions.get_by_date_range(start, end)?
        } else {
            self.storage.transactions.get_all()?
        };

        transactions.retain(|t| filter.matches(t));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    pub fn update(&self, id: TransactionId, changes: TransactionUpdate) -> FintrackResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| FintrackError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();

        if let Some(date) = changes.date {
            txn.date = date;
        }
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(description) = changes.description {
            txn.description = description.trim().to_string();
        }
        if let Some(new_cat_id) = changes.category_id {
            if let Some(cat_id) = new_cat_id {
                self.storage
                    .categories
                    .get(cat_id)?
                    .ok_or_else(|| FintrackError::category_not_found(cat_id.to_string()))?;
            }
            txn.category_id = new_cat_id;
        }
        if let Some(memo) = changes.memo {
            txn.memo = memo;
        }

        // A materialized charge keeps its signature only while it still
        // represents that billing date.
        if txn.date != before.date && txn.recurring_signature.is_some() {
            return Err(FintrackError::Validation(
                "Cannot move a recurring charge to another date; delete it instead".into(),
            ));
        }

        txn.updated_at = Utc::now();
        txn.validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    pub fn delete(&self, id: TransactionId) -> FintrackResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| FintrackError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;

        tracing::info!(transaction = %id, "transaction deleted");
        Ok(txn)
    }

    /// Total of expenses (as a positive amount) in a category over a date range
    pub fn spent_in_category(
        &self,
        category_id: CategoryId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Money> {
        Ok(-self
            .storage
            .transactions
            .get_by_category(category_id)?
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .map(|t| t.amount)
            .sum::<Money>())
    }

    pub fn count(&self) -> FintrackResult<usize> {
        self.storage.transactions.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Account, AccountType, Category, CategoryKind};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn setup(storage: &Storage) -> (AccountId, CategoryId) {
        let account = Account::new("Checking", AccountType::Checking);
        let category = Category::new("Groceries", CategoryKind::Expense);
        let ids = (account.id, category.id);
        storage.accounts.upsert(account).unwrap();
        storage.categories.upsert(category).unwrap();
        ids
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(account_id: AccountId, day: u32, cents: i64, description: &str) -> CreateTransactionInput {
        CreateTransactionInput {
            description: description.into(),
            ..CreateTransactionInput::new(account_id, date(2025, 1, day), Money::from_cents(cents))
        }
    }

    #[test]
    fn test_create_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let (account_id, _) = setup(&storage);
        let service = TransactionService::new(&storage);

        let txn = service.create(input(account_id, 10, -5_000, " Corner Store ")).unwrap();
        assert_eq!(txn.description, "Corner Store");
        assert_eq!(service.find(&txn.id.to_string()).unwrap().unwrap().id, txn.id);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let (account_id, _) = setup(&storage);
        let service = TransactionService::new(&storage);

        assert!(service.create(input(account_id, 1, 0, "zero")).unwrap_err().is_validation());
        assert!(service
            .create(input(AccountId::new(), 1, 100, "nowhere"))
            .unwrap_err()
            .is_not_found());

        let mut bad_category = input(account_id, 1, 100, "x");
        bad_category.category_id = Some(CategoryId::new());
        assert!(service.create(bad_category).unwrap_err().is_not_found());
    }

    #[test]
    fn test_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let (account_id, category_id) = setup(&storage);
        let service = TransactionService::new(&storage);

        let mut groceries = input(account_id, 3, -4_500, "Market");
        groceries.category_id = Some(category_id);
        service.create(groceries).unwrap();
        service.create(input(account_id, 15, 250_000, "Payroll")).unwrap();
        service.create(input(account_id, 20, -1_200, "Coffee Market")).unwrap();

        let expenses = service
            .list(TransactionFilter::new().kind(TransactionKind::Expense))
            .unwrap();
        assert_eq!(expenses.len(), 2);

        let market = service.list(TransactionFilter::new().search("market")).unwrap();
        assert_eq!(market.len(), 2);
        assert_eq!(market[0].description, "Coffee Market");

        let in_category = service
            .list(TransactionFilter::new().category(category_id))
            .unwrap();
        assert_eq!(in_category.len(), 1);

        let window = service
            .list(TransactionFilter::new().date_range(date(2025, 1, 10), date(2025, 1, 31)).limit(1))
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].description, "Coffee Market");

        assert_eq!(
            service
                .spent_in_category(category_id, date(2025, 1, 1), date(2025, 1, 31))
                .unwrap()
                .cents(),
            4_500
        );
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let (account_id, category_id) = setup(&storage);
        let service = TransactionService::new(&storage);

        let txn = service.create(input(account_id, 5, -999, "Lunch")).unwrap();
        let updated = service
            .update(
                txn.id,
                TransactionUpdate {
                    amount: Some(Money::from_cents(-1_299)),
                    category_id: Some(Some(category_id)),
                    ..TransactionUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount.cents(), -1_299);
        assert_eq!(storage.transactions.count_by_category(category_id).unwrap(), 1);

        service.delete(txn.id).unwrap();
        assert_eq!(service.count().unwrap(), 0);
        assert_eq!(storage.audit().read_all().unwrap().len(), 3);
    }
}
