//! Account service
//!
//! Business logic for account management including CRUD operations,
//! balance calculation, and validation.

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Account, AccountId, AccountType, Money};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// An account with its computed balance
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    /// Starting balance plus all transactions
    pub balance: Money,
    pub transaction_count: usize,
}

/// Optional field changes for `AccountService::update`
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub starting_balance: Option<Money>,
    pub notes: Option<String>,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        starting_balance: Money,
    ) -> FintrackResult<Account> {
        let name = name.trim();

        if self.storage.accounts.name_exists(name, None)? {
            return Err(FintrackError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let account = Account::with_starting_balance(name, account_type, starting_balance);
        account
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        tracing::info!(account = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> FintrackResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name, short display id (`acc-1a2b3c4d`) or full id
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        Ok(self
            .storage
            .accounts
            .get_all()?
            .into_iter()
            .find(|a| a.id.to_string() == identifier.trim()))
    }

    /// Like `find`, but a missing account is an error
    pub fn resolve(&self, identifier: &str) -> FintrackResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::account_not_found(identifier))
    }

    pub fn list(&self, include_archived: bool) -> FintrackResult<Vec<Account>> {
        if include_archived {
            self.storage.accounts.get_all()
        } else {
            self.storage.accounts.get_active()
        }
    }

    pub fn list_with_balances(&self, include_archived: bool) -> FintrackResult<Vec<AccountSummary>> {
        self.list(include_archived)?
            .into_iter()
            .map(|account| self.get_summary(account))
            .collect()
    }

    pub fn get_summary(&self, account: Account) -> FintrackResult<AccountSummary> {
        let transactions = self.storage.transactions.get_by_account(account.id)?;
        let total: Money = transactions.iter().map(|t| t.amount).sum();

        Ok(AccountSummary {
            balance: account.starting_balance + total,
            transaction_count: transactions.len(),
            account,
        })
    }

    /// Current balance of one account
    pub fn calculate_balance(&self, account_id: AccountId) -> FintrackResult<Money> {
        let account = self
            .storage
            .accounts
            .get(account_id)?
            .ok_or_else(|| FintrackError::account_not_found(account_id.to_string()))?;

        Ok(self.get_summary(account)?.balance)
    }

    /// Sum of balances across active accounts (liability balances are negative)
    pub fn net_balance(&self) -> FintrackResult<Money> {
        Ok(self
            .list_with_balances(false)?
            .iter()
            .map(|s| s.balance)
            .sum())
    }

    /// The account assistant commands and debt payments fall back to
    pub fn default_account(&self) -> FintrackResult<Option<Account>> {
        let mut active = self.storage.accounts.get_active()?;
        active.sort_by_key(|a| a.created_at);
        Ok(active
            .iter()
            .find(|a| !a.account_type.is_liability())
            .or_else(|| active.first())
            .cloned())
    }

    pub fn update(&self, id: AccountId, changes: AccountUpdate) -> FintrackResult<Account> {
        let mut account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| FintrackError::account_not_found(id.to_string()))?;

        let before = account.clone();

        if let Some(new_name) = changes.name {
            let new_name = new_name.trim();
            if self.storage.accounts.name_exists(new_name, Some(id))? {
                return Err(FintrackError::Duplicate {
                    entity_type: "Account",
                    identifier: new_name.to_string(),
                });
            }
            account.name = new_name.to_string();
        }
        if let Some(account_type) = changes.account_type {
            account.account_type = account_type;
        }
        if let Some(starting_balance) = changes.starting_balance {
            account.starting_balance = starting_balance;
        }
        if let Some(notes) = changes.notes {
            account.notes = notes;
        }

        account.updated_at = chrono::Utc::now();
        account
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }

    /// Archive an account (soft delete)
    pub fn archive(&self, id: AccountId) -> FintrackResult<Account> {
        self.set_archived(id, true)
    }

    pub fn unarchive(&self, id: AccountId) -> FintrackResult<Account> {
        self.set_archived(id, false)
    }

    fn set_archived(&self, id: AccountId, archived: bool) -> FintrackResult<Account> {
        let mut account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| FintrackError::account_not_found(id.to_string()))?;

        if account.archived == archived {
            return Err(FintrackError::Validation(if archived {
                "Account is already archived".into()
            } else {
                "Account is not archived".into()
            }));
        }

        let before = account.clone();
        if archived {
            account.archive();
        } else {
            account.unarchive();
        }

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }

    /// Permanently delete an account
    ///
    /// Refused while transactions or subscriptions still point at it;
    /// archive the account instead.
    pub fn delete(&self, id: AccountId) -> FintrackResult<Account> {
        let account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| FintrackError::account_not_found(id.to_string()))?;

        let transaction_count = self.storage.transactions.count_by_account(id)?;
        if transaction_count > 0 {
            return Err(FintrackError::InUse {
                entity_type: "Account",
                identifier: account.name,
                dependents: format!("{} transaction(s)", transaction_count),
            });
        }

        let subscription_count = self
            .storage
            .subscriptions
            .get_all()?
            .iter()
            .filter(|s| s.account_id == id)
            .count();
        if subscription_count > 0 {
            return Err(FintrackError::InUse {
                entity_type: "Account",
                identifier: account.name,
                dependents: format!("{} subscription(s)", subscription_count),
            });
        }

        self.storage.accounts.delete(id)?;
        self.storage.accounts.save()?;

        self.storage.log_delete(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        tracing::info!(account = %account.id, "account deleted");
        Ok(account)
    }
}
