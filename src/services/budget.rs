//! Budget service
//!
//! Spending limits per expense category and period, and the status of each
//! limit against actual spending.

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Budget, BudgetPeriod, BudgetStatus, Category, CategoryId, CategoryKind, Money};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// All budget statuses of one period with totals
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub period: BudgetPeriod,
    pub total_limit: Money,
    pub total_spent: Money,
    pub statuses: Vec<BudgetStatus>,
}

impl BudgetOverview {
    pub fn total_remaining(&self) -> Money {
        self.statuses.iter().map(|s| s.remaining()).sum()
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetStatus> {
        self.statuses.iter().filter(|s| s.is_over())
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn expense_category(&self, category_id: CategoryId) -> FintrackResult<Category> {
        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| FintrackError::category_not_found(category_id.to_string()))?;

        if category.kind != CategoryKind::Expense {
            return Err(FintrackError::Budget(format!(
                "'{}' is an income category; budgets apply to expense categories only",
                category.name
            )));
        }
        Ok(category)
    }

    /// The budget for a category in a period, if one is set
    pub fn get(&self, category_id: CategoryId, period: BudgetPeriod) -> FintrackResult<Option<Budget>> {
        Ok(self
            .storage
            .budgets
            .get_all()?
            .into_iter()
            .find(|b| b.category_id == category_id && b.period == period))
    }

    /// Set the limit for a category in a period, creating the budget if needed
    pub fn set_limit(
        &self,
        category_id: CategoryId,
        period: BudgetPeriod,
        limit: Money,
        rollover: Option<bool>,
    ) -> FintrackResult<Budget> {
        let category = self.expense_category(category_id)?;

        let existing = self.get(category_id, period)?;
        let mut budget = existing
            .clone()
            .unwrap_or_else(|| Budget::new(category_id, period, limit));
        budget.set_limit(limit);
        if let Some(rollover) = rollover {
            budget.rollover = rollover;
        }

        budget
            .validate()
            .map_err(|e| FintrackError::Budget(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        let label = Some(format!("{} {}", category.name, period));
        match existing {
            Some(before) => self.storage.log_update(
                EntityType::Budget,
                budget.id.to_string(),
                label,
                &before,
                &budget,
            )?,
            None => {
                self.storage
                    .log_create(EntityType::Budget, budget.id.to_string(), label, &budget)?
            }
        }

        tracing::info!(category = %category.name, %period, limit = limit.cents(), "budget set");
        Ok(budget)
    }

    /// Budgets of one period, or all budgets
    pub fn list(&self, period: Option<BudgetPeriod>) -> FintrackResult<Vec<Budget>> {
        let mut budgets = self.storage.budgets.get_all()?;
        if let Some(period) = period {
            budgets.retain(|b| b.period == period);
        }
        Ok(budgets)
    }

    pub fn delete(&self, category_id: CategoryId, period: BudgetPeriod) -> FintrackResult<Budget> {
        let budget = self
            .get(category_id, period)?
            .ok_or_else(|| FintrackError::budget_not_found(format!("{} {}", category_id, period)))?;

        self.storage.budgets.delete(budget.id)?;
        self.storage.budgets.save()?;

        let name = self.storage.categories.get(category_id)?.map(|c| c.name);
        self.storage
            .log_delete(EntityType::Budget, budget.id.to_string(), name, &budget)?;

        Ok(budget)
    }

    /// Copy every budget of `from` into `to`, skipping categories already budgeted there
    pub fn copy_period(&self, from: BudgetPeriod, to: BudgetPeriod) -> FintrackResult<Vec<Budget>> {
        let mut created = Vec::new();
        for source in self.list(Some(from))? {
            if self.get(source.category_id, to)?.is_some() {
                continue;
            }
            let mut budget = Budget::new(source.category_id, to, source.limit);
            budget.rollover = source.rollover;
            self.storage.budgets.upsert(budget.clone())?;
            created.push(budget);
        }

        if !created.is_empty() {
            self.storage.budgets.save()?;
            for budget in &created {
                self.storage.log_create(
                    EntityType::Budget,
                    budget.id.to_string(),
                    Some(budget.period.to_string()),
                    budget,
                )?;
            }
        }

        Ok(created)
    }

    /// Expenses minus refunds in a category during a period, as a positive amount
    pub fn spent(&self, category_id: CategoryId, period: BudgetPeriod) -> FintrackResult<Money> {
        let start = period.start_date();
        let end = period.end_date();
        Ok(-self
            .storage
            .transactions
            .get_by_category(category_id)?
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .map(|t| t.amount)
            .sum::<Money>())
    }

    /// Money carried into `budget`'s period from the previous period's budget
    ///
    /// Only applies when rollover is on; chains through consecutive
    /// rollover budgets.
    pub fn carryover(&self, budget: &Budget) -> FintrackResult<Money> {
        if !budget.rollover {
            return Ok(Money::zero());
        }

        let mut chain = Vec::new();
        let mut period = budget.period.prev();
        while let Some(prev) = self.get(budget.category_id, period)? {
            let rolls = prev.rollover;
            chain.push(prev);
            if !rolls {
                break;
            }
            period = period.prev();
        }

        let mut carry = Money::zero();
        for prev in chain.iter().rev() {
            let available = prev.limit + if prev.rollover { carry } else { Money::zero() };
            carry = available - self.spent(prev.category_id, prev.period)?;
        }
        Ok(carry)
    }

    pub fn status_for(&self, budget: &Budget) -> FintrackResult<BudgetStatus> {
        let category_name = self
            .storage
            .categories
            .get(budget.category_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| "(deleted)".to_string());

        Ok(BudgetStatus {
            category_id: budget.category_id,
            category_name,
            period: budget.period,
            limit: budget.limit,
            carryover: self.carryover(budget)?,
            spent: self.spent(budget.category_id, budget.period)?,
        })
    }

    /// Status of every budget in a period
    pub fn overview(&self, period: BudgetPeriod) -> FintrackResult<BudgetOverview> {
        let mut statuses = self
            .list(Some(period))?
            .iter()
            .map(|b| self.status_for(b))
            .collect::<FintrackResult<Vec<_>>>()?;
        statuses.sort_by(|a, b| a.category_name.cmp(&b.category_name));

        Ok(BudgetOverview {
            period,
            total_limit: statuses.iter().map(|s| s.limit).sum(),
            total_spent: statuses.iter().map(|s| s.spent).sum(),
            statuses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{AccountId, Transaction};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn category(storage: &Storage, name: &str) -> CategoryId {
        storage.categories.get_by_name(name).unwrap().unwrap().id
    }

    fn spend(storage: &Storage, category_id: CategoryId, y: i32, m: u32, d: u32, cents: i64) {
        let mut txn = Transaction::new(
            AccountId::new(),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            Money::from_cents(cents),
        );
        txn.category_id = Some(category_id);
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_set_limit_upserts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let groceries = category(&storage, "Groceries");
        let jan = BudgetPeriod::monthly(2025, 1);

        let first = service
            .set_limit(groceries, jan, Money::from_cents(40_000), None)
            .unwrap();
        let second = service
            .set_limit(groceries, jan, Money::from_cents(45_000), Some(true))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(service.list(Some(jan)).unwrap().len(), 1);
        assert!(second.rollover);
    }

    #[test]
    fn test_income_category_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let salary = category(&storage, "Salary");

        let result = service.set_limit(
            salary,
            BudgetPeriod::monthly(2025, 1),
            Money::from_cents(100),
            None,
        );
        assert!(matches!(result, Err(FintrackError::Budget(_))));
    }

    #[test]
    fn test_status_counts_refunds() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let dining = category(&storage, "Dining Out");
        let jan = BudgetPeriod::monthly(2025, 1);

        service
            .set_limit(dining, jan, Money::from_cents(10_000), None)
            .unwrap();
        spend(&storage, dining, 2025, 1, 4, -8_000);
        spend(&storage, dining, 2025, 1, 9, -5_000);
        spend(&storage, dining, 2025, 1, 10, 1_000);
        spend(&storage, dining, 2025, 2, 1, -9_999);

        let overview = service.overview(jan).unwrap();
        let status = &overview.statuses[0];
        assert_eq!(status.spent.cents(), 12_000);
        assert_eq!(status.remaining().cents(), -2_000);
        assert!(status.is_over());
        assert_eq!(overview.over_budget().count(), 1);
    }

    #[test]
    fn test_rollover_carries_previous_remaining() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let groceries = category(&storage, "Groceries");
        let jan = BudgetPeriod::monthly(2025, 1);
        let feb = BudgetPeriod::monthly(2025, 2);

        service
            .set_limit(groceries, jan, Money::from_cents(40_000), None)
            .unwrap();
        let feb_budget = service
            .set_limit(groceries, feb, Money::from_cents(40_000), Some(true))
            .unwrap();
        spend(&storage, groceries, 2025, 1, 15, -30_000);

        assert_eq!(service.carryover(&feb_budget).unwrap().cents(), 10_000);
        let status = service.status_for(&feb_budget).unwrap();
        assert_eq!(status.available().cents(), 50_000);
    }

    #[test]
    fn test_copy_period_skips_existing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let groceries = category(&storage, "Groceries");
        let housing = category(&storage, "Housing");
        let jan = BudgetPeriod::monthly(2025, 1);
        let feb = BudgetPeriod::monthly(2025, 2);

        service.set_limit(groceries, jan, Money::from_cents(40_000), None).unwrap();
        service.set_limit(housing, jan, Money::from_cents(150_000), None).unwrap();
        service.set_limit(housing, feb, Money::from_cents(160_000), None).unwrap();

        let created = service.copy_period(jan, feb).unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(
            service.get(housing, feb).unwrap().unwrap().limit.cents(),
            160_000
        );
    }
}
