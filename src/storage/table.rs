//! Generic repository for the simple tables
//!
//! Budgets, goals, debts, investments and subscriptions need nothing beyond
//! keyed storage, so they share one repository type. Each file holds a single
//! object keyed by the table name, e.g. `{"goals": [...]}`.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::FintrackError;
use crate::models::{
    Budget, BudgetId, Debt, DebtId, Goal, GoalId, Investment, InvestmentId, Subscription,
    SubscriptionId,
};

use super::file_io::{read_json, write_json_atomic};

/// A row in one of the simple tables
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + std::fmt::Display;

    /// JSON key the rows are stored under
    const TABLE: &'static str;

    fn id(&self) -> Self::Id;

    /// Name used for case-insensitive lookup, if the record has one
    fn name(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> DateTime<Utc>;

    /// Listing order
    fn sort_key(&self) -> String {
        self.name().map(str::to_lowercase).unwrap_or_default()
    }
}

impl Record for Budget {
    type Id = BudgetId;
    const TABLE: &'static str = "budgets";

    fn id(&self) -> BudgetId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn sort_key(&self) -> String {
        self.period.to_string()
    }
}

impl Record for Goal {
    type Id = GoalId;
    const TABLE: &'static str = "goals";

    fn id(&self) -> GoalId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Debt {
    type Id = DebtId;
    const TABLE: &'static str = "debts";

    fn id(&self) -> DebtId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Investment {
    type Id = InvestmentId;
    const TABLE: &'static str = "investments";

    fn id(&self) -> InvestmentId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Subscription {
    type Id = SubscriptionId;
    const TABLE: &'static str = "subscriptions";

    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Keyed JSON-backed storage for one table
pub struct TableRepository<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> TableRepository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: Value = read_json(&self.path)?;
        let rows: Vec<T> = match file_data.get(T::TABLE) {
            Some(rows) => serde_json::from_value(rows.clone()).map_err(|e| {
                FintrackError::Storage(format!(
                    "Failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            })?,
            None => Vec::new(),
        };

        let mut data = self.data.write().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for row in rows {
            data.insert(row.id(), row);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), FintrackError> {
        let rows = serde_json::to_value(self.get_all()?)?;
        let mut file_data = Map::new();
        file_data.insert(T::TABLE.to_string(), rows);
        write_json_atomic(&self.path, &Value::Object(file_data))
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, FintrackError> {
        let data = self.data.read().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    pub fn get_all(&self) -> Result<Vec<T>, FintrackError> {
        let data = self.data.read().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut rows: Vec<_> = data.values().cloned().collect();
        rows.sort_by(|a, b| {
            a.sort_key()
                .cmp(&b.sort_key())
                .then(a.created_at().cmp(&b.created_at()))
        });
        Ok(rows)
    }

    /// Case-insensitive name lookup
    pub fn get_by_name(&self, name: &str) -> Result<Option<T>, FintrackError> {
        let data = self.data.read().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|r| r.name().is_some_and(|n| n.to_lowercase() == name_lower))
            .cloned())
    }

    pub fn upsert(&self, row: T) -> Result<(), FintrackError> {
        let mut data = self.data.write().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(row.id(), row);
        Ok(())
    }

    pub fn delete(&self, id: T::Id) -> Result<bool, FintrackError> {
        let mut data = self.data.write().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, FintrackError> {
        let data = self.data.read().map_err(|e| {
            FintrackError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, CategoryId, Money};
    use tempfile::TempDir;

    #[test]
    fn test_file_is_keyed_by_table_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("goals.json");
        let repo: TableRepository<Goal> = TableRepository::new(path.clone());
        repo.upsert(Goal::new("Vacation", Money::from_cents(200_000)))
            .unwrap();
        repo.save().unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["goals"].as_array().unwrap().len(), 1);

        let reloaded: TableRepository<Goal> = TableRepository::new(path);
        reloaded.load().unwrap();
        assert!(reloaded.get_by_name("vacation").unwrap().is_some());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo: TableRepository<Debt> = TableRepository::new(temp_dir.path().join("debts.json"));
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_unnamed_records_sort_by_period() {
        let temp_dir = TempDir::new().unwrap();
        let repo: TableRepository<Budget> =
            TableRepository::new(temp_dir.path().join("budgets.json"));
        let category = CategoryId::new();
        repo.upsert(Budget::new(category, BudgetPeriod::monthly(2025, 3), Money::zero()))
            .unwrap();
        repo.upsert(Budget::new(category, BudgetPeriod::monthly(2025, 1), Money::zero()))
            .unwrap();

        let periods: Vec<_> = repo.get_all().unwrap().iter().map(|b| b.period).collect();
        assert_eq!(
            periods,
            vec![BudgetPeriod::monthly(2025, 1), BudgetPeriod::monthly(2025, 3)]
        );
        assert!(repo.get_by_name("anything").unwrap().is_none());
    }
}
