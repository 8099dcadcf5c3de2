//! Category service
//!
//! Provides business logic for income and expense categories.

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Category, CategoryId, CategoryKind};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(
        &self,
        name: &str,
        kind: CategoryKind,
        color: Option<String>,
    ) -> FintrackResult<Category> {
        let name = name.trim();

        if name.is_empty() {
            return Err(FintrackError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        if self.storage.categories.name_exists(name, None)? {
            return Err(FintrackError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let mut category = Category::new(name, kind);
        category.color = color;
        category
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        tracing::info!(category = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> FintrackResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    pub fn get_by_name(&self, name: &str) -> FintrackResult<Option<Category>> {
        self.storage.categories.get_by_name(name)
    }

    /// Find a category by name or ID
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .find(|c| c.id.to_string() == identifier.trim()))
    }

    pub fn resolve(&self, identifier: &str) -> FintrackResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::category_not_found(identifier))
    }

    pub fn list(&self) -> FintrackResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    pub fn list_by_kind(&self, kind: CategoryKind) -> FintrackResult<Vec<Category>> {
        self.storage.categories.get_by_kind(kind)
    }

    /// Rename or recolor a category
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        color: Option<Option<String>>,
    ) -> FintrackResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| FintrackError::category_not_found(id.to_string()))?;

        let before = category.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if self.storage.categories.name_exists(new_name, Some(id))? {
                return Err(FintrackError::Duplicate {
                    entity_type: "Category",
                    identifier: new_name.to_string(),
                });
            }
            category.name = new_name.to_string();
        }

        if let Some(color) = color {
            category.color = color;
        }

        category.updated_at = chrono::Utc::now();
        category
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Refused while any transaction, budget or subscription references it.
    pub fn delete(&self, id: CategoryId) -> FintrackResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| FintrackError::category_not_found(id.to_string()))?;

        let transactions = self.storage.transactions.count_by_category(id)?;
        let budgets = self
            .storage
            .budgets
            .get_all()?
            .iter()
            .filter(|b| b.category_id == id)
            .count();
        let subscriptions = self
            .storage
            .subscriptions
            .get_all()?
            .iter()
            .filter(|s| s.category_id == Some(id))
            .count();

        let dependents: Vec<String> = [
            (transactions, "transaction(s)"),
            (budgets, "budget(s)"),
            (subscriptions, "subscription(s)"),
        ]
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect();

        if !dependents.is_empty() {
            return Err(FintrackError::InUse {
                entity_type: "Category",
                identifier: category.name,
                dependents: dependents.join(", "),
            });
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        tracing::info!(category = %category.id, "category deleted");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{AccountId, Budget, BudgetPeriod, Money, Transaction};
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

    #[test]
    fn test_defaults_present() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert_eq!(service.list_by_kind(CategoryKind::Income).unwrap().len(), 4);
        assert!(service.find("groceries").unwrap().is_some());
    }

    #[test]
    fn test_create_duplicate_and_color() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let pets = service
            .create("Pets", CategoryKind::Expense, Some("#a1b2c3".into()))
            .unwrap();
        assert_eq!(pets.color.as_deref(), Some("#a1b2c3"));

        assert!(matches!(
            service.create("pets", CategoryKind::Expense, None),
            Err(FintrackError::Duplicate { .. })
        ));
        assert!(service
            .create("Gifts", CategoryKind::Expense, Some("red".into()))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_rename() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let dining = service.resolve("Dining Out").unwrap();
        let renamed = service.update(dining.id, Some("Restaurants"), None).unwrap();
        assert_eq!(renamed.name, "Restaurants");
        assert!(service.find("Dining Out").unwrap().is_none());

        assert!(matches!(
            service.update(dining.id, Some("Groceries"), None),
            Err(FintrackError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_delete_in_use_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let groceries = service.resolve("Groceries").unwrap();
        let mut txn = Transaction::new(
            AccountId::new(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            Money::from_cents(-4_200),
        );
        txn.category_id = Some(groceries.id);
        storage.transactions.upsert(txn).unwrap();
        storage
            .budgets
            .upsert(Budget::new(
                groceries.id,
                BudgetPeriod::monthly(2025, 1),
                Money::from_cents(40_000),
            ))
            .unwrap();

        let err = service.delete(groceries.id).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Category 'Groceries' is still in use by 1 transaction(s), 1 budget(s)"
        );

        let other = service.resolve("Other").unwrap();
        service.delete(other.id).unwrap();
        assert!(service.get(other.id).unwrap().is_none());
    }
}
