//! Goal service
//!
//! Savings goals with contributions and withdrawals.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Goal, GoalId, Money};
use crate::storage::Storage;

pub struct GoalService<'a> {
    storage: &'a Storage,
}

#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    /// `Some(None)` removes the deadline
    pub deadline: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        name: &str,
        target_amount: Money,
        deadline: Option<NaiveDate>,
    ) -> FintrackResult<Goal> {
        let name = name.trim();

        if self.storage.goals.get_by_name(name)?.is_some() {
            return Err(FintrackError::Duplicate {
                entity_type: "Goal",
                identifier: name.to_string(),
            });
        }

        let mut goal = Goal::new(name, target_amount);
        goal.deadline = deadline;
        goal.validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        tracing::info!(goal = %goal.id, name = %goal.name, "goal created");
        Ok(goal)
    }

    pub fn get(&self, id: GoalId) -> FintrackResult<Option<Goal>> {
        self.storage.goals.get(id)
    }

    /// Find a goal by name or ID
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Goal>> {
        if let Some(goal) = self.storage.goals.get_by_name(identifier)? {
            return Ok(Some(goal));
        }
        if let Ok(id) = identifier.parse::<GoalId>() {
            return self.storage.goals.get(id);
        }
        Ok(self
            .storage
            .goals
            .get_all()?
            .into_iter()
            .find(|g| g.id.to_string() == identifier.trim()))
    }

    pub fn resolve(&self, identifier: &str) -> FintrackResult<Goal> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::goal_not_found(identifier))
    }

    pub fn list(&self, include_completed: bool) -> FintrackResult<Vec<Goal>> {
        let mut goals = self.storage.goals.get_all()?;
        if !include_completed {
            goals.retain(|g| !g.is_completed());
        }
        Ok(goals)
    }

    pub fn update(&self, id: GoalId, changes: GoalUpdate) -> FintrackResult<Goal> {
        let mut goal = self
            .storage
            .goals
            .get(id)?
            .ok_or_else(|| FintrackError::goal_not_found(id.to_string()))?;
        let before = goal.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if let Some(other) = self.storage.goals.get_by_name(name)? {
                if other.id != id {
                    return Err(FintrackError::Duplicate {
                        entity_type: "Goal",
                        identifier: name.to_string(),
                    });
                }
            }
            goal.name = name.to_string();
        }
        if let Some(deadline) = changes.deadline {
            goal.deadline = deadline;
        }
        if let Some(notes) = changes.notes {
            goal.notes = notes;
        }
        if let Some(target) = changes.target_amount {
            goal.target_amount = target;
        }
        // Re-evaluates completion against the possibly new target
        goal.set_saved(goal.saved_amount);

        goal.validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.persist_update(&before, &goal)?;
        Ok(goal)
    }

    /// Add money to a goal
    pub fn contribute(&self, id: GoalId, amount: Money) -> FintrackResult<Goal> {
        if !amount.is_positive() {
            return Err(FintrackError::Validation(
                "Contribution must be positive".into(),
            ));
        }
        self.adjust(id, amount)
    }

    /// Take money out of a goal; cannot go below zero
    pub fn withdraw(&self, id: GoalId, amount: Money) -> FintrackResult<Goal> {
        if !amount.is_positive() {
            return Err(FintrackError::Validation(
                "Withdrawal must be positive".into(),
            ));
        }
        self.adjust(id, -amount)
    }

    fn adjust(&self, id: GoalId, delta: Money) -> FintrackResult<Goal> {
        let mut goal = self
            .storage
            .goals
            .get(id)?
            .ok_or_else(|| FintrackError::goal_not_found(id.to_string()))?;
        let before = goal.clone();

        let saved = goal.saved_amount + delta;
        if saved.is_negative() {
            return Err(FintrackError::Validation(format!(
                "Cannot withdraw {} from '{}': only {} saved",
                -delta, goal.name, goal.saved_amount
            )));
        }
        goal.set_saved(saved);

        self.persist_update(&before, &goal)?;

        if goal.is_completed() && !before.is_completed() {
            tracing::info!(goal = %goal.id, "goal reached");
        }
        Ok(goal)
    }

    fn persist_update(&self, before: &Goal, goal: &Goal) -> FintrackResult<()> {
        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            before,
            goal,
        )
    }

    pub fn delete(&self, id: GoalId) -> FintrackResult<Goal> {
        let goal = self
            .storage
            .goals
            .get(id)?
            .ok_or_else(|| FintrackError::goal_not_found(id.to_string()))?;

        self.storage.goals.delete(id)?;
        self.storage.goals.save()?;

        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_contribute_completes_goal() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        let goal = service
            .create("Emergency Fund", Money::from_cents(100_000), None)
            .unwrap();
        let goal = service.contribute(goal.id, Money::from_cents(60_000)).unwrap();
        assert!(!goal.is_completed());

        let goal = service.contribute(goal.id, Money::from_cents(40_000)).unwrap();
        assert!(goal.is_completed());
        assert!(service.list(false).unwrap().is_empty());
        assert_eq!(service.list(true).unwrap().len(), 1);
    }

    #[test]
    fn test_withdraw_cannot_go_negative() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        let goal = service.create("Vacation", Money::from_cents(200_000), None).unwrap();
        service.contribute(goal.id, Money::from_cents(5_000)).unwrap();

        let err = service.withdraw(goal.id, Money::from_cents(5_001)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get(goal.id).unwrap().unwrap().saved_amount.cents(), 5_000);

        let goal = service.withdraw(goal.id, Money::from_cents(5_000)).unwrap();
        assert!(goal.saved_amount.is_zero());
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create("Car", Money::from_cents(500_000), None).unwrap();

        assert!(service.contribute(goal.id, Money::zero()).is_err());
        assert!(service.withdraw(goal.id, Money::from_cents(-10)).is_err());
        assert!(service.create("Nothing", Money::zero(), None).is_err());
    }

    #[test]
    fn test_lowering_target_completes() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        let goal = service.create("Laptop", Money::from_cents(150_000), None).unwrap();
        service.contribute(goal.id, Money::from_cents(120_000)).unwrap();
        let goal = service
            .update(
                goal.id,
                GoalUpdate {
                    target_amount: Some(Money::from_cents(110_000)),
                    deadline: Some(NaiveDate::from_ymd_opt(2025, 12, 1)),
                    ..GoalUpdate::default()
                },
            )
            .unwrap();
        assert!(goal.is_completed());
        assert!(goal.deadline.is_some());
    }
}
