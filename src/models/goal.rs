//! Savings goal model

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;

/// A savings target with an optional deadline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,

    pub name: String,

    pub target_amount: Money,

    /// Amount set aside so far, never negative
    pub saved_amount: Money,

    pub deadline: Option<NaiveDate>,

    /// Set the first time saved reaches target
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            name: name.into(),
            target_amount,
            saved_amount: Money::zero(),
            deadline: None,
            completed_at: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn remaining(&self) -> Money {
        let remaining = self.target_amount - self.saved_amount;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }

    /// Progress toward the target, capped at 100
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount.is_zero() {
            return 100.0;
        }
        self.saved_amount.percent_of(self.target_amount).min(100.0)
    }

    /// Past the deadline without reaching the target
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.deadline.is_some_and(|d| d < today)
    }

    /// Monthly amount needed to reach the target by the deadline
    ///
    /// Counts the current month, so a deadline later this month needs the
    /// whole remainder now. `None` without a deadline or when already met.
    pub fn required_monthly(&self, today: NaiveDate) -> Option<Money> {
        let deadline = self.deadline?;
        let remaining = self.remaining();
        if remaining.is_zero() {
            return None;
        }

        let months = (deadline.year() - today.year()) as i64 * 12
            + deadline.month() as i64
            - today.month() as i64
            + 1;
        let months = months.max(1);
        let cents = remaining.cents();
        Some(Money::from_cents((cents + months - 1) / months))
    }

    /// Update saved amount and completion together
    pub fn set_saved(&mut self, saved: Money) {
        self.saved_amount = saved;
        if self.saved_amount >= self.target_amount {
            if self.completed_at.is_none() {
                self.completed_at = Some(Utc::now());
            }
        } else {
            self.completed_at = None;
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }
        if self.saved_amount.is_negative() {
            return Err(GoalValidationError::NegativeSaved(self.saved_amount));
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {})",
            self.name, self.saved_amount, self.target_amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget(Money),
    NegativeSaved(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget(m) => write!(f, "Goal target must be positive, got {}", m),
            Self::NegativeSaved(m) => write!(f, "Saved amount cannot be negative: {}", m),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_progress_and_completion() {
        let mut goal = Goal::new("Emergency fund", Money::from_cents(100_000));
        goal.set_saved(Money::from_cents(25_000));
        assert_eq!(goal.progress_percent(), 25.0);
        assert!(!goal.is_completed());

        goal.set_saved(Money::from_cents(120_000));
        assert!(goal.is_completed());
        assert_eq!(goal.progress_percent(), 100.0);
        assert!(goal.remaining().is_zero());

        goal.set_saved(Money::from_cents(10_000));
        assert!(!goal.is_completed());
    }

    #[test]
    fn test_required_monthly() {
        let mut goal = Goal::new("Trip", Money::from_cents(120_000));
        goal.deadline = Some(date(2025, 12, 31));
        // Jan..Dec inclusive is 12 months
        assert_eq!(
            goal.required_monthly(date(2025, 1, 10)),
            Some(Money::from_cents(10_000))
        );
        // Past deadline needs everything at once
        assert_eq!(
            goal.required_monthly(date(2026, 2, 1)),
            Some(Money::from_cents(120_000))
        );
        goal.deadline = None;
        assert_eq!(goal.required_monthly(date(2025, 1, 10)), None);
    }

    #[test]
    fn test_overdue() {
        let mut goal = Goal::new("Laptop", Money::from_cents(150_000));
        goal.deadline = Some(date(2025, 3, 1));
        assert!(goal.is_overdue(date(2025, 3, 2)));
        assert!(!goal.is_overdue(date(2025, 3, 1)));

        goal.set_saved(Money::from_cents(150_000));
        assert!(!goal.is_overdue(date(2025, 4, 1)));
    }

    #[test]
    fn test_validation() {
        assert!(Goal::new("", Money::from_cents(1)).validate().is_err());
        assert!(Goal::new("Car", Money::zero()).validate().is_err());
        assert!(Goal::new("Car", Money::from_cents(1)).validate().is_ok());
    }
}
