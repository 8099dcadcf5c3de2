//! Budget model
//!
//! A spending limit for one expense category in one period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;
use super::period::BudgetPeriod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// The category this limit applies to
    pub category_id: CategoryId,

    pub period: BudgetPeriod,

    /// Maximum planned spending for the period
    pub limit: Money,

    /// Carry unspent (or overspent) money from the previous period
    #[serde(default)]
    pub rollover: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(category_id: CategoryId, period: BudgetPeriod, limit: Money) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category_id,
            period,
            limit,
            rollover: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_limit(&mut self, limit: Money) {
        self.limit = limit;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.limit.is_negative() {
            return Err(BudgetValidationError::NegativeLimit(self.limit));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} limit {}", self.period, self.limit)
    }
}

/// Spending against one budget in one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub category_id: CategoryId,
    pub category_name: String,
    pub period: BudgetPeriod,
    pub limit: Money,
    /// Carried in from the previous period when rollover is on
    pub carryover: Money,
    /// Positive amount spent during the period
    pub spent: Money,
}

impl BudgetStatus {
    /// Limit plus carryover
    pub fn available(&self) -> Money {
        self.limit + self.carryover
    }

    pub fn remaining(&self) -> Money {
        self.available() - self.spent
    }

    pub fn percent_used(&self) -> f64 {
        self.spent.percent_of(self.available())
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.available()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeLimit(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeLimit(m) => write!(f, "Budget limit cannot be negative: {}", m),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
