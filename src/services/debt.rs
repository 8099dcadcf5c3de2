//! Debt service
//!
//! Debts, payments against them and payoff ordering.

use std::fmt;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::models::category::DEBT_PAYMENTS_CATEGORY;
use crate::models::{AccountId, Debt, DebtId, Money, PayoffProjection, Transaction};
use crate::storage::Storage;

use super::transaction::{CreateTransactionInput, TransactionService};

pub struct DebtService<'a> {
    storage: &'a Storage,
}

/// Order in which to attack debts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayoffStrategy {
    /// Highest interest rate first
    #[default]
    Avalanche,
    /// Smallest balance first
    Snowball,
}

impl PayoffStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "avalanche" => Some(Self::Avalanche),
            "snowball" => Some(Self::Snowball),
            _ => None,
        }
    }
}

impl fmt::Display for PayoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avalanche => write!(f, "avalanche"),
            Self::Snowball => write!(f, "snowball"),
        }
    }
}

/// Input for creating a new debt
#[derive(Debug, Clone)]
pub struct CreateDebtInput {
    pub name: String,
    pub lender: Option<String>,
    pub balance: Money,
    pub interest_rate_bps: i64,
    pub minimum_payment: Money,
    pub due_day: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct DebtUpdate {
    pub name: Option<String>,
    pub lender: Option<String>,
    pub interest_rate_bps: Option<i64>,
    pub minimum_payment: Option<Money>,
    pub due_day: Option<Option<u32>>,
}

/// Where a payment came from, when it should also appear as an expense
#[derive(Debug, Clone, Copy)]
pub struct PaymentSource {
    pub account_id: AccountId,
    pub date: NaiveDate,
}

/// Result of recording a payment
#[derive(Debug, Clone)]
pub struct DebtPayment {
    pub debt: Debt,
    pub transaction: Option<Transaction>,
}

/// One row of a payoff plan
#[derive(Debug, Clone)]
pub struct PayoffPlanEntry {
    pub debt: Debt,
    /// Projection at the minimum payment; `None` when it never pays off
    pub projection: Option<PayoffProjection>,
}

impl<'a> DebtService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateDebtInput) -> FintrackResult<Debt> {
        let name = input.name.trim();

        if self.storage.debts.get_by_name(name)?.is_some() {
            return Err(FintrackError::Duplicate {
                entity_type: "Debt",
                identifier: name.to_string(),
            });
        }

        let mut debt = Debt::new(name, input.balance, input.interest_rate_bps);
        debt.lender = input.lender.unwrap_or_default();
        debt.minimum_payment = input.minimum_payment;
        debt.due_day = input.due_day;
        debt.validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.debts.upsert(debt.clone())?;
        self.storage.debts.save()?;

        self.storage.log_create(
            EntityType::Debt,
            debt.id.to_string(),
            Some(debt.name.clone()),
            &debt,
        )?;

        tracing::info!(debt = %debt.id, name = %debt.name, "debt created");
        Ok(debt)
    }

    pub fn get(&self, id: DebtId) -> FintrackResult<Option<Debt>> {
        self.storage.debts.get(id)
    }

    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Debt>> {
        if let Some(debt) = self.storage.debts.get_by_name(identifier)? {
            return Ok(Some(debt));
        }
        if let Ok(id) = identifier.parse::<DebtId>() {
            return self.storage.debts.get(id);
        }
        Ok(self
            .storage
            .debts
            .get_all()?
            .into_iter()
            .find(|d| d.id.to_string() == identifier.trim()))
    }

    pub fn resolve(&self, identifier: &str) -> FintrackResult<Debt> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::debt_not_found(identifier))
    }

    pub fn list(&self, include_paid: bool) -> FintrackResult<Vec<Debt>> {
        let mut debts = self.storage.debts.get_all()?;
        if !include_paid {
            debts.retain(|d| !d.is_paid_off());
        }
        Ok(debts)
    }

    pub fn total_balance(&self) -> FintrackResult<Money> {
        Ok(self.storage.debts.get_all()?.iter().map(|d| d.balance).sum())
    }

    pub fn update(&self, id: DebtId, changes: DebtUpdate) -> FintrackResult<Debt> {
        let mut debt = self
            .storage
            .debts
            .get(id)?
            .ok_or_else(|| FintrackError::debt_not_found(id.to_string()))?;
        let before = debt.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if let Some(other) = self.storage.debts.get_by_name(name)? {
                if other.id != id {
                    return Err(FintrackError::Duplicate {
                        entity_type: "Debt",
                        identifier: name.to_string(),
                    });
                }
            }
            debt.name = name.to_string();
        }
        if let Some(lender) = changes.lender {
            debt.lender = lender;
        }
        if let Some(rate) = changes.interest_rate_bps {
            debt.interest_rate_bps = rate;
        }
        if let Some(minimum) = changes.minimum_payment {
            debt.minimum_payment = minimum;
        }
        if let Some(due_day) = changes.due_day {
            debt.due_day = due_day;
        }

        debt.updated_at = chrono::Utc::now();
        debt.validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.debts.upsert(debt.clone())?;
        self.storage.debts.save()?;

        self.storage.log_update(
            EntityType::Debt,
            debt.id.to_string(),
            Some(debt.name.clone()),
            &before,
            &debt,
        )?;

        Ok(debt)
    }

    /// Pay down a debt
    ///
    /// The payment may not exceed the balance. With a source account the
    /// payment is also booked there as an expense under "Debt Payments".
    pub fn record_payment(
        &self,
        id: DebtId,
        amount: Money,
        source: Option<PaymentSource>,
    ) -> FintrackResult<DebtPayment> {
        let mut debt = self
            .storage
            .debts
            .get(id)?
            .ok_or_else(|| FintrackError::debt_not_found(id.to_string()))?;

        if !amount.is_positive() {
            return Err(FintrackError::Validation("Payment must be positive".into()));
        }
        if amount > debt.balance {
            return Err(FintrackError::Validation(format!(
                "Payment {} exceeds the remaining balance {} of '{}'",
                amount, debt.balance, debt.name
            )));
        }

        // Book the expense first so a rejected transaction leaves the debt untouched
        let transaction = match source {
            Some(source) => {
                let category_id = self
                    .storage
                    .categories
                    .get_by_name(DEBT_PAYMENTS_CATEGORY)?
                    .map(|c| c.id);
                let input = CreateTransactionInput {
                    description: format!("Payment: {}", debt.name),
                    category_id,
                    ..CreateTransactionInput::new(source.account_id, source.date, -amount)
                };
                Some(TransactionService::new(self.storage).create(input)?)
            }
            None => None,
        };

        let before = debt.clone();
        debt.balance -= amount;
        debt.updated_at = chrono::Utc::now();

        self.storage.debts.upsert(debt.clone())?;
        self.storage.debts.save()?;

        self.storage.log_update(
            EntityType::Debt,
            debt.id.to_string(),
            Some(debt.name.clone()),
            &before,
            &debt,
        )?;

        tracing::info!(debt = %debt.id, amount = amount.cents(), "debt payment recorded");
        if debt.is_paid_off() {
            tracing::info!(debt = %debt.id, "debt paid off");
        }

        Ok(DebtPayment { debt, transaction })
    }

    /// Outstanding debts in the order the strategy pays them
    pub fn payoff_order(&self, strategy: PayoffStrategy) -> FintrackResult<Vec<Debt>> {
        let mut debts = self.list(false)?;
        match strategy {
            PayoffStrategy::Avalanche => debts.sort_by(|a, b| {
                b.interest_rate_bps
                    .cmp(&a.interest_rate_bps)
                    .then(a.balance.cmp(&b.balance))
            }),
            PayoffStrategy::Snowball => debts.sort_by(|a, b| {
                a.balance
                    .cmp(&b.balance)
                    .then(b.interest_rate_bps.cmp(&a.interest_rate_bps))
            }),
        }
        Ok(debts)
    }

    pub fn payoff_plan(&self, strategy: PayoffStrategy) -> FintrackResult<Vec<PayoffPlanEntry>> {
        Ok(self
            .payoff_order(strategy)?
            .into_iter()
            .map(|debt| PayoffPlanEntry {
                projection: debt.project_payoff(debt.minimum_payment),
                debt,
            })
            .collect())
    }

    pub fn delete(&self, id: DebtId) -> FintrackResult<Debt> {
        let debt = self
            .storage
            .debts
            .get(id)?
            .ok_or_else(|| FintrackError::debt_not_found(id.to_string()))?;

        self.storage.debts.delete(id)?;
        self.storage.debts.save()?;

        self.storage.log_delete(
            EntityType::Debt,
            debt.id.to_string(),
            Some(debt.name.clone()),
            &debt,
        )?;

        Ok(debt)
    }
}
