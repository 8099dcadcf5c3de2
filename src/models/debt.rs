//! Debt model
//!
//! Loans and card balances tracked outside of account transactions, with
//! interest and payoff projections.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::DebtId;
use super::money::Money;

/// Projections stop here; anything longer is treated as never paid off
pub const MAX_PAYOFF_MONTHS: u32 = 1200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,

    pub name: String,

    #[serde(default)]
    pub lender: String,

    pub original_amount: Money,

    /// Outstanding principal, never negative
    pub balance: Money,

    /// Annual interest rate in basis points (1875 = 18.75%)
    pub interest_rate_bps: i64,

    pub minimum_payment: Money,

    /// Day of month the payment is due (1-31)
    pub due_day: Option<u32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of simulating monthly payments until the balance reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayoffProjection {
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl Debt {
    pub fn new(name: impl Into<String>, balance: Money, interest_rate_bps: i64) -> Self {
        let now = Utc::now();
        Self {
            id: DebtId::new(),
            name: name.into(),
            lender: String::new(),
            original_amount: balance,
            balance,
            interest_rate_bps,
            minimum_payment: Money::zero(),
            due_day: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        !self.balance.is_positive()
    }

    /// Interest accrued on the current balance over one month
    pub fn monthly_interest(&self) -> Money {
        monthly_interest(self.balance, self.interest_rate_bps)
    }

    /// Share of the original amount already repaid
    pub fn paid_percent(&self) -> f64 {
        if self.original_amount.is_zero() {
            return 100.0;
        }
        (self.original_amount - self.balance)
            .percent_of(self.original_amount)
            .clamp(0.0, 100.0)
    }

    /// Simulate paying `payment` each month
    ///
    /// `None` when the payment never outpaces interest.
    pub fn project_payoff(&self, payment: Money) -> Option<PayoffProjection> {
        let mut balance = self.balance;
        let mut months = 0;
        let mut total_interest = Money::zero();
        let mut total_paid = Money::zero();

        while balance.is_positive() {
            if months >= MAX_PAYOFF_MONTHS {
                return None;
            }
            let interest = monthly_interest(balance, self.interest_rate_bps);
            if payment <= interest {
                return None;
            }
            balance += interest;
            total_interest += interest;
            let paid = if payment > balance { balance } else { payment };
            balance -= paid;
            total_paid += paid;
            months += 1;
        }

        Some(PayoffProjection {
            months,
            total_interest,
            total_paid,
        })
    }

    /// Next due date on or after `today`, clamped to the month's last day
    pub fn next_due_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let day = self.due_day?;
        let this_month = clamp_day(today.year(), today.month(), day)?;
        if this_month >= today {
            return Some(this_month);
        }
        let (year, month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        clamp_day(year, month, day)
    }

    pub fn validate(&self) -> Result<(), DebtValidationError> {
        if self.name.trim().is_empty() {
            return Err(DebtValidationError::EmptyName);
        }
        if self.balance.is_negative() || self.original_amount.is_negative() {
            return Err(DebtValidationError::NegativeBalance);
        }
        if !(0..=100_00).contains(&self.interest_rate_bps) {
            return Err(DebtValidationError::InvalidRate(self.interest_rate_bps));
        }
        if self.minimum_payment.is_negative() {
            return Err(DebtValidationError::NegativePayment);
        }
        if let Some(day) = self.due_day {
            if !(1..=31).contains(&day) {
                return Err(DebtValidationError::InvalidDueDay(day));
            }
        }
        Ok(())
    }
}

fn monthly_interest(balance: Money, annual_bps: i64) -> Money {
    let yearly = balance.apply_basis_points(annual_bps);
    Money::from_cents((yearly.cents() + 6) / 12)
}

fn clamp_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    (1..=day.min(31))
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} owed)", self.name, self.balance)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebtValidationError {
    EmptyName,
    NegativeBalance,
    InvalidRate(i64),
    NegativePayment,
    InvalidDueDay(u32),
}

impl fmt::Display for DebtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Debt name cannot be empty"),
            Self::NegativeBalance => write!(f, "Debt balance cannot be negative"),
            Self::InvalidRate(bps) => write!(
                f,
                "Interest rate must be between 0% and 100%, got {}.{:02}%",
                bps / 100,
                (bps % 100).abs()
            ),
            Self::NegativePayment => write!(f, "Minimum payment cannot be negative"),
            Self::InvalidDueDay(d) => write!(f, "Due day must be 1-31, got {}", d),
        }
    }
}

impl std::error::Error for DebtValidationError {}

/// Parse a percentage like "18.75" or "18.75%" into basis points
pub fn parse_rate_bps(s: &str) -> Option<i64> {
    let s = s.trim().trim_end_matches('%').trim();
    Money::parse(s).ok().map(|m| m.cents())
}
