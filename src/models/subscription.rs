//! Subscription model
//!
//! A recurring charge (streaming, gym, insurance) that the materializer
//! turns into expense transactions as billing dates pass.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, SubscriptionId};
use super::money::Money;

/// How often a subscription bills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "quarterly" | "quarter" => Some(Self::Quarterly),
            "yearly" | "annual" | "annually" | "year" => Some(Self::Yearly),
            _ => None,
        }
    }

    fn months(&self) -> Option<u32> {
        match self {
            Self::Weekly => None,
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Yearly => Some(12),
        }
    }

    /// Step `date` forward one period
    ///
    /// Month-based steps land on `anchor_day`, clamped to the target month's
    /// length, so a subscription started on the 31st bills on Feb 28 and
    /// returns to the 31st in March.
    pub fn advance(&self, date: NaiveDate, anchor_day: u32) -> NaiveDate {
        match self.months() {
            None => date + Duration::days(7),
            Some(step) => {
                let total = date.year() * 12 + date.month0() as i32 + step as i32;
                let year = total.div_euclid(12);
                let month = total.rem_euclid(12) as u32 + 1;
                (1..=anchor_day.clamp(1, 31))
                    .rev()
                    .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
                    .unwrap_or(date)
            }
        }
    }

    /// Convert one charge into its monthly equivalent
    pub fn monthly_equivalent(&self, amount: Money) -> Money {
        let cents = amount.cents();
        Money::from_cents(match self {
            Self::Weekly => (cents * 52 + 6) / 12,
            Self::Monthly => cents,
            Self::Quarterly => (cents + 1) / 3,
            Self::Yearly => (cents + 6) / 12,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Quarterly => write!(f, "Quarterly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,

    pub name: String,

    /// Charge per period, positive
    pub amount: Money,

    pub frequency: Frequency,

    /// Account the charge is booked against
    pub account_id: AccountId,

    pub category_id: Option<CategoryId>,

    pub start_date: NaiveDate,

    /// Next charge not yet materialized
    pub next_billing_date: NaiveDate,

    /// Day of month month-based periods land on, when rescheduled away from
    /// the start date's day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_day: Option<u32>,

    /// Paused subscriptions are skipped by the materializer
    pub active: bool,

    /// Date of the most recent materialized charge
    #[serde(default)]
    pub last_generated: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        amount: Money,
        frequency: Frequency,
        account_id: AccountId,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubscriptionId::new(),
            name: name.into(),
            amount,
            frequency,
            account_id,
            category_id: None,
            start_date,
            next_billing_date: start_date,
            billing_day: None,
            active: true,
            last_generated: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Day of month the schedule is anchored to
    pub fn anchor_day(&self) -> u32 {
        self.billing_day.unwrap_or_else(|| self.start_date.day())
    }

    /// Billing date following `date`
    pub fn following(&self, date: NaiveDate) -> NaiveDate {
        self.frequency.advance(date, self.anchor_day())
    }

    /// Move the schedule to `date`; later periods keep its day of month
    pub fn reschedule(&mut self, date: NaiveDate) {
        self.next_billing_date = date;
        self.billing_day = Some(date.day());
    }

    /// First billing date on or after `date`
    fn first_due_from(&self, date: NaiveDate) -> NaiveDate {
        let mut next = self.next_billing_date;
        while next < date {
            let stepped = self.following(next);
            if stepped <= next {
                break;
            }
            next = stepped;
        }
        next
    }

    /// Billing dates from `next_billing_date` through `today` inclusive
    pub fn due_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut date = self.next_billing_date;
        while date <= today {
            dates.push(date);
            let next = self.following(date);
            if next <= date {
                break;
            }
            date = next;
        }
        dates
    }

    /// Whether the next charge falls within `days` of `today`
    pub fn renews_within(&self, today: NaiveDate, days: i64) -> bool {
        self.active
            && self.next_billing_date >= today
            && self.next_billing_date <= today + Duration::days(days)
    }

    pub fn monthly_cost(&self) -> Money {
        self.frequency.monthly_equivalent(self.amount)
    }

    pub fn pause(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivate as of `today`; billing dates that passed while paused are
    /// dropped, not charged
    pub fn resume(&mut self, today: NaiveDate) {
        self.next_billing_date = self.first_due_from(today);
        self.active = true;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), SubscriptionValidationError> {
        if self.name.trim().is_empty() {
            return Err(SubscriptionValidationError::EmptyName);
        }
        if !self.amount.is_positive() {
            return Err(SubscriptionValidationError::NonPositiveAmount(self.amount));
        }
        if self.next_billing_date < self.start_date {
            return Err(SubscriptionValidationError::BillingBeforeStart);
        }
        Ok(())
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.amount, self.frequency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionValidationError {
    EmptyName,
    NonPositiveAmount(Money),
    BillingBeforeStart,
}

impl fmt::Display for SubscriptionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Subscription name cannot be empty"),
            Self::NonPositiveAmount(m) => {
                write!(f, "Subscription amount must be positive, got {}", m)
            }
            Self::BillingBeforeStart => {
                write!(f, "Next billing date cannot be before the start date")
            }
        }
    }
}

impl std::error::Error for SubscriptionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_advance_clamps_and_recovers() {
        let f = Frequency::Monthly;
        assert_eq!(f.advance(date(2025, 1, 31), 31), date(2025, 2, 28));
        assert_eq!(f.advance(date(2025, 2, 28), 31), date(2025, 3, 31));
        assert_eq!(f.advance(date(2024, 1, 31), 31), date(2024, 2, 29));
        assert_eq!(f.advance(date(2025, 12, 15), 15), date(2026, 1, 15));
    }

    #[test]
    fn test_other_frequencies() {
        assert_eq!(
            Frequency::Weekly.advance(date(2025, 1, 1), 1),
            date(2025, 1, 8)
        );
        assert_eq!(
            Frequency::Quarterly.advance(date(2025, 11, 30), 30),
            date(2026, 2, 28)
        );
        assert_eq!(
            Frequency::Yearly.advance(date(2024, 2, 29), 29),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_due_dates() {
        let sub = Subscription::new(
            "Streaming",
            Money::from_cents(1599),
            Frequency::Monthly,
            AccountId::new(),
            date(2025, 1, 10),
        );
        assert_eq!(
            sub.due_dates(date(2025, 3, 10)),
            vec![date(2025, 1, 10), date(2025, 2, 10), date(2025, 3, 10)]
        );
        assert!(sub.due_dates(date(2025, 1, 9)).is_empty());
    }

    #[test]
    fn test_reschedule_keeps_new_day() {
        let mut sub = Subscription::new(
            "Insurance",
            Money::from_cents(8_000),
            Frequency::Monthly,
            AccountId::new(),
            date(2025, 1, 10),
        );
        sub.reschedule(date(2025, 3, 25));
        assert_eq!(
            sub.due_dates(date(2025, 5, 31)),
            vec![date(2025, 3, 25), date(2025, 4, 25), date(2025, 5, 25)]
        );

        sub.reschedule(date(2025, 1, 31));
        assert_eq!(
            sub.due_dates(date(2025, 3, 31)),
            vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]
        );
    }

    #[test]
    fn test_resume_skips_paused_periods() {
        let mut sub = Subscription::new(
            "Streaming",
            Money::from_cents(1599),
            Frequency::Monthly,
            AccountId::new(),
            date(2025, 1, 10),
        );
        sub.next_billing_date = date(2025, 2, 10);
        sub.pause();

        sub.resume(date(2025, 4, 20));
        assert!(sub.active);
        assert_eq!(sub.next_billing_date, date(2025, 5, 10));

        // A billing date on the resume day is still charged
        sub.pause();
        sub.resume(date(2025, 5, 10));
        assert_eq!(sub.next_billing_date, date(2025, 5, 10));
    }

    #[test]
    fn test_monthly_equivalent() {
        assert_eq!(
            Frequency::Yearly.monthly_equivalent(Money::from_cents(12_000)).cents(),
            1_000
        );
        assert_eq!(
            Frequency::Weekly.monthly_equivalent(Money::from_cents(1_200)).cents(),
            5_200
        );
        assert_eq!(
            Frequency::Quarterly.monthly_equivalent(Money::from_cents(3_000)).cents(),
            1_000
        );
    }

    #[test]
    fn test_renews_within() {
        let mut sub = Subscription::new(
            "Gym",
            Money::from_cents(4_000),
            Frequency::Monthly,
            AccountId::new(),
            date(2025, 5, 20),
        );
        assert!(sub.renews_within(date(2025, 5, 15), 7));
        assert!(!sub.renews_within(date(2025, 5, 1), 7));
        sub.pause();
        assert!(!sub.renews_within(date(2025, 5, 15), 7));
    }

    #[test]
    fn test_validation() {
        let mut sub = Subscription::new(
            "Cloud",
            Money::zero(),
            Frequency::Monthly,
            AccountId::new(),
            date(2025, 1, 1),
        );
        assert!(matches!(
            sub.validate(),
            Err(SubscriptionValidationError::NonPositiveAmount(_))
        ));
        sub.amount = Money::from_cents(299);
        assert!(sub.validate().is_ok());
        sub.next_billing_date = date(2024, 12, 1);
        assert_eq!(
            sub.validate(),
            Err(SubscriptionValidationError::BillingBeforeStart)
        );
    }
}
