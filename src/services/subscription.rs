//! Subscription service
//!
//! Recurring charges and the materializer that turns elapsed billing dates
//! into expense transactions.

use chrono::{Duration, NaiveDate, Utc};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{FintrackError, FintrackResult};
use crate::models::category::SUBSCRIPTIONS_CATEGORY;
use crate::models::transaction::recurring_signature;
use crate::models::{
    AccountId, CategoryId, Frequency, Money, Subscription, SubscriptionId, Transaction,
    TransactionSource,
};
use crate::storage::Storage;

pub struct SubscriptionService<'a> {
    storage: &'a Storage,
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionInput {
    pub name: String,
    pub amount: Money,
    pub frequency: Frequency,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub start_date: NaiveDate,
    /// Defaults to the start date
    pub next_billing_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub frequency: Option<Frequency>,
    pub account_id: Option<AccountId>,
    pub category_id: Option<Option<CategoryId>>,
    pub next_billing_date: Option<NaiveDate>,
}

/// A subscription the materializer could not process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSubscription {
    pub subscription_id: SubscriptionId,
    pub name: String,
    pub reason: String,
}

/// Outcome of one materializer run
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    pub created: Vec<Transaction>,
    /// Billing dates whose charge already existed
    pub skipped_duplicates: usize,
    pub skipped: Vec<SkippedSubscription>,
}

impl MaterializeReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.skipped_duplicates == 0 && self.skipped.is_empty()
    }

    pub fn total_charged(&self) -> Money {
        -self.created.iter().map(|t| t.amount).sum::<Money>()
    }
}

impl<'a> SubscriptionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateSubscriptionInput) -> FintrackResult<Subscription> {
        let name = input.name.trim();

        if self.storage.subscriptions.get_by_name(name)?.is_some() {
            return Err(FintrackError::Duplicate {
                entity_type: "Subscription",
                identifier: name.to_string(),
            });
        }

        self.storage
            .accounts
            .get(input.account_id)?
            .ok_or_else(|| FintrackError::account_not_found(input.account_id.to_string()))?;
        if let Some(cat_id) = input.category_id {
            self.storage
                .categories
                .get(cat_id)?
                .ok_or_else(|| FintrackError::category_not_found(cat_id.to_string()))?;
        }

        let mut subscription = Subscription::new(
            name,
            input.amount,
            input.frequency,
            input.account_id,
            input.start_date,
        );
        subscription.category_id = input.category_id;
        if let Some(next) = input.next_billing_date {
            subscription.reschedule(next);
        }
        subscription
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.subscriptions.upsert(subscription.clone())?;
        self.storage.subscriptions.save()?;

        self.storage.log_create(
            EntityType::Subscription,
            subscription.id.to_string(),
            Some(subscription.name.clone()),
            &subscription,
        )?;

        tracing::info!(subscription = %subscription.id, name = %subscription.name, "subscription created");
        Ok(subscription)
    }

    pub fn get(&self, id: SubscriptionId) -> FintrackResult<Option<Subscription>> {
        self.storage.subscriptions.get(id)
    }

    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Subscription>> {
        if let Some(subscription) = self.storage.subscriptions.get_by_name(identifier)? {
            return Ok(Some(subscription));
        }
        if let Ok(id) = identifier.parse::<SubscriptionId>() {
            return self.storage.subscriptions.get(id);
        }
        Ok(self
            .storage
            .subscriptions
            .get_all()?
            .into_iter()
            .find(|s| s.id.to_string() == identifier.trim()))
    }

    pub fn resolve(&self, identifier: &str) -> FintrackResult<Subscription> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::subscription_not_found(identifier))
    }

    pub fn list(&self, include_paused: bool) -> FintrackResult<Vec<Subscription>> {
        let mut subscriptions = self.storage.subscriptions.get_all()?;
        if !include_paused {
            subscriptions.retain(|s| s.active);
        }
        Ok(subscriptions)
    }

    pub fn update(
        &self,
        id: SubscriptionId,
        changes: SubscriptionUpdate,
    ) -> FintrackResult<Subscription> {
        let mut subscription = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| FintrackError::subscription_not_found(id.to_string()))?;
        let before = subscription.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if let Some(other) = self.storage.subscriptions.get_by_name(name)? {
                if other.id != id {
                    return Err(FintrackError::Duplicate {
                        entity_type: "Subscription",
                        identifier: name.to_string(),
                    });
                }
            }
            subscription.name = name.to_string();
        }
        if let Some(amount) = changes.amount {
            subscription.amount = amount;
        }
        if let Some(frequency) = changes.frequency {
            subscription.frequency = frequency;
        }
        if let Some(account_id) = changes.account_id {
            self.storage
                .accounts
                .get(account_id)?
                .ok_or_else(|| FintrackError::account_not_found(account_id.to_string()))?;
            subscription.account_id = account_id;
        }
        if let Some(category_id) = changes.category_id {
            if let Some(cat_id) = category_id {
                self.storage
                    .categories
                    .get(cat_id)?
                    .ok_or_else(|| FintrackError::category_not_found(cat_id.to_string()))?;
            }
            subscription.category_id = category_id;
        }
        if let Some(next) = changes.next_billing_date {
            subscription.reschedule(next);
        }

        subscription.updated_at = Utc::now();
        self.persist_update(&before, &subscription)?;
        Ok(subscription)
    }

    /// Stop materializing charges until resumed
    pub fn pause(&self, id: SubscriptionId) -> FintrackResult<Subscription> {
        self.set_active(id, false, None)
    }

    /// Start charging again from the first billing date on or after `today`
    pub fn resume(&self, id: SubscriptionId, today: NaiveDate) -> FintrackResult<Subscription> {
        self.set_active(id, true, Some(today))
    }

    fn set_active(
        &self,
        id: SubscriptionId,
        active: bool,
        today: Option<NaiveDate>,
    ) -> FintrackResult<Subscription> {
        let mut subscription = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| FintrackError::subscription_not_found(id.to_string()))?;

        if subscription.active == active {
            return Err(FintrackError::Validation(if active {
                format!("Subscription '{}' is already active", subscription.name)
            } else {
                format!("Subscription '{}' is already paused", subscription.name)
            }));
        }

        let before = subscription.clone();
        match today {
            Some(today) if active => subscription.resume(today),
            _ => subscription.pause(),
        }

        self.persist_update(&before, &subscription)?;
        Ok(subscription)
    }

    fn persist_update(&self, before: &Subscription, subscription: &Subscription) -> FintrackResult<()> {
        subscription
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.subscriptions.upsert(subscription.clone())?;
        self.storage.subscriptions.save()?;

        self.storage.log_update(
            EntityType::Subscription,
            subscription.id.to_string(),
            Some(subscription.name.clone()),
            before,
            subscription,
        )
    }

    /// Delete a subscription; charges already materialized stay in place
    pub fn delete(&self, id: SubscriptionId) -> FintrackResult<Subscription> {
        let subscription = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| FintrackError::subscription_not_found(id.to_string()))?;

        self.storage.subscriptions.delete(id)?;
        self.storage.subscriptions.save()?;

        self.storage.log_delete(
            EntityType::Subscription,
            subscription.id.to_string(),
            Some(subscription.name.clone()),
            &subscription,
        )?;

        Ok(subscription)
    }

    /// Active subscriptions renewing within `days` of `today`, soonest first
    pub fn upcoming(&self, today: NaiveDate, days: i64) -> FintrackResult<Vec<Subscription>> {
        let mut upcoming: Vec<_> = self
            .list(false)?
            .into_iter()
            .filter(|s| s.renews_within(today, days))
            .collect();
        upcoming.sort_by_key(|s| s.next_billing_date);
        Ok(upcoming)
    }

    /// Monthly-equivalent cost of all active subscriptions
    pub fn monthly_cost(&self) -> FintrackResult<Money> {
        Ok(self.list(false)?.iter().map(|s| s.monthly_cost()).sum())
    }

    /// Create the charges of every billing date that has come due
    ///
    /// One expense transaction per elapsed date from `next_billing_date`
    /// through `today`. Each carries a signature of subscription and date;
    /// a date whose signature already exists is counted and skipped, so
    /// running twice creates nothing new.
    pub fn materialize_due(&self, today: NaiveDate) -> FintrackResult<MaterializeReport> {
        let mut report = MaterializeReport::default();
        let mut entries = Vec::new();
        let fallback_category = self
            .storage
            .categories
            .get_by_name(SUBSCRIPTIONS_CATEGORY)?
            .map(|c| c.id);

        for subscription in self.list(false)? {
            if subscription.next_billing_date > today {
                continue;
            }

            let skip_reason = match self.storage.accounts.get(subscription.account_id)? {
                None => Some("account not found".to_string()),
                Some(account) if account.archived => {
                    Some(format!("account '{}' is archived", account.name))
                }
                Some(_) => None,
            };
            if let Some(reason) = skip_reason {
                tracing::warn!(subscription = %subscription.id, %reason, "skipping subscription");
                report.skipped.push(SkippedSubscription {
                    subscription_id: subscription.id,
                    name: subscription.name.clone(),
                    reason,
                });
                continue;
            }

            let category_id = match subscription.category_id {
                Some(id) if self.storage.categories.get(id)?.is_some() => Some(id),
                _ => fallback_category,
            };

            let due = subscription.due_dates(today);
            let Some(&last) = due.last() else {
                continue;
            };

            for date in &due {
                let signature = recurring_signature(&subscription.id, *date);
                if self.storage.transactions.has_signature(&signature)? {
                    report.skipped_duplicates += 1;
                    continue;
                }

                let mut txn = Transaction::with_details(
                    subscription.account_id,
                    *date,
                    -subscription.amount,
                    subscription.name.clone(),
                    category_id,
                    "",
                );
                txn.source = TransactionSource::Recurring {
                    subscription_id: subscription.id,
                };
                txn.recurring_signature = Some(signature);
                txn.validate()
                    .map_err(|e| FintrackError::Validation(e.to_string()))?;

                self.storage.transactions.upsert(txn.clone())?;
                entries.push(AuditEntry::create(
                    EntityType::Transaction,
                    txn.id.to_string(),
                    Some(format!("{} {}", txn.date, txn.description)),
                    &txn,
                ));
                report.created.push(txn);
            }

            let before = subscription.clone();
            let mut advanced = subscription;
            advanced.last_generated = Some(last);
            advanced.next_billing_date = advanced.following(last);
            advanced.updated_at = Utc::now();
            self.storage.subscriptions.upsert(advanced.clone())?;
            entries.push(AuditEntry::update(
                EntityType::Subscription,
                advanced.id.to_string(),
                Some(advanced.name.clone()),
                &before,
                &advanced,
                Some(format!(
                    "next_billing_date: {} -> {}",
                    before.next_billing_date, advanced.next_billing_date
                )),
            ));
        }

        if !entries.is_empty() {
            self.storage.transactions.save()?;
            self.storage.subscriptions.save()?;
            self.storage.log_batch(&entries)?;
        }

        if !report.created.is_empty() || report.skipped_duplicates > 0 {
            tracing::info!(
                created = report.created.len(),
                duplicates = report.skipped_duplicates,
                skipped = report.skipped.len(),
                %today,
                "materialized subscription charges"
            );
        }

        Ok(report)
    }

    /// Billing dates of one subscription within the next `days`, for previews
    pub fn schedule(&self, id: SubscriptionId, from: NaiveDate, days: i64) -> FintrackResult<Vec<NaiveDate>> {
        let subscription = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| FintrackError::subscription_not_found(id.to_string()))?;

        let end = from + Duration::days(days);
        let mut dates = Vec::new();
        let mut date = subscription.next_billing_date;
        while date <= end {
            if date >= from {
                dates.push(date);
            }
            let next = subscription.following(date);
            if next <= date {
                break;
            }
            date = next;
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Account, AccountType};
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add_account(storage: &Storage) -> AccountId {
        let account = Account::new("Checking", AccountType::Checking);
        let id = account.id;
        storage.accounts.upsert(account).unwrap();
        id
    }

    fn input(name: &str, account_id: AccountId, start: NaiveDate) -> CreateSubscriptionInput {
        CreateSubscriptionInput {
            name: name.into(),
            amount: Money::from_cents(1_599),
            frequency: Frequency::Monthly,
            account_id,
            category_id: None,
            start_date: start,
            next_billing_date: None,
        }
    }

    #[test]
    fn test_materialize_catches_up_elapsed_periods() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        let sub = service
            .create(input("Streaming", account_id, date(2025, 1, 31)))
            .unwrap();
        let report = service.materialize_due(date(2025, 3, 31)).unwrap();

        let dates: Vec<_> = report.created.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
        assert_eq!(report.total_charged().cents(), 3 * 1_599);

        let txn = &report.created[1];
        assert_eq!(txn.amount.cents(), -1_599);
        assert_eq!(txn.description, "Streaming");
        assert_eq!(
            txn.recurring_signature.as_deref(),
            Some(recurring_signature(&sub.id, date(2025, 2, 28)).as_str())
        );
        let category = storage.categories.get(txn.category_id.unwrap()).unwrap().unwrap();
        assert_eq!(category.name, SUBSCRIPTIONS_CATEGORY);

        let sub = service.get(sub.id).unwrap().unwrap();
        assert_eq!(sub.next_billing_date, date(2025, 4, 30));
        assert_eq!(sub.last_generated, Some(date(2025, 3, 31)));
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        service.create(input("Gym", account_id, date(2025, 1, 1))).unwrap();
        assert_eq!(service.materialize_due(date(2025, 2, 15)).unwrap().created.len(), 2);

        let again = service.materialize_due(date(2025, 2, 15)).unwrap();
        assert!(again.is_empty());
        assert_eq!(storage.transactions.count().unwrap(), 2);
    }

    #[test]
    fn test_existing_signature_is_skipped() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        let sub = service.create(input("News", account_id, date(2025, 1, 10))).unwrap();
        service.materialize_due(date(2025, 1, 10)).unwrap();

        // Rewind the schedule as if the subscription record were restored from an old copy
        let mut rewound = service.get(sub.id).unwrap().unwrap();
        rewound.next_billing_date = date(2025, 1, 10);
        storage.subscriptions.upsert(rewound).unwrap();

        let report = service.materialize_due(date(2025, 2, 10)).unwrap();
        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(report.created.len(), 1);
        assert_eq!(storage.transactions.get_by_subscription(sub.id).unwrap().len(), 2);
    }

    #[test]
    fn test_paused_and_archived_are_skipped() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        let paused = service.create(input("Music", account_id, date(2025, 1, 5))).unwrap();
        service.pause(paused.id).unwrap();
        assert!(service.pause(paused.id).is_err());

        let mut archived = Account::new("Old Card", AccountType::Credit);
        archived.archive();
        let archived_id = archived.id;
        storage.accounts.upsert(archived).unwrap();
        service.create(input("Cloud", archived_id, date(2025, 1, 5))).unwrap();

        let report = service.materialize_due(date(2025, 1, 31)).unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "Cloud");
        assert!(report.skipped[0].reason.contains("archived"));

        service.resume(paused.id, date(2025, 1, 5)).unwrap();
        assert_eq!(service.materialize_due(date(2025, 1, 31)).unwrap().created.len(), 1);
    }

    #[test]
    fn test_resume_does_not_charge_paused_months() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        let sub = service.create(input("Streaming", account_id, date(2025, 1, 10))).unwrap();
        assert_eq!(service.materialize_due(date(2025, 1, 15)).unwrap().created.len(), 1);

        service.pause(sub.id).unwrap();
        assert!(service.materialize_due(date(2025, 4, 20)).unwrap().created.is_empty());

        let resumed = service.resume(sub.id, date(2025, 4, 20)).unwrap();
        assert_eq!(resumed.next_billing_date, date(2025, 5, 10));
        assert!(service.materialize_due(date(2025, 4, 20)).unwrap().created.is_empty());

        let report = service.materialize_due(date(2025, 5, 10)).unwrap();
        let dates: Vec<_> = report.created.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 5, 10)]);
        assert_eq!(storage.transactions.get_by_subscription(sub.id).unwrap().len(), 2);
    }

    #[test]
    fn test_rescheduled_billing_day_sticks() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        let mut moved = input("Insurance", account_id, date(2025, 1, 10));
        moved.next_billing_date = Some(date(2025, 3, 25));
        service.create(moved).unwrap();

        let report = service.materialize_due(date(2025, 5, 31)).unwrap();
        let dates: Vec<_> = report.created.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 3, 25), date(2025, 4, 25), date(2025, 5, 25)]);
    }

    #[test]
    fn test_upcoming_and_monthly_cost() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        service.create(input("Soon", account_id, date(2025, 3, 5))).unwrap();
        service.create(input("Later", account_id, date(2025, 3, 25))).unwrap();
        let mut yearly = input("Domain", account_id, date(2025, 3, 3));
        yearly.amount = Money::from_cents(1_200);
        yearly.frequency = Frequency::Yearly;
        service.create(yearly).unwrap();

        let upcoming = service.upcoming(date(2025, 3, 1), 7).unwrap();
        let names: Vec<_> = upcoming.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Domain", "Soon"]);

        assert_eq!(service.monthly_cost().unwrap().cents(), 1_599 * 2 + 100);
    }

    #[test]
    fn test_schedule_preview() {
        let (_temp_dir, storage) = create_test_storage();
        let account_id = add_account(&storage);
        let service = SubscriptionService::new(&storage);

        let mut weekly = input("Meal Kit", account_id, date(2025, 3, 3));
        weekly.frequency = Frequency::Weekly;
        let sub = service.create(weekly).unwrap();

        let dates = service.schedule(sub.id, date(2025, 3, 1), 14).unwrap();
        assert_eq!(dates, vec![date(2025, 3, 3), date(2025, 3, 10)]);
    }
}
