//! Billing service
//!
//! Premium plan state: starting a hosted checkout and applying verified
//! webhook events.

use chrono::Utc;
use secrecy::SecretString;

use crate::audit::EntityType;
use crate::billing::{verify_signature, CheckoutProvider, CheckoutRequest, CheckoutSession, WebhookEvent};
use crate::config::settings::BillingSettings;
use crate::error::FintrackResult;
use crate::models::{Plan, PlanStatus};
use crate::storage::Storage;

/// What a webhook did to the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Applied { event_type: String, status: PlanStatus },
    /// Event type this relay does not act on
    Ignored { event_type: String },
    /// The event was applied before
    AlreadyProcessed { event_id: String },
    /// Older than an event already applied; applying it would roll state back
    Superseded { event_id: String },
}

pub struct BillingService<'a> {
    storage: &'a Storage,
}

impl<'a> BillingService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn status(&self) -> FintrackResult<Plan> {
        self.storage.plan.get()
    }

    /// Create a checkout session for the configured price
    pub fn checkout(
        &self,
        provider: &dyn CheckoutProvider,
        settings: &BillingSettings,
    ) -> FintrackResult<CheckoutSession> {
        let plan = self.status()?;
        let request = CheckoutRequest {
            price_id: settings.price_id.clone(),
            success_url: settings.success_url.clone(),
            cancel_url: settings.cancel_url.clone(),
            customer_id: plan.customer_id,
        };
        provider.create_session(&request)
    }

    /// Verify a webhook and apply it
    ///
    /// A bad or stale signature is an error and leaves the plan untouched.
    pub fn handle_webhook(
        &self,
        payload: &str,
        signature_header: &str,
        secret: &SecretString,
        tolerance_secs: i64,
        now: i64,
    ) -> FintrackResult<WebhookOutcome> {
        verify_signature(payload, signature_header, secret, tolerance_secs, now)?;
        let event = WebhookEvent::parse(payload)?;
        self.apply_event(&event)
    }

    /// Apply an already verified event
    pub fn apply_event(&self, event: &WebhookEvent) -> FintrackResult<WebhookOutcome> {
        let before = self.status()?;
        if before.has_processed(&event.id) {
            tracing::info!(event = %event.id, "webhook event already processed");
            return Ok(WebhookOutcome::AlreadyProcessed {
                event_id: event.id.clone(),
            });
        }
        if before.is_superseded_by(event.created) {
            tracing::info!(event = %event.id, "ignoring out-of-order webhook event");
            return Ok(WebhookOutcome::Superseded {
                event_id: event.id.clone(),
            });
        }

        let mut after = before.clone();
        match event.event_type.as_str() {
            "checkout.session.completed" => {
                after.status = PlanStatus::Active;
                if let Some(customer) = event.object_str("customer") {
                    after.customer_id = Some(customer.to_string());
                }
                if let Some(subscription) = event.object_str("subscription") {
                    after.subscription_id = Some(subscription.to_string());
                }
            }
            "customer.subscription.updated" => {
                if let Some(status) = event
                    .object_str("status")
                    .and_then(PlanStatus::from_provider)
                {
                    after.status = status;
                }
                if let Some(id) = event.object_str("id") {
                    after.subscription_id = Some(id.to_string());
                }
            }
            "customer.subscription.deleted" => after.status = PlanStatus::Canceled,
            "invoice.payment_failed" => after.status = PlanStatus::PastDue,
            other => {
                tracing::debug!(event_type = other, "ignoring webhook event");
                return Ok(WebhookOutcome::Ignored {
                    event_type: other.to_string(),
                });
            }
        }

        after.record_event(&event.id, event.created);
        after.updated_at = Some(Utc::now());

        self.storage.plan.set(after.clone())?;
        self.storage.plan.save()?;
        self.storage.log_update(
            EntityType::Billing,
            "plan",
            Some(event.event_type.clone()),
            &before,
            &after,
        )?;

        tracing::info!(
            event = %event.id,
            event_type = %event.event_type,
            status = %after.status,
            "plan updated from webhook"
        );
        Ok(WebhookOutcome::Applied {
            event_type: event.event_type.clone(),
            status: after.status,
        })
    }
}
