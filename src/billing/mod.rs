//! Payment relay
//!
//! Creates hosted checkout sessions for the premium plan and turns signed
//! webhook callbacks into plan status changes.

pub mod stripe;
pub mod webhook;

use crate::error::FintrackResult;

pub use stripe::StripeClient;
pub use webhook::{verify_signature, WebhookEvent};

/// Parameters of one checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Existing provider customer, when the user subscribed before
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    /// Page the user opens to pay
    pub url: String,
}

/// A hosted checkout backend
pub trait CheckoutProvider {
    fn create_session(&self, request: &CheckoutRequest) -> FintrackResult<CheckoutSession>;
}
