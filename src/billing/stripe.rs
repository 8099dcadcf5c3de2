//! Stripe Checkout client

use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{CheckoutProvider, CheckoutRequest, CheckoutSession};
use crate::config::settings::BillingSettings;
use crate::error::{FintrackError, FintrackResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct StripeClient {
    client: Client,
    base_url: String,
    secret_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl StripeClient {
    pub fn new(base_url: &str, secret_key: SecretString) -> FintrackResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
        })
    }

    pub fn from_settings(settings: &BillingSettings) -> FintrackResult<Self> {
        Self::new(&settings.base_url, settings.secret_key()?)
    }
}

/// Form fields of a subscription-mode session with one line item
pub fn session_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", request.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
    ];
    if let Some(customer) = &request.customer_id {
        form.push(("customer", customer.clone()));
    }
    form
}

impl CheckoutProvider for StripeClient {
    fn create_session(&self, request: &CheckoutRequest) -> FintrackResult<CheckoutSession> {
        if request.price_id.trim().is_empty() {
            return Err(FintrackError::Config(
                "billing.price_id is not set; run `fintrack config set billing.price_id <id>`"
                    .to_string(),
            ));
        }

        let url = format!("{}/v1/checkout/sessions", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(self.secret_key.expose_secret(), None::<&str>)
            .form(&session_form(request))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        tracing::debug!(%status, "checkout session response");

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| {
                    format!(
                        "{} - {}",
                        e.error.code.unwrap_or_else(|| "error".to_string()),
                        e.error.message.unwrap_or_default()
                    )
                })
                .unwrap_or(body);
            tracing::warn!(%status, "checkout session creation failed");
            return Err(FintrackError::Billing(format!(
                "Checkout session failed ({}): {}",
                status, detail
            )));
        }

        let session: SessionResponse = serde_json::from_str(&body)?;
        let url = session.url.ok_or_else(|| {
            FintrackError::Billing("Checkout session has no URL".to_string())
        })?;

        tracing::info!(session = %session.id, "checkout session created");
        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            price_id: "price_123".into(),
            success_url: "https://example.com/ok".into(),
            cancel_url: "https://example.com/cancel".into(),
            customer_id: None,
        }
    }

    #[test]
    fn test_session_form() {
        let form = session_form(&request());
        assert!(form.contains(&("mode", "subscription".to_string())));
        assert!(form.contains(&("line_items[0][price]", "price_123".to_string())));
        assert!(!form.iter().any(|(k, _)| *k == "customer"));

        let with_customer = CheckoutRequest {
            customer_id: Some("cus_9".into()),
            ..request()
        };
        assert!(session_form(&with_customer).contains(&("customer", "cus_9".to_string())));
    }

    #[test]
    fn test_missing_price_is_config_error() {
        let client =
            StripeClient::new("https://api.example.test", SecretString::new("sk_test".into()))
                .unwrap();
        let request = CheckoutRequest {
            price_id: String::new(),
            ..request()
        };
        assert!(matches!(
            client.create_session(&request),
            Err(FintrackError::Config(_))
        ));
    }
}
