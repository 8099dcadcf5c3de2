//! Webhook signature verification and event parsing
//!
//! The signature header has the form `t=<unix seconds>,v1=<hex>[,v1=<hex>]`.
//! Each `v1` is HMAC-SHA256 of `"<t>.<payload>"` keyed with the endpoint
//! secret.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;

use crate::error::{FintrackError, FintrackResult};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Unix seconds the provider created the event
    #[serde(default)]
    pub created: Option<i64>,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: Value,
}

impl WebhookEvent {
    pub fn parse(payload: &str) -> FintrackResult<Self> {
        serde_json::from_str(payload)
            .map_err(|e| FintrackError::Billing(format!("Malformed webhook payload: {}", e)))
    }

    /// String field of the event object
    pub fn object_str(&self, field: &str) -> Option<&str> {
        self.data.object.get(field).and_then(|v| v.as_str())
    }
}

fn mac_for(secret: &SecretString, timestamp: i64, payload: &str) -> FintrackResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| FintrackError::Billing("Invalid webhook secret".to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Header value for a payload, as the provider would send it
pub fn sign(payload: &str, secret: &SecretString, timestamp: i64) -> FintrackResult<String> {
    let signature = mac_for(secret, timestamp, payload)?.finalize().into_bytes();
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}

/// Check a signature header against the payload
///
/// Fails when the header is malformed, the timestamp is further than
/// `tolerance_secs` from `now`, or no `v1` signature matches.
pub fn verify_signature(
    payload: &str,
    header: &str,
    secret: &SecretString,
    tolerance_secs: i64,
    now: i64,
) -> FintrackResult<()> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        FintrackError::Billing("Signature header has no timestamp".to_string())
    })?;
    if signatures.is_empty() {
        return Err(FintrackError::Billing(
            "Signature header has no v1 signature".to_string(),
        ));
    }

    if (now - timestamp).abs() > tolerance_secs {
        tracing::warn!(timestamp, now, "webhook timestamp outside tolerance");
        return Err(FintrackError::Billing(
            "Webhook timestamp is outside the tolerance window".to_string(),
        ));
    }

    let mac = mac_for(secret, timestamp, payload)?;
    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        tracing::warn!("webhook signature mismatch");
        Err(FintrackError::Billing(
            "Webhook signature does not match".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"id":"evt_1","type":"invoice.payment_failed","data":{"object":{"customer":"cus_1"}}}"#;
    const NOW: i64 = 1_750_000_000;

    fn secret() -> SecretString {
        SecretString::new("whsec_test".into())
    }

    #[test]
    fn test_sign_then_verify() {
        let header = sign(PAYLOAD, &secret(), NOW).unwrap();
        assert!(header.starts_with("t=1750000000,v1="));
        verify_signature(PAYLOAD, &header, &secret(), 300, NOW + 10).unwrap();
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let header = sign(PAYLOAD, &secret(), NOW).unwrap();
        let tampered = PAYLOAD.replace("cus_1", "cus_2");
        assert!(verify_signature(&tampered, &header, &secret(), 300, NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let header = sign(PAYLOAD, &secret(), NOW).unwrap();
        assert!(verify_signature(PAYLOAD, &header, &secret(), 300, NOW + 301).is_err());
    }

    #[test]
    fn test_any_matching_v1_accepted() {
        let good = sign(PAYLOAD, &secret(), NOW).unwrap();
        let v1 = good.split_once(",v1=").unwrap().1;
        let header = format!("t={},v1=deadbeef,v1={}", NOW, v1);
        verify_signature(PAYLOAD, &header, &secret(), 300, NOW).unwrap();
    }

    #[test]
    fn test_malformed_headers() {
        assert!(verify_signature(PAYLOAD, "v1=abc", &secret(), 300, NOW).is_err());
        assert!(verify_signature(PAYLOAD, &format!("t={}", NOW), &secret(), 300, NOW).is_err());
        assert!(verify_signature(PAYLOAD, "garbage", &secret(), 300, NOW).is_err());
    }

    #[test]
    fn test_parse_event() {
        let event = WebhookEvent::parse(PAYLOAD).unwrap();
        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "invoice.payment_failed");
        assert_eq!(event.object_str("customer"), Some("cus_1"));
        assert!(WebhookEvent::parse("{}").is_err());
    }
}
