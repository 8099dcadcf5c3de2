//! Premium plan state, driven by the hosted checkout provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Free,
    Active,
    PastDue,
    Canceled,
}

impl PlanStatus {
    /// Map a provider subscription status string onto a plan status
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "active" | "trialing" => Some(Self::Active),
            "past_due" | "unpaid" | "incomplete" => Some(Self::PastDue),
            "canceled" | "incomplete_expired" => Some(Self::Canceled),
            _ => None,
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Active | Self::PastDue)
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Active => write!(f, "active"),
            Self::PastDue => write!(f, "past_due"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Plan {
    pub status: PlanStatus,

    #[serde(default)]
    pub customer_id: Option<String>,

    #[serde(default)]
    pub subscription_id: Option<String>,

    /// Id of the last applied webhook event
    #[serde(default)]
    pub last_event_id: Option<String>,

    /// Creation time of the newest applied event
    #[serde(default)]
    pub last_event_created: Option<i64>,

    /// Recently applied event ids, oldest first
    #[serde(default)]
    pub processed_events: Vec<String>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Applied event ids remembered for deduplication
pub const PROCESSED_EVENTS_KEPT: usize = 100;

impl Plan {
    pub fn has_processed(&self, event_id: &str) -> bool {
        self.processed_events.iter().any(|id| id == event_id)
            || self.last_event_id.as_deref() == Some(event_id)
    }

    /// Record an applied event, dropping the oldest ids past the limit
    pub fn record_event(&mut self, event_id: &str, created: Option<i64>) {
        self.last_event_id = Some(event_id.to_string());
        if created.is_some() {
            self.last_event_created = created.max(self.last_event_created);
        }
        self.processed_events.push(event_id.to_string());
        let excess = self
            .processed_events
            .len()
            .saturating_sub(PROCESSED_EVENTS_KEPT);
        self.processed_events.drain(..excess);
    }

    /// Whether an event predates the newest one already applied
    pub fn is_superseded_by(&self, created: Option<i64>) -> bool {
        matches!((created, self.last_event_created), (Some(c), Some(last)) if c < last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_status_mapping() {
        assert_eq!(PlanStatus::from_provider("trialing"), Some(PlanStatus::Active));
        assert_eq!(PlanStatus::from_provider("unpaid"), Some(PlanStatus::PastDue));
        assert_eq!(PlanStatus::from_provider("canceled"), Some(PlanStatus::Canceled));
        assert_eq!(PlanStatus::from_provider("paused"), None);
    }

    #[test]
    fn test_default_is_free() {
        let plan = Plan::default();
        assert_eq!(plan.status, PlanStatus::Free);
        assert!(!plan.status.is_premium());
        assert_eq!(serde_json::to_string(&PlanStatus::PastDue).unwrap(), "\"past_due\"");
    }

    #[test]
    fn test_processed_events_are_bounded() {
        let mut plan = Plan::default();
        for i in 0..PROCESSED_EVENTS_KEPT + 5 {
            plan.record_event(&format!("evt_{}", i), Some(i as i64));
        }
        assert_eq!(plan.processed_events.len(), PROCESSED_EVENTS_KEPT);
        assert!(!plan.has_processed("evt_0"));
        assert!(plan.has_processed("evt_5"));
        assert_eq!(plan.last_event_created, Some(PROCESSED_EVENTS_KEPT as i64 + 4));
        assert!(plan.is_superseded_by(Some(3)));
        assert!(!plan.is_superseded_by(None));
    }
}
