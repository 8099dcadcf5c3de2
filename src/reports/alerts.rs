//! Alerts
//!
//! Things that need the user's attention: budgets running out, charges
//! coming up, goals past their deadline, debt payments due.

use crate::error::FintrackResult;
use crate::models::BudgetPeriod;
use crate::reports::budget_status::{BudgetHealth, BudgetStatusReport};
use crate::services::{DebtService, GoalService, SubscriptionService};
use crate::storage::Storage;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "!!"),
            Self::Warning => write!(f, "! "),
            Self::Info => write!(f, "- "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    BudgetExceeded,
    BudgetWarning,
    SubscriptionRenewal,
    GoalOverdue,
    DebtDue,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    /// Date the alert is about, when there is one
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
pub struct AlertSettings {
    /// Horizon for renewals and due dates
    pub upcoming_days: i64,
    pub budget_warning_percent: u32,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            upcoming_days: 7,
            budget_warning_percent: 80,
        }
    }
}

impl From<&crate::config::settings::Settings> for AlertSettings {
    fn from(settings: &crate::config::settings::Settings) -> Self {
        Self {
            upcoming_days: settings.upcoming_days,
            budget_warning_percent: settings.budget_warning_percent,
        }
    }
}

/// Collect alerts as of `today`, most severe first
pub fn collect_alerts(
    storage: &Storage,
    today: NaiveDate,
    settings: AlertSettings,
) -> FintrackResult<Vec<Alert>> {
    let mut alerts = Vec::new();

    // Monthly and weekly budgets are set independently; check both periods containing today
    for period in [BudgetPeriod::month_of(today), BudgetPeriod::week_of(today)] {
        let budgets =
            BudgetStatusReport::generate(storage, period, settings.budget_warning_percent)?;
        for (status, health) in &budgets.rows {
            let label = if period.is_weekly() {
                format!("{} ({})", status.category_name, period)
            } else {
                status.category_name.clone()
            };
            match health {
                BudgetHealth::Over => alerts.push(Alert {
                    kind: AlertKind::BudgetExceeded,
                    severity: Severity::Critical,
                    message: format!(
                        "{} is over budget by {} ({} of {})",
                        label,
                        -status.remaining(),
                        status.spent,
                        status.available()
                    ),
                    date: None,
                }),
                BudgetHealth::Warning => alerts.push(Alert {
                    kind: AlertKind::BudgetWarning,
                    severity: Severity::Warning,
                    message: format!(
                        "{} has used {:.0}% of its budget ({} left)",
                        label,
                        status.percent_used(),
                        status.remaining()
                    ),
                    date: None,
                }),
                BudgetHealth::OnTrack => {}
            }
        }
    }

    for subscription in SubscriptionService::new(storage).upcoming(today, settings.upcoming_days)? {
        let days = (subscription.next_billing_date - today).num_days();
        let when = match days {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {} days", n),
        };
        alerts.push(Alert {
            kind: AlertKind::SubscriptionRenewal,
            severity: Severity::Info,
            message: format!("{} renews {} ({})", subscription.name, when, subscription.amount),
            date: Some(subscription.next_billing_date),
        });
    }

    for goal in GoalService::new(storage).list(false)? {
        if goal.is_overdue(today) {
            alerts.push(Alert {
                kind: AlertKind::GoalOverdue,
                severity: Severity::Warning,
                message: format!(
                    "Goal '{}' passed its deadline with {} still to save",
                    goal.name,
                    goal.remaining()
                ),
                date: goal.deadline,
            });
        }
    }

    let horizon = today + chrono::Duration::days(settings.upcoming_days);
    for debt in DebtService::new(storage).list(false)? {
        if let Some(due) = debt.next_due_date(today).filter(|d| *d <= horizon) {
            alerts.push(Alert {
                kind: AlertKind::DebtDue,
                severity: Severity::Info,
                message: format!(
                    "{} payment of {} due {}",
                    debt.name, debt.minimum_payment, due
                ),
                date: Some(due),
            });
        }
    }

    alerts.sort_by(|a, b| a.severity.cmp(&b.severity).then(a.date.cmp(&b.date)));
    Ok(alerts)
}

pub fn format_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts.\n".to_string();
    }
    alerts
        .iter()
        .map(|a| format!("{} {}\n", a.severity, a.message))
        .collect()
}
