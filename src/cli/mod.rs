//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod alerts;
pub mod ask;
pub mod audit;
pub mod billing;
pub mod budget;
pub mod category;
pub mod config;
pub mod debt;
pub mod export;
pub mod goal;
pub mod import;
pub mod investment;
pub mod report;
pub mod subscription;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use alerts::handle_alerts_command;
pub use ask::{handle_ask_command, AskArgs};
pub use audit::{handle_audit_command, AuditArgs};
pub use billing::{handle_billing_command, BillingCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use debt::{handle_debt_command, DebtCommands};
pub use export::{handle_export_command, ExportArgs};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::{handle_import_command, ImportArgs};
pub use investment::{handle_investment_command, InvestmentCommands};
pub use report::{handle_report_command, ReportCommands};
pub use subscription::{handle_subscription_command, SubscriptionCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{FintrackError, FintrackResult};
use crate::models::{BudgetPeriod, Money};

/// Today in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a user-entered amount such as "12.50" or "$1,000"
pub fn parse_money(value: &str) -> FintrackResult<Money> {
    Money::parse(value).map_err(|e| {
        FintrackError::Validation(format!(
            "Invalid amount '{}'. Use a format like '12.50'. ({})",
            value, e
        ))
    })
}

/// Parse a positive amount
pub fn parse_positive_money(value: &str) -> FintrackResult<Money> {
    let amount = parse_money(value)?;
    if !amount.is_positive() {
        return Err(FintrackError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(amount)
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(value: &str) -> FintrackResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        FintrackError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD.", value))
    })
}

pub fn parse_date_or_today(value: Option<&str>) -> FintrackResult<NaiveDate> {
    value.map(parse_date).transpose().map(|d| d.unwrap_or_else(today))
}

/// Parse a period like "2025-01", or "current" / "last"; defaults to this month
pub fn parse_period(value: Option<&str>) -> FintrackResult<BudgetPeriod> {
    let current = BudgetPeriod::month_of(today());
    match value.map(|v| v.trim().to_lowercase()) {
        None => Ok(current),
        Some(v) if v == "current" || v == "this" => Ok(current),
        Some(v) if v == "last" || v == "prev" => Ok(current.prev()),
        Some(v) => BudgetPeriod::parse(&v).map_err(|e| FintrackError::Validation(e.to_string())),
    }
}

/// Parse an annual percentage like "19.99" into basis points
pub fn parse_rate_bps(value: &str) -> FintrackResult<i64> {
    let rate: f64 = value
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| FintrackError::Validation(format!("Invalid interest rate '{}'", value)))?;
    Ok((rate * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("12.50").unwrap().cents(), 1250);
        assert!(parse_money("twelve").is_err());
        assert!(parse_positive_money("0").is_err());
        assert!(parse_positive_money("-3").is_err());
    }

    #[test]
    fn test_parse_period_keywords() {
        let current = BudgetPeriod::month_of(today());
        assert_eq!(parse_period(None).unwrap(), current);
        assert_eq!(parse_period(Some("last")).unwrap(), current.prev());
        assert_eq!(
            parse_period(Some("2025-03")).unwrap(),
            BudgetPeriod::monthly(2025, 3)
        );
        assert!(parse_period(Some("March")).is_err());
    }

    #[test]
    fn test_parse_rate_bps() {
        assert_eq!(parse_rate_bps("19.99").unwrap(), 1999);
        assert_eq!(parse_rate_bps("5%").unwrap(), 500);
        assert!(parse_rate_bps("high").is_err());
    }
}
