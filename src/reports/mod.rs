//! Reports module for fintrack
//!
//! Derived views over the stored tables: the dashboard summary, spending
//! by category, monthly cash flow, budget status, net worth and alerts.

pub mod alerts;
pub mod budget_status;
pub mod cash_flow;
pub mod net_worth;
pub mod spending;
pub mod summary;

pub use alerts::{collect_alerts, format_alerts, Alert, AlertKind, AlertSettings, Severity};
pub use budget_status::{BudgetHealth, BudgetStatusReport};
pub use cash_flow::{CashFlowMonth, CashFlowReport};
pub use net_worth::{NetWorthLine, NetWorthReport, NetWorthSection, NetWorthSummary};
pub use spending::{SpendingByCategory, SpendingReport};
pub use summary::DashboardSummary;
