//! Core data models for fintrack
//!
//! This module contains the data structures of the personal-finance domain:
//! accounts, transactions, categories, budgets, goals, debts, investments
//! and subscriptions.

pub mod account;
pub mod budget;
pub mod category;
pub mod debt;
pub mod goal;
pub mod ids;
pub mod investment;
pub mod money;
pub mod period;
pub mod plan;
pub mod subscription;
pub mod transaction;

pub use account::{Account, AccountType};
pub use budget::{Budget, BudgetStatus};
pub use category::{Category, CategoryKind};
pub use debt::{Debt, PayoffProjection};
pub use goal::Goal;
pub use ids::{
    AccountId, BudgetId, CategoryId, DebtId, GoalId, InvestmentId, SubscriptionId, TransactionId,
};
pub use investment::{Investment, InvestmentKind};
pub use money::Money;
pub use period::BudgetPeriod;
pub use plan::{Plan, PlanStatus};
pub use subscription::{Frequency, Subscription};
pub use transaction::{Transaction, TransactionKind, TransactionSource};
