//! Service layer for fintrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations.

pub mod account;
pub mod assistant;
pub mod billing;
pub mod budget;
pub mod category;
pub mod debt;
pub mod goal;
pub mod import;
pub mod investment;
pub mod subscription;
pub mod transaction;

pub use account::{AccountService, AccountSummary, AccountUpdate};
pub use assistant::AssistantService;
pub use billing::{BillingService, WebhookOutcome};
pub use budget::{BudgetOverview, BudgetService};
pub use category::CategoryService;
pub use debt::{
    CreateDebtInput, DebtPayment, DebtService, DebtUpdate, PaymentSource, PayoffPlanEntry,
    PayoffStrategy,
};
pub use goal::{GoalService, GoalUpdate};
pub use import::{ImportOptions, ImportPreviewEntry, ImportResult, ImportService, ImportStatus};
pub use investment::{AllocationSlice, CreateInvestmentInput, InvestmentService, PortfolioSummary};
pub use subscription::{
    CreateSubscriptionInput, MaterializeReport, SkippedSubscription, SubscriptionService,
    SubscriptionUpdate,
};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate,
};
