//! Interactive terminal dashboard
//!
//! Five tabs over a snapshot of storage: overview with cash flow and
//! alerts, transactions, budgets, goals and debts, and investments.

pub mod app;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;

pub use app::{App, Snapshot, Tab};
pub use terminal::run_tui;
