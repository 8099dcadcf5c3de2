//! fintrack - terminal personal-finance dashboard
//!
//! Tracks accounts, transactions, budgets, savings goals, debts,
//! investments and recurring subscriptions in a local JSON store, and
//! derives dashboard reports from them. Bank statements come in as CSV,
//! OFX or plain text; data goes out as CSV, JSON or YAML. Two hosted
//! services are relayed: a generative-language assistant that can log a
//! transaction from a chat message, and a checkout provider for the
//! premium plan.
//!
//! # Architecture
//!
//! - `config`: paths and settings
//! - `error`: the crate error type
//! - `models`: domain records
//! - `storage`: one JSON document per table, plus the audit log
//! - `services`: business rules on top of storage, including the
//!   recurring materializer
//! - `reports`: derived views (summary, spending, cash flow, alerts)
//! - `import` / `export`: statement parsing and data export
//! - `assistant` / `billing`: the hosted-service relays
//! - `cli` / `tui` / `display`: user interfaces
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::config::{paths::FintrackPaths, settings::Settings};
//! use fintrack::storage::Storage;
//!
//! let paths = FintrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod assistant;
pub mod audit;
pub mod billing;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{FintrackError, FintrackResult};
