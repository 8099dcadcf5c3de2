//! Configuration module for fintrack
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Relay endpoints and secret lookup

pub mod paths;
pub mod settings;

pub use paths::FintrackPaths;
pub use settings::{AssistantSettings, BillingSettings, Settings};
