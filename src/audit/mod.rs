//! Audit logging for fintrack
//!
//! Every create, update and delete is appended to `audit.log` as one JSON
//! line with before/after snapshots. This is a record of data changes, kept
//! separate from the `tracing` diagnostics.
//!
//! - `AuditEntry`: one operation on one entity
//! - `AuditLogger`: appends and reads the JSONL file
//! - `generate_diff`: summary of changed fields for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
