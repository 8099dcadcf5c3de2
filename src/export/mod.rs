//! Data export
//!
//! - CSV: one table at a time (spreadsheet-compatible)
//! - JSON: the whole store, machine-readable
//! - YAML: the whole store, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_table_csv, export_transactions_csv, ExportTable};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
