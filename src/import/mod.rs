//! Statement parsers
//!
//! Turn CSV exports, plain-text statements and OFX files into
//! [`ParsedRow`]s. Persisting them is the job of
//! [`ImportService`](crate::services::ImportService).

pub mod csv;
pub mod fields;
pub mod ofx;
pub mod statement;

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{FintrackError, FintrackResult};
use crate::models::Money;

/// One transaction read from a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub date: NaiveDate,
    /// Negative for money out
    pub amount: Money,
    pub description: String,
    pub memo: String,
    /// Category name from the file, if it had a category column
    pub category: Option<String>,
    /// Bank-assigned id (OFX FITID)
    pub external_id: Option<String>,
    /// 1-based line or record number in the source file
    pub row_number: usize,
}

/// A parsed row, or the row number and reason it was rejected
pub type RowResult = Result<ParsedRow, (usize, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Statement,
    Ofx,
}

impl ImportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "tsv" => Some(Self::Csv),
            "statement" | "text" | "txt" => Some(Self::Statement),
            "ofx" | "qfx" => Some(Self::Ofx),
            _ => None,
        }
    }

    /// Detect the format from the file extension, then the content
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        let by_extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse);
        if let Some(format) = by_extension {
            return format;
        }

        if ofx::looks_like_ofx(content) {
            Self::Ofx
        } else if statement::looks_like_statement(content) {
            Self::Statement
        } else {
            Self::Csv
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Statement => write!(f, "bank statement"),
            Self::Ofx => write!(f, "OFX"),
        }
    }
}

/// Parse statement content in the given format
pub fn parse(content: &str, format: ImportFormat) -> FintrackResult<Vec<RowResult>> {
    let content = content.trim_start_matches('\u{feff}');
    let rows = match format {
        ImportFormat::Csv => csv::parse(content).map_err(FintrackError::Import)?,
        ImportFormat::Statement => statement::parse(content),
        ImportFormat::Ofx => ofx::parse(content),
    };

    tracing::debug!(%format, rows = rows.len(), "parsed statement");
    Ok(rows)
}
