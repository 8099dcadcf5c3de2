//! CLI command handler for statement import
//!
//! Reads a CSV export, OFX file or plain-text statement, previews it
//! against existing transactions, and imports the new rows.

use std::path::PathBuf;

use clap::Args;

use crate::error::{FintrackError, FintrackResult};
use crate::import::ImportFormat;
use crate::services::{AccountService, CategoryService, ImportOptions, ImportService, ImportStatus};
use crate::storage::Storage;

#[derive(Args)]
pub struct ImportArgs {
    /// File to import
    pub file: PathBuf,
    /// Target account name or ID
    #[arg(short, long)]
    pub account: String,
    /// csv, ofx or statement; detected when omitted
    #[arg(short, long)]
    pub format: Option<String>,
    /// Category for rows the file does not categorize
    #[arg(short, long)]
    pub category: Option<String>,
    /// Match the file's category column against category names
    #[arg(long)]
    pub guess_categories: bool,
    /// Show the preview without importing
    #[arg(long)]
    pub dry_run: bool,
}

pub fn handle_import_command(storage: &Storage, args: ImportArgs) -> FintrackResult<()> {
    let account = AccountService::new(storage).resolve(&args.account)?;
    let import_service = ImportService::new(storage);

    let content = std::fs::read_to_string(&args.file).map_err(|e| {
        FintrackError::Import(format!("Failed to read {}: {}", args.file.display(), e))
    })?;

    let format = match args.format.as_deref() {
        Some(f) => ImportFormat::parse(f).ok_or_else(|| {
            FintrackError::Import(format!(
                "Unknown format '{}'. Use csv, ofx or statement.",
                f
            ))
        })?,
        None => ImportFormat::detect(Some(&args.file), &content),
    };

    let preview = import_service.preview(&content, format, account.id)?;
    if preview.is_empty() {
        println!("No transactions found in {}.", args.file.display());
        return Ok(());
    }

    let new_count = preview.iter().filter(|e| e.status == ImportStatus::New).count();
    let dup_count = preview
        .iter()
        .filter(|e| e.status == ImportStatus::Duplicate)
        .count();
    let errors: Vec<_> = preview
        .iter()
        .filter_map(|e| match &e.status {
            ImportStatus::Error(msg) => Some((e.row_number, msg)),
            _ => None,
        })
        .collect();

    println!("Import preview for '{}' ({})", account.name, format);
    println!("{}", "=".repeat(40));
    println!("  New transactions:   {}", new_count);
    println!("  Duplicates (skip):  {}", dup_count);
    println!("  Errors:             {}", errors.len());
    for (row, msg) in &errors {
        println!("    Row {}: {}", row, msg);
    }
    println!();

    for entry in preview
        .iter()
        .filter(|e| e.status == ImportStatus::New)
        .take(5)
    {
        if let Some(row) = &entry.row {
            println!("  {} {:<30} {:>12}", row.date, row.description, row.amount);
        }
    }
    if new_count > 5 {
        println!("  ... and {} more", new_count - 5);
    }

    if args.dry_run || new_count == 0 {
        if new_count == 0 {
            println!("No new transactions to import.");
        }
        return Ok(());
    }

    let options = ImportOptions {
        default_category_id: args
            .category
            .as_deref()
            .map(|c| CategoryService::new(storage).resolve(c).map(|c| c.id))
            .transpose()?,
        guess_categories: args.guess_categories,
    };
    let result = import_service.import_from_preview(&preview, account.id, &options)?;

    println!();
    println!("Imported {} transaction(s)", result.imported.len());
    if result.duplicates_skipped > 0 {
        println!("Skipped {} duplicate(s)", result.duplicates_skipped);
    }

    Ok(())
}
