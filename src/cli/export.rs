//! Export CLI command

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{FintrackError, FintrackResult};
use crate::export::{export_full_json, export_full_yaml, export_table_csv, ExportTable};
use crate::storage::Storage;

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,
    /// Table for CSV export (accounts, transactions, categories, budgets, goals, debts, investments, subscriptions)
    #[arg(short, long, default_value = "transactions")]
    pub table: String,
    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> FintrackResult<()> {
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            FintrackError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        ExportFormat::Csv => {
            let table = ExportTable::parse(&args.table).ok_or_else(|| {
                FintrackError::Export(format!("Unknown table '{}'", args.table))
            })?;
            let rows = export_table_csv(storage, table, &mut writer)?;
            if let Some(path) = &args.output {
                println!("Exported {} {} to {}", rows, table.name(), path.display());
            }
        }
        ExportFormat::Json => {
            export_full_json(storage, &mut writer, !args.compact)?;
            writeln!(writer).map_err(|e| FintrackError::Export(e.to_string()))?;
        }
        ExportFormat::Yaml => export_full_yaml(storage, &mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| FintrackError::Export(e.to_string()))?;

    if let (Some(path), ExportFormat::Json | ExportFormat::Yaml) = (&args.output, args.format) {
        println!("Exported all data to {}", path.display());
    }
    Ok(())
}
