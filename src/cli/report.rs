//! CLI commands for reports
//!
//! Each report prints to the terminal, or writes CSV with `--output`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use super::{parse_date, parse_period, today};
use crate::config::settings::Settings;
use crate::error::{FintrackError, FintrackResult};
use crate::models::BudgetPeriod;
use crate::reports::{
    BudgetStatusReport, CashFlowReport, DashboardSummary, NetWorthReport, SpendingReport,
};
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Net worth, this month's cash flow and counts at a glance
    Summary,

    /// Spending by category
    Spending {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
        /// Month to report on (alternative to start/end)
        #[arg(short, long)]
        period: Option<String>,
        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Income, expense and net per month
    #[command(alias = "cashflow")]
    CashFlow {
        /// Number of months, ending with the current one
        #[arg(short, long, default_value = "6")]
        months: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Budget limits against spending
    Budget {
        #[arg(short, long)]
        period: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Assets, investments and debts
    #[command(alias = "networth")]
    NetWorth {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn create_output(path: &Path) -> FintrackResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        FintrackError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> FintrackResult<()> {
    match cmd {
        ReportCommands::Summary => {
            let summary = DashboardSummary::generate(storage, today())?;
            println!("{}", summary.format_terminal());
        }

        ReportCommands::Spending {
            start,
            end,
            period,
            top,
            output,
        } => {
            let (start_date, end_date) = spending_range(start, end, period)?;
            let report = SpendingReport::generate(storage, start_date, end_date)?;

            if let Some(path) = output {
                report.export_csv(create_output(&path)?)?;
                println!("Spending report exported to: {}", path.display());
            } else if let Some(n) = top {
                println!("Top {} spending categories: {} to {}\n", n, start_date, end_date);
                for cat in report.top_categories(n) {
                    println!(
                        "{:<30} {:>12} {:>6.1}%",
                        cat.category_name, cat.total_spending, cat.percentage
                    );
                }
                println!("\nTotal spending: {}", report.total_spending);
            } else {
                println!("{}", report.format_terminal());
            }
        }

        ReportCommands::CashFlow { months, output } => {
            let report = CashFlowReport::generate(storage, today(), months)?;
            if let Some(path) = output {
                report.export_csv(create_output(&path)?)?;
                println!("Cash flow report exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal());
            }
        }

        ReportCommands::Budget { period, output } => {
            let period = parse_period(period.as_deref())?;
            let report =
                BudgetStatusReport::generate(storage, period, settings.budget_warning_percent)?;
            if let Some(path) = output {
                report.export_csv(create_output(&path)?)?;
                println!("Budget report exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal());
            }
        }

        ReportCommands::NetWorth { output } => {
            let report = NetWorthReport::generate(storage)?;
            if let Some(path) = output {
                report.export_csv(create_output(&path)?)?;
                println!("Net worth report exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal());
            }
        }
    }

    Ok(())
}

/// Date range from `--period`, or `--start`/`--end` defaulting to month-to-date
fn spending_range(
    start: Option<String>,
    end: Option<String>,
    period: Option<String>,
) -> FintrackResult<(NaiveDate, NaiveDate)> {
    if let Some(period) = period {
        let period: BudgetPeriod = parse_period(Some(&period))?;
        return Ok((period.start_date(), period.end_date()));
    }

    let today = today();
    let start_date = match start {
        Some(s) => parse_date(&s)?,
        None => today.with_day(1).unwrap_or(today),
    };
    let end_date = match end {
        Some(e) => parse_date(&e)?,
        None => today,
    };
    if end_date < start_date {
        return Err(FintrackError::Validation(format!(
            "End date {} is before start date {}",
            end_date, start_date
        )));
    }
    Ok((start_date, end_date))
}
