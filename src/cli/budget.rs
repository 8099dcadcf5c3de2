//! Budget CLI commands
//!
//! Monthly spending limits per expense category.

use clap::Subcommand;

use super::{parse_money, parse_period};
use crate::display::format_budget_overview;
use crate::error::FintrackResult;
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show limits, spending and what is left for a month
    Overview {
        /// Month ("2025-01", "current", "last")
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Set the limit of a category for a month
    Set {
        /// Expense category name or ID
        category: String,
        /// Limit, e.g. "400"
        amount: String,
        #[arg(short, long)]
        period: Option<String>,
        /// Carry unspent money into the next month
        #[arg(long, conflicts_with = "no_rollover")]
        rollover: bool,
        /// Stop carrying unspent money forward
        #[arg(long)]
        no_rollover: bool,
    },
    /// Remove a category's limit for a month
    Remove {
        category: String,
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Copy every limit from one month to another
    Copy {
        /// Source month
        #[arg(long, default_value = "last")]
        from: String,
        /// Target month
        #[arg(long, default_value = "current")]
        to: String,
    },
}

pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> FintrackResult<()> {
    let service = BudgetService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        BudgetCommands::Overview { period } => {
            let period = parse_period(period.as_deref())?;
            print!("{}", format_budget_overview(&service.overview(period)?));
        }

        BudgetCommands::Set {
            category,
            amount,
            period,
            rollover,
            no_rollover,
        } => {
            let category = categories.resolve(&category)?;
            let period = parse_period(period.as_deref())?;
            let rollover = match (rollover, no_rollover) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let budget = service.set_limit(category.id, period, parse_money(&amount)?, rollover)?;
            println!(
                "Budget for {} in {}: {}{}",
                category.name,
                budget.period,
                budget.limit,
                if budget.rollover { " (rollover)" } else { "" }
            );
        }

        BudgetCommands::Remove { category, period } => {
            let category = categories.resolve(&category)?;
            let period = parse_period(period.as_deref())?;
            service.delete(category.id, period)?;
            println!("Removed budget for {} in {}", category.name, period);
        }

        BudgetCommands::Copy { from, to } => {
            let from = parse_period(Some(&from))?;
            let to = parse_period(Some(&to))?;
            let copied = service.copy_period(from, to)?;
            println!("Copied {} budget(s) from {} to {}", copied.len(), from, to);
        }
    }

    Ok(())
}
