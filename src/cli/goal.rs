//! Savings goal CLI commands

use clap::Subcommand;

use super::{parse_date, parse_positive_money, today};
use crate::display::format_goal_list;
use crate::error::FintrackResult;
use crate::services::{GoalService, GoalUpdate};
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// List goals
    List {
        /// Include completed goals
        #[arg(short, long)]
        all: bool,
    },
    /// Create a goal
    Create {
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Put money toward a goal
    Contribute { goal: String, amount: String },
    /// Take money out of a goal
    Withdraw { goal: String, amount: String },
    /// Edit a goal
    Edit {
        goal: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(short, long)]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        no_deadline: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a goal
    Delete { goal: String },
}

pub fn handle_goal_command(storage: &Storage, cmd: GoalCommands) -> FintrackResult<()> {
    let service = GoalService::new(storage);

    match cmd {
        GoalCommands::List { all } => {
            println!("{}", format_goal_list(&service.list(all)?, today()));
        }

        GoalCommands::Create {
            name,
            target,
            deadline,
        } => {
            let deadline = deadline.as_deref().map(parse_date).transpose()?;
            let goal = service.create(&name, parse_positive_money(&target)?, deadline)?;
            println!("Created goal: {} (target {})", goal.name, goal.target_amount);
            if let Some(monthly) = goal.required_monthly(today()) {
                println!("  Save {} per month to make the deadline", monthly);
            }
        }

        GoalCommands::Contribute { goal, amount } => {
            let found = service.resolve(&goal)?;
            let goal = service.contribute(found.id, parse_positive_money(&amount)?)?;
            println!(
                "{}: {} of {} ({:.0}%)",
                goal.name,
                goal.saved_amount,
                goal.target_amount,
                goal.progress_percent()
            );
            if goal.is_completed() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Withdraw { goal, amount } => {
            let found = service.resolve(&goal)?;
            let goal = service.withdraw(found.id, parse_positive_money(&amount)?)?;
            println!("{}: {} of {}", goal.name, goal.saved_amount, goal.target_amount);
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            deadline,
            no_deadline,
            notes,
        } => {
            let found = service.resolve(&goal)?;
            let deadline = if no_deadline {
                Some(None)
            } else {
                deadline.as_deref().map(parse_date).transpose()?.map(Some)
            };
            let changes = GoalUpdate {
                name,
                target_amount: target.as_deref().map(parse_positive_money).transpose()?,
                deadline,
                notes,
            };
            let updated = service.update(found.id, changes)?;
            println!("Updated goal: {}", updated.name);
        }

        GoalCommands::Delete { goal } => {
            let found = service.resolve(&goal)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted goal: {}", deleted.name);
        }
    }

    Ok(())
}
