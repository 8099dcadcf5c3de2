//! Subscription CLI commands
//!
//! Includes the manual trigger of the recurring materializer.

use clap::Subcommand;

use super::{parse_date, parse_date_or_today, parse_positive_money, today};
use crate::display::format_subscription_list;
use crate::error::{FintrackError, FintrackResult};
use crate::models::Frequency;
use crate::services::{
    AccountService, CategoryService, CreateSubscriptionInput, MaterializeReport,
    SubscriptionService, SubscriptionUpdate,
};
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// List subscriptions
    List {
        /// Include paused subscriptions
        #[arg(short, long)]
        all: bool,
    },
    /// Add a subscription
    Add {
        name: String,
        amount: String,
        /// Account charged
        #[arg(short, long)]
        account: String,
        /// weekly, monthly, quarterly, yearly
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        #[arg(short, long)]
        category: Option<String>,
        /// First billing date, defaults to today
        #[arg(short, long)]
        start: Option<String>,
        /// Next billing date when it differs from the start
        #[arg(short, long)]
        next: Option<String>,
    },
    /// Edit a subscription
    Edit {
        subscription: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        frequency: Option<String>,
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        next: Option<String>,
    },
    /// Stop generating charges
    Pause { subscription: String },
    /// Start generating charges again
    Resume { subscription: String },
    /// Delete a subscription
    Delete { subscription: String },
    /// Renewals within the next days
    Upcoming {
        #[arg(short, long, default_value = "30")]
        days: i64,
    },
    /// Create the charges of every billing date up to a day
    Materialize {
        /// Defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn parse_frequency(value: &str) -> FintrackResult<Frequency> {
    Frequency::parse(value).ok_or_else(|| {
        FintrackError::Validation(format!(
            "Unknown frequency '{}'. Use weekly, monthly, quarterly or yearly.",
            value
        ))
    })
}

/// Print what a materializer run did
pub fn print_materialize_report(report: &MaterializeReport) {
    if report.is_empty() {
        println!("No subscription charges due.");
        return;
    }

    for txn in &report.created {
        println!("  {} {} {}", txn.date, txn.description, txn.amount);
    }
    println!(
        "Created {} charge(s) totalling {}",
        report.created.len(),
        report.total_charged()
    );
    if report.skipped_duplicates > 0 {
        println!("Skipped {} already recorded", report.skipped_duplicates);
    }
    for skipped in &report.skipped {
        println!("Skipped {}: {}", skipped.name, skipped.reason);
    }
}

pub fn handle_subscription_command(
    storage: &Storage,
    cmd: SubscriptionCommands,
) -> FintrackResult<()> {
    let service = SubscriptionService::new(storage);
    let accounts = AccountService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        SubscriptionCommands::List { all } => {
            println!("{}", format_subscription_list(&service.list(all)?));
            println!("Monthly cost: {}", service.monthly_cost()?);
        }

        SubscriptionCommands::Add {
            name,
            amount,
            account,
            frequency,
            category,
            start,
            next,
        } => {
            let subscription = service.create(CreateSubscriptionInput {
                name,
                amount: parse_positive_money(&amount)?,
                frequency: parse_frequency(&frequency)?,
                account_id: accounts.resolve(&account)?.id,
                category_id: category
                    .as_deref()
                    .map(|c| categories.resolve(c).map(|c| c.id))
                    .transpose()?,
                start_date: parse_date_or_today(start.as_deref())?,
                next_billing_date: next.as_deref().map(parse_date).transpose()?,
            })?;
            println!(
                "Added subscription: {} ({} {}), next charge {}",
                subscription.name,
                subscription.amount,
                subscription.frequency,
                subscription.next_billing_date
            );
            println!("  ID: {}", subscription.id);
        }

        SubscriptionCommands::Edit {
            subscription,
            name,
            amount,
            frequency,
            account,
            category,
            next,
        } => {
            let found = service.resolve(&subscription)?;
            let changes = SubscriptionUpdate {
                name,
                amount: amount.as_deref().map(parse_positive_money).transpose()?,
                frequency: frequency.as_deref().map(parse_frequency).transpose()?,
                account_id: account
                    .as_deref()
                    .map(|a| accounts.resolve(a).map(|a| a.id))
                    .transpose()?,
                category_id: category
                    .as_deref()
                    .map(|c| categories.resolve(c).map(|c| Some(c.id)))
                    .transpose()?,
                next_billing_date: next.as_deref().map(parse_date).transpose()?,
            };
            let updated = service.update(found.id, changes)?;
            println!("Updated subscription: {}", updated.name);
        }

        SubscriptionCommands::Pause { subscription } => {
            let found = service.resolve(&subscription)?;
            let paused = service.pause(found.id)?;
            println!("Paused subscription: {}", paused.name);
        }

        SubscriptionCommands::Resume { subscription } => {
            let found = service.resolve(&subscription)?;
            let resumed = service.resume(found.id, today())?;
            println!(
                "Resumed subscription: {} (next charge {})",
                resumed.name, resumed.next_billing_date
            );
        }

        SubscriptionCommands::Delete { subscription } => {
            let found = service.resolve(&subscription)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted subscription: {}", deleted.name);
        }

        SubscriptionCommands::Upcoming { days } => {
            let upcoming = service.upcoming(today(), days)?;
            if upcoming.is_empty() {
                println!("No renewals in the next {} days.", days);
            } else {
                println!("{}", format_subscription_list(&upcoming));
            }
        }

        SubscriptionCommands::Materialize { date } => {
            let date = parse_date_or_today(date.as_deref())?;
            let report = service.materialize_due(date)?;
            print_materialize_report(&report);
        }
    }

    Ok(())
}
