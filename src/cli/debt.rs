//! Debt CLI commands

use clap::Subcommand;

use super::{parse_date_or_today, parse_money, parse_positive_money, parse_rate_bps, today};
use crate::display::format_debt_plan;
use crate::error::{FintrackError, FintrackResult};
use crate::services::{
    AccountService, CreateDebtInput, DebtService, DebtUpdate, PaymentSource, PayoffPlanEntry,
    PayoffStrategy,
};
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum DebtCommands {
    /// List debts in payoff order
    List {
        /// avalanche (highest rate first) or snowball (smallest balance first)
        #[arg(short, long, default_value = "avalanche")]
        strategy: String,
        /// Include paid-off debts
        #[arg(short, long)]
        all: bool,
    },
    /// Track a new debt
    Add {
        name: String,
        /// Amount owed
        balance: String,
        /// Annual interest rate in percent, e.g. "19.99"
        #[arg(short, long, default_value = "0")]
        rate: String,
        #[arg(short, long, default_value = "0")]
        minimum: String,
        /// Day of month the payment is due (1-31)
        #[arg(short, long)]
        due_day: Option<u32>,
        #[arg(short, long)]
        lender: Option<String>,
    },
    /// Record a payment
    Pay {
        debt: String,
        amount: String,
        /// Also book the payment as an expense in this account
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Edit a debt
    Edit {
        debt: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        rate: Option<String>,
        #[arg(short, long)]
        minimum: Option<String>,
        #[arg(short, long)]
        due_day: Option<u32>,
        #[arg(short, long)]
        lender: Option<String>,
    },
    /// Stop tracking a debt
    Delete { debt: String },
}

pub fn handle_debt_command(storage: &Storage, cmd: DebtCommands) -> FintrackResult<()> {
    let service = DebtService::new(storage);

    match cmd {
        DebtCommands::List { strategy, all } => {
            let strategy = PayoffStrategy::parse(&strategy).ok_or_else(|| {
                FintrackError::Validation(format!(
                    "Unknown strategy '{}'. Use avalanche or snowball.",
                    strategy
                ))
            })?;
            let mut plan = service.payoff_plan(strategy)?;
            if all {
                plan.extend(
                    service
                        .list(true)?
                        .into_iter()
                        .filter(|d| d.is_paid_off())
                        .map(|debt| PayoffPlanEntry {
                            debt,
                            projection: None,
                        }),
                );
            }
            println!("Payoff order ({}):", strategy);
            println!("{}", format_debt_plan(&plan, today()));
            println!("Total owed: {}", service.total_balance()?);
        }

        DebtCommands::Add {
            name,
            balance,
            rate,
            minimum,
            due_day,
            lender,
        } => {
            let debt = service.create(CreateDebtInput {
                name,
                lender,
                balance: parse_positive_money(&balance)?,
                interest_rate_bps: parse_rate_bps(&rate)?,
                minimum_payment: parse_money(&minimum)?,
                due_day,
            })?;
            println!("Tracking debt: {} ({})", debt.name, debt.balance);
            println!("  ID: {}", debt.id);
        }

        DebtCommands::Pay {
            debt,
            amount,
            account,
            date,
        } => {
            let found = service.resolve(&debt)?;
            let source = match account {
                Some(account) => Some(PaymentSource {
                    account_id: AccountService::new(storage).resolve(&account)?.id,
                    date: parse_date_or_today(date.as_deref())?,
                }),
                None => None,
            };
            let payment = service.record_payment(found.id, parse_positive_money(&amount)?, source)?;
            println!(
                "{}: {} remaining",
                payment.debt.name, payment.debt.balance
            );
            if let Some(txn) = payment.transaction {
                println!("  Booked as expense {}", txn.id);
            }
            if payment.debt.is_paid_off() {
                println!("Paid off!");
            }
        }

        DebtCommands::Edit {
            debt,
            name,
            rate,
            minimum,
            due_day,
            lender,
        } => {
            let found = service.resolve(&debt)?;
            let changes = DebtUpdate {
                name,
                lender,
                interest_rate_bps: rate.as_deref().map(parse_rate_bps).transpose()?,
                minimum_payment: minimum.as_deref().map(parse_money).transpose()?,
                due_day: due_day.map(Some),
            };
            let updated = service.update(found.id, changes)?;
            println!("Updated debt: {}", updated.name);
        }

        DebtCommands::Delete { debt } => {
            let found = service.resolve(&debt)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted debt: {}", deleted.name);
        }
    }

    Ok(())
}
