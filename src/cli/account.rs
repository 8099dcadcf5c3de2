//! Account CLI commands

use clap::Subcommand;

use super::parse_money;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::{FintrackError, FintrackResult};
use crate::models::AccountType;
use crate::services::{AccountService, AccountUpdate};
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (checking, savings, credit, cash, investment, loan, other)
        #[arg(short = 't', long, default_value = "checking")]
        account_type: String,
        /// Starting balance (e.g., "1000.00"); owed amounts on credit and loan accounts may be entered positive
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// List all accounts with balances
    List {
        /// Include archived accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 't', long)]
        account_type: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Archive an account
    Archive { account: String },
    /// Unarchive an account
    Unarchive { account: String },
    /// Delete an account that has no transactions
    Delete { account: String },
}

fn parse_account_type(value: &str) -> FintrackResult<AccountType> {
    AccountType::parse(value).ok_or_else(|| {
        FintrackError::Validation(format!(
            "Invalid account type: '{}'. Valid types: checking, savings, credit, cash, investment, loan, other",
            value
        ))
    })
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> FintrackResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
        } => {
            let account_type = parse_account_type(&account_type)?;
            let mut starting_balance = parse_money(&balance)?;

            // Liability balances are stored negative
            if account_type.is_liability() && starting_balance.is_positive() {
                starting_balance = -starting_balance;
            }

            let account = service.create(&name, account_type, starting_balance)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!("  Starting Balance: {}", account.starting_balance);
            println!("  ID: {}", account.id);
        }

        AccountCommands::List { all } => {
            let summaries = service.list_with_balances(all)?;
            print!("{}", format_account_list(&summaries));
        }

        AccountCommands::Show { account } => {
            let found = service.resolve(&account)?;
            let summary = service.get_summary(found)?;
            print!("{}", format_account_details(&summary));
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            notes,
        } => {
            let found = service.resolve(&account)?;

            if name.is_none() && account_type.is_none() && notes.is_none() {
                println!("No changes specified. Use --name, --account-type or --notes.");
                return Ok(());
            }

            let changes = AccountUpdate {
                name,
                account_type: account_type.as_deref().map(parse_account_type).transpose()?,
                starting_balance: None,
                notes,
            };
            let updated = service.update(found.id, changes)?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Archive { account } => {
            let found = service.resolve(&account)?;
            let archived = service.archive(found.id)?;
            println!("Archived account: {}", archived.name);
        }

        AccountCommands::Unarchive { account } => {
            let found = service.resolve(&account)?;
            let unarchived = service.unarchive(found.id)?;
            println!("Unarchived account: {}", unarchived.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.resolve(&account)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}
