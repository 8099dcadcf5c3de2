//! Transaction CLI commands

use clap::Subcommand;

use super::{parse_date, parse_date_or_today, parse_positive_money, parse_money};
use crate::display::{format_transaction_details, format_transaction_register, NameLookup};
use crate::error::{FintrackError, FintrackResult};
use crate::models::TransactionKind;
use crate::services::{
    AccountService, CategoryService, CreateTransactionInput, TransactionFilter,
    TransactionService, TransactionUpdate,
};
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Account name or ID
        account: String,
        /// Amount, always positive; the kind sets the sign
        amount: String,
        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// List transactions, newest first
    List {
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// income or expense
        #[arg(short, long)]
        kind: Option<String>,
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Text to look for in description or memo
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one transaction
    Show { id: String },
    /// Edit a transaction
    Edit {
        id: String,
        #[arg(short, long)]
        date: Option<String>,
        /// Signed amount, e.g. "-12.50"
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(short = 'D', long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Remove the category
        #[arg(long, conflicts_with = "category")]
        uncategorize: bool,
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// Delete a transaction
    Delete { id: String },
}

fn parse_kind(value: &str) -> FintrackResult<TransactionKind> {
    TransactionKind::parse(value).ok_or_else(|| {
        FintrackError::Validation(format!(
            "Invalid kind '{}'. Use income or expense.",
            value
        ))
    })
}

pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> FintrackResult<()> {
    let service = TransactionService::new(storage);
    let accounts = AccountService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            kind,
            description,
            category,
            date,
            memo,
        } => {
            let account = accounts.resolve(&account)?;
            let kind = parse_kind(&kind)?;
            let amount = kind.signed(parse_positive_money(&amount)?);

            let mut input =
                CreateTransactionInput::new(account.id, parse_date_or_today(date.as_deref())?, amount);
            input.description = description.unwrap_or_default();
            input.category_id = category
                .as_deref()
                .map(|c| categories.resolve(c).map(|c| c.id))
                .transpose()?;
            input.memo = memo;

            let txn = service.create(input)?;
            println!(
                "Recorded {} of {} in {} on {}",
                txn.kind(),
                txn.amount.abs(),
                account.name,
                txn.date
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            category,
            kind,
            from,
            to,
            search,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(account) = account {
                filter = filter.account(accounts.resolve(&account)?.id);
            }
            if let Some(category) = category {
                filter = filter.category(categories.resolve(&category)?.id);
            }
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            if from.is_some() || to.is_some() {
                let start = from
                    .as_deref()
                    .map(parse_date)
                    .transpose()?
                    .unwrap_or(chrono::NaiveDate::MIN);
                let end = to
                    .as_deref()
                    .map(parse_date)
                    .transpose()?
                    .unwrap_or(chrono::NaiveDate::MAX);
                filter = filter.date_range(start, end);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }

            let transactions = service.list(filter)?;
            let names = NameLookup::from_storage(storage)?;
            println!("{}", format_transaction_register(&transactions, &names));
        }

        TransactionCommands::Show { id } => {
            let txn = service.resolve(&id)?;
            let names = NameLookup::from_storage(storage)?;
            print!("{}", format_transaction_details(&txn, &names));
        }

        TransactionCommands::Edit {
            id,
            date,
            amount,
            description,
            category,
            uncategorize,
            memo,
        } => {
            let txn = service.resolve(&id)?;
            let category_id = if uncategorize {
                Some(None)
            } else {
                category
                    .as_deref()
                    .map(|c| categories.resolve(c).map(|c| Some(c.id)))
                    .transpose()?
            };

            let changes = TransactionUpdate {
                date: date.as_deref().map(parse_date).transpose()?,
                amount: amount.as_deref().map(parse_money).transpose()?,
                description,
                category_id,
                memo,
            };
            let updated = service.update(txn.id, changes)?;
            println!("Updated transaction {} ({})", updated.id, updated.amount);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.resolve(&id)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction {} ({})", deleted.id, deleted.amount);
        }
    }

    Ok(())
}
