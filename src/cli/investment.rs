//! Investment CLI commands

use clap::Subcommand;

use super::{parse_money, parse_positive_money};
use crate::display::format_portfolio;
use crate::error::{FintrackError, FintrackResult};
use crate::models::InvestmentKind;
use crate::services::{CreateInvestmentInput, InvestmentService};
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum InvestmentCommands {
    /// Show holdings, gains and allocation
    List,
    /// Add a holding
    Add {
        name: String,
        /// Units held
        quantity: f64,
        /// Price paid per unit
        cost: String,
        /// stock, fund, crypto, bond, real_estate, other
        #[arg(short, long, default_value = "stock")]
        kind: String,
        /// Ticker symbol
        #[arg(short, long)]
        symbol: Option<String>,
        /// Current price per unit, defaults to the cost
        #[arg(short, long)]
        price: Option<String>,
    },
    /// Update the current price
    Price { holding: String, price: String },
    /// Buy more units
    Buy {
        holding: String,
        quantity: f64,
        /// Price paid per unit
        price: String,
    },
    /// Sell units
    Sell { holding: String, quantity: f64 },
    /// Remove a holding
    Delete { holding: String },
}

pub fn handle_investment_command(
    storage: &Storage,
    cmd: InvestmentCommands,
) -> FintrackResult<()> {
    let service = InvestmentService::new(storage);

    match cmd {
        InvestmentCommands::List => {
            print!("{}", format_portfolio(&service.portfolio()?));
        }

        InvestmentCommands::Add {
            name,
            quantity,
            cost,
            kind,
            symbol,
            price,
        } => {
            let kind = InvestmentKind::parse(&kind).ok_or_else(|| {
                FintrackError::Validation(format!(
                    "Unknown investment kind '{}'. Use stock, fund, crypto, bond, real_estate or other.",
                    kind
                ))
            })?;
            let holding = service.create(CreateInvestmentInput {
                name,
                symbol,
                kind,
                quantity,
                cost_basis: parse_money(&cost)?,
                current_price: price.as_deref().map(parse_money).transpose()?,
            })?;
            println!(
                "Added {}: {} units worth {}",
                holding.name,
                holding.quantity,
                holding.market_value()
            );
            println!("  ID: {}", holding.id);
        }

        InvestmentCommands::Price { holding, price } => {
            let found = service.resolve(&holding)?;
            let updated = service.update_price(found.id, parse_money(&price)?)?;
            println!(
                "{} now {} per unit, worth {}",
                updated.name,
                updated.current_price,
                updated.market_value()
            );
        }

        InvestmentCommands::Buy {
            holding,
            quantity,
            price,
        } => {
            let found = service.resolve(&holding)?;
            let updated = service.buy(found.id, quantity, parse_positive_money(&price)?)?;
            println!("{}: {} units", updated.name, updated.quantity);
        }

        InvestmentCommands::Sell { holding, quantity } => {
            let found = service.resolve(&holding)?;
            let updated = service.sell(found.id, quantity)?;
            println!("{}: {} units left", updated.name, updated.quantity);
        }

        InvestmentCommands::Delete { holding } => {
            let found = service.resolve(&holding)?;
            let deleted = service.delete(found.id)?;
            println!("Removed holding: {}", deleted.name);
        }
    }

    Ok(())
}
