//! Investment holding model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::InvestmentId;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    #[default]
    Stock,
    Fund,
    Crypto,
    Bond,
    RealEstate,
    Other,
}

impl InvestmentKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "stock" | "equity" => Some(Self::Stock),
            "fund" | "etf" | "mutual_fund" => Some(Self::Fund),
            "crypto" => Some(Self::Crypto),
            "bond" => Some(Self::Bond),
            "real_estate" | "property" => Some(Self::RealEstate),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock => write!(f, "Stock"),
            Self::Fund => write!(f, "Fund"),
            Self::Crypto => write!(f, "Crypto"),
            Self::Bond => write!(f, "Bond"),
            Self::RealEstate => write!(f, "Real Estate"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A position in one asset
///
/// Quantities may be fractional (fund units, crypto); prices and cost stay
/// in integer cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: InvestmentId,

    pub name: String,

    /// Ticker symbol, uppercase
    #[serde(default)]
    pub symbol: Option<String>,

    pub kind: InvestmentKind,

    pub quantity: f64,

    /// Average cost per unit
    pub cost_basis: Money,

    /// Latest known price per unit
    pub current_price: Money,

    #[serde(default)]
    pub price_updated_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Investment {
    pub fn new(
        name: impl Into<String>,
        kind: InvestmentKind,
        quantity: f64,
        cost_basis: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InvestmentId::new(),
            name: name.into(),
            symbol: None,
            kind,
            quantity,
            cost_basis,
            current_price: cost_basis,
            price_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn market_value(&self) -> Money {
        scale(self.current_price, self.quantity)
    }

    pub fn total_cost(&self) -> Money {
        scale(self.cost_basis, self.quantity)
    }

    pub fn gain(&self) -> Money {
        self.market_value() - self.total_cost()
    }

    pub fn return_percent(&self) -> f64 {
        self.gain().percent_of(self.total_cost())
    }

    pub fn set_price(&mut self, price: Money) {
        self.current_price = price;
        self.price_updated_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Add units at `price`, moving the cost basis to the weighted average
    pub fn buy(&mut self, quantity: f64, price: Money) {
        let total_quantity = self.quantity + quantity;
        if total_quantity > 0.0 {
            let total_cost = self.total_cost() + scale(price, quantity);
            self.cost_basis = Money::from_cents((total_cost.cents() as f64 / total_quantity).round() as i64);
        }
        self.quantity = total_quantity;
        self.updated_at = Utc::now();
    }

    /// Remove units; cost basis per unit is unchanged
    pub fn sell(&mut self, quantity: f64) {
        self.quantity -= quantity;
        if self.quantity.abs() < QUANTITY_EPSILON {
            self.quantity = 0.0;
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), InvestmentValidationError> {
        if self.name.trim().is_empty() {
            return Err(InvestmentValidationError::EmptyName);
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(InvestmentValidationError::InvalidQuantity(self.quantity));
        }
        if self.cost_basis.is_negative() || self.current_price.is_negative() {
            return Err(InvestmentValidationError::NegativePrice);
        }
        Ok(())
    }
}

/// Tolerance when comparing fractional quantities
pub const QUANTITY_EPSILON: f64 = 1e-9;

fn scale(price: Money, quantity: f64) -> Money {
    Money::from_cents((price.cents() as f64 * quantity).round() as i64)
}

impl fmt::Display for Investment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{} ({})", self.name, symbol),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvestmentValidationError {
    EmptyName,
    InvalidQuantity(f64),
    NegativePrice,
}

impl fmt::Display for InvestmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Investment name cannot be empty"),
            Self::InvalidQuantity(q) => write!(f, "Invalid quantity: {}", q),
            Self::NegativePrice => write!(f, "Prices cannot be negative"),
        }
    }
}

impl std::error::Error for InvestmentValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation() {
        let mut holding = Investment::new("Index Fund", InvestmentKind::Fund, 10.0, Money::from_cents(10_000));
        holding.set_price(Money::from_cents(12_500));
        assert_eq!(holding.market_value().cents(), 125_000);
        assert_eq!(holding.total_cost().cents(), 100_000);
        assert_eq!(holding.gain().cents(), 25_000);
        assert!((holding.return_percent() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_cost_basis_on_buy() {
        let mut holding = Investment::new("ACME", InvestmentKind::Stock, 10.0, Money::from_cents(1_000));
        holding.buy(30.0, Money::from_cents(2_000));
        assert_eq!(holding.quantity, 40.0);
        // (10*10 + 30*20) / 40 = 17.50
        assert_eq!(holding.cost_basis.cents(), 1_750);
    }

    #[test]
    fn test_sell_keeps_basis() {
        let mut holding = Investment::new("BTC", InvestmentKind::Crypto, 0.5, Money::from_cents(3_000_000));
        holding.sell(0.2);
        assert!((holding.quantity - 0.3).abs() < 1e-9);
        assert_eq!(holding.cost_basis.cents(), 3_000_000);
    }

    #[test]
    fn test_validation() {
        let holding = Investment::new("X", InvestmentKind::Other, -1.0, Money::zero());
        assert!(matches!(
            holding.validate(),
            Err(InvestmentValidationError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(InvestmentKind::parse("ETF"), Some(InvestmentKind::Fund));
        assert_eq!(InvestmentKind::parse("real-estate"), Some(InvestmentKind::RealEstate));
        assert_eq!(InvestmentKind::parse("tulips"), None);
    }
}
