//! Investment service
//!
//! Holdings, price updates, buys and sells, and the portfolio summary.

use std::collections::BTreeMap;

use crate::audit::EntityType;
use crate::error::{FintrackError, FintrackResult};
use crate::models::investment::QUANTITY_EPSILON;
use crate::models::{Investment, InvestmentId, InvestmentKind, Money};
use crate::storage::Storage;

pub struct InvestmentService<'a> {
    storage: &'a Storage,
}

#[derive(Debug, Clone)]
pub struct CreateInvestmentInput {
    pub name: String,
    pub symbol: Option<String>,
    pub kind: InvestmentKind,
    pub quantity: f64,
    /// Price paid per unit
    pub cost_basis: Money,
    /// Defaults to the cost basis
    pub current_price: Option<Money>,
}

/// Share of the portfolio held in one kind of asset
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSlice {
    pub kind: InvestmentKind,
    pub value: Money,
    pub percent: f64,
}

#[derive(Debug, Clone)]
pub struct PortfolioSummary {
    pub holdings: Vec<Investment>,
    pub total_value: Money,
    pub total_cost: Money,
    pub allocation: Vec<AllocationSlice>,
}

impl PortfolioSummary {
    pub fn gain(&self) -> Money {
        self.total_value - self.total_cost
    }

    pub fn return_percent(&self) -> f64 {
        self.gain().percent_of(self.total_cost)
    }
}

impl<'a> InvestmentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateInvestmentInput) -> FintrackResult<Investment> {
        let name = input.name.trim();

        if self.storage.investments.get_by_name(name)?.is_some() {
            return Err(FintrackError::Duplicate {
                entity_type: "Investment",
                identifier: name.to_string(),
            });
        }

        let mut investment = Investment::new(name, input.kind, input.quantity, input.cost_basis);
        investment.symbol = input
            .symbol
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty());
        if let Some(price) = input.current_price {
            investment.set_price(price);
        }
        investment
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.investments.upsert(investment.clone())?;
        self.storage.investments.save()?;

        self.storage.log_create(
            EntityType::Investment,
            investment.id.to_string(),
            Some(investment.name.clone()),
            &investment,
        )?;

        tracing::info!(investment = %investment.id, name = %investment.name, "investment created");
        Ok(investment)
    }

    pub fn get(&self, id: InvestmentId) -> FintrackResult<Option<Investment>> {
        self.storage.investments.get(id)
    }

    /// Find a holding by name, ticker symbol or ID
    pub fn find(&self, identifier: &str) -> FintrackResult<Option<Investment>> {
        if let Some(investment) = self.storage.investments.get_by_name(identifier)? {
            return Ok(Some(investment));
        }
        if let Ok(id) = identifier.parse::<InvestmentId>() {
            return self.storage.investments.get(id);
        }

        let identifier = identifier.trim();
        Ok(self.storage.investments.get_all()?.into_iter().find(|i| {
            i.symbol
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(identifier))
                || i.id.to_string() == identifier
        }))
    }

    pub fn resolve(&self, identifier: &str) -> FintrackResult<Investment> {
        self.find(identifier)?
            .ok_or_else(|| FintrackError::investment_not_found(identifier))
    }

    pub fn list(&self) -> FintrackResult<Vec<Investment>> {
        self.storage.investments.get_all()
    }

    pub fn update_price(&self, id: InvestmentId, price: Money) -> FintrackResult<Investment> {
        self.modify(id, |investment| {
            investment.set_price(price);
            Ok(())
        })
    }

    /// Add units at a price, averaging the cost basis
    pub fn buy(&self, id: InvestmentId, quantity: f64, price: Money) -> FintrackResult<Investment> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(FintrackError::Validation("Quantity must be positive".into()));
        }
        self.modify(id, |investment| {
            investment.buy(quantity, price);
            Ok(())
        })
    }

    /// Remove units; selling more than is held is rejected
    pub fn sell(&self, id: InvestmentId, quantity: f64) -> FintrackResult<Investment> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(FintrackError::Validation("Quantity must be positive".into()));
        }
        self.modify(id, |investment| {
            if quantity > investment.quantity + QUANTITY_EPSILON {
                return Err(FintrackError::Validation(format!(
                    "Cannot sell {} units of '{}': only {} held",
                    quantity, investment.name, investment.quantity
                )));
            }
            investment.sell(quantity);
            Ok(())
        })
    }

    fn modify(
        &self,
        id: InvestmentId,
        change: impl FnOnce(&mut Investment) -> FintrackResult<()>,
    ) -> FintrackResult<Investment> {
        let mut investment = self
            .storage
            .investments
            .get(id)?
            .ok_or_else(|| FintrackError::investment_not_found(id.to_string()))?;
        let before = investment.clone();

        change(&mut investment)?;
        investment
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.storage.investments.upsert(investment.clone())?;
        self.storage.investments.save()?;

        self.storage.log_update(
            EntityType::Investment,
            investment.id.to_string(),
            Some(investment.name.clone()),
            &before,
            &investment,
        )?;

        Ok(investment)
    }

    pub fn delete(&self, id: InvestmentId) -> FintrackResult<Investment> {
        let investment = self
            .storage
            .investments
            .get(id)?
            .ok_or_else(|| FintrackError::investment_not_found(id.to_string()))?;

        self.storage.investments.delete(id)?;
        self.storage.investments.save()?;

        self.storage.log_delete(
            EntityType::Investment,
            investment.id.to_string(),
            Some(investment.name.clone()),
            &investment,
        )?;

        Ok(investment)
    }

    /// Totals and allocation by asset kind, largest slice first
    pub fn portfolio(&self) -> FintrackResult<PortfolioSummary> {
        let holdings = self.list()?;
        let total_value: Money = holdings.iter().map(|i| i.market_value()).sum();
        let total_cost: Money = holdings.iter().map(|i| i.total_cost()).sum();

        let mut by_kind: BTreeMap<InvestmentKind, Money> = BTreeMap::new();
        for holding in &holdings {
            *by_kind.entry(holding.kind).or_default() += holding.market_value();
        }

        let mut allocation: Vec<_> = by_kind
            .into_iter()
            .map(|(kind, value)| AllocationSlice {
                kind,
                value,
                percent: value.percent_of(total_value),
            })
            .collect();
        allocation.sort_by(|a, b| b.value.cmp(&a.value));

        Ok(PortfolioSummary {
            holdings,
            total_value,
            total_cost,
            allocation,
        })
    }
}
