//! Category model
//!
//! Categories classify transactions as income or expense and are the unit
//! budgets are set against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Whether a category collects money in or out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
}

impl CategoryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    pub kind: CategoryKind,

    /// Display color as `#rrggbb`
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub archived: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            color: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == CategoryKind::Income
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if let Some(color) = &self.color {
            let hex = color.strip_prefix('#').unwrap_or("");
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(CategoryValidationError::InvalidColor(color.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(c) => write!(f, "Invalid color '{}', expected #rrggbb", c),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// Categories created by `init`
pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Interest", "Other Income"];

pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Housing",
    "Utilities",
    "Groceries",
    "Transportation",
    "Dining Out",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Subscriptions",
    "Debt Payments",
    "Other",
];

/// Category that materialized subscription charges fall back to
pub const SUBSCRIPTIONS_CATEGORY: &str = "Subscriptions";

/// Category used for debt payments booked as transactions
pub const DEBT_PAYMENTS_CATEGORY: &str = "Debt Payments";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Groceries", CategoryKind::Expense);
        assert_eq!(category.name, "Groceries");
        assert!(!category.is_income());
        assert!(category.color.is_none());
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Rent", CategoryKind::Expense).with_color("#aa00FF");
        assert!(category.validate().is_ok());

        category.color = Some("red".into());
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));

        category.color = None;
        category.name = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(CategoryKind::parse("Income"), Some(CategoryKind::Income));
        assert_eq!(CategoryKind::parse("expense"), Some(CategoryKind::Expense));
        assert_eq!(CategoryKind::parse("transfer"), None);
    }

    #[test]
    fn test_defaults_include_fallbacks() {
        assert!(DEFAULT_EXPENSE_CATEGORIES.contains(&SUBSCRIPTIONS_CATEGORY));
        assert!(DEFAULT_EXPENSE_CATEGORIES.contains(&DEBT_PAYMENTS_CATEGORY));
    }
}
