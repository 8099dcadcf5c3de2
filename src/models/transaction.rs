//! Transaction model
//!
//! A single dated money movement in an account. The sign of the amount
//! decides whether it is income (positive) or an expense (negative).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::ids::{AccountId, CategoryId, SubscriptionId, TransactionId};
use super::money::Money;

/// Income or expense, derived from the amount sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "credit" => Some(Self::Income),
            "expense" | "out" | "debit" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Apply this kind's sign to an amount regardless of the amount's own sign
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount.abs(),
            Self::Expense => -amount.abs(),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// Where a transaction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionSource {
    /// Entered by the user
    #[default]
    Manual,
    /// Created by a statement import
    Import,
    /// Materialized from a subscription
    Recurring { subscription_id: SubscriptionId },
    /// Inserted from an assistant command
    Assistant,
}

impl fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Import => write!(f, "import"),
            Self::Recurring { .. } => write!(f, "recurring"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    pub date: NaiveDate,

    /// Amount (positive for income, negative for expense)
    pub amount: Money,

    #[serde(default)]
    pub description: String,

    pub category_id: Option<CategoryId>,

    #[serde(default)]
    pub memo: String,

    #[serde(default)]
    pub source: TransactionSource,

    /// Import ID for duplicate detection during statement import
    #[serde(default)]
    pub import_id: Option<String>,

    /// `"{subscription_id}:{YYYY-MM-DD}"` for materialized subscription charges
    #[serde(default)]
    pub recurring_signature: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(account_id: AccountId, date: NaiveDate, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            account_id,
            date,
            amount,
            description: String::new(),
            category_id: None,
            memo: String::new(),
            source: TransactionSource::Manual,
            import_id: None,
            recurring_signature: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a transaction with all common fields
    pub fn with_details(
        account_id: AccountId,
        date: NaiveDate,
        amount: Money,
        description: impl Into<String>,
        category_id: Option<CategoryId>,
        memo: impl Into<String>,
    ) -> Self {
        let mut txn = Self::new(account_id, date, amount);
        txn.description = description.into();
        txn.category_id = category_id;
        txn.memo = memo.into();
        txn
    }

    pub fn kind(&self) -> TransactionKind {
        if self.amount.is_negative() {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn set_category(&mut self, category_id: Option<CategoryId>) {
        self.category_id = category_id;
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }

        if self.description.len() > 200 {
            return Err(TransactionValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        if matches!(self.source, TransactionSource::Recurring { .. })
            && self.recurring_signature.is_none()
        {
            return Err(TransactionValidationError::MissingSignature);
        }

        Ok(())
    }

    /// Generate an import ID for duplicate detection
    ///
    /// Stable across runs so re-importing the same statement is detected.
    pub fn generate_import_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.date.format("%Y-%m-%d").to_string());
        hasher.update(self.amount.cents().to_le_bytes());
        hasher.update(self.description.trim().to_lowercase());
        let digest = hex::encode(hasher.finalize());
        format!("imp-{}", &digest[..16])
    }
}

/// Signature of one materialized subscription charge
pub fn recurring_signature(subscription_id: &SubscriptionId, date: NaiveDate) -> String {
    format!("{}:{}", subscription_id.as_uuid(), date.format("%Y-%m-%d"))
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    DescriptionTooLong(usize),
    MissingSignature,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount cannot be zero"),
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 200)", len)
            }
            Self::MissingSignature => {
                write!(f, "Recurring transactions must carry a recurring signature")
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
