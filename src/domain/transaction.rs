use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Amount, MAX_AMOUNT};

/// Opaque identifier assigned by the store when a transaction is created.
pub type TransactionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The categories a transaction of this type may use, in display order.
    pub fn categories(&self) -> &'static [Category] {
        Category::for_type(*self)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(UnknownVariant::TransactionType(s.to_string())),
        }
    }
}

/// Fixed category taxonomy. Each category belongs to exactly one transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    // Income
    Salary,
    SideIncome,
    Allowance,
    // Expense
    Food,
    DailyGoods,
    Housing,
    Social,
    Entertainment,
    Transport,
}

const INCOME_CATEGORIES: [Category; 3] =
    [Category::Salary, Category::SideIncome, Category::Allowance];

const EXPENSE_CATEGORIES: [Category; 6] = [
    Category::Food,
    Category::DailyGoods,
    Category::Housing,
    Category::Social,
    Category::Entertainment,
    Category::Transport,
];

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Salary,
        Category::SideIncome,
        Category::Allowance,
        Category::Food,
        Category::DailyGoods,
        Category::Housing,
        Category::Social,
        Category::Entertainment,
        Category::Transport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::SideIncome => "side-income",
            Category::Allowance => "allowance",
            Category::Food => "food",
            Category::DailyGoods => "daily-goods",
            Category::Housing => "housing",
            Category::Social => "social",
            Category::Entertainment => "entertainment",
            Category::Transport => "transport",
        }
    }

    /// The transaction type this category belongs to.
    pub fn kind(&self) -> TransactionType {
        match self {
            Category::Salary | Category::SideIncome | Category::Allowance => {
                TransactionType::Income
            }
            _ => TransactionType::Expense,
        }
    }

    pub fn for_type(kind: TransactionType) -> &'static [Category] {
        match kind {
            TransactionType::Income => &INCOME_CATEGORIES,
            TransactionType::Expense => &EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownVariant::Category(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownVariant {
    TransactionType(String),
    Category(String),
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownVariant::TransactionType(s) => {
                write!(f, "unknown transaction type '{}' (expected income or expense)", s)
            }
            UnknownVariant::Category(s) => write!(f, "unknown category '{}'", s),
        }
    }
}

impl std::error::Error for UnknownVariant {}

/// One recorded cash movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    /// Magnitude in whole currency units, never negative
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    /// Free-text description, not used in aggregation
    pub content: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Apply a partial update. Fields present in the patch replace the current
    /// values, absent fields keep them. The id never changes.
    pub fn merge(&self, patch: &TransactionPatch) -> Transaction {
        Transaction {
            id: self.id.clone(),
            date: patch.date.unwrap_or(self.date),
            amount: patch.amount.unwrap_or(self.amount),
            kind: patch.kind.unwrap_or(self.kind),
            category: patch.category.unwrap_or(self.category),
            content: patch
                .content
                .clone()
                .unwrap_or_else(|| self.content.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(self.amount, self.kind, self.category)
    }
}

/// A transaction as entered by the user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    #[serde(default)]
    pub content: String,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, amount: Amount, category: Category) -> Self {
        Self {
            date,
            amount,
            kind: category.kind(),
            category,
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(self.amount, self.kind, self.category)
    }

    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            content: self.content,
        }
    }
}

/// Partial update of a stored transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<Amount>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<Category>,
    pub content: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.content.is_none()
    }
}

fn validate_fields(
    amount: Amount,
    kind: TransactionType,
    category: Category,
) -> Result<(), ValidationError> {
    if amount < 0 {
        return Err(ValidationError::NegativeAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    if category.kind() != kind {
        return Err(ValidationError::CategoryMismatch { category, kind });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NegativeAmount(Amount),
    AmountTooLarge(Amount),
    CategoryMismatch {
        category: Category,
        kind: TransactionType,
    },
    EmptyPatch,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NegativeAmount(amount) => {
                write!(f, "amount must not be negative (got {})", amount)
            }
            ValidationError::AmountTooLarge(amount) => {
                write!(f, "amount {} exceeds the limit of {}", amount, MAX_AMOUNT)
            }
            ValidationError::CategoryMismatch { category, kind } => write!(
                f,
                "category '{}' is not a valid {} category",
                category, kind
            ),
            ValidationError::EmptyPatch => write!(f, "nothing to update"),
        }
    }
}

impl std::error::Error for ValidationError {}
