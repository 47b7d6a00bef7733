//! Pure projections from a transaction set to the totals and buckets shown in
//! reports. Nothing here mutates its input, and every function is linear in
//! the number of transactions. Sums saturate at the `Amount` range instead of
//! overflowing.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Amount, Category, Transaction, TransactionType};

/// Summed income, expense and the resulting balance over a transaction set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount,
}

impl PeriodTotals {
    pub fn new(income: Amount, expense: Amount) -> Self {
        Self {
            income,
            expense,
            balance: income.saturating_sub(expense),
        }
    }

    /// Total for one side of the ledger.
    pub fn for_type(&self, kind: TransactionType) -> Amount {
        match kind {
            TransactionType::Income => self.income,
            TransactionType::Expense => self.expense,
        }
    }
}

/// Income and expense partial sums for a single bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAmounts {
    pub income: Amount,
    pub expense: Amount,
}

impl DailyAmounts {
    fn add(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionType::Income => self.income = self.income.saturating_add(transaction.amount),
            TransactionType::Expense => {
                self.expense = self.expense.saturating_add(transaction.amount)
            }
        }
    }
}

/// One entry per distinct date present in the input. Dates without
/// transactions are absent, not zero-filled.
pub type DailyBalance = BTreeMap<NaiveDate, DailyAmounts>;

/// Sparse: categories without transactions are absent.
pub type CategoryTotals = BTreeMap<Category, Amount>;

pub fn compute_totals(transactions: &[Transaction]) -> PeriodTotals {
    let sums = transactions
        .iter()
        .fold(DailyAmounts::default(), |mut sums, transaction| {
            sums.add(transaction);
            sums
        });

    PeriodTotals::new(sums.income, sums.expense)
}

pub fn compute_daily_balances(transactions: &[Transaction]) -> DailyBalance {
    let mut daily = DailyBalance::new();

    for transaction in transactions {
        daily.entry(transaction.date).or_default().add(transaction);
    }

    daily
}

pub fn compute_category_totals(
    transactions: &[Transaction],
    kind: TransactionType,
) -> CategoryTotals {
    let mut totals = CategoryTotals::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        let total = totals.entry(transaction.category).or_insert(0);
        *total = total.saturating_add(transaction.amount);
    }

    totals
}

/// Per-month totals keyed by `(year, month)`, for the yearly view.
/// Months without transactions are absent.
pub fn compute_monthly_totals(transactions: &[Transaction]) -> BTreeMap<(i32, u32), PeriodTotals> {
    let mut months: BTreeMap<(i32, u32), DailyAmounts> = BTreeMap::new();

    for transaction in transactions {
        months
            .entry((transaction.date.year(), transaction.date.month()))
            .or_default()
            .add(transaction);
    }

    months
        .into_iter()
        .map(|(key, sums)| (key, PeriodTotals::new(sums.income, sums.expense)))
        .collect()
}

/// Chart axis for daily balances: `YYYY-MM-DD` labels in chronological order.
pub fn date_axis(daily: &DailyBalance) -> Vec<String> {
    let mut dates: Vec<&NaiveDate> = daily.keys().collect();
    dates.sort();
    dates
        .into_iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

/// Income values aligned with [`date_axis`].
pub fn income_series(daily: &DailyBalance) -> Vec<Amount> {
    daily.values().map(|d| d.income).collect()
}

/// Expense values aligned with [`date_axis`].
pub fn expense_series(daily: &DailyBalance) -> Vec<Amount> {
    daily.values().map(|d| d.expense).collect()
}

/// Union a sparse category map with every category of `kind`, filling gaps
/// with zero. Entries follow the category enumeration order.
pub fn complete_category_axis(
    totals: &CategoryTotals,
    kind: TransactionType,
) -> Vec<(Category, Amount)> {
    Category::for_type(kind)
        .iter()
        .map(|category| (*category, totals.get(category).copied().unwrap_or(0)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Amount,
    pub count: usize,
    /// Share of the type's total, 0-100
    pub percentage: f64,
}

/// Category totals with counts and shares, largest first.
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: TransactionType,
) -> Vec<CategoryShare> {
    let mut buckets: BTreeMap<Category, (Amount, usize)> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        let bucket = buckets.entry(transaction.category).or_insert((0, 0));
        bucket.0 = bucket.0.saturating_add(transaction.amount);
        bucket.1 += 1;
    }

    let grand_total = buckets
        .values()
        .fold(0, |sum: Amount, (total, _)| sum.saturating_add(*total));

    let mut shares: Vec<CategoryShare> = buckets
        .into_iter()
        .map(|(category, (total, count))| CategoryShare {
            category,
            total,
            count,
            percentage: if grand_total > 0 {
                total as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    // Stable sort keeps enumeration order among equal totals
    shares.sort_by(|a, b| b.total.cmp(&a.total));
    shares
}
