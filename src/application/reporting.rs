use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    category_breakdown, compute_daily_balances, compute_monthly_totals, compute_totals, Amount,
    CategoryShare, Period, PeriodTotals, Transaction, TransactionType,
};

/// Everything a monthly or yearly overview displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period: String,
    pub first_day: Option<NaiveDate>,
    pub transaction_count: usize,
    pub totals: PeriodTotals,
    pub daily: Vec<DailyRow>,
    /// Only filled for yearly reports
    pub monthly: Vec<MonthRow>,
    pub income_categories: Vec<CategoryShare>,
    pub expense_categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub income: Amount,
    pub expense: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: String,
    pub totals: PeriodTotals,
}

/// Build a report for `period` from the full transaction set.
/// Transactions outside the period are ignored.
pub fn build_period_report(period: Period, transactions: &[Transaction]) -> PeriodReport {
    let selected = period.select(transactions);

    let daily = compute_daily_balances(&selected)
        .into_iter()
        .map(|(date, sums)| DailyRow {
            date,
            income: sums.income,
            expense: sums.expense,
        })
        .collect();

    let monthly = if period.is_month() {
        Vec::new()
    } else {
        compute_monthly_totals(&selected)
            .into_iter()
            .map(|((year, month), totals)| MonthRow {
                month: format!("{:04}-{:02}", year, month),
                totals,
            })
            .collect()
    };

    PeriodReport {
        period: period.label(),
        first_day: period.first_day(),
        transaction_count: selected.len(),
        totals: compute_totals(&selected),
        daily,
        monthly,
        income_categories: category_breakdown(&selected, TransactionType::Income),
        expense_categories: category_breakdown(&selected, TransactionType::Expense),
    }
}

impl PeriodReport {
    pub fn categories(&self, kind: TransactionType) -> &[CategoryShare] {
        match kind {
            TransactionType::Income => &self.income_categories,
            TransactionType::Expense => &self.expense_categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}
