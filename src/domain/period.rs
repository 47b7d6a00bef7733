use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Transaction;

/// Select the transactions dated in the same calendar month as `anchor`.
/// Relative order is preserved.
pub fn select_by_month(transactions: &[Transaction], anchor: NaiveDate) -> Vec<Transaction> {
    Period::month_of(anchor).select(transactions)
}

/// Select the transactions dated in the same calendar year as `anchor`.
pub fn select_by_year(transactions: &[Transaction], anchor: NaiveDate) -> Vec<Transaction> {
    Period::year_of(anchor).select(transactions)
}

/// A month or a year used to scope which transactions are current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year_of(date: NaiveDate) -> Self {
        Period::Year { year: date.year() }
    }

    pub fn year(&self) -> i32 {
        match self {
            Period::Month { year, .. } | Period::Year { year } => *year,
        }
    }

    pub fn is_month(&self) -> bool {
        matches!(self, Period::Month { .. })
    }

    /// Compares calendar components only.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year { year } => date.year() == year,
        }
    }

    pub fn select(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.contains(t.date))
            .cloned()
            .collect()
    }

    /// First calendar day of the period.
    pub fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            Period::Year { year } => NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }

    pub fn previous(&self) -> Self {
        match *self {
            Period::Month { year, month: 1 } => Period::Month {
                year: year - 1,
                month: 12,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month - 1,
            },
            Period::Year { year } => Period::Year { year: year - 1 },
        }
    }

    pub fn next(&self) -> Self {
        match *self {
            Period::Month { year, month: 12 } => Period::Month {
                year: year + 1,
                month: 1,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month + 1,
            },
            Period::Year { year } => Period::Year { year: year + 1 },
        }
    }

    /// `2024-06` for a month, `2024` for a year.
    pub fn label(&self) -> String {
        match self {
            Period::Month { year, month } => format!("{:04}-{:02}", year, month),
            Period::Year { year } => format!("{:04}", year),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    /// Accepts `YYYY-MM` for a month or `YYYY` for a year.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParsePeriodError(s.to_string());

        match s.split_once('-') {
            Some((year, month)) => {
                let year: i32 = parse_digits(year).ok_or_else(invalid)?;
                let month: u32 = parse_digits(month).ok_or_else(invalid)?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(Period::Month { year, month })
            }
            None => {
                let year: i32 = parse_digits(s).ok_or_else(invalid)?;
                Ok(Period::Year { year })
            }
        }
    }
}

/// Plain ASCII digits only; `str::parse` alone would also take a sign.
fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError(pub String);

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid period '{}' (expected YYYY-MM or YYYY)", self.0)
    }
}

impl std::error::Error for ParsePeriodError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewTransaction};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(id: &str, d: &str) -> Transaction {
        NewTransaction::new(date(d), 100, Category::Food).into_transaction(id.to_string())
    }

    #[test]
    fn test_select_by_month_preserves_order() {
        let transactions = vec![
            tx("a", "2024-06-15"),
            tx("b", "2024-07-01"),
            tx("c", "2024-06-01"),
            tx("d", "2023-06-10"),
        ];

        let selected = select_by_month(&transactions, date("2024-06-30"));
        let ids: Vec<&str> = selected.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(transactions.len(), 4);
    }

    #[test]
    fn test_select_by_year() {
        let transactions = vec![
            tx("a", "2024-01-01"),
            tx("b", "2023-12-31"),
            tx("c", "2024-12-31"),
        ];

        let selected = select_by_year(&transactions, date("2024-06-01"));
        let ids: Vec<&str> = selected.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_select_empty() {
        assert!(select_by_month(&[], date("2024-06-01")).is_empty());
        assert!(select_by_year(&[tx("a", "2020-01-01")], date("2024-06-01")).is_empty());
    }

    #[test]
    fn test_navigation_wraps_year() {
        let jan: Period = "2024-01".parse().unwrap();
        assert_eq!(jan.previous(), Period::Month { year: 2023, month: 12 });
        assert_eq!(jan.previous().next(), jan);

        let year = Period::Year { year: 2024 };
        assert_eq!(year.next().label(), "2025");
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("2024-06".parse::<Period>(), Ok(Period::Month { year: 2024, month: 6 }));
        assert_eq!("2024-6".parse::<Period>(), Ok(Period::Month { year: 2024, month: 6 }));
        assert_eq!("2024".parse::<Period>(), Ok(Period::Year { year: 2024 }));
        assert!("2024-13".parse::<Period>().is_err());
        assert!("june".parse::<Period>().is_err());
    }

    #[test]
    fn test_parse_period_rejects_signs_and_gaps() {
        let inputs = [
            "+2024",
            "2024-+6",
            "-2024",
            "2024-",
            "-06",
            "2024-06-01",
            " 2024 -06",
        ];
        for input in inputs {
            assert!(input.parse::<Period>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_first_day() {
        let period = Period::month_of(date("2024-02-29"));
        assert_eq!(period.first_day(), Some(date("2024-02-01")));
        assert_eq!(period.label(), "2024-02");
    }
}
