// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use kakeibo::application::TransactionService;
use kakeibo::domain::{Amount, Category, NewTransaction, Transaction};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(TransactionService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = TransactionService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Build an in-memory transaction without going through a store
pub fn transaction(id: &str, date: &str, amount: Amount, category: Category) -> Transaction {
    NewTransaction::new(parse_date(date), amount, category).into_transaction(id.to_string())
}

/// The three-record June 2024 set used throughout the aggregation tests
pub fn june_transactions() -> Vec<Transaction> {
    vec![
        transaction("t1", "2024-06-01", 1000, Category::Salary),
        transaction("t2", "2024-06-01", 300, Category::Food),
        transaction("t3", "2024-06-15", 200, Category::Transport),
    ]
}

/// Test fixture: a household with two months of activity
pub struct Household;

impl Household {
    /// Record salary, rent and groceries for May and June 2024
    pub async fn record_two_months(service: &mut TransactionService) -> Result<()> {
        let entries = [
            ("2024-05-25", 250000, Category::Salary, "May salary"),
            ("2024-05-27", 80000, Category::Housing, "Rent"),
            ("2024-05-28", 4200, Category::Food, "Supermarket"),
            ("2024-06-01", 1000, Category::Salary, "Bonus"),
            ("2024-06-01", 300, Category::Food, "Lunch"),
            ("2024-06-15", 200, Category::Transport, "Bus"),
        ];

        for (date, amount, category, content) in entries {
            service
                .add_transaction(
                    NewTransaction::new(parse_date(date), amount, category).with_content(content),
                )
                .await?;
        }
        Ok(())
    }
}
