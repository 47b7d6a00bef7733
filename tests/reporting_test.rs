mod common;

use anyhow::Result;
use common::{june_transactions, parse_date, test_service, Household};
use kakeibo::application::build_period_report;
use kakeibo::domain::{Category, Period, PeriodTotals, TransactionType};

#[test]
fn test_month_report_from_snapshot() {
    let report = build_period_report(
        Period::Month {
            year: 2024,
            month: 6,
        },
        &june_transactions(),
    );

    assert_eq!(report.period, "2024-06");
    assert_eq!(report.first_day, Some(parse_date("2024-06-01")));
    assert_eq!(report.transaction_count, 3);
    assert_eq!(report.totals, PeriodTotals::new(1000, 500));
    assert!(report.monthly.is_empty());

    assert_eq!(report.daily.len(), 2);
    assert_eq!(report.daily[0].date, parse_date("2024-06-01"));
    assert_eq!((report.daily[0].income, report.daily[0].expense), (1000, 300));
    assert_eq!((report.daily[1].income, report.daily[1].expense), (0, 200));

    let expense = report.categories(TransactionType::Expense);
    assert_eq!(expense.len(), 2);
    assert_eq!(expense[0].category, Category::Food);
    assert!((expense[0].percentage - 60.0).abs() < 0.01);
    assert_eq!(expense[1].category, Category::Transport);

    let income = report.categories(TransactionType::Income);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].total, 1000);
    assert!((income[0].percentage - 100.0).abs() < 0.01);
}

#[test]
fn test_empty_period_report() {
    let report = build_period_report(
        Period::Month {
            year: 2024,
            month: 7,
        },
        &june_transactions(),
    );

    assert!(report.is_empty());
    assert_eq!(report.totals, PeriodTotals::default());
    assert!(report.daily.is_empty());
    assert!(report.income_categories.is_empty());
    assert!(report.expense_categories.is_empty());
}

#[tokio::test]
async fn test_year_report_has_month_rows() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    Household::record_two_months(&mut service).await?;

    let report = service.period_report(Period::Year { year: 2024 });

    assert_eq!(report.period, "2024");
    assert_eq!(report.transaction_count, 6);
    assert_eq!(report.totals, PeriodTotals::new(251000, 84700));
    assert_eq!(report.monthly.len(), 2);
    assert_eq!(report.monthly[0].month, "2024-05");
    assert_eq!(report.monthly[0].totals, PeriodTotals::new(250000, 84200));
    assert_eq!(report.monthly[1].month, "2024-06");
    assert_eq!(report.monthly[1].totals, PeriodTotals::new(1000, 500));

    // Largest expense category first
    assert_eq!(report.expense_categories[0].category, Category::Housing);
    Ok(())
}

#[tokio::test]
async fn test_report_follows_writes() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    Household::record_two_months(&mut service).await?;
    let june = Period::Month {
        year: 2024,
        month: 6,
    };

    let before = service.period_report(june);
    assert_eq!(before.totals.balance, 500);

    let lunch_id = service
        .transactions()
        .iter()
        .find(|t| t.content == "Lunch")
        .map(|t| t.id.clone())
        .unwrap();
    service.delete_transactions(&[lunch_id]).await?;

    let after = service.period_report(june);
    assert_eq!(after.totals, PeriodTotals::new(1000, 200));
    assert_eq!(after.transaction_count, 2);
    Ok(())
}

#[test]
fn test_report_serializes_to_json() {
    let report = build_period_report(Period::Year { year: 2024 }, &june_transactions());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["period"], "2024");
    assert_eq!(json["totals"]["balance"], 500);
    assert_eq!(json["daily"][0]["date"], "2024-06-01");
    assert_eq!(json["monthly"][0]["month"], "2024-06");
    assert_eq!(json["expense_categories"][0]["category"], "food");
}
