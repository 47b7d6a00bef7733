mod common;

use anyhow::Result;
use common::{test_service, Household};
use kakeibo::domain::Category;
use kakeibo::io::{Exporter, ImportOptions, Importer, TransactionSnapshot};

#[tokio::test]
async fn test_export_csv() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    Household::record_two_months(&mut service).await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service).export_csv(&mut buffer)?;
    assert_eq!(count, 6);

    let csv = String::from_utf8(buffer)?;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("id,date,amount,type,category,content"));
    let first = lines.next().unwrap();
    assert!(first.ends_with(",2024-05-25,250000,income,salary,May salary"));
    assert_eq!(lines.count(), 5);
    Ok(())
}

#[tokio::test]
async fn test_export_json_snapshot() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    Household::record_two_months(&mut service).await?;

    let mut buffer = Vec::new();
    Exporter::new(&service).export_json(&mut buffer)?;

    let snapshot: TransactionSnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(snapshot.transactions, service.transactions());
    Ok(())
}

#[tokio::test]
async fn test_csv_export_then_import_into_empty_store() -> Result<()> {
    let (mut source, _temp_a) = test_service().await?;
    Household::record_two_months(&mut source).await?;

    let mut buffer = Vec::new();
    Exporter::new(&source).export_csv(&mut buffer)?;

    let (mut target, _temp_b) = test_service().await?;
    let result = Importer::new(&mut target)
        .import_csv(buffer.as_slice(), ImportOptions::default())
        .await?;

    assert_eq!(result.imported, 6);
    assert!(result.errors.is_empty());

    // Same content, fresh ids
    let strip = |t: &kakeibo::domain::Transaction| {
        (t.date, t.amount, t.kind, t.category, t.content.clone())
    };
    let source_rows: Vec<_> = source.transactions().iter().map(strip).collect();
    let target_rows: Vec<_> = target.transactions().iter().map(strip).collect();
    assert_eq!(source_rows, target_rows);
    assert_ne!(source.transactions()[0].id, target.transactions()[0].id);
    Ok(())
}

#[tokio::test]
async fn test_import_reports_invalid_rows() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let csv = "\
date,amount,type,category,content
2024-06-01,1000,income,salary,ok
2024-06-31,100,expense,food,bad date
2024-06-02,12.5,expense,food,bad amount
2024-06-03,100,expense,salary,mismatch
2024-06-04,100,expense,groceries,unknown category
2024-06-05,\"2,500\",expense,housing,grouped amount
";

    let result = Importer::new(&mut service)
        .import_csv(csv.as_bytes(), ImportOptions::default())
        .await?;

    assert_eq!(result.imported, 2);
    assert_eq!(result.errors.len(), 4);

    let fields: Vec<(usize, Option<&str>)> = result
        .errors
        .iter()
        .map(|e| (e.line, e.field.as_deref()))
        .collect();
    assert_eq!(
        fields,
        vec![
            (3, Some("date")),
            (4, Some("amount")),
            (5, Some("category")),
            (6, Some("category")),
        ]
    );

    let housing = service
        .transactions()
        .iter()
        .find(|t| t.category == Category::Housing)
        .unwrap();
    assert_eq!(housing.amount, 2500);
    Ok(())
}

#[tokio::test]
async fn test_import_dry_run_and_duplicates() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    Household::record_two_months(&mut service).await?;

    let csv = "\
date,amount,type,category,content
2024-05-25,250000,income,salary,May salary
2024-07-01,900,expense,entertainment,Cinema
2024-07-01,900,expense,entertainment,Cinema
";

    let dry = Importer::new(&mut service)
        .import_csv(
            csv.as_bytes(),
            ImportOptions {
                dry_run: true,
                skip_duplicates: true,
            },
        )
        .await?;
    assert_eq!((dry.imported, dry.skipped), (1, 2));
    assert_eq!(service.transactions().len(), 6);

    let real = Importer::new(&mut service)
        .import_csv(
            csv.as_bytes(),
            ImportOptions {
                dry_run: false,
                skip_duplicates: true,
            },
        )
        .await?;
    assert_eq!((real.imported, real.skipped), (1, 2));
    assert_eq!(service.transactions().len(), 7);
    Ok(())
}
