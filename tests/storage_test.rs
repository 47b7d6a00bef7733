mod common;

use anyhow::Result;
use common::parse_date;
use kakeibo::domain::{Category, NewTransaction};
use kakeibo::storage::{Repository, StoreError};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool() -> Result<(SqlitePool, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("store.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;
    Ok((pool, temp_dir))
}

#[tokio::test]
async fn test_get_transaction_round_trips_fields() -> Result<()> {
    let (pool, _temp) = test_pool().await?;
    let repo = Repository::new(pool);
    repo.migrate().await?;

    let created = repo
        .create_transaction(
            &NewTransaction::new(parse_date("2024-02-29"), 4200, Category::DailyGoods)
                .with_content("Detergent"),
        )
        .await?;

    let fetched = repo.get_transaction(&created.id).await?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn test_missing_id_is_not_found() -> Result<()> {
    let (pool, _temp) = test_pool().await?;
    let repo = Repository::new(pool);
    repo.migrate().await?;

    assert!(matches!(
        repo.get_transaction("nope").await,
        Err(StoreError::NotFound(id)) if id == "nope"
    ));
    assert!(matches!(
        repo.delete_transaction("nope").await,
        Err(StoreError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_undecodable_rows_are_corrupt() -> Result<()> {
    let (pool, _temp) = test_pool().await?;
    let repo = Repository::new(pool.clone());
    repo.migrate().await?;

    // Expense type with an income category
    sqlx::query(
        "INSERT INTO transactions (id, date, amount, type, category, content, created_at)
         VALUES ('bad-1', '2024-06-01', 100, 'expense', 'salary', '', '2024-06-01T00:00:00Z')",
    )
    .execute(&pool)
    .await?;

    assert!(matches!(
        repo.get_transaction("bad-1").await,
        Err(StoreError::Corrupt(_))
    ));
    assert!(matches!(
        repo.list_transactions().await,
        Err(StoreError::Corrupt(_))
    ));

    sqlx::query("DELETE FROM transactions").execute(&pool).await?;
    sqlx::query(
        "INSERT INTO transactions (id, date, amount, type, category, content, created_at)
         VALUES ('bad-2', '2024-13-40', 100, 'expense', 'food', '', '2024-06-01T00:00:00Z')",
    )
    .execute(&pool)
    .await?;

    assert!(matches!(
        repo.get_transaction("bad-2").await,
        Err(StoreError::Corrupt(msg)) if msg.contains("2024-13-40")
    ));
    Ok(())
}
