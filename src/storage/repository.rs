use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Category, NewTransaction, Transaction, TransactionType};

use super::{StoreError, MIGRATION_001_INITIAL};

type StoreResult<T> = Result<T, StoreError>;

const SELECT_COLUMNS: &str = "SELECT id, date, amount, type, category, content FROM transactions";

/// Repository for persisting and querying transactions.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        tracing::debug!(database_url, "connecting to store");
        let pool = SqlitePool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> StoreResult<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Store a new transaction. The store assigns the id.
    pub async fn create_transaction(&self, new: &NewTransaction) -> StoreResult<Transaction> {
        let transaction = new.clone().into_transaction(Uuid::new_v4().to_string());

        sqlx::query(
            r#"
            INSERT INTO transactions (id, date, amount, type, category, content, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(transaction.date.format("%Y-%m-%d").to_string())
        .bind(transaction.amount)
        .bind(transaction.kind.as_str())
        .bind(transaction.category.as_str())
        .bind(&transaction.content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %transaction.id, "inserted transaction");
        Ok(transaction)
    }

    /// List all transactions ordered by date, then insertion order.
    pub async fn list_transactions(&self) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY date, rowid"))
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "loaded transactions");
        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Get a transaction by id.
    pub async fn get_transaction(&self, id: &str) -> StoreResult<Transaction> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_transaction(&row),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// Overwrite every field of an existing transaction.
    pub async fn update_transaction(&self, transaction: &Transaction) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET date = ?, amount = ?, type = ?, category = ?, content = ?
            WHERE id = ?
            "#,
        )
        .bind(transaction.date.format("%Y-%m-%d").to_string())
        .bind(transaction.amount)
        .bind(transaction.kind.as_str())
        .bind(transaction.category.as_str())
        .bind(&transaction.content)
        .bind(&transaction.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(transaction.id.clone()));
        }
        tracing::debug!(id = %transaction.id, "updated transaction");
        Ok(())
    }

    /// Delete a transaction by id.
    pub async fn delete_transaction(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tracing::debug!(id, "deleted transaction");
        Ok(())
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Transaction> {
        let id: String = row.try_get("id")?;
        let date_str: String = row.try_get("date")?;
        let kind_str: String = row.try_get("type")?;
        let category_str: String = row.try_get("category")?;

        let corrupt = |what: String| StoreError::Corrupt(format!("transaction {}: {}", id, what));

        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|_| corrupt(format!("invalid date '{}'", date_str)))?;
        let kind: TransactionType = kind_str.parse().map_err(|e| corrupt(format!("{}", e)))?;
        let category: Category = category_str
            .parse()
            .map_err(|e| corrupt(format!("{}", e)))?;

        let transaction = Transaction {
            id: id.clone(),
            date,
            amount: row.try_get("amount")?,
            kind,
            category,
            content: row.try_get("content")?,
        };
        transaction
            .validate()
            .map_err(|e| corrupt(e.to_string()))?;

        Ok(transaction)
    }
}
