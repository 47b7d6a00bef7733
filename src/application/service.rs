use chrono::NaiveDate;

use crate::domain::{
    select_by_month, select_by_year, NewTransaction, Period, Transaction, TransactionId,
    TransactionPatch, ValidationError,
};
use crate::storage::Repository;

use super::{build_period_report, AppError, PeriodReport};

/// Application service providing high-level operations over the household
/// ledger. It owns the in-memory transaction cache: the cache is loaded from
/// the store once and kept in step with every successful write, so reports
/// never go back to the store.
pub struct TransactionService {
    repo: Repository,
    transactions: Vec<Transaction>,
}

impl TransactionService {
    /// Create a service over `repo` and load its transactions.
    pub async fn new(repo: Repository) -> Result<Self, AppError> {
        let mut service = Self {
            repo,
            transactions: Vec::new(),
        };
        service.reload().await?;
        Ok(service)
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Self::new(repo).await
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Self::new(repo).await
    }

    /// Replace the cache with the store's current contents.
    pub async fn reload(&mut self) -> Result<(), AppError> {
        self.transactions = self.repo.list_transactions().await?;
        tracing::debug!(count = self.transactions.len(), "transaction cache loaded");
        Ok(())
    }

    /// Current snapshot of all transactions.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get_transaction(&self, id: &str) -> Result<&Transaction, AppError> {
        self.transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    // ========================
    // Writes
    // ========================

    /// Validate and record a new transaction.
    pub async fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction, AppError> {
        new.validate()?;

        let transaction = self.repo.create_transaction(&new).await?;
        self.transactions.push(transaction.clone());

        tracing::info!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount = transaction.amount,
            "recorded transaction"
        );
        Ok(transaction)
    }

    /// Apply a partial update to a stored transaction.
    pub async fn update_transaction(
        &mut self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Transaction, AppError> {
        if patch.is_empty() {
            return Err(ValidationError::EmptyPatch.into());
        }

        let updated = self.get_transaction(id)?.merge(&patch);
        updated.validate()?;

        self.repo.update_transaction(&updated).await?;
        if let Some(slot) = self.transactions.iter_mut().find(|t| t.id == id) {
            *slot = updated.clone();
        }

        tracing::info!(id, "updated transaction");
        Ok(updated)
    }

    /// Delete one or more transactions. Stops at the first id the store
    /// rejects; ids deleted before that stay deleted.
    pub async fn delete_transactions(&mut self, ids: &[TransactionId]) -> Result<usize, AppError> {
        let mut deleted = 0;

        for id in ids {
            self.repo.delete_transaction(id).await?;
            self.transactions.retain(|t| t.id != *id);
            deleted += 1;
        }

        tracing::info!(deleted, "deleted transactions");
        Ok(deleted)
    }

    // ========================
    // Views
    // ========================

    pub fn monthly_transactions(&self, anchor: NaiveDate) -> Vec<Transaction> {
        select_by_month(&self.transactions, anchor)
    }

    pub fn yearly_transactions(&self, anchor: NaiveDate) -> Vec<Transaction> {
        select_by_year(&self.transactions, anchor)
    }

    pub fn period_report(&self, period: Period) -> PeriodReport {
        build_period_report(period, &self.transactions)
    }
}
