use thiserror::Error;

use crate::domain::ValidationError;
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::TransactionNotFound(id),
            other => AppError::Store(other),
        }
    }
}
