use thiserror::Error;

/// Typed failure of a store operation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded into a valid transaction.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

// SQLite primary result codes, see https://www.sqlite.org/rescode.html
const SQLITE_PERM: i32 = 3;
const SQLITE_READONLY: i32 = 8;
const SQLITE_AUTH: i32 = 23;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            sqlx::Error::Io(ref io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
                StoreError::PermissionDenied(err.to_string())
            }
            sqlx::Error::Database(ref db) => {
                // Extended codes keep the primary code in the low byte
                let primary = db
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| code & 0xff);
                match primary {
                    Some(SQLITE_PERM | SQLITE_READONLY | SQLITE_AUTH) => {
                        StoreError::PermissionDenied(db.message().to_string())
                    }
                    _ => StoreError::Unavailable(db.message().to_string()),
                }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Corrupt(err.to_string())
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}
