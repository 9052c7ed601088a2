//! Database error types
//!
//! This module defines the error types that can occur during database
//! operations and classifies SQLx errors by PostgreSQL SQLSTATE so callers
//! can tell lock contention apart from connection loss or bad data.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A lock could not be acquired within `lock_timeout`, or the statement was cancelled
    #[error("Lock timeout: {0}")]
    LockTimeout(String),

    /// The transaction was chosen as a deadlock victim
    #[error("Deadlock detected: {0}")]
    Deadlock(String),

    /// Serializable isolation conflict
    #[error("Serialization failure: {0}")]
    SerializationFailure(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value does not fit the domain type
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Order", "ORD-123");
    /// assert!(error.to_string().contains("Order"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }

    /// Checks if this error comes from competing transactions
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            DatabaseError::LockTimeout(_)
                | DatabaseError::Deadlock(_)
                | DatabaseError::SerializationFailure(_)
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// Database errors are mapped by PostgreSQL error code
/// (https://www.postgresql.org/docs/current/errcodes-appendix.html).
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::SerializationError(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(message),
                    Some("23514") => DatabaseError::ConstraintViolation(message),
                    Some("40001") => DatabaseError::SerializationFailure(message),
                    Some("40P01") => DatabaseError::Deadlock(message),
                    Some("55P03") | Some("57014") => DatabaseError::LockTimeout(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::ConnectionFailed(message) => PortError::Connection {
                message,
                source: None,
            },
            DatabaseError::PoolExhausted => PortError::connection("Connection pool exhausted"),
            DatabaseError::LockTimeout(message) => PortError::Timeout {
                operation: message,
                duration_ms: 0,
            },
            DatabaseError::Deadlock(message) | DatabaseError::SerializationFailure(message) => {
                PortError::contention(message)
            }
            DatabaseError::DuplicateEntry(message) => PortError::Conflict { message },
            DatabaseError::SerializationError(message) => PortError::transformation(message),
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
