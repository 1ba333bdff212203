use async_trait::async_trait;
use thiserror::Error;

use crate::models::CalculationRecord;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication required: {0}")]
    Unauthorized(String),
}

/// Append-only sink for completed calculations.
///
/// There is no read, update, or delete path: a record is written once and
/// the caller never looks at it again.
#[async_trait]
pub trait CalculationRepository: Send + Sync {
    async fn record_calculation(
        &self,
        record: &CalculationRecord,
    ) -> Result<(), RepositoryError>;
}
