use async_trait::async_trait;

use crate::error::AppError;
use crate::models::submission::SubmissionRecord;

/// Append-only audit store for verification attempts. Implementations own
/// whatever locking the backing medium needs; handlers only see the trait.
#[async_trait]
pub trait SubmissionLedger: Send + Sync {
    /// Append one record. A missing backing store counts as an empty
    /// collection; only a failed write is an error.
    async fn append(&self, record: SubmissionRecord) -> Result<(), AppError>;

    /// Full collection in insertion order. Missing store yields empty.
    async fn list_all(&self) -> Result<Vec<SubmissionRecord>, AppError>;

    /// Remove every record with the given identifier, returning how many
    /// were removed. Idempotent: a second call returns 0.
    async fn remove_by_identifier(&self, identifier: &str) -> Result<usize, AppError>;

    /// Duplicate-submission guard.
    async fn exists_with_identifier(&self, identifier: &str) -> Result<bool, AppError>;
}
