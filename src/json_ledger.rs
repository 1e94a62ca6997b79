use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::ledger::SubmissionLedger;
use crate::models::submission::SubmissionRecord;

/// File-backed ledger: one JSON array, read fully and rewritten wholesale on
/// every mutation. A single in-process mutex serializes every operation,
/// reads included, and rewrites go through a temp file + rename so a reader
/// can never observe a half-written collection. The store is file-local and
/// single-process in the intended deployment, so that closes the
/// lost-update race.
pub struct JsonFileLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Load the collection, recovering leniently: a missing file is an empty
    /// ledger, and an unreadable or unparsable one is logged and treated as
    /// empty rather than failing the request.
    async fn load(&self) -> Vec<SubmissionRecord> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "ledger: no backing file, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ledger: read failed, recovering with empty collection");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ledger: parse failed, recovering with empty collection");
                Vec::new()
            }
        }
    }

    async fn store(&self, records: &[SubmissionRecord]) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "ledger: collection rewritten"
        );
        Ok(())
    }
}

#[async_trait]
impl SubmissionLedger for JsonFileLedger {
    async fn append(&self, record: SubmissionRecord) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await;
        records.push(record);
        self.store(&records).await
    }

    async fn list_all(&self) -> Result<Vec<SubmissionRecord>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await)
    }

    async fn remove_by_identifier(&self, identifier: &str) -> Result<usize, AppError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await;
        let before = records.len();
        let kept: Vec<SubmissionRecord> = records
            .into_iter()
            .filter(|r| r.identifier != identifier)
            .collect();
        let removed = before - kept.len();
        self.store(&kept).await?;
        tracing::debug!(identifier, removed, "ledger: remove_by_identifier complete");
        Ok(removed)
    }

    async fn exists_with_identifier(&self, identifier: &str) -> Result<bool, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await.iter().any(|r| r.identifier == identifier))
    }
}
