use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verifier::VerificationOutcome;

/// How a submission was made: free pairing, or a paid token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Free,
    Paid,
}

/// One audit entry in the ledger. Created once per /verify call, appended,
/// never mutated; only the admin bulk-remove deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub identifier: String,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_digest: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn free(identifier: String) -> Self {
        Self {
            identifier,
            mode: Mode::Free,
            amount: None,
            token: None,
            token_digest: None,
            verified: true,
            failure_reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn paid(
        identifier: String,
        token: String,
        token_digest: String,
        outcome: &VerificationOutcome,
    ) -> Self {
        Self {
            identifier,
            mode: Mode::Paid,
            amount: Some(outcome.amount),
            token: Some(token),
            token_digest: Some(token_digest),
            verified: outcome.ok,
            failure_reason: outcome.reason.clone(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub phone_number: String,
    /// Claimed amount as a stringified integer; required unless `free`.
    pub value: Option<String>,
    /// Base64 token; required unless `free`.
    pub hash: Option<String>,
    #[serde(default)]
    pub free: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionsResponse {
    pub count: usize,
    pub data: Vec<SubmissionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemoveRequest {
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: usize,
}
