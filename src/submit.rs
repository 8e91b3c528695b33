//! Submission client.
//!
//! One operation: POST the finalized record to the configured endpoint and
//! hand back the server-assigned receipt. Any transport error or non-2xx
//! status maps to a typed [`SubmissionError`]; nothing panics and nothing
//! retries on its own — the session returns to the last step and the user
//! decides.
//!
//! No idempotency key is attached. A retry after a timed-out request that
//! the server actually served can create a second remote record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SubmissionConfig;
use crate::record::ApplicationRecord;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Why a submission attempt failed. Surfaced as a dismissible notification;
/// the record stays intact for retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error("submission request failed: {0}")]
    Transport(String),
    #[error("submission endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("submission response malformed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for SubmissionError {
    fn from(e: reqwest::Error) -> Self {
        SubmissionError::Transport(e.to_string())
    }
}

// ─── Receipt ──────────────────────────────────────────────────────────────────

/// Success acknowledgment from the submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Server-assigned identifier of the created record.
    pub id: u64,
    /// When the submission completed, client-side.
    pub submitted_at: DateTime<Utc>,
}

// ─── Client seam ──────────────────────────────────────────────────────────────

/// The submission seam. The HTTP client below is the production
/// implementation; tests substitute fakes.
#[async_trait]
pub trait SubmissionApi: Send + Sync {
    async fn submit(&self, record: &ApplicationRecord)
        -> Result<SubmissionReceipt, SubmissionError>;
}

// ─── HTTP implementation ──────────────────────────────────────────────────────

/// Wire payload: the whole record travels as one JSON text blob in `body`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitPayload<'a> {
    title: &'a str,
    body: String,
    user_id: u32,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: u64,
}

pub struct HttpSubmissionClient {
    client: reqwest::Client,
    url: String,
}

impl HttpSubmissionClient {
    pub fn new(config: &SubmissionConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.endpoint_url.clone(),
        })
    }
}

#[async_trait]
impl SubmissionApi for HttpSubmissionClient {
    async fn submit(
        &self,
        record: &ApplicationRecord,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let payload = SubmitPayload {
            title: "Form Submission",
            body: serde_json::to_string(record)
                .map_err(|e| SubmissionError::Malformed(e.to_string()))?,
            user_id: 1,
        };

        let resp = self.client.post(&self.url).json(&payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "submission refused");
            return Err(SubmissionError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| SubmissionError::Malformed(e.to_string()))?;
        info!(id = parsed.id, "application submitted");
        Ok(SubmissionReceipt {
            id: parsed.id,
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_the_record_as_one_text_blob() {
        let mut record = ApplicationRecord::new();
        record.set("name", "Sara");
        let payload = SubmitPayload {
            title: "Form Submission",
            body: serde_json::to_string(&record).unwrap(),
            user_id: 1,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "Form Submission");
        assert_eq!(json["userId"], 1);
        // The body is a string, not a nested object.
        let body = json["body"].as_str().unwrap();
        assert!(body.contains("\"name\":\"Sara\""));
    }

    #[test]
    fn receipt_round_trips_camel_case() {
        let receipt = SubmissionReceipt {
            id: 101,
            submitted_at: Utc::now(),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"submittedAt\""));
        let back: SubmissionReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, receipt);
    }
}
