//! Shared fakes and fixtures for the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use benefit_intake::{
    ApplicationRecord, AssistRequest, CompletionApi, FieldValue, FormApp, GenerationError,
    SnapshotStore, SubmissionApi, SubmissionError, SubmissionReceipt,
};

// ─── Fake clients ─────────────────────────────────────────────────────────────

/// Submission fake: fails the first `fail_remaining` calls with HTTP 503,
/// then succeeds with a fixed receipt.
pub struct FakeSubmission {
    pub calls: AtomicUsize,
    fail_remaining: AtomicUsize,
}

impl FakeSubmission {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_remaining: AtomicUsize::new(0),
        })
    }

    pub fn failing_first(n: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_remaining: AtomicUsize::new(n),
        })
    }
}

#[async_trait]
impl SubmissionApi for FakeSubmission {
    async fn submit(
        &self,
        _record: &ApplicationRecord,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(SubmissionError::Status { status: 503 });
        }
        Ok(SubmissionReceipt {
            id: 101,
            submitted_at: Utc::now(),
        })
    }
}

/// Completion fake answering every request with a fixed reply.
pub struct FakeCompletion {
    pub calls: AtomicUsize,
    pub reply: String,
}

impl FakeCompletion {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: reply.to_string(),
        })
    }
}

#[async_trait]
impl CompletionApi for FakeCompletion {
    async fn generate(&self, _request: &AssistRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

pub const NARRATIVE: &str = "I have been supporting my family on a single income since January, \
    and our rent increased by a large amount this year.";

pub fn personal_patch() -> ApplicationRecord {
    let mut p = ApplicationRecord::new();
    p.set("name", "Sara Haddad");
    p.set("nationalId", "784-1990-1234567");
    p.set("dateOfBirth", "1990-03-20");
    p.set("gender", "female");
    p.set("address", "Villa 12, Al Wasl Road");
    p.set("city", "Dubai");
    p.set("state", "Dubai");
    p.set("country", "United Arab Emirates");
    p.set("phone", "+971501234567");
    p.set("email", "sara@example.com");
    p
}

pub fn financial_patch() -> ApplicationRecord {
    let mut p = ApplicationRecord::new();
    p.set("maritalStatus", "married");
    p.set("dependents", FieldValue::Number(2.0));
    p.set("employmentStatus", "unemployed");
    p.set("monthlyIncome", FieldValue::Number(3_000.0));
    p.set("housingStatus", "rent");
    p
}

pub fn narrative_patch() -> ApplicationRecord {
    let mut p = ApplicationRecord::new();
    p.set("currentFinancialSituation", NARRATIVE);
    p.set("employmentCircumstances", NARRATIVE);
    p.set("reasonForApplying", NARRATIVE);
    p
}

/// An app over a temp-dir store and the given fakes.
pub async fn app_in(
    dir: &std::path::Path,
    submission: Arc<FakeSubmission>,
    completion: Arc<FakeCompletion>,
) -> FormApp {
    FormApp::with_clients(SnapshotStore::new(dir), submission, completion).await
}

/// An app already advanced to the narrative step.
pub async fn app_at_narrative(
    dir: &std::path::Path,
    submission: Arc<FakeSubmission>,
    completion: Arc<FakeCompletion>,
) -> FormApp {
    let mut app = app_in(dir, submission, completion).await;
    app.submit_step(personal_patch()).await.expect("personal step");
    app.submit_step(financial_patch()).await.expect("financial step");
    app
}
