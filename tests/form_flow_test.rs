//! End-to-end form flow: step gates, persistence lifecycle, submission.

mod common;

use std::sync::atomic::Ordering;

use benefit_intake::{AppError, FormState, SessionError, SnapshotStore, Violation};
use common::*;

#[tokio::test]
async fn full_flow_reaches_submitted_and_clears_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let submission = FakeSubmission::accepting();
    let mut app = app_at_narrative(dir.path(), submission.clone(), FakeCompletion::replying("")).await;

    let receipt = app.submit(narrative_patch()).await.expect("submission succeeds");
    assert_eq!(receipt.id, 101);
    assert_eq!(app.state(), FormState::Submitted);
    assert_eq!(submission.calls.load(Ordering::SeqCst), 1);

    // The snapshot is gone: a later load finds nothing.
    assert!(SnapshotStore::new(dir.path()).load().await.is_none());
}

#[tokio::test]
async fn invalid_step_is_refused_and_nothing_advances() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_in(dir.path(), FakeSubmission::accepting(), FakeCompletion::replying("")).await;

    let mut patch = personal_patch();
    patch.set("dateOfBirth", "2099-01-01");
    let err = app.submit_step(patch).await.unwrap_err();
    match err {
        AppError::Session(SessionError::StepInvalid { violations, .. }) => {
            assert!(violations
                .iter()
                .any(|v| v.field == "dateOfBirth" && v.violation == Violation::FutureDate));
        }
        other => panic!("expected StepInvalid, got {other:?}"),
    }
    assert_eq!(app.state(), FormState::Personal);
    // The refused mutation was never persisted either.
    assert!(SnapshotStore::new(dir.path()).load().await.is_none());
}

#[tokio::test]
async fn failed_submission_keeps_data_and_allows_retry() {
    let dir = tempfile::tempdir().unwrap();
    let submission = FakeSubmission::failing_first(1);
    let mut app = app_at_narrative(dir.path(), submission.clone(), FakeCompletion::replying("")).await;

    let err = app.submit(narrative_patch()).await.unwrap_err();
    assert!(matches!(err, AppError::Submission(_)));
    assert_eq!(app.state(), FormState::Narrative);
    assert_eq!(app.record().text("name"), "Sara Haddad");
    assert!(!app.record().text("reasonForApplying").is_empty());
    // Progress is still on disk for a reload.
    assert!(SnapshotStore::new(dir.path()).load().await.is_some());

    // Retry with no new input succeeds.
    app.submit(Default::default()).await.expect("retry succeeds");
    assert_eq!(app.state(), FormState::Submitted);
    assert_eq!(submission.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn second_submission_while_in_flight_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_at_narrative(dir.path(), FakeSubmission::accepting(), FakeCompletion::replying("")).await;

    app.begin_submission(narrative_patch()).await.expect("first begin");
    let err = app.begin_submission(Default::default()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Session(SessionError::InvalidTransition { .. })
    ));

    // The original submission still resolves normally.
    let receipt = benefit_intake::SubmissionReceipt {
        id: 7,
        submitted_at: chrono::Utc::now(),
    };
    app.complete_submission(Ok(receipt)).await.expect("resolve");
    assert_eq!(app.state(), FormState::Submitted);
}

#[tokio::test]
async fn restart_resumes_step_and_record_from_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut app =
            app_in(dir.path(), FakeSubmission::accepting(), FakeCompletion::replying("")).await;
        app.submit_step(personal_patch()).await.unwrap();
    }

    // New process, same data dir.
    let app = app_in(dir.path(), FakeSubmission::accepting(), FakeCompletion::replying("")).await;
    assert_eq!(app.state(), FormState::Financial);
    assert_eq!(app.record().text("name"), "Sara Haddad");
}

#[tokio::test]
async fn back_and_forth_preserves_entered_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_at_narrative(dir.path(), FakeSubmission::accepting(), FakeCompletion::replying("")).await;

    app.go_back().await.unwrap();
    assert_eq!(app.state(), FormState::Financial);
    assert_eq!(app.record().text("email"), "sara@example.com");

    // Forward again without retyping — the record already validates.
    app.submit_step(Default::default()).await.unwrap();
    assert_eq!(app.state(), FormState::Narrative);
}

#[tokio::test]
async fn reset_drops_progress_and_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_at_narrative(dir.path(), FakeSubmission::accepting(), FakeCompletion::replying("")).await;

    app.reset().await;
    assert_eq!(app.state(), FormState::Personal);
    assert!(app.record().is_empty());
    assert!(SnapshotStore::new(dir.path()).load().await.is_none());
}

#[tokio::test]
async fn update_fields_autosaves_between_steps() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_in(dir.path(), FakeSubmission::accepting(), FakeCompletion::replying("")).await;

    let mut patch = benefit_intake::ApplicationRecord::new();
    patch.set("name", "Draft Name");
    app.update_fields(patch).await.unwrap();

    let snapshot = SnapshotStore::new(dir.path()).load().await.expect("saved");
    assert_eq!(snapshot.current_step, 0);
    assert_eq!(snapshot.record.text("name"), "Draft Name");
}
