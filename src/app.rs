//! Application root.
//!
//! [`FormApp`] owns the session and wires every mutation to the snapshot
//! store: restore at startup, save on every non-terminal change, clear on
//! submit success or reset. It also enforces single-flight submission
//! (through the `Submitting` state) and ties assist generations to the
//! dialog that started them so late results are discarded, not applied.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assist::client::{CompletionApi, HttpCompletionClient};
use crate::assist::{prompt, AssistDialog, AssistRequest, GenerationError};
use crate::config::EngineConfig;
use crate::record::{ApplicationRecord, FieldValue};
use crate::session::{reduce_now, FormAction, FormSession, FormState, SessionError};
use crate::store::SnapshotStore;
use crate::submit::{HttpSubmissionClient, SubmissionApi, SubmissionError, SubmissionReceipt};

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Anything a [`FormApp`] operation can refuse with. Each variant keeps its
/// own taxonomy; none is fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

// ─── Pending generation ───────────────────────────────────────────────────────

/// A generation handed to the completion client. The ticket identifies the
/// dialog that asked; [`FormApp::complete_assist_generation`] checks it
/// before applying the result.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGeneration {
    pub ticket: u64,
    pub request: AssistRequest,
}

// ─── FormApp ──────────────────────────────────────────────────────────────────

pub struct FormApp {
    session: FormSession,
    store: SnapshotStore,
    submission: Arc<dyn SubmissionApi>,
    completion: Arc<dyn CompletionApi>,
    assist: Option<AssistDialog>,
    next_ticket: u64,
}

impl FormApp {
    /// Production wiring: HTTP clients from config, snapshot restore from
    /// the configured data directory.
    pub async fn start(config: &EngineConfig) -> anyhow::Result<Self> {
        let store = SnapshotStore::new(&config.storage.data_dir);
        let submission = Arc::new(HttpSubmissionClient::new(&config.submission)?);
        let completion = Arc::new(HttpCompletionClient::new(&config.completion)?);
        Ok(Self::with_clients(store, submission, completion).await)
    }

    /// Wire an app from parts. Used by tests to substitute fake clients.
    pub async fn with_clients(
        store: SnapshotStore,
        submission: Arc<dyn SubmissionApi>,
        completion: Arc<dyn CompletionApi>,
    ) -> Self {
        let mut session = FormSession::new();
        if let Some(snapshot) = store.load().await {
            let saved_at = snapshot.saved_at;
            match reduce_now(session.clone(), &FormAction::Restored { snapshot }) {
                Ok(restored) => {
                    info!(saved_at = %saved_at, "resumed in-progress application");
                    session = restored;
                }
                Err(e) => warn!(err = %e, "snapshot restore refused — starting fresh"),
            }
        }
        Self {
            session,
            store,
            submission,
            completion,
            assist: None,
            next_ticket: 1,
        }
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn state(&self) -> FormState {
        self.session.state
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.session.record
    }

    /// Apply one action and mirror the result to the snapshot store. The
    /// restore path bypasses this on purpose — the initial restore is the
    /// one mutation that must not trigger a save.
    async fn dispatch(&mut self, action: FormAction) -> Result<(), SessionError> {
        self.session = reduce_now(self.session.clone(), &action)?;
        if self.session.is_terminal() {
            self.store.clear().await;
        } else {
            self.store.save(&self.session).await;
        }
        Ok(())
    }

    // ── Step flow ────────────────────────────────────────────────────────────

    /// Merge a partial update into the record without moving steps.
    pub async fn update_fields(&mut self, patch: ApplicationRecord) -> Result<(), AppError> {
        self.dispatch(FormAction::PatchRecord { patch }).await?;
        Ok(())
    }

    /// Validate the current step against `patch` and advance.
    pub async fn submit_step(&mut self, patch: ApplicationRecord) -> Result<(), AppError> {
        self.dispatch(FormAction::StepSubmitted { patch }).await?;
        Ok(())
    }

    /// One step back; entered data is kept.
    pub async fn go_back(&mut self) -> Result<(), AppError> {
        self.dispatch(FormAction::WentBack).await?;
        Ok(())
    }

    /// Drop all progress: fresh session, no snapshot, no open dialog.
    pub async fn reset(&mut self) {
        self.session = FormSession::new();
        self.assist = None;
        self.store.clear().await;
        info!("application reset");
    }

    // ── Submission ───────────────────────────────────────────────────────────

    /// Validate the final step, enter `Submitting`, and return the record
    /// to send. A second call while one submission is in flight is refused
    /// by the state machine.
    pub async fn begin_submission(
        &mut self,
        patch: ApplicationRecord,
    ) -> Result<ApplicationRecord, AppError> {
        self.dispatch(FormAction::SubmitStarted { patch }).await?;
        Ok(self.session.record.clone())
    }

    /// Resolve the in-flight submission. Success reaches `Submitted` and
    /// deletes the snapshot; failure returns to the last step with the
    /// record intact and hands the error back for display.
    pub async fn complete_submission(
        &mut self,
        outcome: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<SubmissionReceipt, AppError> {
        match outcome {
            Ok(receipt) => {
                self.dispatch(FormAction::SubmitSucceeded {
                    receipt: receipt.clone(),
                })
                .await?;
                Ok(receipt)
            }
            Err(error) => {
                self.dispatch(FormAction::SubmitFailed {
                    error: error.to_string(),
                })
                .await?;
                warn!(err = %error, "submission failed — form kept for retry");
                Err(error.into())
            }
        }
    }

    /// Full submission round-trip: begin, call the client, complete.
    pub async fn submit(
        &mut self,
        patch: ApplicationRecord,
    ) -> Result<SubmissionReceipt, AppError> {
        let record = self.begin_submission(patch).await?;
        let client = Arc::clone(&self.submission);
        let outcome = client.submit(&record).await;
        self.complete_submission(outcome).await
    }

    // ── Assist workflow ──────────────────────────────────────────────────────

    /// Open the assist dialog on one field. The profile context is a fixed
    /// snapshot of the personal fields collected so far.
    pub fn open_assist(&mut self, field: &str) -> &AssistDialog {
        let current = self.session.record.text(field).to_string();
        let profile = prompt::profile_context(&self.session.record, field, &current);
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        debug!(field, ticket, "assist dialog opened");
        self.assist
            .insert(AssistDialog::open(field, current, profile, ticket))
    }

    pub fn assist(&self) -> Option<&AssistDialog> {
        self.assist.as_ref()
    }

    /// Mutable dialog access for prompt edits and merge-mode switches.
    pub fn assist_mut(&mut self) -> Option<&mut AssistDialog> {
        self.assist.as_mut()
    }

    /// Close the dialog without touching the record. Any generation still
    /// in flight becomes stale and will be discarded on completion.
    pub fn close_assist(&mut self) {
        if self.assist.take().is_some() {
            debug!("assist dialog closed");
        }
    }

    /// First half of a generation: validate the instruction and capture
    /// the request plus the dialog ticket. The caller runs the completion
    /// client and reports back through
    /// [`complete_assist_generation`](Self::complete_assist_generation).
    pub fn begin_assist_generation(&self) -> Result<PendingGeneration, AppError> {
        let dialog = self.assist.as_ref().ok_or(GenerationError::NoDialog)?;
        let request = dialog.generation_request()?;
        Ok(PendingGeneration {
            ticket: dialog.ticket(),
            request,
        })
    }

    /// Second half of a generation. Returns `Ok(true)` when the content
    /// was folded into the dialog, `Ok(false)` when the result was stale
    /// (dialog closed or replaced since the request started) and silently
    /// discarded. A failed generation leaves the dialog content intact.
    pub async fn complete_assist_generation(
        &mut self,
        ticket: u64,
        outcome: Result<String, GenerationError>,
    ) -> Result<bool, AppError> {
        let Some(dialog) = self.assist.as_mut().filter(|d| d.ticket() == ticket) else {
            debug!(ticket, "stale generation result discarded");
            return Ok(false);
        };
        match outcome {
            Ok(content) => {
                dialog.apply_generation(&content);
                Ok(true)
            }
            Err(e) => {
                warn!(err = %e, "generation failed — dialog content kept");
                Err(e.into())
            }
        }
    }

    /// Full generation round-trip against the wired completion client.
    pub async fn generate_assist(&mut self) -> Result<(), AppError> {
        let pending = self.begin_assist_generation()?;
        let client = Arc::clone(&self.completion);
        let outcome = client.generate(&pending.request).await;
        self.complete_assist_generation(pending.ticket, outcome)
            .await?;
        Ok(())
    }

    /// Copy the (possibly hand-edited) prompt into the target field and
    /// close the dialog. Refused with the dialog left open when the prompt
    /// is empty.
    pub async fn confirm_assist(&mut self) -> Result<(), AppError> {
        let Some(dialog) = self.assist.take() else {
            return Err(GenerationError::NoDialog.into());
        };
        if let Err(e) = dialog.confirmable() {
            self.assist = Some(dialog);
            return Err(e.into());
        }
        let (field, text) = dialog.into_confirmed();
        debug!(field = %field, "assist content confirmed into record");
        let mut patch = ApplicationRecord::new();
        patch.set(field, FieldValue::Text(text));
        self.update_fields(patch).await
    }
}
