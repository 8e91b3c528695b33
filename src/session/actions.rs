use serde::{Deserialize, Serialize};

use crate::record::ApplicationRecord;
use crate::store::Snapshot;
use crate::submit::SubmissionReceipt;

/// All distinct actions the form session reducer can apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormAction {
    /// Merge a partial update into the record without moving steps.
    PatchRecord { patch: ApplicationRecord },
    /// Validate the current step against `patch` merged into the record,
    /// then advance one step.
    StepSubmitted { patch: ApplicationRecord },
    /// Move one step back. Entered data is kept.
    WentBack,
    /// Validate the final step and enter `Submitting`.
    SubmitStarted { patch: ApplicationRecord },
    /// The submission endpoint accepted the record.
    SubmitSucceeded { receipt: SubmissionReceipt },
    /// The submission endpoint refused or was unreachable; the session
    /// returns to the last step with the record intact.
    SubmitFailed { error: String },
    /// Apply a persisted snapshot verbatim (startup restore).
    Restored { snapshot: Snapshot },
    /// Back to a fresh session.
    Reset,
}

impl FormAction {
    /// Short name for transition-refusal messages.
    pub fn name(&self) -> &'static str {
        match self {
            FormAction::PatchRecord { .. } => "patch_record",
            FormAction::StepSubmitted { .. } => "step_submitted",
            FormAction::WentBack => "went_back",
            FormAction::SubmitStarted { .. } => "submit_started",
            FormAction::SubmitSucceeded { .. } => "submit_succeeded",
            FormAction::SubmitFailed { .. } => "submit_failed",
            FormAction::Restored { .. } => "restored",
            FormAction::Reset => "reset",
        }
    }
}
