use chrono::{NaiveDate, Utc};
use thiserror::Error;

use super::{FormAction, FormSession, FormState};
use crate::fields::Step;
use crate::validation::{check_step, FieldViolation};

/// Why the reducer refused an action. The session is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("invalid transition: {action} from {state}")]
    InvalidTransition {
        action: &'static str,
        state: FormState,
    },
    #[error("step {step} has {} invalid field(s)", violations.len())]
    StepInvalid {
        step: Step,
        violations: Vec<FieldViolation>,
    },
}

/// Pure transition function: apply one action to the session and return
/// the new session. Deterministic — `today` is passed in so date rules do
/// not read the clock.
///
/// Refused actions return an error and imply no state change; callers keep
/// their session as-is and surface the error.
pub fn reduce(
    mut session: FormSession,
    action: &FormAction,
    today: NaiveDate,
) -> Result<FormSession, SessionError> {
    let refused = |state: FormState| SessionError::InvalidTransition {
        action: action.name(),
        state,
    };

    match action {
        // ── Record patch ─────────────────────────────────────────────────────
        // Allowed in every state except the terminal one.
        FormAction::PatchRecord { patch } => {
            if session.state == FormState::Submitted {
                return Err(refused(session.state));
            }
            session.record.merge(patch.clone());
        }

        // ── Forward one step ─────────────────────────────────────────────────
        FormAction::StepSubmitted { patch } => {
            let step = match session.state {
                FormState::Personal => Step::Personal,
                FormState::Financial => Step::Financial,
                // The last step advances via SubmitStarted, never here.
                _ => return Err(refused(session.state)),
            };
            let merged = session.record.merged(patch);
            let violations = check_step(step, &merged, today);
            if !violations.is_empty() {
                return Err(SessionError::StepInvalid { step, violations });
            }
            session.record = merged;
            session.state = match step {
                Step::Personal => FormState::Financial,
                _ => FormState::Narrative,
            };
        }

        // ── Back one step ────────────────────────────────────────────────────
        // Never discards entered data.
        FormAction::WentBack => {
            session.state = match session.state {
                FormState::Financial => FormState::Personal,
                FormState::Narrative => FormState::Financial,
                _ => return Err(refused(session.state)),
            };
        }

        // ── Submission lifecycle ─────────────────────────────────────────────
        FormAction::SubmitStarted { patch } => {
            if session.state != FormState::Narrative {
                return Err(refused(session.state));
            }
            let merged = session.record.merged(patch);
            let violations = check_step(Step::Narrative, &merged, today);
            if !violations.is_empty() {
                return Err(SessionError::StepInvalid {
                    step: Step::Narrative,
                    violations,
                });
            }
            session.record = merged;
            session.state = FormState::Submitting;
        }
        FormAction::SubmitSucceeded { .. } => {
            if session.state != FormState::Submitting {
                return Err(refused(session.state));
            }
            session.state = FormState::Submitted;
        }
        FormAction::SubmitFailed { .. } => {
            if session.state != FormState::Submitting {
                return Err(refused(session.state));
            }
            session.state = FormState::Narrative;
        }

        // ── Restore / reset ──────────────────────────────────────────────────
        FormAction::Restored { snapshot } => {
            // The snapshot is trusted verbatim: step index and record are
            // applied without re-validating earlier steps under current
            // rules.
            let step = match session.state {
                FormState::Submitting | FormState::Submitted => {
                    return Err(refused(session.state))
                }
                _ => Step::from_index(snapshot.current_step).unwrap_or(Step::Personal),
            };
            session.state = match step {
                Step::Personal => FormState::Personal,
                Step::Financial => FormState::Financial,
                Step::Narrative => FormState::Narrative,
            };
            session.record = snapshot.record.clone();
        }
        FormAction::Reset => {
            session = FormSession::new();
        }
    }

    Ok(session)
}

/// [`reduce`] as of the current date.
pub fn reduce_now(
    session: FormSession,
    action: &FormAction,
) -> Result<FormSession, SessionError> {
    reduce(session, action, Utc::now().date_naive())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
