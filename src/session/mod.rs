//! Form session state machine.
//!
//! A [`FormSession`] owns the current position in the flow and the
//! accumulated record. All mutation goes through the pure
//! [`reduce`] function with a [`FormAction`] — there is no ambient
//! mutable store.

mod actions;
mod reducer;

pub use actions::FormAction;
pub use reducer::{reduce, reduce_now, SessionError};

use serde::{Deserialize, Serialize};

use crate::fields::Step;
use crate::record::ApplicationRecord;

/// The finite set of states a form session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// Step 0 — personal identity fields.
    Personal,
    /// Step 1 — financial fields.
    Financial,
    /// Step 2 — free-text narrative fields.
    Narrative,
    /// Submission in flight; further submits are refused until it resolves.
    Submitting,
    /// Terminal. The record and step can no longer change.
    Submitted,
}

impl FormState {
    /// The step the user is looking at, if any. While `Submitting` the form
    /// is still on the last step; `Submitted` has left the flow.
    pub fn current_step(self) -> Option<Step> {
        match self {
            FormState::Personal => Some(Step::Personal),
            FormState::Financial => Some(Step::Financial),
            FormState::Narrative | FormState::Submitting => Some(Step::Narrative),
            FormState::Submitted => None,
        }
    }

    /// 0-based step index for snapshots.
    pub fn step_index(self) -> Option<usize> {
        self.current_step().map(Step::index)
    }
}

impl std::fmt::Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormState::Personal => "personal",
            FormState::Financial => "financial",
            FormState::Narrative => "narrative",
            FormState::Submitting => "submitting",
            FormState::Submitted => "submitted",
        };
        write!(f, "{name}")
    }
}

/// The running session: current state plus everything entered so far.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    pub state: FormState,
    pub record: ApplicationRecord,
}

impl FormSession {
    /// A fresh session on the first step with an empty record.
    pub fn new() -> Self {
        Self {
            state: FormState::Personal,
            record: ApplicationRecord::new(),
        }
    }

    /// True once the session reached `Submitted`.
    pub fn is_terminal(&self) -> bool {
        self.state == FormState::Submitted
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}
