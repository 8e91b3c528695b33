// SPDX-License-Identifier: MIT
// AI writing assistant — dialog workflow for long-answer fields.

//! Assist dialog workflow.
//!
//! The dialog opens on one narrative field, seeds its editable prompt with
//! the field's current value, and lets the user generate AI content into
//! the prompt under a replace-or-append policy. Nothing touches the record
//! until the user explicitly confirms; closing the dialog discards
//! everything, including generations that resolve late.

pub mod client;
pub mod prompt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Why a generation or merge step was refused. All variants are surfaced
/// inside the dialog; the underlying field is never affected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The user asked to generate with an empty prompt box.
    #[error("describe what to write before generating")]
    EmptyInstruction,
    /// The user confirmed an empty prompt; there is nothing to copy into
    /// the field.
    #[error("there is no content to apply")]
    EmptyPrompt,
    /// There is no dialog open to act on.
    #[error("no assist dialog is open")]
    NoDialog,
    #[error("no completion API key is configured")]
    MissingApiKey,
    #[error("completion request failed: {0}")]
    Transport(String),
    #[error("completion endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("completion response carried no choices")]
    NoChoices,
}

// ─── Merge mode ───────────────────────────────────────────────────────────────

/// How generated content combines with the field's existing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Generated content replaces the prompt outright.
    Replace,
    /// Generated content is appended after the field's original value,
    /// separated by a blank line.
    Append,
}

// ─── Generation request ───────────────────────────────────────────────────────

/// Everything the completion client needs for one generation. Scoped to a
/// single dialog interaction and discarded with it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistRequest {
    /// The field the user is writing.
    pub field_name: String,
    /// The instruction text — the current contents of the prompt box.
    pub instruction: String,
    /// The field's value when the dialog opened; may be empty.
    pub current_value: String,
    /// JSON snapshot of already-collected personal fields.
    pub profile: String,
    /// Whether the profile snapshot should inform the generation.
    pub use_personal_data: bool,
}

// ─── Dialog ───────────────────────────────────────────────────────────────────

/// One open assist dialog. Created by [`crate::app::FormApp::open_assist`];
/// the ticket ties in-flight generations to this specific dialog instance
/// so results landing after close are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistDialog {
    field: String,
    original_value: String,
    profile: String,
    prompt: String,
    mode: MergeMode,
    ticket: u64,
}

impl AssistDialog {
    pub(crate) fn open(
        field: impl Into<String>,
        current_value: impl Into<String>,
        profile: String,
        ticket: u64,
    ) -> Self {
        let field = field.into();
        let current_value = current_value.into();
        // Non-empty fields default to Append so a generation extends what
        // the user already wrote; empty fields start from scratch.
        let mode = if current_value.trim().is_empty() {
            MergeMode::Replace
        } else {
            MergeMode::Append
        };
        Self {
            field,
            // The prompt box starts as the field's current value so the
            // user edits in place rather than from a blank box.
            prompt: current_value.clone(),
            original_value: current_value,
            profile,
            mode,
            ticket,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// The user edited the prompt box.
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    /// The user switched between replace and append.
    pub fn set_mode(&mut self, mode: MergeMode) {
        self.mode = mode;
    }

    /// Build the request for one generation from the dialog's current
    /// contents. Refused while the prompt box is empty.
    pub fn generation_request(&self) -> Result<AssistRequest, GenerationError> {
        let instruction = self.prompt.trim();
        if instruction.is_empty() {
            return Err(GenerationError::EmptyInstruction);
        }
        Ok(AssistRequest {
            field_name: self.field.clone(),
            instruction: instruction.to_string(),
            current_value: self.original_value.clone(),
            profile: self.profile.clone(),
            use_personal_data: true,
        })
    }

    /// Fold generated content into the prompt box. Under `Append` with a
    /// non-empty original value the result is
    /// `"{original}\n\n{generated}"`; every other combination replaces the
    /// prompt outright. The record is untouched either way.
    pub fn apply_generation(&mut self, generated: &str) {
        if self.mode == MergeMode::Append && !self.original_value.trim().is_empty() {
            self.prompt = format!("{}\n\n{}", self.original_value, generated);
        } else {
            self.prompt = generated.to_string();
        }
    }

    /// Check that confirming would carry content into the field.
    pub fn confirmable(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        Ok(())
    }

    /// Consume the dialog, yielding `(field, text)` for the record update.
    pub(crate) fn into_confirmed(self) -> (String, String) {
        (self.field, self.prompt)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog(current: &str) -> AssistDialog {
        AssistDialog::open("reasonForApplying", current, "{}".to_string(), 1)
    }

    #[test]
    fn empty_field_defaults_to_replace() {
        assert_eq!(dialog("").mode(), MergeMode::Replace);
        assert_eq!(dialog("   ").mode(), MergeMode::Replace);
    }

    #[test]
    fn populated_field_defaults_to_append() {
        assert_eq!(dialog("existing text").mode(), MergeMode::Append);
    }

    #[test]
    fn prompt_is_seeded_with_the_current_value() {
        assert_eq!(dialog("existing text").prompt(), "existing text");
        assert_eq!(dialog("").prompt(), "");
    }

    #[test]
    fn append_joins_with_a_blank_line() {
        let mut d = dialog("existing text");
        d.apply_generation("new text");
        assert_eq!(d.prompt(), "existing text\n\nnew text");
    }

    #[test]
    fn append_onto_empty_original_replaces() {
        let mut d = dialog("");
        d.set_mode(MergeMode::Append);
        d.apply_generation("new text");
        assert_eq!(d.prompt(), "new text");
    }

    #[test]
    fn replace_discards_prior_prompt() {
        let mut d = dialog("existing text");
        d.set_mode(MergeMode::Replace);
        d.apply_generation("new text");
        assert_eq!(d.prompt(), "new text");
    }

    #[test]
    fn append_uses_the_original_value_not_the_edited_prompt() {
        let mut d = dialog("original");
        d.set_prompt("the user rewrote this as an instruction");
        d.apply_generation("generated");
        assert_eq!(d.prompt(), "original\n\ngenerated");
    }

    #[test]
    fn empty_instruction_blocks_generation() {
        let mut d = dialog("existing");
        d.set_prompt("   ");
        assert_eq!(
            d.generation_request().unwrap_err(),
            GenerationError::EmptyInstruction
        );
    }

    #[test]
    fn generation_request_carries_dialog_context() {
        let mut d = dialog("existing text");
        d.set_prompt("make it more formal");
        let req = d.generation_request().unwrap();
        assert_eq!(req.field_name, "reasonForApplying");
        assert_eq!(req.instruction, "make it more formal");
        assert_eq!(req.current_value, "existing text");
        assert!(req.use_personal_data);
    }

    #[test]
    fn empty_prompt_blocks_confirmation() {
        let mut d = dialog("");
        d.set_prompt("");
        assert_eq!(d.confirmable().unwrap_err(), GenerationError::EmptyPrompt);
        d.set_prompt("final answer");
        assert!(d.confirmable().is_ok());
    }
}
