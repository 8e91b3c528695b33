// SPDX-License-Identifier: MIT
// AI writing assistant — prompt composition.

//! Prompt composition for the completion endpoint.
//!
//! The system preamble pins tone and person; the user message carries the
//! field name, the personal-data snapshot, the field's current content,
//! and the instruction, in that order.

use crate::assist::AssistRequest;
use crate::record::ApplicationRecord;

/// System role preamble sent with every generation.
pub const SYSTEM_PROMPT: &str = "You are a helpful writing assistant for form completion. \
    Always write in first-person (\"I\"). Generate professional, clear, and concise content \
    based on the user's input and any personal data provided.";

/// Compose the user message for one generation request.
pub fn user_prompt(req: &AssistRequest) -> String {
    let mut out = format!(
        "I need help writing content for the \"{}\" field.\n\n",
        req.field_name
    );
    if req.use_personal_data && !req.profile.is_empty() {
        out.push_str(&format!(
            "Here is my personal information:\n{}\n",
            req.profile
        ));
    }
    if !req.current_value.is_empty() {
        out.push_str(&format!("Current field content: {}\n", req.current_value));
    }
    out.push_str(&format!(
        "Based on this context/instruction: {}\n\n",
        req.instruction
    ));
    out.push_str("Please generate appropriate content for this field");
    if req.use_personal_data {
        out.push_str(", taking my personal information into account");
    }
    out.push('.');
    out
}

/// Fixed JSON snapshot of already-collected personal fields, captured when
/// the dialog opens.
pub fn profile_context(record: &ApplicationRecord, field: &str, current_value: &str) -> String {
    serde_json::json!({
        "personalInfo": {
            "fullName": record.text("name"),
            "email": record.text("email"),
            "phone": record.text("phone"),
            "dateOfBirth": record.text("dateOfBirth"),
            "nationality": record.text("nationalId"),
            "address": record.text("address"),
        },
        "currentField": {
            "fieldName": field,
            "currentValue": current_value,
        },
    })
    .to_string()
}
