//! Benefit application intake engine.
//!
//! The core of a three-step loan/benefits application form: a pure session
//! state machine with declarative field validation, a durable local
//! snapshot for resume-after-restart, an AI writing assistant for the
//! long-answer fields, and a submission client for the finished record.
//! UI layers sit on top of [`app::FormApp`] and stay free of state logic.

pub mod app;
pub mod assist;
pub mod config;
pub mod fields;
pub mod record;
pub mod session;
pub mod store;
pub mod submit;
pub mod validation;

pub use app::{AppError, FormApp, PendingGeneration};
pub use assist::client::CompletionApi;
pub use assist::{AssistDialog, AssistRequest, GenerationError, MergeMode};
pub use config::EngineConfig;
pub use fields::Step;
pub use record::{ApplicationRecord, FieldValue};
pub use session::{reduce, reduce_now, FormAction, FormSession, FormState, SessionError};
pub use store::{Snapshot, SnapshotStore};
pub use submit::{SubmissionApi, SubmissionError, SubmissionReceipt};
pub use validation::{check_field, check_step, FieldViolation, Violation};
