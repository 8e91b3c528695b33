//! Field validation engine.
//!
//! One engine evaluates any field against its declared rule list from the
//! registry in [`crate::fields`]. Rules run in declaration order and the
//! first violated rule is reported, so each field yields at most one
//! violation per pass. Validation is cheap enough to re-run on every
//! change; there is no debounce.

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fields::{step_fields, FieldSpec, Step};
use crate::record::{ApplicationRecord, FieldValue};

// ─── Rules ────────────────────────────────────────────────────────────────────

/// One declarative validation rule. Const-constructible so the field
/// registry can be a static table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Value must be present and non-blank.
    Required,
    /// Text length in characters must fall in `[min, max]`.
    Length { min: usize, max: usize },
    /// Text length in characters must not exceed `max`.
    MaxLength(usize),
    /// Text must match the named pattern wholesale.
    Pattern(Pattern),
    /// Numeric value must fall in `[min, max]`.
    Range { min: f64, max: f64 },
    /// Numeric value must be a whole number.
    Integer,
    /// `YYYY-MM-DD` calendar date, not in the future, with age in
    /// `[min_age, max_age]` years.
    BirthDate { min_age: u32, max_age: u32 },
}

/// Named character patterns shared across fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Latin/Arabic letters, space, hyphen, apostrophe.
    Name,
    /// Alphanumeric plus hyphen, case-insensitive.
    NationalId,
    /// Letters, digits, Arabic script, and street punctuation.
    Address,
    /// International phone number with optional separators.
    Phone,
    /// Email address.
    Email,
    /// Long-form text: Latin/Arabic plus common punctuation and currency
    /// signs.
    Narrative,
}

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z\u{0600}-\u{06FF}\s'-]+$").expect("regex: name")
});
static NATIONAL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9-]+$").expect("regex: national id"));
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9\u{0600}-\u{06FF}\s,.'-/#]+$").expect("regex: address")
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,4}[-\s.]?[0-9]{1,9}$")
        .expect("regex: phone")
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("regex: email")
});
static NARRATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[a-zA-Z0-9\u{0600}-\u{06FF}\s.,!?;:()\-'"$€£¥%&/]+$"#)
        .expect("regex: narrative")
});

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Pattern::Name => &NAME_RE,
            Pattern::NationalId => &NATIONAL_ID_RE,
            Pattern::Address => &ADDRESS_RE,
            Pattern::Phone => &PHONE_RE,
            Pattern::Email => &EMAIL_RE,
            Pattern::Narrative => &NARRATIVE_RE,
        }
    }
}

// ─── Violations ───────────────────────────────────────────────────────────────

/// Why a field failed validation. Recoverable; shown inline next to the
/// field and re-evaluated on every change.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("this field is required")]
    Missing,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("contains characters that are not allowed")]
    PatternMismatch,
    #[error("must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },
    #[error("must be a whole number")]
    NotInteger,
    #[error("is not a valid date")]
    InvalidDate,
    #[error("cannot be in the future")]
    FutureDate,
    #[error("age must be at least {min} years")]
    AgeBelow { min: u32 },
    #[error("age must be at most {max} years")]
    AgeAbove { max: u32 },
}

/// One field's violation, as reported by a step-level pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub violation: Violation,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

// ─── Engine ───────────────────────────────────────────────────────────────────

/// Validate one field against its rule list as of `today`.
///
/// Rules other than `Required` are skipped for absent or blank values, so
/// an untouched optional field never reports a format violation.
pub fn check_field(
    spec: &FieldSpec,
    value: Option<&FieldValue>,
    today: NaiveDate,
) -> Result<(), Violation> {
    let present = value.map(|v| !v.is_blank()).unwrap_or(false);

    for rule in spec.rules {
        match rule {
            Rule::Required => {
                if !present {
                    return Err(Violation::Missing);
                }
            }
            _ if !present => continue,
            Rule::Length { min, max } => {
                let len = text_of(value).chars().count();
                if len < *min {
                    return Err(Violation::TooShort { min: *min });
                }
                if len > *max {
                    return Err(Violation::TooLong { max: *max });
                }
            }
            Rule::MaxLength(max) => {
                if text_of(value).chars().count() > *max {
                    return Err(Violation::TooLong { max: *max });
                }
            }
            Rule::Pattern(pattern) => {
                if !pattern.regex().is_match(text_of(value)) {
                    return Err(Violation::PatternMismatch);
                }
            }
            Rule::Range { min, max } => {
                let n = numeric_of(value)?;
                if n < *min || n > *max {
                    return Err(Violation::OutOfRange {
                        min: *min,
                        max: *max,
                    });
                }
            }
            Rule::Integer => {
                if numeric_of(value)?.fract() != 0.0 {
                    return Err(Violation::NotInteger);
                }
            }
            Rule::BirthDate { min_age, max_age } => {
                check_birth_date(text_of(value), today, *min_age, *max_age)?;
            }
        }
    }
    Ok(())
}

/// Validate every field a step owns against `record`.
///
/// An empty result means the step's forward transition may proceed.
pub fn check_step(step: Step, record: &ApplicationRecord, today: NaiveDate) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    for spec in step_fields(step) {
        if let Err(violation) = check_field(spec, record.get(spec.name), today) {
            violations.push(FieldViolation {
                field: spec.name.to_string(),
                violation,
            });
        }
    }
    violations
}

/// [`check_step`] as of the current date.
pub fn check_step_now(step: Step, record: &ApplicationRecord) -> Vec<FieldViolation> {
    check_step(step, record, Utc::now().date_naive())
}

fn text_of(value: Option<&FieldValue>) -> &str {
    value.and_then(FieldValue::as_text).unwrap_or("")
}

/// Numeric reading of a value. Text that does not parse as a number is a
/// format violation, not a crash — form layers sometimes hand numbers over
/// as strings.
fn numeric_of(value: Option<&FieldValue>) -> Result<f64, Violation> {
    match value {
        Some(FieldValue::Number(n)) => Ok(*n),
        Some(FieldValue::Text(s)) => s.trim().parse().map_err(|_| Violation::PatternMismatch),
        _ => Err(Violation::PatternMismatch),
    }
}

fn check_birth_date(
    raw: &str,
    today: NaiveDate,
    min_age: u32,
    max_age: u32,
) -> Result<(), Violation> {
    let date =
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| Violation::InvalidDate)?;
    if date > today {
        return Err(Violation::FutureDate);
    }
    let age = age_in_years(date, today);
    if age < min_age {
        return Err(Violation::AgeBelow { min: min_age });
    }
    if age > max_age {
        return Err(Violation::AgeAbove { max: max_age });
    }
    Ok(())
}

/// Whole years between `born` and `today`, anniversary-based.
fn age_in_years(born: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

// ─── Tests ────────────────────────────────────────────────────────────────────
