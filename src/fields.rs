//! Declarative field registry.
//!
//! Every form field is described once in [`FIELDS`]: which step owns it and
//! the ordered rule list the validation engine evaluates. UI layers render
//! from this table; the reducer gates step advancement with it. Adding a
//! field is a one-line change here, not new validation code.

use serde::{Deserialize, Serialize};

use crate::validation::{Pattern, Rule};

// ─── Steps ────────────────────────────────────────────────────────────────────

/// One page of the multi-step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Personal,
    Financial,
    Narrative,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Personal, Step::Financial, Step::Narrative];

    /// 0-based position in the flow.
    pub fn index(self) -> usize {
        match self {
            Step::Personal => 0,
            Step::Financial => 1,
            Step::Narrative => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::ALL.get(index).copied()
    }

    /// The step after this one, if any.
    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    /// The step before this one, if any.
    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Step::from_index)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Personal => "personal",
            Step::Financial => "financial",
            Step::Narrative => "narrative",
        };
        write!(f, "{name}")
    }
}

// ─── Field specs ──────────────────────────────────────────────────────────────

/// Static description of one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire/snapshot name of the field (camelCase, matching the endpoints).
    pub name: &'static str,
    /// The step that collects this field.
    pub step: Step,
    /// Rules evaluated in order; the first violation is reported.
    pub rules: &'static [Rule],
}

/// The full registry, in display order within each step.
pub const FIELDS: &[FieldSpec] = &[
    // ── Step 0: personal identity ────────────────────────────────────────────
    FieldSpec {
        name: "name",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::Length { min: 2, max: 100 },
            Rule::Pattern(Pattern::Name),
        ],
    },
    FieldSpec {
        name: "nationalId",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::Length { min: 5, max: 20 },
            Rule::Pattern(Pattern::NationalId),
        ],
    },
    FieldSpec {
        name: "dateOfBirth",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::BirthDate {
                min_age: 13,
                max_age: 120,
            },
        ],
    },
    FieldSpec {
        name: "gender",
        step: Step::Personal,
        rules: &[Rule::Required],
    },
    FieldSpec {
        name: "address",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::Length { min: 5, max: 200 },
            Rule::Pattern(Pattern::Address),
        ],
    },
    FieldSpec {
        name: "city",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::Length { min: 2, max: 50 },
            Rule::Pattern(Pattern::Name),
        ],
    },
    FieldSpec {
        name: "state",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::Length { min: 2, max: 50 },
            Rule::Pattern(Pattern::Name),
        ],
    },
    FieldSpec {
        name: "country",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::Length { min: 2, max: 50 },
            Rule::Pattern(Pattern::Name),
        ],
    },
    FieldSpec {
        name: "phone",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::Length { min: 10, max: 20 },
            Rule::Pattern(Pattern::Phone),
        ],
    },
    FieldSpec {
        name: "email",
        step: Step::Personal,
        rules: &[
            Rule::Required,
            Rule::MaxLength(100),
            Rule::Pattern(Pattern::Email),
        ],
    },
    // ── Step 1: financial ────────────────────────────────────────────────────
    FieldSpec {
        name: "maritalStatus",
        step: Step::Financial,
        rules: &[Rule::Required],
    },
    FieldSpec {
        name: "dependents",
        step: Step::Financial,
        rules: &[
            Rule::Required,
            Rule::Range {
                min: 0.0,
                max: 20.0,
            },
            Rule::Integer,
        ],
    },
    FieldSpec {
        name: "employmentStatus",
        step: Step::Financial,
        rules: &[Rule::Required],
    },
    FieldSpec {
        name: "monthlyIncome",
        step: Step::Financial,
        rules: &[
            Rule::Required,
            Rule::Range {
                min: 0.0,
                max: 10_000_000.0,
            },
        ],
    },
    FieldSpec {
        name: "housingStatus",
        step: Step::Financial,
        rules: &[Rule::Required],
    },
    // ── Step 2: free-text narratives ─────────────────────────────────────────
    FieldSpec {
        name: "currentFinancialSituation",
        step: Step::Narrative,
        rules: &[
            Rule::Required,
            Rule::Length { min: 50, max: 1000 },
            Rule::Pattern(Pattern::Narrative),
        ],
    },
    FieldSpec {
        name: "employmentCircumstances",
        step: Step::Narrative,
        rules: &[
            Rule::Required,
            Rule::Length { min: 50, max: 1000 },
            Rule::Pattern(Pattern::Narrative),
        ],
    },
    FieldSpec {
        name: "reasonForApplying",
        step: Step::Narrative,
        rules: &[
            Rule::Required,
            Rule::Length { min: 50, max: 1000 },
            Rule::Pattern(Pattern::Narrative),
        ],
    },
];

/// Look up one field's spec by name.
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// All fields collected by `step`, in display order.
pub fn step_fields(step: Step) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |f| f.step == step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_step_owns_fields() {
        for step in Step::ALL {
            assert!(step_fields(step).count() > 0, "step {step} has no fields");
        }
    }

    #[test]
    fn registry_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for f in FIELDS {
            assert!(seen.insert(f.name), "duplicate field {}", f.name);
        }
    }

    #[test]
    fn step_ordering_is_sequential() {
        assert_eq!(Step::Personal.next(), Some(Step::Financial));
        assert_eq!(Step::Financial.next(), Some(Step::Narrative));
        assert_eq!(Step::Narrative.next(), None);
        assert_eq!(Step::Personal.previous(), None);
        assert_eq!(Step::Narrative.previous(), Some(Step::Financial));
        assert_eq!(Step::from_index(3), None);
    }
}
