use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Invalid input: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("Cannot compute {context}: {reason}")]
    Domain {
        context: &'static str,
        reason: String,
    },

    #[error("Unknown calculator: {0}")]
    UnknownProduct(String),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CalcError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Validation(vec![FieldViolation::new(field, reason)])
    }

    pub fn domain(context: &'static str, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            context,
            reason: reason.into(),
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            CalcError::Validation(violations) => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type CalcResult<T> = Result<T, CalcError>;
