//! Engine error types.
//!
//! These errors represent fatal failures of bank loading or variant
//! generation. They are structured so callers can report exact counts and
//! offending records without string matching. All of them abort the whole
//! generation batch: a partial variant set is never returned.

use thiserror::Error;

use crate::model::Difficulty;

/// Errors that can occur while loading a bank or generating variants.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A bank record is missing a required field or declares a value
    /// outside the recognized enumerations.
    #[error("malformed record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },

    /// Two records computed the same identity key but differ in content.
    #[error(
        "conflicting records for identity {identity}: positions {first} and {second} \
         share an identity key but differ in content"
    )]
    ConflictingIdentity {
        identity: String,
        first: usize,
        second: usize,
    },

    /// A difficulty bucket cannot be filled from the eligible candidates.
    #[error(
        "not enough {difficulty} questions: required {required}, available {available}"
    )]
    InsufficientQuestions {
        difficulty: Difficulty,
        required: usize,
        available: usize,
    },

    /// The selection configuration is unusable as given.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Returns `true` if this error points at the bank content rather than
    /// the selection configuration.
    pub fn is_bank_error(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedRecord { .. } | EngineError::ConflictingIdentity { .. }
        )
    }
}
