//! Scoring error types.
//!
//! Defined as a typed enum so the evaluation engine can downcast errors
//! coming out of a forecast source and decide whether a question is skipped
//! or the whole run is aborted.

use thiserror::Error;

use crate::model::QuestionType;

/// Errors raised while validating questions, scoring forecasts, or aggregating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A forecast probability lies outside [0, 1] (or is NaN).
    #[error("invalid forecast for '{question_id}': '{label}' = {probability} is outside [0, 1]")]
    InvalidForecast {
        question_id: String,
        label: String,
        probability: f64,
    },

    /// A question definition violates its type's invariants.
    #[error("invalid question definition '{question_id}': {message}")]
    InvalidQuestionDefinition {
        question_id: String,
        message: String,
    },

    /// The forecast variant does not match the question's declared type.
    #[error("forecast for '{question_id}' is a {actual} forecast but the question is {expected}")]
    ForecastTypeMismatch {
        question_id: String,
        expected: QuestionType,
        actual: QuestionType,
    },

    /// The forecast source has no forecast for this question.
    #[error("no forecast supplied for question '{0}'")]
    MissingForecast(String),

    /// Aggregation was attempted over zero scores.
    #[error("cannot aggregate an empty result set")]
    EmptyResultSet,

    /// Scoring configuration is unusable.
    #[error("invalid scoring configuration: {0}")]
    InvalidConfig(String),
}

impl ScoringError {
    /// Returns `true` if this error concerns a single question's forecast and
    /// the run may skip that question and continue.
    pub fn is_per_question(&self) -> bool {
        matches!(
            self,
            ScoringError::InvalidForecast { .. }
                | ScoringError::ForecastTypeMismatch { .. }
                | ScoringError::MissingForecast(_)
        )
    }

    /// The question this error refers to, if any.
    pub fn question_id(&self) -> Option<&str> {
        match self {
            ScoringError::InvalidForecast { question_id, .. }
            | ScoringError::InvalidQuestionDefinition { question_id, .. }
            | ScoringError::ForecastTypeMismatch { question_id, .. } => Some(question_id),
            ScoringError::MissingForecast(id) => Some(id),
            ScoringError::EmptyResultSet | ScoringError::InvalidConfig(_) => None,
        }
    }
}
