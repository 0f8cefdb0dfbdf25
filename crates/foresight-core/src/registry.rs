//! The validated, ordered collection of questions to score.

use std::collections::HashSet;

use crate::error::ScoringError;
use crate::model::{QuestionDefinition, Resolution};

/// An ordered set of question definitions whose invariants have been checked.
///
/// Construction is the only way in, so a malformed definition never reaches
/// the scorer.
#[derive(Debug, Clone)]
pub struct QuestionRegistry {
    /// Identifier of the question set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of the question set.
    pub description: String,
    questions: Vec<QuestionDefinition>,
}

impl QuestionRegistry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        questions: Vec<QuestionDefinition>,
    ) -> Result<Self, ScoringError> {
        let mut seen = HashSet::new();
        for question in &questions {
            validate_definition(question)?;
            if !seen.insert(question.id.as_str()) {
                return Err(ScoringError::InvalidQuestionDefinition {
                    question_id: question.id.clone(),
                    message: "duplicate question id".into(),
                });
            }
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            questions,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, QuestionDefinition> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl<'a> IntoIterator for &'a QuestionRegistry {
    type Item = &'a QuestionDefinition;
    type IntoIter = std::slice::Iter<'a, QuestionDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// Check one definition against the invariants of its type.
pub fn validate_definition(question: &QuestionDefinition) -> Result<(), ScoringError> {
    let invalid = |message: String| ScoringError::InvalidQuestionDefinition {
        question_id: question.id.clone(),
        message,
    };

    if question.id.trim().is_empty() {
        return Err(invalid("question id is empty".into()));
    }

    if let Resolution::Choice { outcome, choices } = &question.resolution {
        if choices.is_empty() {
            return Err(invalid("choice question has no choices".into()));
        }
        let mut seen = HashSet::new();
        for choice in choices {
            if !seen.insert(choice.as_str()) {
                return Err(invalid(format!("duplicate choice '{choice}'")));
            }
        }
        if !choices.contains(outcome) {
            return Err(invalid(format!(
                "outcome '{outcome}' is not one of the declared choices"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Vec<QuestionDefinition> {
        vec![
            QuestionDefinition::binary("Question 1", true),
            QuestionDefinition::date("Question 3", NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
            QuestionDefinition::choice("Question 6", "Alice", ["Alice", "Bob", "Charlie"]),
        ]
    }

    #[test]
    fn preserves_declaration_order() {
        let registry = QuestionRegistry::new("demo", "Demo", sample()).unwrap();
        let ids: Vec<&str> = registry.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["Question 1", "Question 3", "Question 6"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.get("Question 6").is_some());
        assert!(registry.get("Question 7").is_none());
    }

    #[test]
    fn rejects_outcome_outside_choices() {
        let q = QuestionDefinition::choice("q", "Dave", ["Alice", "Bob"]);
        let err = QuestionRegistry::new("s", "S", vec![q]).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InvalidQuestionDefinition { .. }
        ));
        assert!(err.to_string().contains("Dave"));
    }

    #[test]
    fn rejects_empty_choices() {
        let q = QuestionDefinition::choice("q", "Alice", Vec::<String>::new());
        assert!(validate_definition(&q).is_err());
    }

    #[test]
    fn rejects_duplicate_choices() {
        let q = QuestionDefinition::choice("q", "Alice", ["Alice", "Bob", "Alice"]);
        let err = validate_definition(&q).unwrap_err();
        assert!(err.to_string().contains("duplicate choice"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let questions = vec![
            QuestionDefinition::binary("same", true),
            QuestionDefinition::binary("same", false),
        ];
        let err = QuestionRegistry::new("s", "S", questions).unwrap_err();
        assert!(err.to_string().contains("duplicate question id"));
    }

    #[test]
    fn rejects_blank_id() {
        let err = validate_definition(&QuestionDefinition::binary("  ", true)).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
