//! Core data model types for foresight.
//!
//! These are the fundamental types the whole workspace uses to represent
//! questions, their realized outcomes, and the forecasts made about them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The closed set of question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Binary,
    Date,
    Choice,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Binary => write!(f, "binary"),
            QuestionType::Date => write!(f, "date"),
            QuestionType::Choice => write!(f, "choice"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "bool" => Ok(QuestionType::Binary),
            "date" => Ok(QuestionType::Date),
            "choice" | "multiple-choice" => Ok(QuestionType::Choice),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// How a question actually resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resolution {
    /// The event happened (`true`) or not (`false`).
    Binary { outcome: bool },
    /// The calendar date on which the event happened.
    Date { outcome: NaiveDate },
    /// The winning label out of a fixed, ordered set of choices.
    Choice {
        outcome: String,
        choices: Vec<String>,
    },
}

/// A single question together with its realized outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Unique identifier within a question set.
    pub id: String,
    /// Free-form description of the question.
    #[serde(default)]
    pub description: String,
    /// The true outcome.
    pub resolution: Resolution,
}

impl QuestionDefinition {
    pub fn binary(id: impl Into<String>, outcome: bool) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            resolution: Resolution::Binary { outcome },
        }
    }

    pub fn date(id: impl Into<String>, outcome: NaiveDate) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            resolution: Resolution::Date { outcome },
        }
    }

    pub fn choice<I, S>(id: impl Into<String>, outcome: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            description: String::new(),
            resolution: Resolution::Choice {
                outcome: outcome.into(),
                choices: choices.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn question_type(&self) -> QuestionType {
        match self.resolution {
            Resolution::Binary { .. } => QuestionType::Binary,
            Resolution::Date { .. } => QuestionType::Date,
            Resolution::Choice { .. } => QuestionType::Choice,
        }
    }

    /// The declared choices; empty for non-choice questions.
    pub fn choices(&self) -> &[String] {
        match &self.resolution {
            Resolution::Choice { choices, .. } => choices,
            _ => &[],
        }
    }
}

/// A forecast for one question.
///
/// Serialized untagged: a number is a binary probability, a `YYYY-MM-DD`
/// string a date, and a table a choice distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Forecast {
    /// Probability that the event happens.
    Binary(f64),
    /// Predicted calendar date.
    Date(NaiveDate),
    /// Probability per choice label. Absent labels count as 0.
    Choice(BTreeMap<String, f64>),
}

impl Forecast {
    /// Build a choice forecast from `(label, probability)` pairs.
    pub fn choice<I, S>(probabilities: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Forecast::Choice(
            probabilities
                .into_iter()
                .map(|(label, p)| (label.into(), p))
                .collect(),
        )
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Forecast::Binary(_) => QuestionType::Binary,
            Forecast::Date(_) => QuestionType::Date,
            Forecast::Choice(_) => QuestionType::Choice,
        }
    }
}

/// Forecasts from one forecaster, keyed by question id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSet {
    /// Who made the forecasts.
    #[serde(default = "default_forecaster")]
    pub forecaster: String,
    /// Forecast per question id.
    #[serde(default)]
    pub forecasts: BTreeMap<String, Forecast>,
}

fn default_forecaster() -> String {
    "anonymous".to_string()
}

impl ForecastSet {
    pub fn new(forecaster: impl Into<String>) -> Self {
        Self {
            forecaster: forecaster.into(),
            forecasts: BTreeMap::new(),
        }
    }

    /// Add or replace the forecast for `question_id`.
    pub fn insert(&mut self, question_id: impl Into<String>, forecast: Forecast) {
        self.forecasts.insert(question_id.into(), forecast);
    }

    /// Builder-style `insert`.
    pub fn with(mut self, question_id: impl Into<String>, forecast: Forecast) -> Self {
        self.insert(question_id, forecast);
        self
    }

    pub fn get(&self, question_id: &str) -> Option<&Forecast> {
        self.forecasts.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.forecasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
    }
}
