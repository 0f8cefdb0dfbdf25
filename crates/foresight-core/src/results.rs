//! Per-question score records and their display projection.

use serde::{Deserialize, Serialize};

use crate::model::{Forecast, QuestionDefinition, QuestionType, Resolution};

/// The outcome of scoring one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Question identifier.
    pub question_id: String,
    /// Question type.
    pub question_type: QuestionType,
    /// True outcome, formatted for display.
    pub outcome: String,
    /// Forecast, formatted for display.
    pub forecast: String,
    /// Error score; 0 is perfect.
    pub score: f64,
}

impl ScoreRecord {
    pub fn new(question: &QuestionDefinition, forecast: &Forecast, score: f64) -> Self {
        Self {
            question_id: question.id.clone(),
            question_type: question.question_type(),
            outcome: display_outcome(question),
            forecast: display_forecast(question, forecast),
            score,
        }
    }
}

/// Scored questions in registry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<ScoreRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ScoreRecord) {
        self.records.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.score)
    }

    pub fn get(&self, question_id: &str) -> Option<&ScoreRecord> {
        self.records.iter().find(|r| r.question_id == question_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ScoreRecord> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ScoreRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ScoreRecord;
    type IntoIter = std::slice::Iter<'a, ScoreRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Format the true outcome: `1`/`0`, `YYYY-MM-DD`, or the winning label.
pub fn display_outcome(question: &QuestionDefinition) -> String {
    match &question.resolution {
        Resolution::Binary { outcome } => (if *outcome { "1" } else { "0" }).to_string(),
        Resolution::Date { outcome } => outcome.format("%Y-%m-%d").to_string(),
        Resolution::Choice { outcome, .. } => outcome.clone(),
    }
}

/// Format a forecast for display.
///
/// Choice forecasts collapse to their most likely declared choice; this is
/// never used for scoring.
pub fn display_forecast(question: &QuestionDefinition, forecast: &Forecast) -> String {
    match forecast {
        Forecast::Binary(p) => format!("{p:.3}"),
        Forecast::Date(date) => date.format("%Y-%m-%d").to_string(),
        Forecast::Choice(probabilities) => {
            let mut best: Option<(&str, f64)> = None;
            for choice in question.choices() {
                let p = probabilities.get(choice).copied().unwrap_or(0.0);
                // Strict comparison keeps the earliest declared choice on ties.
                if best.is_none_or(|(_, max)| p > max) {
                    best = Some((choice, p));
                }
            }
            match best {
                Some((label, _)) => label.to_string(),
                None => "-".to_string(),
            }
        }
    }
}
