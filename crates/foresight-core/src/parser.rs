//! TOML question-set and forecast-file parsing.
//!
//! Loads question sets from TOML files and directories, validates them into a
//! [`QuestionRegistry`], and reads/writes forecast files.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{ForecastSet, QuestionDefinition, QuestionType, Resolution};
use crate::registry::QuestionRegistry;

/// Intermediate TOML structure for parsing question-set files.
#[derive(Debug, Deserialize)]
struct TomlQuestionFile {
    question_set: TomlQuestionSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    question_type: String,
    outcome: toml::Value,
    #[serde(default)]
    choices: Vec<String>,
    #[serde(default)]
    description: String,
}

impl TomlQuestion {
    fn into_definition(self) -> Result<QuestionDefinition> {
        let question_type: QuestionType = self
            .question_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!("question '{}': {}", self.id, e))?;

        let resolution = match question_type {
            QuestionType::Binary => Resolution::Binary {
                outcome: parse_binary_outcome(&self.outcome)
                    .with_context(|| format!("question '{}'", self.id))?,
            },
            QuestionType::Date => Resolution::Date {
                outcome: parse_date_outcome(&self.outcome)
                    .with_context(|| format!("question '{}'", self.id))?,
            },
            QuestionType::Choice => {
                let outcome = self.outcome.as_str().ok_or_else(|| {
                    anyhow::anyhow!("question '{}': choice outcome must be a string", self.id)
                })?;
                Resolution::Choice {
                    outcome: outcome.to_string(),
                    choices: self.choices,
                }
            }
        };

        Ok(QuestionDefinition {
            id: self.id,
            description: self.description,
            resolution,
        })
    }
}

fn parse_binary_outcome(value: &toml::Value) -> Result<bool> {
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::Integer(0) => Ok(false),
        toml::Value::Integer(1) => Ok(true),
        other => anyhow::bail!("binary outcome must be 0, 1, true or false, got {other}"),
    }
}

/// A date outcome is a native TOML local date or a `YYYY-MM-DD` string.
fn parse_date_outcome(value: &toml::Value) -> Result<NaiveDate> {
    match value {
        toml::Value::String(s) => parse_date(s),
        toml::Value::Datetime(dt) if is_local_date(dt) => parse_date(&dt.to_string()),
        other => anyhow::bail!("date outcome must be a YYYY-MM-DD date, got {other}"),
    }
}

fn is_local_date(dt: &toml::value::Datetime) -> bool {
    dt.date.is_some() && dt.time.is_none()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Parse a single TOML file into a validated [`QuestionRegistry`].
pub fn parse_question_set(path: &Path) -> Result<QuestionRegistry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a TOML string into a validated [`QuestionRegistry`].
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionRegistry> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(TomlQuestion::into_definition)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("in {}", source_path.display()))?;

    let header = parsed.question_set;
    let registry = QuestionRegistry::new(header.id, header.name, questions)
        .with_context(|| format!("in {}", source_path.display()))?
        .with_description(header.description);

    tracing::debug!(
        "loaded question set '{}' ({} questions) from {}",
        registry.id,
        registry.len(),
        source_path.display()
    );
    Ok(registry)
}

/// Recursively load all `.toml` question-set files from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionRegistry>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a question set from a file, or every question set under a directory.
pub fn load_question_sets(path: &Path) -> Result<Vec<QuestionRegistry>> {
    if path.is_dir() {
        load_question_directory(path)
    } else {
        Ok(vec![parse_question_set(path)?])
    }
}

/// A non-fatal finding from question-set linting.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Lint a registry for issues that are legal but probably unintended.
pub fn validate_question_set(registry: &QuestionRegistry) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if registry.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question set has no questions".into(),
        });
    }

    for question in registry {
        if question.question_type() == QuestionType::Choice && question.choices().len() == 1 {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "choice question has a single choice; forecasts score 0 or 1".into(),
            });
        }

        if question.id.trim() != question.id {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "question id has leading or trailing whitespace".into(),
            });
        }
    }

    warnings
}

/// Parse a forecast file. `.json` files are read as JSON, anything else as TOML.
pub fn parse_forecast_set(path: &Path) -> Result<ForecastSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read forecast file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse forecast JSON: {}", path.display()))
    } else {
        parse_forecast_set_str(&content, path)
    }
}

/// Parse a TOML forecast document.
///
/// Date forecasts may be native TOML local dates (`"Q" = 2024-12-01`) as well
/// as `YYYY-MM-DD` strings.
pub fn parse_forecast_set_str(content: &str, source_path: &Path) -> Result<ForecastSet> {
    let context = || format!("failed to parse forecast TOML: {}", source_path.display());
    let mut document = content.parse::<toml::Table>().with_context(context)?;

    if let Some(toml::Value::Table(forecasts)) = document.get_mut("forecasts") {
        for (_, value) in forecasts.iter_mut() {
            let date = match value {
                toml::Value::Datetime(dt) if is_local_date(dt) => dt.to_string(),
                _ => continue,
            };
            *value = toml::Value::String(date);
        }
    }

    toml::Value::Table(document)
        .try_into()
        .with_context(context)
}

/// Write a forecast set as TOML (or JSON for a `.json` path).
pub fn save_forecast_set(set: &ForecastSet, path: &Path) -> Result<()> {
    let content = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::to_string_pretty(set).context("failed to serialize forecasts")?
    } else {
        toml::to_string(set).context("failed to serialize forecasts")?
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write forecasts to {}", path.display()))?;
    Ok(())
}
