//! Workspace configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use foresight_core::engine::{EvalEngineConfig, FailurePolicy};
use foresight_core::scoring::ScoringConfig;

use crate::simulated::SimulationConfig;

/// Top-level foresight configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForesightConfig {
    /// Scoring parameters.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Handling of questions that cannot be scored.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Simulated forecaster parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./foresight-results")
}

impl Default for ForesightConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            failure_policy: FailurePolicy::default(),
            simulation: SimulationConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl ForesightConfig {
    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> EvalEngineConfig {
        EvalEngineConfig {
            scoring: self.scoring,
            failure_policy: self.failure_policy,
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `foresight.toml` in the current directory
/// 2. `~/.config/foresight/config.toml`
///
/// Environment variable overrides: `FORESIGHT_MAX_DAYS`, `FORESIGHT_SEED`.
pub fn load_config() -> Result<ForesightConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ForesightConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("foresight.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ForesightConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parse a config document.
pub fn parse_config(content: &str) -> Result<ForesightConfig> {
    let config: ForesightConfig = toml::from_str(content)?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut ForesightConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = lookup("FORESIGHT_MAX_DAYS") {
        config.scoring.max_days = value
            .trim()
            .parse()
            .with_context(|| format!("FORESIGHT_MAX_DAYS is not a day count: '{value}'"))?;
    }
    if let Some(value) = lookup("FORESIGHT_SEED") {
        config.simulation.seed = value
            .trim()
            .parse()
            .with_context(|| format!("FORESIGHT_SEED is not an integer: '{value}'"))?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("foresight"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use foresight_core::scoring::DateClamp;

    #[test]
    fn default_config() {
        let config = ForesightConfig::default();
        assert_eq!(config.scoring.max_days, 365);
        assert_eq!(config.scoring.date_clamp, DateClamp::Clamp);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.output_dir, PathBuf::from("./foresight-results"));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), ForesightConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
failure_policy = "skip"
output_dir = "out"

[scoring]
max_days = 180
date_clamp = "unclamped"

[simulation]
seed = 7
binary_min = 0.1
binary_max = 0.6
date_anchor = "2025-06-01"
date_span_days = 30
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.scoring.max_days, 180);
        assert_eq!(config.scoring.date_clamp, DateClamp::Unclamped);
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.binary_max, 0.6);
        assert_eq!(
            config.simulation.date_anchor,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert_eq!(config.simulation.date_span_days, 30);

        let engine = config.engine_config();
        assert_eq!(engine.failure_policy, FailurePolicy::Skip);
        assert_eq!(engine.scoring.max_days, 180);
    }

    #[test]
    fn partial_simulation_table_keeps_defaults() {
        let config = parse_config("[simulation]\nseed = 9\n").unwrap();
        assert_eq!(config.simulation.seed, 9);
        assert_eq!(config.simulation.binary_min, 0.4);
        assert_eq!(config.simulation.date_span_days, 365);
    }

    #[test]
    fn rejects_unknown_clamp_policy() {
        let result = parse_config("[scoring]\ndate_clamp = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides() {
        let mut config = ForesightConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "FORESIGHT_MAX_DAYS" => Some("90".into()),
            "FORESIGHT_SEED" => Some(" 1234 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.scoring.max_days, 90);
        assert_eq!(config.simulation.seed, 1234);
    }

    #[test]
    fn bad_env_override_is_an_error() {
        let mut config = ForesightConfig::default();
        let err = apply_env_overrides(&mut config, |key| {
            (key == "FORESIGHT_MAX_DAYS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("FORESIGHT_MAX_DAYS"));
    }

    #[test]
    fn explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[scoring]\nmax_days = 30\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        // FORESIGHT_MAX_DAYS may be set in the environment running the tests.
        if std::env::var("FORESIGHT_MAX_DAYS").is_err() {
            assert_eq!(config.scoring.max_days, 30);
        }
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
