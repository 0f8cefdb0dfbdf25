//! The `foresight simulate` command.

use std::path::PathBuf;

use anyhow::Result;

use foresight_core::parser;
use foresight_sim::config::load_config_from;
use foresight_sim::SimulatedForecaster;

pub fn execute(
    questions_path: PathBuf,
    seed: Option<u64>,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(seed) = seed {
        config.simulation.seed = seed;
    }

    let registries = parser::load_question_sets(&questions_path)?;
    anyhow::ensure!(
        !registries.is_empty(),
        "no question sets found in {}",
        questions_path.display()
    );

    let mut simulator = SimulatedForecaster::new(config.simulation)?;
    let mut forecasts = simulator.simulate(&registries[0]);
    for registry in &registries[1..] {
        for (question_id, forecast) in simulator.simulate(registry).forecasts {
            if forecasts.get(&question_id).is_some() {
                tracing::warn!("question '{question_id}' is in several sets, keeping the last");
            }
            forecasts.insert(question_id, forecast);
        }
    }

    parser::save_forecast_set(&forecasts, &output)?;
    println!(
        "Wrote {} forecasts ({}) to {}",
        forecasts.len(),
        forecasts.forecaster,
        output.display()
    );

    Ok(())
}
