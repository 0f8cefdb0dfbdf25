//! foresight-sim: Seeded forecast simulation and configuration loading.
//!
//! The simulator stands in for a real forecaster when exercising the
//! scoring pipeline. Every draw comes from an explicitly seeded generator.

pub mod config;
pub mod simulated;

pub use simulated::{SimulatedForecaster, SimulationConfig};
