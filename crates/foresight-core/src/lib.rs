//! foresight-core: Question registry, scoring rules, and aggregation.
//!
//! This crate defines the data model, the per-type scoring rules, and the
//! evaluation run that the rest of the foresight workspace builds on.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;
pub mod report;
pub mod results;
pub mod scoring;
pub mod statistics;
pub mod traits;

pub use error::ScoringError;
