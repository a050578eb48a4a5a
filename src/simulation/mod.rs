//! Simulation engine: year transitions, runs, and output records

pub mod engine;
pub mod records;
pub mod run;

pub use engine::YearEngine;
pub use records::{FailureReason, RunOutcome, RunStatus, YearRecord};
pub use run::SimulationRun;
