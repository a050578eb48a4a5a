//! Rolling evaluation across every eligible historical start year
//!
//! Each start year gets an independent run with its own ladder and account,
//! so runs evaluate in parallel without locks. Only the summary aggregation
//! waits for all runs.

use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::market::ReturnSeries;
use crate::simulation::{RunOutcome, SimulationRun};

/// Runs the configured strategy from every eligible start year
#[derive(Debug, Clone)]
pub struct RollingEvaluator {
    config: SimulationConfig,
}

impl RollingEvaluator {
    /// Create an evaluator, failing fast on invalid configuration
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Start years with enough subsequent observations to cover the full
    /// horizon, ascending
    pub fn eligible_start_years<'a>(
        &'a self,
        series: &'a ReturnSeries,
    ) -> impl Iterator<Item = i32> + 'a {
        series
            .years()
            .filter(move |&year| series.covers(year, self.config.horizon_length))
    }

    /// Run a single start year
    pub fn run_one(&self, series: &ReturnSeries, start_year: i32) -> Result<RunOutcome, SimError> {
        SimulationRun::new(start_year, &self.config, series)?.execute(series)
    }

    /// Lazy, restartable sequence of outcomes ordered by start year
    pub fn outcomes<'a>(
        &'a self,
        series: &'a ReturnSeries,
    ) -> impl Iterator<Item = Result<RunOutcome, SimError>> + 'a {
        self.eligible_start_years(series)
            .map(move |start_year| self.run_one(series, start_year))
    }

    /// Evaluate every eligible start year in parallel
    ///
    /// Outcomes come back ordered by start year ascending regardless of
    /// scheduling; the model is deterministic given its inputs.
    pub fn evaluate(&self, series: &ReturnSeries) -> Result<Evaluation, SimError> {
        let start_years: Vec<i32> = self.eligible_start_years(series).collect();

        let outcomes: Vec<RunOutcome> = start_years
            .par_iter()
            .map(|&start_year| self.run_one(series, start_year))
            .collect::<Result<_, _>>()?;

        let summary = EvaluationSummary::from_outcomes(&outcomes);
        log::info!(
            "evaluated {} start years: {} completed, {} failed ({:.1}% success)",
            summary.eligible_runs,
            summary.completed,
            summary.failed,
            summary.success_rate * 100.0
        );

        Ok(Evaluation { outcomes, summary })
    }
}

/// Outcome collection plus headline statistics for one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// One outcome per eligible start year, ascending
    pub outcomes: Vec<RunOutcome>,

    /// Aggregate success statistics
    pub summary: EvaluationSummary,
}

/// The strategy's headline risk measure across start years
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EvaluationSummary {
    pub eligible_runs: usize,
    pub completed: usize,
    pub failed: usize,
    /// `completed / eligible_runs`, zero when no start year is eligible
    pub success_rate: f64,
}

impl EvaluationSummary {
    pub fn from_outcomes(outcomes: &[RunOutcome]) -> Self {
        let eligible_runs = outcomes.len();
        let completed = outcomes.iter().filter(|o| o.is_completed()).count();
        let failed = eligible_runs - completed;
        let success_rate = if eligible_runs > 0 {
            completed as f64 / eligible_runs as f64
        } else {
            0.0
        };

        Self {
            eligible_runs,
            completed,
            failed,
            success_rate,
        }
    }
}
