//! CD-Ladder - retirement drawdown simulator with rolling historical evaluation
//!
//! This library provides:
//! - A fixed-tenor CD ladder model with yearly redemption and replenishment
//! - An investment account with explicit capital-gains harvesting
//! - A year-by-year simulation engine with first-class shortfall outcomes
//! - Rolling evaluation across every eligible historical start year
//! - CSV input of historical return series and CSV output of results

pub mod config;
pub mod error;
pub mod evaluation;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod simulation;

// Re-export commonly used types
pub use config::{InflationAdjustment, PricingConvention, SimulationConfig};
pub use error::SimError;
pub use evaluation::{Evaluation, EvaluationSummary, RollingEvaluator};
pub use market::{load_return_series, MarketYear, ReturnSeries};
pub use portfolio::{Cd, InvestmentAccount, Ladder};
pub use simulation::{FailureReason, RunOutcome, RunStatus, SimulationRun, YearRecord};
