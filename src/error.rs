//! Error taxonomy for the simulation engine

use thiserror::Error;

/// Errors raised by simulation components
///
/// `InsufficientFunds` is a modeled outcome of the strategy, not a software
/// defect: it is caught at the `SimulationRun` boundary and recorded as a
/// `CapitalShortfall`. `LadderIntegrity` indicates a bug in the engine itself
/// and is never caught internally.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid caller-supplied parameters, surfaced before any run starts
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Internal ladder invariant violation (size or maturity mismatch)
    #[error("ladder integrity violated: {0}")]
    LadderIntegrity(String),

    /// Harvest request exceeds the investment balance
    #[error("insufficient funds: needed {needed:.2}, available {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    /// The return series has no observation for a year the run requires
    #[error("no market observation for year {year}")]
    MissingMarketData { year: i32 },
}

impl SimError {
    /// Amount by which a harvest request exceeded the available balance
    pub fn shortfall(&self) -> Option<f64> {
        match self {
            SimError::InsufficientFunds { needed, available } => Some(needed - available),
            _ => None,
        }
    }
}
