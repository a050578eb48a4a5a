//! Per-year output records and run outcomes

use serde::{Deserialize, Serialize};

/// Immutable snapshot of one simulated year
///
/// Field order is the tabular output contract: it is stable across runs of
/// equal horizon length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Calendar year
    pub year: i32,

    /// Consumption paid, equal to the redeemed CD's face value
    pub consumption: f64,

    /// Investment balance before this year's growth
    pub balance_before_growth: f64,

    /// Investment balance after growth, before the harvest
    pub balance_after_growth: f64,

    /// Capital gains realized by the harvest
    pub gains_harvested: f64,

    /// Purchase price of the replacement CD
    pub cd_purchase_price: f64,

    /// Maturity year of the replacement CD
    pub new_cd_maturity: i32,

    /// Face value of the replacement CD
    pub new_cd_face_value: f64,

    /// Investment balance after the harvest
    pub investment_balance: f64,

    /// Sum of held CD face values after re-issuance
    pub ladder_face_value: f64,

    /// Ladder face total plus investment balance
    pub net_worth: f64,
}

/// Why a run failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FailureReason {
    /// Growth could not fund the ladder replenishment (or, at
    /// initialization, the starting balance could not fund the ladder)
    CapitalShortfall {
        /// Year the shortfall occurred
        year: i32,
        /// Amount by which the required purchase exceeded available funds
        shortfall: f64,
    },
}

/// Terminal state of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Ran the full horizon
    Completed,
    /// Could not fund consumption or replenish the ladder
    Failed(FailureReason),
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// Result of one simulation run from a single historical start year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Calendar year the run started
    pub start_year: i32,

    /// Terminal status
    pub status: RunStatus,

    /// Per-year records up to and including the failing year, if any
    pub records: Vec<YearRecord>,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Net worth at the end of the last simulated year, zero if the run
    /// failed before completing any year
    pub fn final_net_worth(&self) -> f64 {
        self.records.last().map(|r| r.net_worth).unwrap_or(0.0)
    }
}
