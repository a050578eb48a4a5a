//! Simulation configuration and pricing policies

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Configuration for a single simulation run or rolling evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Ladder tenor in years; also the run horizon
    pub horizon_length: u32,

    /// Starting portfolio balance
    pub initial_balance: f64,

    /// Annual consumption target, constant in nominal terms unless an
    /// inflation adjustment is supplied
    pub target_consumption: f64,

    /// Optional escalation applied to CD face values by years from run start
    pub inflation: InflationAdjustment,

    /// Issuance-rate-to-price conversion for new CDs
    pub pricing: PricingConvention,
}

impl SimulationConfig {
    /// Fail-fast validation of caller-supplied parameters
    pub fn validate(&self) -> Result<(), SimError> {
        if self.horizon_length < 1 {
            return Err(SimError::Configuration(
                "horizon length must be at least 1 year".into(),
            ));
        }
        if self.initial_balance <= 0.0 || self.initial_balance.is_nan() {
            return Err(SimError::Configuration(format!(
                "initial balance must be positive, got {}",
                self.initial_balance
            )));
        }
        if self.target_consumption <= 0.0 || self.target_consumption.is_nan() {
            return Err(SimError::Configuration(format!(
                "target consumption must be positive, got {}",
                self.target_consumption
            )));
        }
        self.inflation.validate()?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_length: 5,
            initial_balance: 1_000_000.0,
            target_consumption: 100_000.0,
            inflation: InflationAdjustment::None,
            pricing: PricingConvention::CompoundDiscount,
        }
    }
}

/// Escalation schedule for CD face sizing
///
/// The face value of a CD maturing `k` years after the run start is
/// `target_consumption * factor(k)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InflationAdjustment {
    /// Constant nominal target (default)
    None,
    /// Target grows at a fixed annual rate
    FixedRate(f64),
    /// Explicit multiplicative factors by years-out; the last entry is
    /// reused beyond the end of the schedule
    Schedule(Vec<f64>),
}

impl InflationAdjustment {
    /// Multiplicative adjustment for a maturity `years_out` from run start
    pub fn factor(&self, years_out: u32) -> f64 {
        match self {
            InflationAdjustment::None => 1.0,
            InflationAdjustment::FixedRate(rate) => (1.0 + rate).powi(years_out as i32),
            InflationAdjustment::Schedule(factors) => factors
                .get(years_out as usize)
                .or_else(|| factors.last())
                .copied()
                .unwrap_or(1.0),
        }
    }

    fn validate(&self) -> Result<(), SimError> {
        match self {
            InflationAdjustment::None => Ok(()),
            InflationAdjustment::FixedRate(rate) if *rate > -1.0 => Ok(()),
            InflationAdjustment::FixedRate(rate) => Err(SimError::Configuration(format!(
                "inflation rate must exceed -100%, got {}",
                rate
            ))),
            InflationAdjustment::Schedule(factors) => {
                if factors.iter().all(|f| *f > 0.0) {
                    Ok(())
                } else {
                    Err(SimError::Configuration(
                        "inflation schedule factors must be positive".into(),
                    ))
                }
            }
        }
    }
}

/// Discounting convention used to price a CD from its face value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingConvention {
    /// Price = face / (1 + rate)^tenor
    CompoundDiscount,
    /// Price = face / (1 + rate * tenor)
    SimpleDiscount,
}

impl PricingConvention {
    /// Purchase price of a CD with the given face value and tenor at the
    /// current issuance rate
    pub fn purchase_price(&self, face_value: f64, issuance_rate: f64, tenor_years: u32) -> f64 {
        match self {
            PricingConvention::CompoundDiscount => {
                face_value / (1.0 + issuance_rate).powi(tenor_years as i32)
            }
            PricingConvention::SimpleDiscount => {
                face_value / (1.0 + issuance_rate * tenor_years as f64)
            }
        }
    }
}
