//! Contiguous annual series of market observations

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// One calendar year of market observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketYear {
    /// Calendar year
    pub year: i32,

    /// Annual return of the invested asset (decimal fraction)
    pub investment_return: f64,

    /// Issuance rate for a new CD purchased this year (decimal fraction)
    pub cd_rate: f64,
}

/// An ordered, contiguous, indexable series of annual observations
///
/// The series is fully materialized before evaluation begins; no simulation
/// step performs I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    first_year: i32,
    observations: Vec<MarketYear>,
}

impl ReturnSeries {
    /// Build a series from observations, which must be sorted by year with
    /// no gaps or duplicates
    pub fn new(observations: Vec<MarketYear>) -> Result<Self, SimError> {
        let first = observations
            .first()
            .ok_or_else(|| SimError::Configuration("return series is empty".into()))?;
        let first_year = first.year;

        for (i, obs) in observations.iter().enumerate() {
            let expected = first_year + i as i32;
            if obs.year != expected {
                return Err(SimError::Configuration(format!(
                    "return series must be contiguous: expected year {}, found {}",
                    expected, obs.year
                )));
            }
        }

        Ok(Self {
            first_year,
            observations,
        })
    }

    /// Series with the same observation repeated for `years` consecutive
    /// years, used for synthetic constant-rate evaluation
    pub fn constant(
        first_year: i32,
        years: u32,
        investment_return: f64,
        cd_rate: f64,
    ) -> Result<Self, SimError> {
        let observations = (0..years as i32)
            .map(|offset| MarketYear {
                year: first_year + offset,
                investment_return,
                cd_rate,
            })
            .collect();
        Self::new(observations)
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + self.observations.len() as i32 - 1
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observation for a calendar year, if the series covers it
    pub fn get(&self, year: i32) -> Option<MarketYear> {
        let offset = year.checked_sub(self.first_year)?;
        if offset < 0 {
            return None;
        }
        self.observations.get(offset as usize).copied()
    }

    /// Calendar years covered by the series, ascending
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.first_year..=self.last_year()
    }

    /// Whether a run starting at `start_year` with the given horizon has a
    /// full set of observations
    pub fn covers(&self, start_year: i32, horizon_length: u32) -> bool {
        start_year >= self.first_year && start_year + horizon_length as i32 <= self.last_year()
    }

    /// Copy of the series truncated at `last_year` inclusive
    pub fn truncated(&self, last_year: i32) -> Result<Self, SimError> {
        let keep: Vec<MarketYear> = self
            .observations
            .iter()
            .copied()
            .filter(|obs| obs.year <= last_year)
            .collect();
        Self::new(keep)
    }
}
