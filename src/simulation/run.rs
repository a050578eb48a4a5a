//! One simulation run from a single historical start year

use log::debug;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::market::ReturnSeries;
use crate::portfolio::{InvestmentAccount, Ladder};

use super::engine::YearEngine;
use super::records::{FailureReason, RunOutcome, RunStatus, YearRecord};

enum RunState {
    Running,
    Terminal(RunStatus),
}

/// State machine driving `YearEngine` across a fixed horizon
///
/// Owns its ladder and investment account; sibling runs in a rolling
/// evaluation share no state, so runs may execute concurrently.
pub struct SimulationRun {
    start_year: i32,
    config: SimulationConfig,
    ladder: Ladder,
    account: InvestmentAccount,
    records: Vec<YearRecord>,
    state: RunState,
}

impl SimulationRun {
    /// Seed a run: set aside year-zero consumption, purchase the initial
    /// ladder at the start year's issuance rate, and invest the remainder
    ///
    /// A starting balance too small to fund the ladder leaves the run in a
    /// terminal `CapitalShortfall` state rather than clamping the purchase.
    pub fn new(
        start_year: i32,
        config: &SimulationConfig,
        series: &ReturnSeries,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let start = series
            .get(start_year)
            .ok_or(SimError::MissingMarketData { year: start_year })?;

        let ladder = Ladder::initialize(
            start_year,
            config.horizon_length,
            config.target_consumption,
            &config.inflation,
        )?;

        let year_zero_consumption = config.target_consumption;
        let ladder_cost: f64 = ladder
            .rungs()
            .map(|cd| {
                config
                    .pricing
                    .purchase_price(cd.face_value, start.cd_rate, cd.tenor_years())
            })
            .sum();

        let remainder = config.initial_balance - year_zero_consumption - ladder_cost;
        let mut account = InvestmentAccount::new();
        let state = if remainder < 0.0 {
            debug!(
                "start {}: balance {:.2} cannot fund consumption plus ladder cost {:.2}",
                start_year, config.initial_balance, ladder_cost
            );
            RunState::Terminal(RunStatus::Failed(FailureReason::CapitalShortfall {
                year: start_year,
                shortfall: -remainder,
            }))
        } else {
            account.deposit(remainder);
            RunState::Running
        };

        Ok(Self {
            start_year,
            config: config.clone(),
            ladder,
            account,
            records: Vec::with_capacity(config.horizon_length as usize),
            state,
        })
    }

    /// Drive the run to its terminal state
    ///
    /// A capital shortfall is recorded as the outcome, not propagated;
    /// integrity violations and missing market data are hard errors.
    pub fn execute(mut self, series: &ReturnSeries) -> Result<RunOutcome, SimError> {
        if let RunState::Terminal(status) = self.state {
            return Ok(RunOutcome {
                start_year: self.start_year,
                status,
                records: self.records,
            });
        }

        let engine = YearEngine::new(&self.config, self.start_year);
        let horizon = self.config.horizon_length as i32;

        for year in (self.start_year + 1)..=(self.start_year + horizon) {
            let market = series
                .get(year)
                .ok_or(SimError::MissingMarketData { year })?;

            match engine.advance_year(year, market, &mut self.ladder, &mut self.account) {
                Ok(record) => self.records.push(record),
                Err(err @ SimError::InsufficientFunds { .. }) => {
                    let shortfall = err.shortfall().unwrap_or(0.0);
                    debug!("start {}: capital shortfall of {:.2} in {}", self.start_year, shortfall, year);
                    self.state = RunState::Terminal(RunStatus::Failed(
                        FailureReason::CapitalShortfall { year, shortfall },
                    ));
                    break;
                }
                Err(other) => return Err(other),
            }
        }

        let status = match self.state {
            RunState::Terminal(status) => status,
            RunState::Running => RunStatus::Completed,
        };

        Ok(RunOutcome {
            start_year: self.start_year,
            status,
            records: self.records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MarketYear;
    use approx::assert_relative_eq;

    fn sustainable_config() -> SimulationConfig {
        SimulationConfig {
            horizon_length: 10,
            initial_balance: 300_000.0,
            target_consumption: 10_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_completed_run_has_one_record_per_year() {
        let config = sustainable_config();
        let series = ReturnSeries::constant(2000, 11, 0.05, 0.03).unwrap();

        let outcome = SimulationRun::new(2000, &config, &series)
            .unwrap()
            .execute(&series)
            .unwrap();

        assert!(outcome.is_completed());
        assert_eq!(outcome.records.len(), 10);
        let years: Vec<i32> = outcome.records.iter().map(|r| r.year).collect();
        assert_eq!(years, (2001..=2010).collect::<Vec<_>>());
    }

    #[test]
    fn test_sustainable_run_net_worth_non_decreasing() {
        let config = sustainable_config();
        let series = ReturnSeries::constant(2000, 11, 0.05, 0.03).unwrap();

        let outcome = SimulationRun::new(2000, &config, &series)
            .unwrap()
            .execute(&series)
            .unwrap();

        assert!(outcome.is_completed());
        for pair in outcome.records.windows(2) {
            assert!(
                pair[1].net_worth > pair[0].net_worth,
                "net worth fell from {:.2} to {:.2} in {}",
                pair[0].net_worth,
                pair[1].net_worth,
                pair[1].year
            );
        }
    }

    #[test]
    fn test_crash_year_fails_with_capital_shortfall() {
        // Sized so flat returns barely complete the horizon while a -40%
        // year in 2010 leaves the account short of the replacement CD price.
        let config = SimulationConfig {
            horizon_length: 10,
            initial_balance: 170_000.0,
            target_consumption: 10_000.0,
            ..Default::default()
        };

        let flat = ReturnSeries::constant(2000, 11, 0.0, 0.03).unwrap();
        let baseline = SimulationRun::new(2000, &config, &flat)
            .unwrap()
            .execute(&flat)
            .unwrap();
        assert!(baseline.is_completed());

        let observations = flat
            .years()
            .map(|year| MarketYear {
                year,
                investment_return: if year == 2010 { -0.40 } else { 0.0 },
                cd_rate: 0.03,
            })
            .collect();
        let shocked = ReturnSeries::new(observations).unwrap();

        let outcome = SimulationRun::new(2000, &config, &shocked)
            .unwrap()
            .execute(&shocked)
            .unwrap();

        match &outcome.status {
            RunStatus::Failed(FailureReason::CapitalShortfall { year, shortfall }) => {
                assert_eq!(*year, 2010);
                assert_relative_eq!(*shortfall, 2_803.2276, max_relative = 1e-4);
            }
            other => panic!("expected capital shortfall, got {:?}", other),
        }
        // No record for the failing year or beyond
        assert_eq!(outcome.records.len(), 9);
        assert_eq!(outcome.records.last().unwrap().year, 2009);
    }

    #[test]
    fn test_failure_depends_only_on_prefix() {
        let config = SimulationConfig {
            horizon_length: 10,
            initial_balance: 170_000.0,
            target_consumption: 10_000.0,
            ..Default::default()
        };

        let observations = (2000..=2010)
            .map(|year| MarketYear {
                year,
                investment_return: if year == 2008 { -0.95 } else { 0.0 },
                cd_rate: 0.03,
            })
            .collect();
        let series = ReturnSeries::new(observations).unwrap();

        let full = SimulationRun::new(2000, &config, &series)
            .unwrap()
            .execute(&series)
            .unwrap();
        let failing_year = match &full.status {
            RunStatus::Failed(FailureReason::CapitalShortfall { year, .. }) => *year,
            other => panic!("expected failure, got {:?}", other),
        };
        assert_eq!(failing_year, 2008);

        let truncated = series.truncated(failing_year).unwrap();
        let prefix = SimulationRun::new(2000, &config, &truncated)
            .unwrap()
            .execute(&truncated)
            .unwrap();

        assert_eq!(prefix.status, full.status);
        assert_eq!(prefix.records, full.records);
    }

    #[test]
    fn test_underfunded_initialization_fails_at_start_year() {
        // 50k cannot cover year-zero consumption plus a ~85k ladder
        let config = SimulationConfig {
            horizon_length: 10,
            initial_balance: 50_000.0,
            target_consumption: 10_000.0,
            ..Default::default()
        };
        let series = ReturnSeries::constant(2000, 11, 0.05, 0.03).unwrap();

        let outcome = SimulationRun::new(2000, &config, &series)
            .unwrap()
            .execute(&series)
            .unwrap();

        match &outcome.status {
            RunStatus::Failed(FailureReason::CapitalShortfall { year, shortfall }) => {
                assert_eq!(*year, 2000);
                assert!(*shortfall > 0.0);
            }
            other => panic!("expected initialization shortfall, got {:?}", other),
        }
        assert!(outcome.records.is_empty());
        assert_relative_eq!(outcome.final_net_worth(), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let config = SimulationConfig {
            horizon_length: 0,
            ..Default::default()
        };
        let series = ReturnSeries::constant(2000, 11, 0.05, 0.03).unwrap();
        assert!(matches!(
            SimulationRun::new(2000, &config, &series),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_start_year_is_hard_error() {
        let config = sustainable_config();
        let series = ReturnSeries::constant(2000, 11, 0.05, 0.03).unwrap();
        assert!(matches!(
            SimulationRun::new(1980, &config, &series),
            Err(SimError::MissingMarketData { year: 1980 })
        ));
    }
}
