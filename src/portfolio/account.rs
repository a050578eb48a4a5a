//! The non-laddered investment balance

use crate::error::SimError;

/// Invested remainder of the portfolio with a growth-since-last-harvest
/// marker used to report realized capital gains
///
/// The balance never goes negative: a harvest exceeding the balance fails
/// rather than being clamped, which is the run-failure trigger.
#[derive(Debug, Clone, Default)]
pub struct InvestmentAccount {
    balance: f64,
    accrued_gains: f64,
}

impl InvestmentAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&mut self, amount: f64) {
        self.balance += amount;
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Net growth accumulated since the last harvest; negative after losses
    pub fn accrued_gains(&self) -> f64 {
        self.accrued_gains
    }

    /// Apply one year of market return; returns the growth amount
    pub fn grow(&mut self, return_rate: f64) -> f64 {
        let growth = self.balance * return_rate;
        self.balance += growth;
        self.accrued_gains += growth;
        growth
    }

    /// Withdraw `amount`, drawn preferentially from accrued gains
    ///
    /// Returns the capital gains realized by the withdrawal. Requests
    /// exceeding the balance fail with the shortfall left for the caller to
    /// report.
    pub fn harvest(&mut self, amount: f64) -> Result<f64, SimError> {
        if amount > self.balance {
            return Err(SimError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }

        let realized = amount.min(self.accrued_gains.max(0.0));
        self.accrued_gains -= realized;
        self.balance -= amount;
        Ok(realized)
    }
}
