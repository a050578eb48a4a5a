//! CSV serialization of evaluation output
//!
//! Row-per-year records and row-per-run summaries. Column order follows
//! struct declaration order and is stable across runs of equal horizon.

use std::io::Write;

use serde::Serialize;

use crate::simulation::{FailureReason, RunOutcome, RunStatus};

#[derive(Debug, Serialize)]
struct RecordRow {
    start_year: i32,
    year: i32,
    consumption: f64,
    balance_before_growth: f64,
    balance_after_growth: f64,
    gains_harvested: f64,
    cd_purchase_price: f64,
    new_cd_maturity: i32,
    new_cd_face_value: f64,
    investment_balance: f64,
    ladder_face_value: f64,
    net_worth: f64,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    start_year: i32,
    status: &'static str,
    failure_year: Option<i32>,
    shortfall: Option<f64>,
    years_simulated: usize,
    final_net_worth: f64,
}

impl SummaryRow {
    fn from_outcome(outcome: &RunOutcome) -> Self {
        let (status, failure_year, shortfall) = match &outcome.status {
            RunStatus::Completed => ("completed", None, None),
            RunStatus::Failed(FailureReason::CapitalShortfall { year, shortfall }) => {
                ("failed", Some(*year), Some(*shortfall))
            }
        };

        Self {
            start_year: outcome.start_year,
            status,
            failure_year,
            shortfall,
            years_simulated: outcome.records.len(),
            final_net_worth: outcome.final_net_worth(),
        }
    }
}

/// Write every per-year record across all outcomes, one row per simulated
/// year, ordered by start year then calendar year
pub fn write_records<W: Write>(
    writer: W,
    outcomes: &[RunOutcome],
    include_header: bool,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(include_header)
        .from_writer(writer);

    for outcome in outcomes {
        for record in &outcome.records {
            csv_writer.serialize(RecordRow {
                start_year: outcome.start_year,
                year: record.year,
                consumption: record.consumption,
                balance_before_growth: record.balance_before_growth,
                balance_after_growth: record.balance_after_growth,
                gains_harvested: record.gains_harvested,
                cd_purchase_price: record.cd_purchase_price,
                new_cd_maturity: record.new_cd_maturity,
                new_cd_face_value: record.new_cd_face_value,
                investment_balance: record.investment_balance,
                ladder_face_value: record.ladder_face_value,
                net_worth: record.net_worth,
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write one terminal-status row per evaluated start year
pub fn write_summaries<W: Write>(
    writer: W,
    outcomes: &[RunOutcome],
    include_header: bool,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(include_header)
        .from_writer(writer);

    for outcome in outcomes {
        csv_writer.serialize(SummaryRow::from_outcome(outcome))?;
    }

    csv_writer.flush()?;
    Ok(())
}
