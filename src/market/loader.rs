//! CSV loader for historical return series
//!
//! Expects a header row followed by `year,investment_return,cd_rate` records.
//! Rates are decimal fractions (0.05 = 5%).

use std::error::Error;
use std::fs::File;
use std::path::Path;

use super::series::{MarketYear, ReturnSeries};

/// Load a return series from a CSV file
///
/// Rows may appear in any order; the resulting series must be contiguous by
/// calendar year.
pub fn load_return_series(path: &Path) -> Result<ReturnSeries, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut observations = Vec::new();

    for result in reader.records() {
        let record = result?;
        let year: i32 = record[0].trim().parse()?;
        let investment_return: f64 = record[1].trim().parse()?;
        let cd_rate: f64 = record[2].trim().parse()?;

        observations.push(MarketYear {
            year,
            investment_return,
            cd_rate,
        });
    }

    observations.sort_by_key(|obs| obs.year);
    let series = ReturnSeries::new(observations)?;

    log::debug!(
        "loaded {} market observations ({}..={})",
        series.len(),
        series.first_year(),
        series.last_year()
    );
    Ok(series)
}
