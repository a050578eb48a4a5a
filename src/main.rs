//! CD-Ladder CLI
//!
//! Evaluates the ladder-and-harvest drawdown strategy from every eligible
//! start year of a historical return series (or a synthetic constant-rate
//! series) and reports per-run outcomes.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use cd_ladder::{
    load_return_series, report, FailureReason, InflationAdjustment, PricingConvention,
    ReturnSeries, RollingEvaluator, RunStatus, SimulationConfig,
};

#[derive(Debug, Parser)]
#[command(name = "cd-ladder", version, about = "CD-ladder retirement drawdown simulator")]
struct Cli {
    /// CSV file of historical observations (year,investment_return,cd_rate).
    /// Omit to simulate a synthetic constant-rate series.
    #[arg(long)]
    returns_file: Option<PathBuf>,

    /// Starting portfolio balance
    #[arg(long, default_value_t = 1_000_000.0)]
    initial_balance: f64,

    /// Desired annual consumption
    #[arg(long, default_value_t = 100_000.0)]
    target_consumption: f64,

    /// Ladder tenor in years (also the run horizon)
    #[arg(long, default_value_t = 5)]
    horizon_length: u32,

    /// Annual escalation of the consumption target (default: none)
    #[arg(long)]
    inflation_rate: Option<f64>,

    /// Discounting convention for CD purchase prices
    #[arg(long, value_enum, default_value = "compound")]
    pricing: PricingArg,

    /// Constant investment return for the synthetic series
    #[arg(long, default_value_t = 0.05)]
    investment_return: f64,

    /// Constant CD issuance rate for the synthetic series
    #[arg(long, default_value_t = 0.03)]
    cd_rate: f64,

    /// First year of the synthetic series
    #[arg(long, default_value_t = 1926)]
    first_year: i32,

    /// Length of the synthetic series in years
    #[arg(long, default_value_t = 100)]
    years: u32,

    /// Write per-year records to this CSV file
    #[arg(long)]
    records_out: Option<PathBuf>,

    /// Write per-run summaries to this CSV file
    #[arg(long)]
    summary_out: Option<PathBuf>,

    /// Include CSV header rows
    #[arg(long)]
    include_header: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PricingArg {
    Compound,
    Simple,
}

impl From<PricingArg> for PricingConvention {
    fn from(arg: PricingArg) -> Self {
        match arg {
            PricingArg::Compound => PricingConvention::CompoundDiscount,
            PricingArg::Simple => PricingConvention::SimpleDiscount,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SimulationConfig {
        horizon_length: cli.horizon_length,
        initial_balance: cli.initial_balance,
        target_consumption: cli.target_consumption,
        inflation: match cli.inflation_rate {
            Some(rate) => InflationAdjustment::FixedRate(rate),
            None => InflationAdjustment::None,
        },
        pricing: cli.pricing.into(),
    };

    let series = match &cli.returns_file {
        Some(path) => load_return_series(path)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("failed to load return series from {}", path.display()))?,
        None => ReturnSeries::constant(
            cli.first_year,
            cli.years,
            cli.investment_return,
            cli.cd_rate,
        )?,
    };

    let evaluator = RollingEvaluator::new(config)?;
    let evaluation = evaluator.evaluate(&series)?;

    println!(
        "Evaluated {} start years ({}..={}), horizon {} years",
        evaluation.summary.eligible_runs,
        series.first_year(),
        series.last_year(),
        cli.horizon_length,
    );
    println!(
        "Completed: {}  Failed: {}  Success rate: {:.1}%\n",
        evaluation.summary.completed,
        evaluation.summary.failed,
        evaluation.summary.success_rate * 100.0,
    );

    println!(
        "{:>6} {:>10} {:>6} {:>14} {:>14}",
        "Start", "Status", "Years", "Shortfall", "FinalNetWorth"
    );
    println!("{}", "-".repeat(56));
    for outcome in &evaluation.outcomes {
        let (status, shortfall) = match &outcome.status {
            RunStatus::Completed => ("completed", String::new()),
            RunStatus::Failed(FailureReason::CapitalShortfall { shortfall, .. }) => {
                ("failed", format!("{:.2}", shortfall))
            }
        };
        println!(
            "{:>6} {:>10} {:>6} {:>14} {:>14.2}",
            outcome.start_year,
            status,
            outcome.records.len(),
            shortfall,
            outcome.final_net_worth(),
        );
    }

    if let Some(path) = &cli.records_out {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        report::write_records(file, &evaluation.outcomes, cli.include_header)?;
        println!("\nPer-year records written to {}", path.display());
    }

    if let Some(path) = &cli.summary_out {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        report::write_summaries(file, &evaluation.outcomes, cli.include_header)?;
        println!("Per-run summaries written to {}", path.display());
    }

    Ok(())
}
