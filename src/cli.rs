//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::{CsvPriceAdapter, CsvScheduleAdapter};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::format_ledger_table;
use crate::domain::calendar::parse_date;
use crate::domain::config_validation::{validate_storage_config, STORAGE_SECTION};
use crate::domain::error::StorageError;
use crate::domain::ledger::StorageLedger;
use crate::domain::overview::CostOverview;
use crate::domain::price_series::PriceSeries;
use crate::domain::storage_config::StorageConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;
use crate::ports::schedule_port::{ScheduleInput, SchedulePort};

#[derive(Parser, Debug)]
#[command(name = "storagecost", about = "Commodity storage cost and profit evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process a schedule and report its costs
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        schedule: PathBuf,
        /// Price series CSV (date,price) for profit figures
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// Write the ledger as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a storage configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Evaluate {
            config,
            schedule,
            prices,
            output,
        } => run_evaluate(&config, &schedule, prices.as_ref(), output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, StorageError> {
    FileConfigAdapter::from_file(path).map_err(|e| StorageError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_storage_config(adapter: &dyn ConfigPort) -> Result<StorageConfig, StorageError> {
    validate_storage_config(adapter)?;

    let start_str = adapter
        .get_string(STORAGE_SECTION, "start_day")
        .ok_or_else(|| StorageError::ConfigMissing {
            section: STORAGE_SECTION.into(),
            key: "start_day".into(),
        })?;
    let start_day = parse_date(&start_str).map_err(|_| StorageError::ConfigInvalid {
        section: STORAGE_SECTION.into(),
        key: "start_day".into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })?;

    let config = StorageConfig {
        max_vol: adapter.get_double(STORAGE_SECTION, "max_vol", 0.0),
        rate: adapter.get_double(STORAGE_SECTION, "rate", 0.0),
        inj_cost: adapter.get_double(STORAGE_SECTION, "inj_cost", 0.0),
        wit_cost: adapter.get_double(STORAGE_SECTION, "wit_cost", 0.0),
        cost_per_day_per_unit: adapter.get_double(STORAGE_SECTION, "cost_per_day_per_unit", 0.0),
        start_day,
        require_empty_at_end: adapter.get_bool(STORAGE_SECTION, "require_empty_at_end", false),
    };
    config.validate()?;
    Ok(config)
}

/// Process a schedule against a fresh ledger and summarize it.
pub fn evaluate(
    config: StorageConfig,
    schedule: &ScheduleInput,
    prices: Option<&dyn PricePort>,
) -> Result<(StorageLedger, CostOverview), StorageError> {
    let mut ledger = StorageLedger::from_config(config)?;
    ledger.process(
        &schedule.injection_dates,
        &schedule.withdrawal_dates,
        &schedule.injection_volumes,
        &schedule.withdrawal_volumes,
    )?;
    let overview = ledger.cost_overview(prices)?;
    Ok((ledger, overview))
}

pub fn run_evaluate(
    config_path: &PathBuf,
    schedule_path: &PathBuf,
    prices_path: Option<&PathBuf>,
    output_path: Option<&PathBuf>,
) -> Result<(), StorageError> {
    // Stage 1: Load and validate config
    info!(path = %config_path.display(), "loading config");
    let adapter = load_config(config_path)?;
    let config = build_storage_config(&adapter)?;

    // Stage 2: Load schedule and optional prices
    info!(path = %schedule_path.display(), "loading schedule");
    let schedule = CsvScheduleAdapter::new(schedule_path.clone()).load_schedule()?;
    info!(operations = schedule.len(), "schedule loaded");

    let prices: Option<PriceSeries> = match prices_path {
        Some(path) => {
            info!(path = %path.display(), "loading price series");
            let series = CsvPriceAdapter::new(path.clone()).load()?;
            info!(
                points = series.len(),
                first = ?series.first_date(),
                last = ?series.last_date(),
                "price series loaded"
            );
            Some(series)
        }
        None => None,
    };

    // Stage 3: Process and summarize
    let (ledger, overview) = evaluate(
        config,
        &schedule,
        prices.as_ref().map(|p| p as &dyn PricePort),
    )?;
    let entries = ledger.entries().unwrap_or_default();

    // Stage 4: Console output
    println!("{}", format_ledger_table(entries));
    println!("{overview}");

    // Stage 5: Ledger export
    let output = output_path
        .map(|p| p.display().to_string())
        .or_else(|| adapter.get_string("report", "output_path"));
    if let Some(path) = output {
        CsvReportAdapter.write(entries, &path)?;
        info!(path = %path, "ledger written");
    }

    Ok(())
}

pub fn run_validate(config_path: &PathBuf) -> Result<(), StorageError> {
    info!(path = %config_path.display(), "validating config");
    let adapter = load_config(config_path)?;
    let config = build_storage_config(&adapter)?;

    println!("Storage configuration is valid.");
    println!("  max_vol:               {}", config.max_vol);
    println!("  rate:                  {}", config.rate);
    println!("  inj_cost:              {}", config.inj_cost);
    println!("  wit_cost:              {}", config.wit_cost);
    println!("  cost_per_day_per_unit: {}", config.cost_per_day_per_unit);
    println!("  start_day:             {}", config.start_day);
    println!("  require_empty_at_end:  {}", config.require_empty_at_end);
    Ok(())
}
