//! CSV file adapters for schedules and price series.
//!
//! Schedule files have a `date,kind,volume` header, price files a
//! `date,price` header. Dates stay as text in schedules so the ledger does
//! its own date validation.

use crate::domain::calendar::parse_date;
use crate::domain::error::StorageError;
use crate::domain::operation::OperationKind;
use crate::domain::price_series::PriceSeries;
use crate::ports::schedule_port::{ScheduleInput, SchedulePort};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct ScheduleRow {
    date: String,
    kind: String,
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    price: f64,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(input)
}

fn open(path: &PathBuf) -> Result<File, StorageError> {
    File::open(path).map_err(|e| StorageError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })
}

/// Parse schedule rows from any reader; `source` names it in errors.
pub fn read_schedule<R: Read>(input: R, source: &str) -> Result<ScheduleInput, StorageError> {
    let mut rdr = reader(input);
    let mut schedule = ScheduleInput::default();

    for (idx, result) in rdr.deserialize::<ScheduleRow>().enumerate() {
        let row = result.map_err(|e| StorageError::Data {
            reason: format!("{} row {}: {}", source, idx + 1, e),
        })?;
        let kind: OperationKind = row.kind.parse().map_err(|e| StorageError::Data {
            reason: format!("{} row {}: {}", source, idx + 1, e),
        })?;
        schedule.push(row.date, kind, row.volume);
    }

    Ok(schedule)
}

/// Parse a `date,price` series from any reader; `source` names it in errors.
pub fn read_price_series<R: Read>(input: R, source: &str) -> Result<PriceSeries, StorageError> {
    let mut rdr = reader(input);
    let mut series = PriceSeries::new();

    for (idx, result) in rdr.deserialize::<PriceRow>().enumerate() {
        let row = result.map_err(|e| StorageError::Data {
            reason: format!("{} row {}: {}", source, idx + 1, e),
        })?;
        let date = parse_date(&row.date).map_err(|e| StorageError::Data {
            reason: format!("{} row {}: {}", source, idx + 1, e),
        })?;
        series.insert(date, row.price).map_err(|e| StorageError::Data {
            reason: format!("{} row {}: {}", source, idx + 1, e),
        })?;
    }

    Ok(series)
}

pub struct CsvScheduleAdapter {
    path: PathBuf,
}

impl CsvScheduleAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SchedulePort for CsvScheduleAdapter {
    fn load_schedule(&self) -> Result<ScheduleInput, StorageError> {
        let file = open(&self.path)?;
        read_schedule(file, &self.path.display().to_string())
    }
}

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<PriceSeries, StorageError> {
        let file = open(&self.path)?;
        read_price_series(file, &self.path.display().to_string())
    }
}
