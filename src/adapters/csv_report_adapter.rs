//! CSV ledger export implementing ReportPort.

use serde::Serialize;
use std::io::Write;

use crate::domain::calendar::format_date;
use crate::domain::error::StorageError;
use crate::domain::ledger::LedgerEntry;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    date: String,
    kind: &'a str,
    volume: f64,
    volume_before: f64,
    volume_after: f64,
    days_elapsed: i64,
    operation_cost: f64,
    holding_cost: f64,
    cumulative_cost: f64,
}

impl<'a> From<&'a LedgerEntry> for LedgerRow<'a> {
    fn from(entry: &'a LedgerEntry) -> Self {
        LedgerRow {
            date: format_date(entry.date),
            kind: entry.kind.as_str(),
            volume: entry.volume,
            volume_before: entry.volume_before,
            volume_after: entry.volume_after,
            days_elapsed: entry.days_elapsed,
            operation_cost: entry.operation_cost,
            holding_cost: entry.holding_cost,
            cumulative_cost: entry.cumulative_cost,
        }
    }
}

/// Write ledger rows, with header, to any writer.
pub fn write_ledger<W: Write>(writer: W, entries: &[LedgerEntry]) -> Result<(), StorageError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(LedgerRow::from(entry))
            .map_err(|e| StorageError::Data {
                reason: format!("failed to write ledger row: {e}"),
            })?;
    }
    if entries.is_empty() {
        wtr.write_record([
            "date",
            "kind",
            "volume",
            "volume_before",
            "volume_after",
            "days_elapsed",
            "operation_cost",
            "holding_cost",
            "cumulative_cost",
        ])
        .map_err(|e| StorageError::Data {
            reason: format!("failed to write ledger header: {e}"),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(&self, entries: &[LedgerEntry], output_path: &str) -> Result<(), StorageError> {
        let file = std::fs::File::create(output_path)?;
        write_ledger(file, entries)
    }
}
