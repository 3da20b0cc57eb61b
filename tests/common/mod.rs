#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::io::Write;
use storagecost::domain::calendar::format_date;
use storagecost::domain::error::StorageError;
use storagecost::domain::ledger::{LedgerEntry, StorageLedger};
use storagecost::domain::operation::Operation;
use storagecost::domain::storage_config::StorageConfig;
use storagecost::ports::report_port::ReportPort;
use storagecost::ports::schedule_port::ScheduleInput;

pub const EXAMPLE_INI: &str = r#"
[storage]
max_vol = 1000
rate = 50
inj_cost = 2.0
wit_cost = 1.5
cost_per_day_per_unit = 0.1
start_day = 2024-01-01
"#;

pub const EXAMPLE_SCHEDULE_CSV: &str = "date,kind,volume\n\
    2024-01-15,injection,40\n\
    2024-02-01,injection,30\n\
    2024-03-15,withdrawal,35\n\
    2024-04-01,withdrawal,35\n";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_config() -> StorageConfig {
    StorageConfig::new(1000.0, 50.0, 2.0, 1.5, 0.1, "2024-01-01").unwrap()
}

pub fn sample_ledger() -> StorageLedger {
    StorageLedger::from_config(sample_config()).unwrap()
}

pub fn example_schedule() -> ScheduleInput {
    ScheduleInput {
        injection_dates: vec!["2024-01-15".into(), "2024-02-01".into()],
        withdrawal_dates: vec!["2024-03-15".into(), "2024-04-01".into()],
        injection_volumes: vec![40.0, 30.0],
        withdrawal_volumes: vec![35.0, 35.0],
    }
}

pub fn process_schedule(
    ledger: &mut StorageLedger,
    schedule: &ScheduleInput,
) -> Result<(), StorageError> {
    ledger.process(
        &schedule.injection_dates,
        &schedule.withdrawal_dates,
        &schedule.injection_volumes,
        &schedule.withdrawal_volumes,
    )
}

/// Daily operations starting at `start`, one per day.
pub fn daily_operations(start: NaiveDate, deltas: &[f64]) -> Vec<Operation> {
    deltas
        .iter()
        .enumerate()
        .map(|(i, &delta)| {
            let day = start + chrono::Duration::days(i as i64 + 1);
            if delta >= 0.0 {
                Operation::injection(day, delta)
            } else {
                Operation::withdrawal(day, -delta)
            }
        })
        .collect()
}

/// Split typed operations into the parallel sequences a schedule file yields.
pub fn schedule_input(operations: &[Operation]) -> ScheduleInput {
    let mut input = ScheduleInput::default();
    for op in operations {
        input.push(format_date(op.date), op.kind, op.volume);
    }
    input
}

pub fn schedule_to_csv(operations: &[Operation]) -> String {
    let mut out = String::from("date,kind,volume\n");
    for op in operations {
        out.push_str(&format!("{},{},{}\n", format_date(op.date), op.kind, op.volume));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// ReportPort that records what it was asked to write.
pub struct RecordingReport {
    pub written: RefCell<Vec<(usize, f64, String)>>,
}

impl RecordingReport {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReport {
    fn write(&self, entries: &[LedgerEntry], output_path: &str) -> Result<(), StorageError> {
        let total_cost = entries.last().map(|e| e.cumulative_cost).unwrap_or(0.0);
        self.written
            .borrow_mut()
            .push((entries.len(), total_cost, output_path.to_string()));
        Ok(())
    }
}
