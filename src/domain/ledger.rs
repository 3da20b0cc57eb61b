//! Storage ledger: schedule validation and cost accrual.
//!
//! A schedule is walked in chronological order from the configured start day
//! with the facility empty. Between consecutive points the volume held accrues
//! holding cost; each operation then moves volume, is checked against the
//! capacity and rate limits, and is charged its per-unit cost.
//!
//! [`StorageLedger::process`] is all-or-nothing: the stored ledger is only
//! replaced once the whole schedule has been accepted.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::calendar::days_between;
use super::error::StorageError;
use super::operation::{pair_operations, sort_chronologically, Operation, OperationKind};
use super::overview::CostOverview;
use super::storage_config::StorageConfig;
use crate::ports::price_port::PricePort;

/// Rounding slack on the volume bounds, as a fraction of capacity.
const VOLUME_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: OperationKind,
    pub volume: f64,
    /// Stored volume during the interval that ended at this entry.
    pub volume_before: f64,
    pub volume_after: f64,
    /// Days since the previous entry (or the start day for the first).
    pub days_elapsed: i64,
    pub operation_cost: f64,
    pub holding_cost: f64,
    pub cumulative_cost: f64,
}

impl LedgerEntry {
    pub fn is_injection(&self) -> bool {
        self.kind == OperationKind::Injection
    }

    pub fn is_withdrawal(&self) -> bool {
        self.kind == OperationKind::Withdrawal
    }

    /// Volume-days held over the interval that ended at this entry.
    pub fn volume_days(&self) -> f64 {
        self.volume_before * self.days_elapsed as f64
    }
}

/// Walk a schedule and build its ledger. Operations need not be sorted.
pub fn run_schedule(
    config: &StorageConfig,
    mut operations: Vec<Operation>,
) -> Result<Vec<LedgerEntry>, StorageError> {
    sort_chronologically(&mut operations);

    let mut entries: Vec<LedgerEntry> = Vec::with_capacity(operations.len());
    let mut volume = 0.0_f64;
    let mut prev_date = config.start_day;
    let mut cumulative_cost = 0.0_f64;

    for op in operations {
        check_operation(config, &op)?;

        let days_elapsed = days_between(prev_date, op.date);
        let holding_cost = config.holding_cost(volume, days_elapsed);

        let volume_before = volume;
        volume += op.delta();
        let slack = VOLUME_TOLERANCE * config.max_vol;

        if volume > config.max_vol + slack {
            return Err(StorageError::CapacityExceeded {
                date: op.date,
                kind: op.kind,
                volume: op.volume,
                resulting: volume,
                max_vol: config.max_vol,
            });
        }
        if volume < -slack {
            return Err(StorageError::InsufficientVolume {
                date: op.date,
                kind: op.kind,
                volume: op.volume,
                available: volume_before,
            });
        }
        // Absorb the accepted rounding error so later intervals start in bounds.
        volume = volume.clamp(0.0, config.max_vol);

        let operation_cost = config.operation_cost(op.kind, op.volume);
        cumulative_cost += holding_cost + operation_cost;

        debug!(
            date = %op.date,
            kind = %op.kind,
            volume = op.volume,
            volume_after = volume,
            holding_cost,
            operation_cost,
            "operation applied"
        );

        entries.push(LedgerEntry {
            date: op.date,
            kind: op.kind,
            volume: op.volume,
            volume_before,
            volume_after: volume,
            days_elapsed,
            operation_cost,
            holding_cost,
            cumulative_cost,
        });

        prev_date = op.date;
    }

    if config.require_empty_at_end {
        if let Some(last) = entries.last() {
            if last.volume_after > VOLUME_TOLERANCE * config.max_vol {
                return Err(StorageError::ResidualVolume {
                    date: last.date,
                    volume: last.volume_after,
                });
            }
        }
    }

    Ok(entries)
}

fn check_operation(config: &StorageConfig, op: &Operation) -> Result<(), StorageError> {
    if !op.volume.is_finite() || op.volume <= 0.0 {
        return Err(StorageError::InvalidVolume {
            date: op.date,
            kind: op.kind,
            volume: op.volume,
        });
    }
    if op.date < config.start_day {
        return Err(StorageError::BeforeStart {
            date: op.date,
            kind: op.kind,
            start_day: config.start_day,
        });
    }
    if op.volume > config.rate {
        return Err(StorageError::RateExceeded {
            date: op.date,
            kind: op.kind,
            volume: op.volume,
            rate: config.rate,
        });
    }
    Ok(())
}

/// A single storage facility and the ledger of its most recent schedule.
///
/// `process` takes `&mut self`; evaluate independent schedules concurrently
/// with separate instances.
#[derive(Debug, Clone)]
pub struct StorageLedger {
    config: StorageConfig,
    entries: Option<Vec<LedgerEntry>>,
}

impl StorageLedger {
    pub fn new(
        max_vol: f64,
        rate: f64,
        inj_cost: f64,
        wit_cost: f64,
        cost_per_day_per_unit: f64,
        start_day: &str,
    ) -> Result<Self, StorageError> {
        let config = StorageConfig::new(
            max_vol,
            rate,
            inj_cost,
            wit_cost,
            cost_per_day_per_unit,
            start_day,
        )?;
        Ok(StorageLedger {
            config,
            entries: None,
        })
    }

    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        Ok(StorageLedger {
            config,
            entries: None,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Ledger of the last successful `process` call.
    pub fn entries(&self) -> Option<&[LedgerEntry]> {
        self.entries.as_deref()
    }

    pub fn is_processed(&self) -> bool {
        self.entries.is_some()
    }

    /// Volume in storage after the last processed operation.
    pub fn final_volume(&self) -> Option<f64> {
        self.entries
            .as_ref()
            .map(|e| e.last().map(|last| last.volume_after).unwrap_or(0.0))
    }

    /// Process a schedule given as parallel date/volume sequences per kind.
    ///
    /// Dates are `YYYY-MM-DD` strings. On error the previously stored ledger
    /// is kept unchanged.
    pub fn process<S: AsRef<str>>(
        &mut self,
        injection_dates: &[S],
        withdrawal_dates: &[S],
        injection_volumes: &[f64],
        withdrawal_volumes: &[f64],
    ) -> Result<(), StorageError> {
        let mut operations =
            pair_operations(OperationKind::Injection, injection_dates, injection_volumes)?;
        operations.extend(pair_operations(
            OperationKind::Withdrawal,
            withdrawal_dates,
            withdrawal_volumes,
        )?);
        self.process_operations(operations)
    }

    pub fn process_operations(&mut self, operations: Vec<Operation>) -> Result<(), StorageError> {
        let count = operations.len();
        match run_schedule(&self.config, operations) {
            Ok(entries) => {
                info!(
                    operations = count,
                    total_cost = entries.last().map(|e| e.cumulative_cost).unwrap_or(0.0),
                    "schedule processed"
                );
                self.entries = Some(entries);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "schedule rejected");
                Err(e)
            }
        }
    }

    /// Summarize the processed ledger. With a price curve, profit figures
    /// are included.
    pub fn cost_overview(&self, prices: Option<&dyn PricePort>) -> Result<CostOverview, StorageError> {
        let entries = self.entries.as_deref().ok_or(StorageError::NoLedger)?;
        CostOverview::compute(entries, prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> StorageLedger {
        StorageLedger::new(1000.0, 50.0, 2.0, 1.5, 0.1, "2024-01-01").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn process_example(ledger: &mut StorageLedger) -> Result<(), StorageError> {
        ledger.process(
            &["2024-01-15", "2024-02-01"],
            &["2024-03-15", "2024-04-01"],
            &[40.0, 30.0],
            &[35.0, 35.0],
        )
    }

    #[test]
    fn new_ledger_is_unprocessed() {
        let ledger = sample_ledger();
        assert!(!ledger.is_processed());
        assert!(ledger.entries().is_none());
        assert_eq!(ledger.final_volume(), None);
    }

    #[test]
    fn new_rejects_bad_parameters() {
        let err = StorageLedger::new(1000.0, 0.0, 2.0, 1.5, 0.1, "2024-01-01").unwrap_err();
        assert!(matches!(err, StorageError::Configuration { .. }));
        let err = StorageLedger::new(1000.0, 50.0, 2.0, 1.5, 0.1, "01/01/2024").unwrap_err();
        assert!(matches!(err, StorageError::Configuration { .. }));
    }

    #[test]
    fn from_config_revalidates() {
        let mut config = sample_ledger().config().clone();
        config.max_vol = -1.0;
        assert!(StorageLedger::from_config(config).is_err());
    }

    #[test]
    fn example_schedule_volumes_and_costs() {
        let mut ledger = sample_ledger();
        process_example(&mut ledger).unwrap();
        let entries = ledger.entries().unwrap();

        let volumes: Vec<f64> = entries.iter().map(|e| e.volume_after).collect();
        assert_eq!(volumes, vec![40.0, 70.0, 35.0, 0.0]);

        let days: Vec<i64> = entries.iter().map(|e| e.days_elapsed).collect();
        assert_eq!(days, vec![14, 17, 43, 17]);

        assert!((entries[0].holding_cost - 0.0).abs() < 1e-9);
        assert!((entries[1].holding_cost - 68.0).abs() < 1e-9);
        assert!((entries[2].holding_cost - 301.0).abs() < 1e-9);
        assert!((entries[3].holding_cost - 59.5).abs() < 1e-9);

        assert!((entries[0].operation_cost - 80.0).abs() < 1e-9);
        assert!((entries[2].operation_cost - 52.5).abs() < 1e-9);
        assert!((entries[3].cumulative_cost - 673.5).abs() < 1e-9);
        assert_eq!(ledger.final_volume(), Some(0.0));
    }

    #[test]
    fn cumulative_cost_is_running_sum() {
        let mut ledger = sample_ledger();
        process_example(&mut ledger).unwrap();
        let mut running = 0.0;
        for entry in ledger.entries().unwrap() {
            running += entry.holding_cost + entry.operation_cost;
            assert!((entry.cumulative_cost - running).abs() < 1e-9);
        }
    }

    #[test]
    fn rate_exceeded_leaves_no_ledger() {
        let mut ledger = sample_ledger();
        let err = ledger
            .process(&["2024-01-15"], &[] as &[&str], &[60.0], &[])
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::RateExceeded { kind: OperationKind::Injection, volume, rate, .. }
                if volume == 60.0 && rate == 50.0
        ));
        assert!(ledger.entries().is_none());
    }

    #[test]
    fn volume_equal_to_rate_is_allowed() {
        let mut ledger = sample_ledger();
        ledger
            .process(&["2024-01-15"], &[] as &[&str], &[50.0], &[])
            .unwrap();
        assert_eq!(ledger.entries().unwrap()[0].volume_after, 50.0);
    }

    #[test]
    fn capacity_exceeded_keeps_previous_ledger() {
        let mut ledger = StorageLedger::new(1000.0, 1000.0, 0.0, 0.0, 0.0, "2024-01-01").unwrap();
        ledger
            .process(&["2024-01-02"], &["2024-01-03"], &[10.0], &[10.0])
            .unwrap();
        let before = ledger.entries().unwrap().to_vec();

        let err = ledger
            .process(&["2024-01-05", "2024-01-06"], &[] as &[&str], &[1000.0, 50.0], &[])
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::CapacityExceeded { date, resulting, .. }
                if date == NaiveDate::from_ymd_opt(2024, 1, 6).unwrap() && resulting == 1050.0
        ));
        assert_eq!(ledger.entries().unwrap(), before.as_slice());
    }

    #[test]
    fn filling_exactly_to_capacity_is_allowed() {
        let mut ledger = StorageLedger::new(100.0, 100.0, 0.0, 0.0, 0.0, "2024-01-01").unwrap();
        ledger
            .process(&["2024-01-02"], &[] as &[&str], &[100.0], &[])
            .unwrap();
        assert_eq!(ledger.final_volume(), Some(100.0));
    }

    #[test]
    fn fractional_fill_to_capacity_is_allowed() {
        // 0.1 + 0.2 sums to 0.30000000000000004 in binary floating point.
        let mut ledger = StorageLedger::new(0.3, 1.0, 0.0, 0.0, 0.0, "2024-01-01").unwrap();
        ledger
            .process(&["2024-01-02", "2024-01-03"], &[] as &[&str], &[0.1, 0.2], &[])
            .unwrap();
        assert_eq!(ledger.final_volume(), Some(0.3));
    }

    #[test]
    fn fractional_drain_to_empty_is_allowed() {
        // 0.3 - 0.1 leaves 0.19999999999999998, just short of the final 0.2.
        let mut ledger = StorageLedger::new(1.0, 1.0, 0.0, 0.0, 1.0, "2024-01-01")
            .unwrap();
        ledger
            .process(
                &["2024-01-02"],
                &["2024-01-03", "2024-01-04"],
                &[0.3],
                &[0.1, 0.2],
            )
            .unwrap();
        let entries = ledger.entries().unwrap();
        assert_eq!(entries[2].volume_after, 0.0);
        assert!(entries.iter().all(|e| e.volume_after >= 0.0));
    }

    #[test]
    fn fractional_drain_satisfies_residual_check() {
        let config = StorageConfig::new(1.0, 1.0, 0.0, 0.0, 0.0, "2024-01-01")
            .unwrap()
            .with_require_empty_at_end(true);
        let mut ledger = StorageLedger::from_config(config).unwrap();
        ledger
            .process(
                &["2024-01-02"],
                &["2024-01-03", "2024-01-04"],
                &[0.3],
                &[0.1, 0.2],
            )
            .unwrap();
    }

    #[test]
    fn overfill_beyond_rounding_still_fails() {
        let mut ledger = StorageLedger::new(0.3, 1.0, 0.0, 0.0, 0.0, "2024-01-01").unwrap();
        let err = ledger
            .process(&["2024-01-02", "2024-01-03"], &[] as &[&str], &[0.1, 0.2001], &[])
            .unwrap_err();
        assert!(matches!(err, StorageError::CapacityExceeded { .. }));
    }

    #[test]
    fn withdrawing_more_than_held_fails() {
        let mut ledger = sample_ledger();
        let err = ledger
            .process(&["2024-01-10"], &["2024-01-12"], &[10.0], &[20.0])
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::InsufficientVolume { kind: OperationKind::Withdrawal, available, .. }
                if available == 10.0
        ));
        assert!(ledger.entries().is_none());
    }

    #[test]
    fn same_day_injection_settles_before_withdrawal() {
        let mut ledger = sample_ledger();
        ledger
            .process(&["2024-01-10"], &["2024-01-10"], &[20.0], &[20.0])
            .unwrap();
        let entries = ledger.entries().unwrap();
        assert_eq!(entries[0].kind, OperationKind::Injection);
        assert_eq!(entries[1].kind, OperationKind::Withdrawal);
        assert_eq!(entries[1].days_elapsed, 0);
        assert_eq!(entries[1].holding_cost, 0.0);
    }

    #[test]
    fn operation_on_start_day_accrues_nothing() {
        let mut ledger = sample_ledger();
        ledger
            .process(&["2024-01-01"], &[] as &[&str], &[10.0], &[])
            .unwrap();
        let entry = &ledger.entries().unwrap()[0];
        assert_eq!(entry.days_elapsed, 0);
        assert_eq!(entry.holding_cost, 0.0);
    }

    #[test]
    fn operation_before_start_day_fails() {
        let mut ledger = sample_ledger();
        let err = ledger
            .process(&["2023-12-31"], &[] as &[&str], &[10.0], &[])
            .unwrap_err();
        assert!(matches!(err, StorageError::BeforeStart { .. }));
    }

    #[test]
    fn non_positive_volume_fails() {
        let mut ledger = sample_ledger();
        let err = ledger
            .process(&["2024-01-05"], &[] as &[&str], &[0.0], &[])
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidVolume { .. }));

        let err = ledger
            .process(&["2024-01-05"], &[] as &[&str], &[f64::NAN], &[])
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidVolume { .. }));
    }

    #[test]
    fn malformed_date_fails_without_touching_ledger() {
        let mut ledger = sample_ledger();
        process_example(&mut ledger).unwrap();
        let before = ledger.entries().unwrap().to_vec();

        let err = ledger
            .process(&["2024-02-30"], &[] as &[&str], &[1.0], &[])
            .unwrap_err();
        assert!(matches!(err, StorageError::DateParse { .. }));
        assert_eq!(ledger.entries().unwrap(), before.as_slice());
    }

    #[test]
    fn reprocessing_replaces_ledger() {
        let mut ledger = sample_ledger();
        process_example(&mut ledger).unwrap();
        ledger
            .process(&["2024-05-01"], &[] as &[&str], &[5.0], &[])
            .unwrap();
        let entries = ledger.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, date(2024, 5, 1));
        assert_eq!(entries[0].volume_after, 5.0);
    }

    #[test]
    fn processing_is_idempotent() {
        let mut ledger = sample_ledger();
        process_example(&mut ledger).unwrap();
        let first = ledger.entries().unwrap().to_vec();
        process_example(&mut ledger).unwrap();
        assert_eq!(ledger.entries().unwrap(), first.as_slice());
    }

    #[test]
    fn empty_schedule_yields_empty_ledger() {
        let mut ledger = sample_ledger();
        ledger
            .process::<&str>(&[], &[], &[], &[])
            .unwrap();
        assert!(ledger.is_processed());
        assert!(ledger.entries().unwrap().is_empty());
        assert_eq!(ledger.final_volume(), Some(0.0));
    }

    #[test]
    fn residual_volume_rejected_when_required() {
        let config = sample_ledger().config().clone().with_require_empty_at_end(true);
        let mut ledger = StorageLedger::from_config(config).unwrap();
        let err = ledger
            .process(&["2024-01-10", "2024-01-11"], &["2024-01-20"], &[20.0, 20.0], &[30.0])
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::ResidualVolume { volume, .. } if volume == 10.0
        ));
        assert!(ledger.entries().is_none());

        process_example(&mut ledger).unwrap();
        assert_eq!(ledger.final_volume(), Some(0.0));
    }

    #[test]
    fn residual_volume_allowed_by_default() {
        let mut ledger = sample_ledger();
        ledger
            .process(&["2024-01-10"], &[] as &[&str], &[20.0], &[])
            .unwrap();
        assert_eq!(ledger.final_volume(), Some(20.0));
    }

    #[test]
    fn unsorted_input_is_processed_chronologically() {
        let mut ledger = sample_ledger();
        ledger
            .process(
                &["2024-02-01", "2024-01-15"],
                &["2024-04-01", "2024-03-15"],
                &[30.0, 40.0],
                &[35.0, 35.0],
            )
            .unwrap();
        let dates: Vec<NaiveDate> = ledger.entries().unwrap().iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 2, 1), date(2024, 3, 15), date(2024, 4, 1)]
        );
    }

    #[test]
    fn cost_overview_requires_ledger() {
        let ledger = sample_ledger();
        assert!(matches!(ledger.cost_overview(None), Err(StorageError::NoLedger)));
    }

    #[test]
    fn entry_helpers() {
        let mut ledger = sample_ledger();
        process_example(&mut ledger).unwrap();
        let entries = ledger.entries().unwrap();
        assert!(entries[0].is_injection());
        assert!(entries[3].is_withdrawal());
        assert!((entries[2].volume_days() - 3010.0).abs() < 1e-9);
    }
}
