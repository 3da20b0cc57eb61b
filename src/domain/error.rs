//! Domain error types.

use chrono::NaiveDate;

use super::operation::OperationKind;

/// Top-level error type for storagecost.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid configuration: {parameter} {reason}")]
    Configuration { parameter: String, reason: String },

    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    DateParse { input: String },

    #[error("{kind} of {volume} on {date} exceeds the daily rate of {rate}")]
    RateExceeded {
        date: NaiveDate,
        kind: OperationKind,
        volume: f64,
        rate: f64,
    },

    #[error("{kind} of {volume} on {date} would raise the stored volume to {resulting}, above the capacity of {max_vol}")]
    CapacityExceeded {
        date: NaiveDate,
        kind: OperationKind,
        volume: f64,
        resulting: f64,
        max_vol: f64,
    },

    #[error("{kind} of {volume} on {date} exceeds the {available} held in storage")]
    InsufficientVolume {
        date: NaiveDate,
        kind: OperationKind,
        volume: f64,
        available: f64,
    },

    #[error("no ledger available: process a schedule first")]
    NoLedger,

    #[error("{kind} schedule has {dates} dates but {volumes} volumes")]
    ScheduleMismatch {
        kind: OperationKind,
        dates: usize,
        volumes: usize,
    },

    #[error("{kind} on {date} has invalid volume {volume}: must be positive and finite")]
    InvalidVolume {
        date: NaiveDate,
        kind: OperationKind,
        volume: f64,
    },

    #[error("{kind} on {date} is before the start day {start_day}")]
    BeforeStart {
        date: NaiveDate,
        kind: OperationKind,
        start_day: NaiveDate,
    },

    #[error("storage is not empty after the last operation on {date}: residual volume {volume}")]
    ResidualVolume { date: NaiveDate, volume: f64 },

    #[error("no price available for {date}")]
    MissingPrice { date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// True for errors raised by the schedule walk itself, as opposed to
    /// configuration, input parsing or reporting.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StorageError::RateExceeded { .. }
                | StorageError::CapacityExceeded { .. }
                | StorageError::InsufficientVolume { .. }
                | StorageError::InvalidVolume { .. }
                | StorageError::BeforeStart { .. }
                | StorageError::ResidualVolume { .. }
                | StorageError::ScheduleMismatch { .. }
        )
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            StorageError::Io(_) => 1,
            StorageError::Configuration { .. }
            | StorageError::ConfigParse { .. }
            | StorageError::ConfigMissing { .. }
            | StorageError::ConfigInvalid { .. } => 2,
            StorageError::DateParse { .. } | StorageError::Data { .. } => 3,
            StorageError::RateExceeded { .. }
            | StorageError::CapacityExceeded { .. }
            | StorageError::InsufficientVolume { .. }
            | StorageError::ScheduleMismatch { .. }
            | StorageError::InvalidVolume { .. }
            | StorageError::BeforeStart { .. }
            | StorageError::ResidualVolume { .. } => 4,
            StorageError::NoLedger | StorageError::MissingPrice { .. } => 5,
        }
    }
}

impl From<&StorageError> for std::process::ExitCode {
    fn from(err: &StorageError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
