//! Injection and withdrawal operations and schedule assembly.

use chrono::NaiveDate;
use std::fmt;

use super::calendar::parse_date;
use super::error::StorageError;

/// Declaration order is the same-day tie-break: injections settle before
/// withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Injection,
    Withdrawal,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Injection => "injection",
            OperationKind::Withdrawal => "withdrawal",
        }
    }

    /// Signed multiplier applied to an operation's volume.
    pub fn direction(&self) -> f64 {
        match self {
            OperationKind::Injection => 1.0,
            OperationKind::Withdrawal => -1.0,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "injection" | "inject" | "in" => Ok(OperationKind::Injection),
            "withdrawal" | "withdraw" | "out" => Ok(OperationKind::Withdrawal),
            other => Err(StorageError::Data {
                reason: format!("unknown operation kind '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub date: NaiveDate,
    pub kind: OperationKind,
    pub volume: f64,
}

impl Operation {
    pub fn injection(date: NaiveDate, volume: f64) -> Self {
        Operation {
            date,
            kind: OperationKind::Injection,
            volume,
        }
    }

    pub fn withdrawal(date: NaiveDate, volume: f64) -> Self {
        Operation {
            date,
            kind: OperationKind::Withdrawal,
            volume,
        }
    }

    /// Change in stored volume caused by this operation.
    pub fn delta(&self) -> f64 {
        self.kind.direction() * self.volume
    }
}

/// Pair one kind's parallel date and volume sequences into operations.
pub fn pair_operations<S: AsRef<str>>(
    kind: OperationKind,
    dates: &[S],
    volumes: &[f64],
) -> Result<Vec<Operation>, StorageError> {
    if dates.len() != volumes.len() {
        return Err(StorageError::ScheduleMismatch {
            kind,
            dates: dates.len(),
            volumes: volumes.len(),
        });
    }

    dates
        .iter()
        .zip(volumes)
        .map(|(date, &volume)| {
            Ok(Operation {
                date: parse_date(date.as_ref())?,
                kind,
                volume,
            })
        })
        .collect()
}

/// Merge operations into processing order: by date, injections before
/// withdrawals on the same date, input order within a kind.
pub fn sort_chronologically(operations: &mut [Operation]) {
    operations.sort_by_key(|op| (op.date, op.kind));
}
