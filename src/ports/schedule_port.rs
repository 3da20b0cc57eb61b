//! Schedule source port trait.

use crate::domain::error::StorageError;
use crate::domain::operation::OperationKind;

/// A schedule in the form the ledger consumes: parallel date and volume
/// sequences for each operation kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleInput {
    pub injection_dates: Vec<String>,
    pub withdrawal_dates: Vec<String>,
    pub injection_volumes: Vec<f64>,
    pub withdrawal_volumes: Vec<f64>,
}

impl ScheduleInput {
    pub fn push(&mut self, date: String, kind: OperationKind, volume: f64) {
        match kind {
            OperationKind::Injection => {
                self.injection_dates.push(date);
                self.injection_volumes.push(volume);
            }
            OperationKind::Withdrawal => {
                self.withdrawal_dates.push(date);
                self.withdrawal_volumes.push(volume);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.injection_dates.len() + self.withdrawal_dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait SchedulePort {
    fn load_schedule(&self) -> Result<ScheduleInput, StorageError>;
}
