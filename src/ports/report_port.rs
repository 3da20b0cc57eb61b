//! Report generation port trait.

use crate::domain::error::StorageError;
use crate::domain::ledger::LedgerEntry;

/// Port for writing a processed ledger.
pub trait ReportPort {
    fn write(&self, entries: &[LedgerEntry], output_path: &str) -> Result<(), StorageError>;
}
