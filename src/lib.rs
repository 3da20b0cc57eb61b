//! storagecost: commodity storage cost and profit evaluation.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The [`cli`] module wires them
//! together for the `storagecost` binary.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;

pub use domain::error::StorageError;
pub use domain::ledger::{LedgerEntry, StorageLedger};
pub use domain::operation::{Operation, OperationKind};
pub use domain::overview::{CostOverview, ProfitSummary};
pub use domain::price_series::PriceSeries;
pub use domain::storage_config::StorageConfig;
