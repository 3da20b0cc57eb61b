//! Core domain types and logic.

pub mod calendar;
pub mod config_validation;
pub mod error;
pub mod ledger;
pub mod operation;
pub mod overview;
pub mod price_series;
pub mod storage_config;
