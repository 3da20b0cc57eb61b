//! Port traits between the storage domain and its inputs and outputs.

pub mod config_port;
pub mod price_port;
pub mod report_port;
pub mod schedule_port;
