//! Configuration validation.
//!
//! Checks the `[storage]` section of a loaded config before a
//! [`StorageConfig`](super::storage_config::StorageConfig) is built from it.

use crate::domain::error::StorageError;
use crate::ports::config_port::ConfigPort;

pub const STORAGE_SECTION: &str = "storage";

pub fn validate_storage_config(config: &dyn ConfigPort) -> Result<(), StorageError> {
    validate_positive(config, "max_vol")?;
    validate_positive(config, "rate")?;
    validate_non_negative(config, "inj_cost")?;
    validate_non_negative(config, "wit_cost")?;
    validate_non_negative(config, "cost_per_day_per_unit")?;
    validate_start_day(config)?;
    validate_flag(config, "require_empty_at_end")?;
    Ok(())
}

fn required_number(config: &dyn ConfigPort, key: &str) -> Result<f64, StorageError> {
    let raw = config
        .get_string(STORAGE_SECTION, key)
        .ok_or_else(|| StorageError::ConfigMissing {
            section: STORAGE_SECTION.to_string(),
            key: key.to_string(),
        })?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| StorageError::ConfigInvalid {
            section: STORAGE_SECTION.to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not a finite number", raw.trim()),
        })
}

fn validate_positive(config: &dyn ConfigPort, key: &str) -> Result<(), StorageError> {
    let value = required_number(config, key)?;
    if value <= 0.0 {
        return Err(StorageError::ConfigInvalid {
            section: STORAGE_SECTION.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive"),
        });
    }
    Ok(())
}

fn validate_non_negative(config: &dyn ConfigPort, key: &str) -> Result<(), StorageError> {
    let value = required_number(config, key)?;
    if value < 0.0 {
        return Err(StorageError::ConfigInvalid {
            section: STORAGE_SECTION.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        });
    }
    Ok(())
}

fn validate_start_day(config: &dyn ConfigPort) -> Result<(), StorageError> {
    match config.get_string(STORAGE_SECTION, "start_day") {
        None => Err(StorageError::ConfigMissing {
            section: STORAGE_SECTION.to_string(),
            key: "start_day".to_string(),
        }),
        Some(s) => crate::domain::calendar::parse_date(&s)
            .map(|_| ())
            .map_err(|_| StorageError::ConfigInvalid {
                section: STORAGE_SECTION.to_string(),
                key: "start_day".to_string(),
                reason: "invalid start_day format, expected YYYY-MM-DD".to_string(),
            }),
    }
}

fn validate_flag(config: &dyn ConfigPort, key: &str) -> Result<(), StorageError> {
    // get_bool falls back to the default on unrecognised text; probing with
    // both defaults exposes that case.
    if config.get_string(STORAGE_SECTION, key).is_some()
        && config.get_bool(STORAGE_SECTION, key, true) != config.get_bool(STORAGE_SECTION, key, false)
    {
        return Err(StorageError::ConfigInvalid {
            section: STORAGE_SECTION.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be true or false"),
        });
    }
    Ok(())
}
