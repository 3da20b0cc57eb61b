//! Storage facility parameters.

use chrono::NaiveDate;

use super::calendar::parse_date;
use super::error::StorageError;
use super::operation::OperationKind;

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Hard ceiling on stored volume.
    pub max_vol: f64,
    /// Maximum volume moved by a single operation (one per day).
    pub rate: f64,
    pub inj_cost: f64,
    pub wit_cost: f64,
    /// Holding cost per unit held per day.
    pub cost_per_day_per_unit: f64,
    pub start_day: NaiveDate,
    /// Reject schedules that leave volume in storage after the last operation.
    pub require_empty_at_end: bool,
}

impl StorageConfig {
    pub fn new(
        max_vol: f64,
        rate: f64,
        inj_cost: f64,
        wit_cost: f64,
        cost_per_day_per_unit: f64,
        start_day: &str,
    ) -> Result<Self, StorageError> {
        let start_day = parse_date(start_day).map_err(|_| StorageError::Configuration {
            parameter: "start_day".into(),
            reason: format!("'{start_day}' is not a valid YYYY-MM-DD date"),
        })?;
        let config = StorageConfig {
            max_vol,
            rate,
            inj_cost,
            wit_cost,
            cost_per_day_per_unit,
            start_day,
            require_empty_at_end: false,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_require_empty_at_end(self, require_empty_at_end: bool) -> Self {
        StorageConfig {
            require_empty_at_end,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), StorageError> {
        positive("max_vol", self.max_vol)?;
        positive("rate", self.rate)?;
        non_negative("inj_cost", self.inj_cost)?;
        non_negative("wit_cost", self.wit_cost)?;
        non_negative("cost_per_day_per_unit", self.cost_per_day_per_unit)?;
        Ok(())
    }

    pub fn operation_cost(&self, kind: OperationKind, volume: f64) -> f64 {
        match kind {
            OperationKind::Injection => volume * self.inj_cost,
            OperationKind::Withdrawal => volume * self.wit_cost,
        }
    }

    pub fn holding_cost(&self, volume: f64, days: i64) -> f64 {
        self.cost_per_day_per_unit * volume * days as f64
    }
}

fn positive(parameter: &str, value: f64) -> Result<(), StorageError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StorageError::Configuration {
            parameter: parameter.to_string(),
            reason: format!("must be positive and finite, got {value}"),
        });
    }
    Ok(())
}

fn non_negative(parameter: &str, value: f64) -> Result<(), StorageError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StorageError::Configuration {
            parameter: parameter.to_string(),
            reason: format!("must be non-negative and finite, got {value}"),
        });
    }
    Ok(())
}
