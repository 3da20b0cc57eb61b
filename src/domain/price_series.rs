//! Observed or forecast commodity prices keyed by date.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::error::StorageError;
use crate::ports::price_port::PricePort;

/// Step curve: a price holds from its date until the next observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points<I>(points: I) -> Result<Self, StorageError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut series = PriceSeries::new();
        for (date, price) in points {
            series.insert(date, price)?;
        }
        Ok(series)
    }

    /// Later inserts for the same date replace earlier ones.
    pub fn insert(&mut self, date: NaiveDate, price: f64) -> Result<(), StorageError> {
        if !price.is_finite() || price < 0.0 {
            return Err(StorageError::Data {
                reason: format!("invalid price {price} on {date}"),
            });
        }
        self.points.insert(date, price);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.keys().next_back().copied()
    }
}

impl PricePort for PriceSeries {
    fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.points.range(..=date).next_back().map(|(_, &p)| p)
    }
}
