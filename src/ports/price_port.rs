//! Price curve port trait.
//!
//! Price construction (forecasting, interpolation) lives outside the crate;
//! the ledger only asks for the price applying on an operation date.

use chrono::NaiveDate;

pub trait PricePort {
    /// Price applying on `date`, or `None` when the curve does not cover it.
    fn price_on(&self, date: NaiveDate) -> Option<f64>;
}

impl<F> PricePort for F
where
    F: Fn(NaiveDate) -> Option<f64>,
{
    fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self(date)
    }
}
