//! Cost and profit summary of a processed ledger.

use std::fmt;

use super::error::StorageError;
use super::ledger::LedgerEntry;
use crate::ports::price_port::PricePort;

/// Profit figures, available only when a price curve is supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitSummary {
    /// Σ price × volume over withdrawals.
    pub withdrawal_revenue: f64,
    /// Σ price × volume over injections.
    pub injection_expenditure: f64,
    /// Revenue less expenditure, before any storage costs.
    pub gross_gain: f64,
    /// Gross gain less holding cost.
    pub realized_profit: f64,
    /// Gross gain less every cost in the ledger.
    pub net_gain: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostOverview {
    pub injection_cost: f64,
    pub withdrawal_cost: f64,
    pub holding_cost: f64,
    pub total_cost: f64,
    pub operations: usize,
    /// Days on which a non-zero volume was held.
    pub storage_days: i64,
    pub volume_days: f64,
    pub average_volume: f64,
    pub average_cost_per_day: f64,
    pub final_volume: f64,
    pub profit: Option<ProfitSummary>,
}

impl CostOverview {
    pub fn compute(
        entries: &[LedgerEntry],
        prices: Option<&dyn PricePort>,
    ) -> Result<Self, StorageError> {
        let mut injection_cost = 0.0;
        let mut withdrawal_cost = 0.0;
        let mut holding_cost = 0.0;
        let mut storage_days = 0i64;
        let mut volume_days = 0.0;

        for entry in entries {
            if entry.is_injection() {
                injection_cost += entry.operation_cost;
            } else {
                withdrawal_cost += entry.operation_cost;
            }
            holding_cost += entry.holding_cost;
            if entry.volume_before > 0.0 {
                storage_days += entry.days_elapsed;
            }
            volume_days += entry.volume_days();
        }

        let total_cost = injection_cost + withdrawal_cost + holding_cost;
        let (average_volume, average_cost_per_day) = if storage_days > 0 {
            (
                volume_days / storage_days as f64,
                total_cost / storage_days as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let profit = match prices {
            Some(curve) => Some(compute_profit(entries, curve, holding_cost, total_cost)?),
            None => None,
        };

        Ok(CostOverview {
            injection_cost,
            withdrawal_cost,
            holding_cost,
            total_cost,
            operations: entries.len(),
            storage_days,
            volume_days,
            average_volume,
            average_cost_per_day,
            final_volume: entries.last().map(|e| e.volume_after).unwrap_or(0.0),
            profit,
        })
    }
}

fn compute_profit(
    entries: &[LedgerEntry],
    curve: &dyn PricePort,
    holding_cost: f64,
    total_cost: f64,
) -> Result<ProfitSummary, StorageError> {
    let mut withdrawal_revenue = 0.0;
    let mut injection_expenditure = 0.0;

    for entry in entries {
        let price = curve
            .price_on(entry.date)
            .ok_or(StorageError::MissingPrice { date: entry.date })?;
        if entry.is_injection() {
            injection_expenditure += price * entry.volume;
        } else {
            withdrawal_revenue += price * entry.volume;
        }
    }

    let gross_gain = withdrawal_revenue - injection_expenditure;
    Ok(ProfitSummary {
        withdrawal_revenue,
        injection_expenditure,
        gross_gain,
        realized_profit: gross_gain - holding_cost,
        net_gain: gross_gain - total_cost,
    })
}

impl fmt::Display for CostOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Costs due to injections:  {:.2}", self.injection_cost)?;
        writeln!(f, "Costs due to withdrawals: {:.2}", self.withdrawal_cost)?;
        writeln!(f, "Storage cost:             {:.2}", self.holding_cost)?;
        writeln!(f, "Total cost:               {:.2}", self.total_cost)?;
        writeln!(f, "Operations:               {}", self.operations)?;
        writeln!(f, "Days of storage:          {}", self.storage_days)?;
        writeln!(f, "Average cost per day:     {:.2}", self.average_cost_per_day)?;
        writeln!(f, "Average volume stored:    {:.2}", self.average_volume)?;
        write!(f, "Final volume:             {:.2}", self.final_volume)?;
        if let Some(ref p) = self.profit {
            writeln!(f)?;
            writeln!(f, "Withdrawal revenue:       {:.2}", p.withdrawal_revenue)?;
            writeln!(f, "Injection expenditure:    {:.2}", p.injection_expenditure)?;
            writeln!(f, "Gross gain:               {:.2}", p.gross_gain)?;
            writeln!(f, "Realized profit:          {:.2}", p.realized_profit)?;
            write!(f, "Net gain:                 {:.2}", p.net_gain)?;
        }
        Ok(())
    }
}
