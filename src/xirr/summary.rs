//! Totals over a cash-flow schedule

use serde::{Deserialize, Serialize};

use super::schedule::CashFlowEvent;
use crate::calendar::whole_months_between;
use crate::error::{EngineError, EngineResult};

/// Output of the XIRR engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XirrResult {
    /// Annualised rate as a decimal (0.12 = 12%)
    pub rate: f64,
    /// Sum of all outflows, as a positive amount
    pub total_invested: f64,
    /// Sum of all flows
    pub net_profit: f64,
    /// Whole calendar months from first to last event
    pub hold_period_months: i32,
}

/// Schedule totals, independent of the rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleTotals {
    pub total_invested: f64,
    pub net_profit: f64,
    pub hold_period_months: i32,
}

impl ScheduleTotals {
    pub fn with_rate(self, rate: f64) -> XirrResult {
        XirrResult {
            rate,
            total_invested: self.total_invested,
            net_profit: self.net_profit,
            hold_period_months: self.hold_period_months,
        }
    }
}

pub fn summarize(events: &[CashFlowEvent]) -> EngineResult<ScheduleTotals> {
    let first = events.iter().map(|e| e.date).min().ok_or(EngineError::EmptySchedule)?;
    let last = events.iter().map(|e| e.date).max().ok_or(EngineError::EmptySchedule)?;

    let total_invested = events.iter().filter(|e| e.amount < 0.0).map(|e| -e.amount).sum();
    let net_profit = events.iter().map(|e| e.amount).sum();

    Ok(ScheduleTotals {
        total_invested,
        net_profit,
        hold_period_months: whole_months_between(first, last),
    })
}
