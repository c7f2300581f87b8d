//! Operational phase and partial-year proration

use serde::{Deserialize, Serialize};

use crate::assumptions::Timeline;
use crate::calendar::YearMonth;

/// Fiscal years in a pro forma
pub const PROJECTION_YEARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationalPhase {
    /// Under construction or not yet purchased
    PreOperational,
    /// Opening year, possibly partial
    FirstOperational,
    /// Every later year
    SteadyState,
}

impl OperationalPhase {
    pub fn is_operational(&self) -> bool {
        !matches!(self, OperationalPhase::PreOperational)
    }
}

/// When operations start relative to the purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSchedule {
    purchase: YearMonth,
    start: YearMonth,
}

impl OperationSchedule {
    /// Operations start at the later of purchase and ready month
    pub fn new(timeline: Timeline) -> Self {
        let start = match timeline.ready {
            Some(ready) if ready > timeline.purchase => ready,
            _ => timeline.purchase,
        };
        Self {
            purchase: timeline.purchase,
            start,
        }
    }

    pub fn purchase(&self) -> YearMonth {
        self.purchase
    }

    pub fn start(&self) -> YearMonth {
        self.start
    }

    /// Calendar year of projection index `i`
    pub fn calendar_year(&self, index: usize) -> i32 {
        self.purchase.year + index as i32
    }

    /// Share of `calendar_year` the property operates
    pub fn factor(&self, calendar_year: i32) -> f64 {
        if calendar_year < self.start.year {
            0.0
        } else if calendar_year == self.start.year {
            self.start.remaining_year_fraction()
        } else {
            1.0
        }
    }

    /// Share of the purchase year the investor owns the property
    pub fn purchase_factor(&self) -> f64 {
        self.purchase.remaining_year_fraction()
    }

    /// Projection index of the opening year
    pub fn first_operational_index(&self) -> usize {
        (self.start.year - self.purchase.year) as usize
    }

    pub fn phase(&self, calendar_year: i32) -> OperationalPhase {
        if calendar_year < self.start.year {
            OperationalPhase::PreOperational
        } else if calendar_year == self.start.year {
            OperationalPhase::FirstOperational
        } else {
            OperationalPhase::SteadyState
        }
    }

    /// 1 in the opening year, 2 the year after; 0 before opening
    pub fn operational_year(&self, calendar_year: i32) -> usize {
        if calendar_year < self.start.year {
            0
        } else {
            (calendar_year - self.start.year) as usize + 1
        }
    }
}
