//! Decade-level aggregates over a rental projection

use serde::{Serialize, Serializer};
use std::fmt;

use super::rows::YearlyProjection;
use crate::rating::{payback_risk, GrowthProfile, RentalGrade, RiskLevel};

/// Years to recover the initial investment from average take-home profit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaybackPeriod {
    Years(f64),
    /// Total profit over the decade is zero or negative
    NotRecoverable,
}

impl PaybackPeriod {
    pub fn years(&self) -> Option<f64> {
        match self {
            PaybackPeriod::Years(y) => Some(*y),
            PaybackPeriod::NotRecoverable => None,
        }
    }
}

impl fmt::Display for PaybackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaybackPeriod::Years(y) => write!(f, "{:.1} yrs", y),
            PaybackPeriod::NotRecoverable => write!(f, "N/A"),
        }
    }
}

// serialized as years, or null when not recoverable
impl Serialize for PaybackPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.years().serialize(serializer)
    }
}

/// Largest profit growth reported, in either direction
const GROWTH_CAP_PCT: f64 = 999.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub years: usize,

    // Averages
    pub avg_occupancy: f64,
    pub avg_adr: f64,
    pub avg_revpar: f64,
    pub avg_trevpar: f64,
    pub avg_roi_before_management: f64,
    pub avg_roi_after_management: f64,
    pub avg_gop_margin: f64,
    pub avg_profit_margin: f64,
    pub avg_take_home_profit: f64,

    // Totals
    pub total_revenue: f64,
    pub total_operating_cost: f64,
    pub total_undistributed_cost: f64,
    pub total_gop: f64,
    pub total_management_fees: f64,
    pub total_profit: f64,

    pub payback: PaybackPeriod,
    /// First-to-last-year take-home profit growth, %
    pub profit_growth_pct: f64,

    pub grade: RentalGrade,
    pub risk: RiskLevel,
    pub growth_profile: GrowthProfile,
}

fn mean(rows: &[YearlyProjection], field: impl Fn(&YearlyProjection) -> f64) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(field).sum::<f64>() / rows.len() as f64
}

fn total(rows: &[YearlyProjection], field: impl Fn(&YearlyProjection) -> f64) -> f64 {
    rows.iter().map(field).sum()
}

/// Growth from `first` to `last` relative to |first|, capped at ±999%
pub fn profit_growth(first: f64, last: f64) -> f64 {
    if first == 0.0 || !first.is_finite() || !last.is_finite() {
        return 0.0;
    }
    ((last - first) / first.abs() * 100.0).clamp(-GROWTH_CAP_PCT, GROWTH_CAP_PCT)
}

pub fn summarize_projection(rows: &[YearlyProjection], initial_investment: f64) -> AggregateSummary {
    let total_profit = total(rows, |r| r.take_home_profit);
    let payback = if total_profit > 0.0 && !rows.is_empty() {
        PaybackPeriod::Years(initial_investment / (total_profit / rows.len() as f64))
    } else {
        PaybackPeriod::NotRecoverable
    };

    let profit_growth_pct = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => profit_growth(first.take_home_profit, last.take_home_profit),
        _ => 0.0,
    };

    let avg_roi_after_management = mean(rows, |r| r.roi_after_management);

    AggregateSummary {
        years: rows.len(),
        avg_occupancy: mean(rows, |r| r.occupancy),
        avg_adr: mean(rows, |r| r.adr),
        avg_revpar: mean(rows, |r| r.revpar),
        avg_trevpar: mean(rows, |r| r.trevpar),
        avg_roi_before_management: mean(rows, |r| r.roi_before_management),
        avg_roi_after_management,
        avg_gop_margin: mean(rows, |r| r.gop_margin),
        avg_profit_margin: mean(rows, |r| r.profit_margin),
        avg_take_home_profit: mean(rows, |r| r.take_home_profit),
        total_revenue: total(rows, |r| r.total_revenue),
        total_operating_cost: total(rows, |r| r.total_operating_cost),
        total_undistributed_cost: total(rows, |r| r.total_undistributed_cost),
        total_gop: total(rows, |r| r.gop),
        total_management_fees: total(rows, |r| r.total_management_fees),
        total_profit,
        payback,
        profit_growth_pct,
        grade: RentalGrade::from_net_yield(avg_roi_after_management),
        risk: payback_risk(payback),
        growth_profile: GrowthProfile::from_profit_growth(profit_growth_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: u32, revenue: f64, profit: f64) -> YearlyProjection {
        let mut r = YearlyProjection::new(year, 2025 + year as i32);
        r.total_revenue = revenue;
        r.gop = profit;
        r.take_home_profit = profit;
        r.roi_after_management = profit / 10.0;
        r
    }

    #[test]
    fn test_totals_and_means() {
        let rows: Vec<_> = (1..=10).map(|y| row(y, 500.0, 100.0)).collect();
        let s = summarize_projection(&rows, 1000.0);

        assert_eq!(s.years, 10);
        assert_eq!(s.total_revenue, 5000.0);
        assert_eq!(s.total_profit, 1000.0);
        assert_eq!(s.avg_take_home_profit, 100.0);
        assert_eq!(s.payback, PaybackPeriod::Years(10.0));
        assert_eq!(s.avg_roi_after_management, 10.0);
        assert_eq!(s.grade, RentalGrade::Good);
        assert_eq!(s.risk, RiskLevel::High);
        assert_eq!(s.growth_profile, GrowthProfile::Stable);
    }

    #[test]
    fn test_loss_making_is_not_recoverable() {
        let rows: Vec<_> = (1..=10).map(|y| row(y, 0.0, -50.0)).collect();
        let s = summarize_projection(&rows, 1000.0);
        assert_eq!(s.payback, PaybackPeriod::NotRecoverable);
        assert_eq!(s.payback.to_string(), "N/A");
        assert_eq!(s.risk, RiskLevel::High);
    }

    #[test]
    fn test_profit_growth() {
        assert_eq!(profit_growth(100.0, 250.0), 150.0);
        assert_eq!(profit_growth(-100.0, 100.0), 200.0);
        assert_eq!(profit_growth(0.0, 100.0), 0.0);
        assert_eq!(profit_growth(1.0, 1_000_000.0), 999.0);
    }

    #[test]
    fn test_payback_serializes_as_years_or_null() {
        assert_eq!(serde_json::to_string(&PaybackPeriod::Years(4.5)).unwrap(), "4.5");
        assert_eq!(serde_json::to_string(&PaybackPeriod::NotRecoverable).unwrap(), "null");
    }

    #[test]
    fn test_empty_rows() {
        let s = summarize_projection(&[], 1000.0);
        assert_eq!(s.avg_occupancy, 0.0);
        assert_eq!(s.payback, PaybackPeriod::NotRecoverable);
    }
}
