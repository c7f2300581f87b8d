//! Per-year output records of the rental pro forma

use serde::{Deserialize, Serialize};

use super::phase::OperationalPhase;

/// One fiscal year of the pro forma.
///
/// Money is in the base unit, percentages are whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    // Timing
    /// 1-based year number
    pub year: u32,
    pub calendar_year: i32,
    pub phase: OperationalPhase,
    pub operational_factor: f64,
    pub keys: u32,

    // Operating metrics
    pub occupancy: f64,
    pub occupancy_increase: f64,
    pub adr: f64,
    pub adr_growth: f64,
    pub revpar: f64,
    pub trevpar: f64,

    // Revenue
    pub revenue_rooms: f64,
    pub revenue_rooms_pct: f64,
    pub revenue_fb: f64,
    pub revenue_fb_pct: f64,
    pub revenue_spa: f64,
    pub revenue_spa_pct: f64,
    pub revenue_other: f64,
    pub revenue_other_pct: f64,
    pub revenue_misc: f64,
    pub revenue_misc_pct: f64,
    pub total_revenue: f64,
    pub revenue_growth: f64,

    // Direct operating costs
    pub cost_rooms: f64,
    pub cost_fb: f64,
    pub cost_spa: f64,
    pub cost_other: f64,
    pub cost_misc: f64,
    pub cost_utilities: f64,
    pub total_operating_cost: f64,
    pub operating_cost_pct: f64,

    // Undistributed
    pub undistributed_admin: f64,
    pub undistributed_sales: f64,
    pub undistributed_maintenance: f64,
    pub total_undistributed_cost: f64,
    pub undistributed_cost_pct: f64,

    // Gross operating profit
    pub gop: f64,
    pub gop_margin: f64,

    // Management fees
    pub fee_cam: f64,
    pub fee_cam_pct: f64,
    pub fee_base: f64,
    pub fee_base_pct: f64,
    pub fee_tech: f64,
    pub fee_tech_pct: f64,
    pub fee_incentive: f64,
    /// Share of total revenue, not the configured incentive rate
    pub fee_incentive_pct: f64,
    pub total_management_fees: f64,
    pub management_fees_pct: f64,

    // Bottom line
    pub take_home_profit: f64,
    pub profit_margin: f64,
    pub roi_before_management: f64,
    pub roi_after_management: f64,
}

/// `part` as a percentage of `whole`, 0 when `whole` is 0
pub(crate) fn share(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

impl YearlyProjection {
    pub fn new(year: u32, calendar_year: i32) -> Self {
        Self {
            year,
            calendar_year,
            phase: OperationalPhase::PreOperational,
            operational_factor: 0.0,
            keys: 0,
            occupancy: 0.0,
            occupancy_increase: 0.0,
            adr: 0.0,
            adr_growth: 0.0,
            revpar: 0.0,
            trevpar: 0.0,
            revenue_rooms: 0.0,
            revenue_rooms_pct: 0.0,
            revenue_fb: 0.0,
            revenue_fb_pct: 0.0,
            revenue_spa: 0.0,
            revenue_spa_pct: 0.0,
            revenue_other: 0.0,
            revenue_other_pct: 0.0,
            revenue_misc: 0.0,
            revenue_misc_pct: 0.0,
            total_revenue: 0.0,
            revenue_growth: 0.0,
            cost_rooms: 0.0,
            cost_fb: 0.0,
            cost_spa: 0.0,
            cost_other: 0.0,
            cost_misc: 0.0,
            cost_utilities: 0.0,
            total_operating_cost: 0.0,
            operating_cost_pct: 0.0,
            undistributed_admin: 0.0,
            undistributed_sales: 0.0,
            undistributed_maintenance: 0.0,
            total_undistributed_cost: 0.0,
            undistributed_cost_pct: 0.0,
            gop: 0.0,
            gop_margin: 0.0,
            fee_cam: 0.0,
            fee_cam_pct: 0.0,
            fee_base: 0.0,
            fee_base_pct: 0.0,
            fee_tech: 0.0,
            fee_tech_pct: 0.0,
            fee_incentive: 0.0,
            fee_incentive_pct: 0.0,
            total_management_fees: 0.0,
            management_fees_pct: 0.0,
            take_home_profit: 0.0,
            profit_margin: 0.0,
            roi_before_management: 0.0,
            roi_after_management: 0.0,
        }
    }

    /// Fill every share-of-revenue column from the amounts
    pub fn compute_shares(&mut self) {
        let revenue = self.total_revenue;

        self.revenue_rooms_pct = share(self.revenue_rooms, revenue);
        self.revenue_fb_pct = share(self.revenue_fb, revenue);
        self.revenue_spa_pct = share(self.revenue_spa, revenue);
        self.revenue_other_pct = share(self.revenue_other, revenue);
        self.revenue_misc_pct = share(self.revenue_misc, revenue);

        self.operating_cost_pct = share(self.total_operating_cost, revenue);
        self.undistributed_cost_pct = share(self.total_undistributed_cost, revenue);
        self.gop_margin = share(self.gop, revenue);

        self.fee_cam_pct = share(self.fee_cam, revenue);
        self.fee_base_pct = share(self.fee_base, revenue);
        self.fee_tech_pct = share(self.fee_tech, revenue);
        self.fee_incentive_pct = share(self.fee_incentive, revenue);
        self.management_fees_pct = share(self.total_management_fees, revenue);

        self.profit_margin = share(self.take_home_profit, revenue);
    }

    pub fn is_operational(&self) -> bool {
        self.phase.is_operational()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row_is_zeroed() {
        let row = YearlyProjection::new(3, 2028);
        assert_eq!(row.year, 3);
        assert_eq!(row.calendar_year, 2028);
        assert_eq!(row.total_revenue, 0.0);
        assert!(!row.is_operational());
    }

    #[test]
    fn test_shares_of_zero_revenue_are_zero() {
        let mut row = YearlyProjection::new(1, 2026);
        row.fee_tech = 259_200_000.0;
        row.total_management_fees = 259_200_000.0;
        row.take_home_profit = -259_200_000.0;
        row.compute_shares();

        assert_eq!(row.fee_tech_pct, 0.0);
        assert_eq!(row.profit_margin, 0.0);
        assert_eq!(row.gop_margin, 0.0);
    }

    #[test]
    fn test_shares() {
        let mut row = YearlyProjection::new(1, 2026);
        row.revenue_rooms = 750.0;
        row.revenue_fb = 250.0;
        row.total_revenue = 1000.0;
        row.gop = 400.0;
        // 10% incentive on a 400 GOP
        row.fee_incentive = 40.0;
        row.compute_shares();

        assert_eq!(row.revenue_rooms_pct, 75.0);
        assert_eq!(row.revenue_fb_pct, 25.0);
        assert_eq!(row.gop_margin, 40.0);
        assert!((row.fee_incentive_pct - 4.0).abs() < 1e-12);
    }
}
