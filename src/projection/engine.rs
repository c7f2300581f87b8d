//! Ten-year rental projection engine

use crate::assumptions::RentalAssumptions;
use crate::error::EngineResult;

use super::phase::{OperationSchedule, OperationalPhase, PROJECTION_YEARS};
use super::rows::{share, YearlyProjection};
use super::state::ProjectionState;

const DAYS_PER_YEAR: f64 = 365.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Runs the revenue, cost and fee waterfall year by year
pub struct ProjectionCalculator<'a> {
    assumptions: &'a RentalAssumptions,
    schedule: OperationSchedule,
}

impl<'a> ProjectionCalculator<'a> {
    /// Validates the assumptions up front; nothing is computed on bad input.
    pub fn new(assumptions: &'a RentalAssumptions) -> EngineResult<Self> {
        let timeline = assumptions.validate()?;
        if !assumptions.occupancy_increases.covers_full_projection() {
            log::info!(
                "{} occupancy increases listed; later years use the {:?} policy",
                assumptions.occupancy_increases.len(),
                assumptions.occupancy_exhaustion
            );
        }
        Ok(Self {
            assumptions,
            schedule: OperationSchedule::new(timeline),
        })
    }

    pub fn schedule(&self) -> &OperationSchedule {
        &self.schedule
    }

    /// Project all ten years
    pub fn project(&self) -> Vec<YearlyProjection> {
        let mut state = ProjectionState::from_assumptions(self.assumptions, &self.schedule);
        let mut rows = Vec::with_capacity(PROJECTION_YEARS);

        for _ in 0..PROJECTION_YEARS {
            state.advance_year(&self.schedule);
            let row = self.calculate_year(&mut state);
            rows.push(row);
        }

        log::info!(
            "Projected {} years from {} (operations start {})",
            rows.len(),
            self.schedule.purchase(),
            self.schedule.start()
        );
        rows
    }

    fn calculate_year(&self, state: &mut ProjectionState) -> YearlyProjection {
        let mut row = YearlyProjection::new(state.index() as u32 + 1, state.calendar_year);
        row.phase = state.phase;
        row.operational_factor = state.factor;
        row.keys = self.assumptions.keys;

        log::debug!(
            "Year {} ({}): {:?}, factor {:.4}",
            row.year,
            row.calendar_year,
            row.phase,
            row.operational_factor
        );

        self.calculate_operating_metrics(state, &mut row);
        self.calculate_revenue(state, &mut row);
        self.calculate_costs(&mut row);
        self.calculate_fees(state, &mut row);

        // Bottom line
        row.take_home_profit = row.gop - row.total_management_fees;
        row.roi_before_management = share(row.gop, self.assumptions.initial_investment);
        row.roi_after_management = share(row.take_home_profit, self.assumptions.initial_investment);
        row.compute_shares();

        row
    }

    /// Occupancy and ADR
    fn calculate_operating_metrics(&self, state: &mut ProjectionState, row: &mut YearlyProjection) {
        let a = self.assumptions;

        match state.phase {
            OperationalPhase::PreOperational => {
                state.base_occupancy = 0.0;
                state.adr = 0.0;
            }
            OperationalPhase::FirstOperational => {
                state.base_occupancy = a.y1_occupancy;
                state.adr = a.y1_adr;
                // shown as the step up from zero
                row.occupancy_increase = a.y1_occupancy;
            }
            OperationalPhase::SteadyState => {
                let operational_year = self.schedule.operational_year(state.calendar_year);
                let increase = a
                    .occupancy_increases
                    .for_operational_year(operational_year, a.occupancy_exhaustion);

                state.base_occupancy += increase;
                state.adr *= 1.0 + a.adr_growth / 100.0;
                row.occupancy_increase = increase;
                row.adr_growth = a.adr_growth;
            }
        }

        row.occupancy = state.base_occupancy * state.factor;
        row.adr = state.adr;
        row.revpar = row.adr * row.occupancy / 100.0;

        if row.occupancy > 100.0 {
            log::warn!(
                "Occupancy reaches {:.2}% in {}; check the occupancy increases",
                row.occupancy,
                row.calendar_year
            );
        }
    }

    fn calculate_revenue(&self, state: &mut ProjectionState, row: &mut YearlyProjection) {
        let a = self.assumptions;

        if state.phase == OperationalPhase::SteadyState {
            state.fb_base *= 1.0 + a.fb_growth / 100.0;
            state.spa_base *= 1.0 + a.spa_growth / 100.0;
            state.other_base *= 1.0 + a.other_growth / 100.0;
            state.misc_base *= 1.0 + a.misc_growth / 100.0;
        }

        let keys = a.keys as f64;
        row.revenue_rooms = keys * DAYS_PER_YEAR * (row.occupancy / 100.0) * row.adr;
        row.revenue_fb = state.fb_base * state.factor;
        row.revenue_spa = state.spa_base * state.factor;
        row.revenue_other = state.other_base * state.factor;
        row.revenue_misc = state.misc_base * state.factor;

        row.total_revenue = row.revenue_rooms + row.revenue_fb + row.revenue_spa + row.revenue_other + row.revenue_misc;
        row.trevpar = row.total_revenue / (keys * DAYS_PER_YEAR);

        if state.index() > 0 && state.total_revenue != 0.0 {
            row.revenue_growth = (row.total_revenue / state.total_revenue - 1.0) * 100.0;
        }
        state.total_revenue = row.total_revenue;
    }

    /// Direct and undistributed costs, then GOP
    fn calculate_costs(&self, row: &mut YearlyProjection) {
        let a = self.assumptions;
        let revenue = row.total_revenue;

        row.cost_rooms = row.revenue_rooms * a.rooms_cost_pct / 100.0;
        row.cost_fb = row.revenue_fb * a.fb_cost_pct / 100.0;
        row.cost_spa = row.revenue_spa * a.spa_cost_pct / 100.0;
        row.cost_other = row.revenue_other * a.other_cost_pct / 100.0;
        row.cost_misc = row.revenue_misc * a.misc_cost_pct / 100.0;
        row.cost_utilities = revenue * a.utilities_pct / 100.0;
        row.total_operating_cost =
            row.cost_rooms + row.cost_fb + row.cost_spa + row.cost_other + row.cost_misc + row.cost_utilities;

        row.undistributed_admin = revenue * a.admin_pct / 100.0;
        row.undistributed_sales = revenue * a.sales_pct / 100.0;
        row.undistributed_maintenance = revenue * a.maint_pct / 100.0;
        row.total_undistributed_cost = row.undistributed_admin + row.undistributed_sales + row.undistributed_maintenance;

        row.gop = revenue - row.total_operating_cost - row.total_undistributed_cost;
    }

    fn calculate_fees(&self, state: &mut ProjectionState, row: &mut YearlyProjection) {
        let a = self.assumptions;
        let keys = a.keys as f64;
        let index = state.index();

        // Tech fee accrues from purchase, operational or not
        let annual_tech = a.tech_fee_per_unit * MONTHS_PER_YEAR * keys;
        let first_operational = self.schedule.first_operational_index();
        row.fee_tech = if index == 0 {
            annual_tech * self.schedule.purchase_factor()
        } else if index <= first_operational {
            annual_tech
        } else {
            annual_tech * (1.0 + a.tech_fee_growth / 100.0).powi((index - first_operational) as i32)
        };

        match state.phase {
            OperationalPhase::PreOperational => {
                row.fee_cam = 0.0;
                row.fee_base = 0.0;
            }
            OperationalPhase::FirstOperational => {
                state.cam_base = a.cam_fee_per_unit * MONTHS_PER_YEAR * keys;
                row.fee_cam = state.cam_base * state.factor;
                row.fee_base = row.total_revenue * a.base_fee_percent / 100.0;
            }
            OperationalPhase::SteadyState => {
                state.cam_base *= 1.0 + a.cam_growth / 100.0;
                row.fee_cam = state.cam_base * state.factor;
                row.fee_base = state.base_fee * (1.0 + a.base_fee_growth / 100.0);
            }
        }
        if row.total_revenue == 0.0 {
            row.fee_base = 0.0;
        }
        state.base_fee = row.fee_base;

        row.fee_incentive = if state.phase.is_operational() {
            row.gop * a.incentive_fee_pct / 100.0
        } else {
            0.0
        };

        row.total_management_fees = row.fee_cam + row.fee_base + row.fee_tech + row.fee_incentive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::ExhaustionPolicy;
    use crate::error::EngineError;

    fn project(a: &RentalAssumptions) -> Vec<YearlyProjection> {
        ProjectionCalculator::new(a).unwrap().project()
    }

    #[test]
    fn test_ten_rows() {
        let rows = project(&RentalAssumptions::default_villa());
        assert_eq!(rows.len(), PROJECTION_YEARS);
        assert_eq!(rows[0].year, 1);
        assert_eq!(rows[9].year, 10);
        assert_eq!(rows[9].calendar_year, 2035);
    }

    #[test]
    fn test_identities_hold_every_year() {
        for rows in [
            project(&RentalAssumptions::default_villa()),
            project(&RentalAssumptions::reference_apartment()),
        ] {
            for r in &rows {
                let revenue = r.revenue_rooms + r.revenue_fb + r.revenue_spa + r.revenue_other + r.revenue_misc;
                assert!((r.total_revenue - revenue).abs() < 1.0);
                let gop = r.total_revenue - r.total_operating_cost - r.total_undistributed_cost;
                assert!((r.gop - gop).abs() < 1.0);
                let fees = r.fee_cam + r.fee_base + r.fee_tech + r.fee_incentive;
                assert!((r.take_home_profit - (r.gop - fees)).abs() < 1.0);
            }
        }
    }

    #[test]
    fn test_pre_operational_years() {
        let rows = project(&RentalAssumptions::reference_apartment());
        for r in &rows[..2] {
            assert_eq!(r.phase, OperationalPhase::PreOperational);
            assert_eq!(r.occupancy, 0.0);
            assert_eq!(r.total_revenue, 0.0);
            assert_eq!(r.fee_cam, 0.0);
            assert_eq!(r.fee_base, 0.0);
            assert_eq!(r.fee_tech, 259_200_000.0);
            assert_eq!(r.take_home_profit, -259_200_000.0);
            assert_eq!(r.revenue_growth, 0.0);
        }
        assert_eq!(rows[2].phase, OperationalPhase::FirstOperational);
        assert_eq!(rows[3].phase, OperationalPhase::SteadyState);
    }

    #[test]
    fn test_partial_opening_year_prorates() {
        let mut a = RentalAssumptions::default_villa();
        a.purchase_date = "2026-07".to_string();
        let rows = project(&a);

        assert_eq!(rows[0].operational_factor, 0.5);
        assert_eq!(rows[0].occupancy, 35.0);
        assert_eq!(rows[0].revenue_fb, 6_000_000.0);
        // year-0 tech fee follows the purchase month
        assert_eq!(rows[0].fee_tech, 6_000_000.0);
        assert_eq!(rows[0].fee_cam, 7_500_000.0);

        // year two grows from the full-year base, not the prorated figures
        assert_eq!(rows[1].occupancy, 74.0);
        assert!((rows[1].revenue_fb - 12_360_000.0).abs() < 1e-6);
        assert!((rows[1].fee_cam - 15_300_000.0).abs() < 1e-6);
        assert!((rows[1].fee_tech - 12_360_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_base_fee_grows_from_prior_fee() {
        let rows = project(&RentalAssumptions::default_villa());
        let first = rows[0].total_revenue * 0.02;
        assert!((rows[0].fee_base - first).abs() < 1e-6);
        assert!((rows[1].fee_base - first * 1.03).abs() < 1e-6);
        assert!((rows[2].fee_base - first * 1.03 * 1.03).abs() < 1e-6);
    }

    #[test]
    fn test_incentive_fee_on_gop() {
        let mut a = RentalAssumptions::reference_apartment();
        a.incentive_fee_pct = 10.0;
        let rows = project(&a);
        assert_eq!(rows[0].fee_incentive, 0.0);
        assert!((rows[2].fee_incentive - rows[2].gop * 0.10).abs() < 1e-3);
    }

    #[test]
    fn test_exhaustion_policies() {
        let mut a = RentalAssumptions::default_villa();
        a.occupancy_increases = vec![4.0, 3.0].into();

        a.occupancy_exhaustion = ExhaustionPolicy::HoldLast;
        let held = project(&a);
        assert_eq!(held[3].occupancy, 80.0);
        assert_eq!(held[9].occupancy, 98.0);

        a.occupancy_exhaustion = ExhaustionPolicy::Zero;
        let flat = project(&a);
        assert_eq!(flat[3].occupancy, 77.0);
        assert_eq!(flat[9].occupancy, 77.0);
    }

    #[test]
    fn test_ready_beyond_horizon() {
        let mut a = RentalAssumptions::default_villa();
        a.property_ready_date = Some("2040-01".to_string());
        let rows = project(&a);
        assert!(rows.iter().all(|r| r.total_revenue == 0.0));
        assert!(rows.iter().all(|r| r.fee_tech == 12_000_000.0));
    }

    #[test]
    fn test_zero_investment_gives_zero_roi() {
        let mut a = RentalAssumptions::default_villa();
        a.initial_investment = 0.0;
        let rows = project(&a);
        assert!(rows.iter().all(|r| r.roi_after_management == 0.0));
    }

    #[test]
    fn test_rejects_invalid_before_computing() {
        let mut a = RentalAssumptions::default_villa();
        a.keys = 0;
        assert!(matches!(ProjectionCalculator::new(&a), Err(EngineError::InvalidAssumptions { .. })));
    }
}
