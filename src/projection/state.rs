//! Carry-forward state between projection years

use crate::assumptions::RentalAssumptions;

use super::phase::{OperationSchedule, OperationalPhase};

/// Values a year needs from the one before it.
///
/// Revenue and CAM bases are kept un-prorated, so a partial opening year
/// does not depress the growth path of later years.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Projection index (0-9); `None` before the first year
    pub year_index: Option<usize>,

    /// Calendar year of the current index
    pub calendar_year: i32,

    /// Operational factor of the current year
    pub factor: f64,

    /// Phase of the current year
    pub phase: OperationalPhase,

    /// Full-year occupancy % before proration
    pub base_occupancy: f64,

    /// Average daily rate
    pub adr: f64,

    /// Un-prorated F&B revenue
    pub fb_base: f64,

    /// Un-prorated spa revenue
    pub spa_base: f64,

    /// Un-prorated other operated departments revenue
    pub other_base: f64,

    /// Un-prorated miscellaneous revenue
    pub misc_base: f64,

    /// Un-prorated annual CAM fee
    pub cam_base: f64,

    /// Base management fee actually charged
    pub base_fee: f64,

    /// Total revenue actually reported
    pub total_revenue: f64,
}

impl ProjectionState {
    /// State before the first projection year
    pub fn from_assumptions(assumptions: &RentalAssumptions, schedule: &OperationSchedule) -> Self {
        Self {
            year_index: None,
            calendar_year: schedule.purchase().year - 1,
            factor: 0.0,
            phase: OperationalPhase::PreOperational,
            base_occupancy: 0.0,
            adr: 0.0,
            fb_base: assumptions.y1_fb,
            spa_base: assumptions.y1_spa,
            other_base: assumptions.y1_other,
            misc_base: assumptions.y1_misc,
            cam_base: 0.0,
            base_fee: 0.0,
            total_revenue: 0.0,
        }
    }

    /// Move to the next projection year. Returns the phase of the year just
    /// left, which decides how the new year grows.
    pub fn advance_year(&mut self, schedule: &OperationSchedule) -> OperationalPhase {
        let prior_phase = self.phase;
        let index = self.year_index.map_or(0, |i| i + 1);

        self.year_index = Some(index);
        self.calendar_year = schedule.calendar_year(index);
        self.factor = schedule.factor(self.calendar_year);
        self.phase = schedule.phase(self.calendar_year);

        prior_phase
    }

    pub fn index(&self) -> usize {
        self.year_index.unwrap_or(0)
    }
}
