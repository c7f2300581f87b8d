//! Year-over-year occupancy increases for operational years 2 onward

use serde::{Deserialize, Serialize};

/// Number of increases a full ten-year projection consults
const STANDARD_INCREASE_COUNT: usize = 9;

/// What to add once the increase list runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExhaustionPolicy {
    /// Repeat the last listed increase
    #[default]
    HoldLast,
    /// Occupancy stops rising
    Zero,
}

/// Occupancy-point increases, indexed by operational year.
///
/// Entry 0 applies to the second operational year, entry 8 to the tenth.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupancyIncreases(Vec<f64>);

impl OccupancyIncreases {
    pub fn new(points: Vec<f64>) -> Self {
        Self(points)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every year of a ten-year projection has its own entry
    pub fn covers_full_projection(&self) -> bool {
        self.0.len() >= STANDARD_INCREASE_COUNT
    }

    /// Increase applied in `operational_year` (1 = first operational year,
    /// which never gets an increase).
    pub fn for_operational_year(&self, operational_year: usize, policy: ExhaustionPolicy) -> f64 {
        if operational_year < 2 {
            return 0.0;
        }
        let idx = operational_year - 2;
        match self.0.get(idx) {
            Some(points) => *points,
            None => match policy {
                ExhaustionPolicy::HoldLast => self.0.last().copied().unwrap_or(0.0),
                ExhaustionPolicy::Zero => 0.0,
            },
        }
    }
}

impl From<Vec<f64>> for OccupancyIncreases {
    fn from(points: Vec<f64>) -> Self {
        Self(points)
    }
}
