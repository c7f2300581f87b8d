//! Ten-year rental pro forma
//!
//! A property moves through three phases: pre-operational while under
//! construction, a possibly partial opening year, and steady state. Revenue
//! and cost lines are scaled by the share of each year the property operates;
//! the tech fee accrues from purchase regardless.

mod engine;
mod phase;
mod rows;
mod state;
mod summary;

pub use engine::ProjectionCalculator;
pub use phase::{OperationSchedule, OperationalPhase, PROJECTION_YEARS};
pub use rows::YearlyProjection;
pub use state::ProjectionState;
pub use summary::{profit_growth, summarize_projection, AggregateSummary, PaybackPeriod};

use crate::assumptions::RentalAssumptions;
use crate::error::EngineResult;

/// Project ten fiscal years of a rental operation
pub fn compute_rental_projection(assumptions: &RentalAssumptions) -> EngineResult<Vec<YearlyProjection>> {
    Ok(ProjectionCalculator::new(assumptions)?.project())
}

/// Projection plus its decade summary
pub fn analyze_rental(assumptions: &RentalAssumptions) -> EngineResult<(Vec<YearlyProjection>, AggregateSummary)> {
    let rows = compute_rental_projection(assumptions)?;
    let summary = summarize_projection(&rows, assumptions.initial_investment);
    Ok((rows, summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent() {
        let a = RentalAssumptions::reference_apartment();
        assert_eq!(compute_rental_projection(&a).unwrap(), compute_rental_projection(&a).unwrap());
    }

    #[test]
    fn test_extreme_purchase_year_is_an_error() {
        let mut a = RentalAssumptions::default_villa();
        a.purchase_date = "2147483647-01".to_string();
        assert!(matches!(
            compute_rental_projection(&a),
            Err(crate::EngineError::InvalidAssumptions { ref field, .. }) if field == "purchaseDate"
        ));
    }

    #[test]
    fn test_always_ten_years() {
        let (rows, summary) = analyze_rental(&RentalAssumptions::default_villa()).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(summary.years, 10);
    }
}
