//! XIRR engine for buy/flip analyses
//!
//! Assumptions are expanded into a dated cash-flow schedule, the schedule is
//! solved for the annualised rate that zeroes its NPV, and the result is
//! summarised with total invested, net profit and hold period.

mod report;
mod schedule;
mod solver;
mod summary;

pub use report::{analyze_investment, ExitBreakdown, PaymentPlan, XirrReport};
pub use schedule::{generate_schedule, CashFlowEvent, CashFlowKind};
pub use solver::{FallbackReason, SolverState, XirrSolver, BRACKET_HIGH, BRACKET_LOW, MAX_ITERATIONS, NEWTON_SEED};
pub use summary::{summarize, ScheduleTotals, XirrResult};

use crate::assumptions::InvestmentAssumptions;
use crate::error::EngineResult;

/// Schedule plus its solved summary; shared by `compute_xirr` and the report
pub(crate) fn solve_schedule(assumptions: &InvestmentAssumptions) -> EngineResult<(Vec<CashFlowEvent>, XirrResult)> {
    let schedule = generate_schedule(assumptions)?;
    let rate = XirrSolver::new(&schedule)?.solve()?;
    let result = summarize(&schedule)?.with_rate(rate);
    Ok((schedule, result))
}

/// Rate, total invested, net profit and hold period for a flip
pub fn compute_xirr(assumptions: &InvestmentAssumptions) -> EngineResult<XirrResult> {
    let (schedule, result) = solve_schedule(assumptions)?;

    log::info!(
        "XIRR {:.4} over {} months ({} cash flows)",
        result.rate,
        result.hold_period_months,
        schedule.len()
    );
    Ok(result)
}
