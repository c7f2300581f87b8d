//! XIRR root finding
//!
//! Solves `Σ aᵢ (1+r)^(-tᵢ) = 0` for irregularly dated cash flows, with `tᵢ`
//! measured in actual/365 years from the first event. Newton-Raphson runs
//! first from a 10% seed; when it misbehaves the solver falls back to
//! bisection over a fixed bracket. Each iteration is a single transition of
//! [`SolverState`], so individual steps can be driven and inspected.

use crate::calendar::year_fraction;
use crate::error::{EngineError, EngineResult};

use super::schedule::CashFlowEvent;

/// Newton starting guess
pub const NEWTON_SEED: f64 = 0.1;

/// Bisection bracket
pub const BRACKET_LOW: f64 = -0.999;
pub const BRACKET_HIGH: f64 = 10.0;

/// Iteration budget for each phase
pub const MAX_ITERATIONS: u32 = 100;

/// Converged when |NPV| is within this fraction of the largest cash flow
const NPV_TOLERANCE: f64 = 1e-9;

/// Converged when a step moves the rate less than this
const STEP_TOLERANCE: f64 = 1e-12;

/// Derivative magnitude, relative to the largest cash flow, treated as flat
const FLAT_DERIVATIVE: f64 = 1e-12;

/// Why Newton handed over to bisection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    FlatDerivative,
    NonFinite,
    LeftDomain,
    Oscillation,
    IterationBudget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverState {
    NewtonStep {
        rate: f64,
        /// Rate before `rate`, for 2-cycle detection
        previous: Option<f64>,
        iteration: u32,
    },
    BisectionStep {
        low: f64,
        high: f64,
        iteration: u32,
        /// Iterations already spent in Newton
        spent: u32,
        reason: FallbackReason,
    },
    Converged {
        rate: f64,
        iterations: u32,
    },
    Failed {
        iterations: u32,
        last_npv: f64,
    },
}

impl SolverState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SolverState::Converged { .. } | SolverState::Failed { .. })
    }
}

/// Cash flows reduced to (years since first event, amount) pairs
#[derive(Debug, Clone)]
pub struct XirrSolver {
    points: Vec<(f64, f64)>,
    scale: f64,
}

impl XirrSolver {
    /// Needs at least two events with both an outflow and an inflow.
    pub fn new(events: &[CashFlowEvent]) -> EngineResult<Self> {
        if events.len() < 2 {
            return Err(EngineError::InvalidCashFlow(format!(
                "need at least two cash flows, got {}",
                events.len()
            )));
        }
        if events.iter().any(|e| !e.amount.is_finite()) {
            return Err(EngineError::InvalidCashFlow("cash flow amount is not a number".to_string()));
        }

        let has_outflow = events.iter().any(|e| e.amount < 0.0);
        let has_inflow = events.iter().any(|e| e.amount > 0.0);
        if !has_outflow || !has_inflow {
            return Err(EngineError::InvalidCashFlow(
                "cash flows must include both an outflow and an inflow".to_string(),
            ));
        }

        // events are expected sorted, but t=0 is the earliest date either way
        let base = events.iter().map(|e| e.date).min().unwrap_or(events[0].date);
        let points: Vec<(f64, f64)> = events.iter().map(|e| (year_fraction(base, e.date), e.amount)).collect();
        let scale = points.iter().map(|(_, a)| a.abs()).fold(0.0, f64::max);

        Ok(Self { points, scale })
    }

    pub fn npv(&self, rate: f64) -> f64 {
        self.points.iter().map(|&(t, a)| a * (1.0 + rate).powf(-t)).sum()
    }

    /// NPV and its derivative with respect to the rate
    pub fn npv_and_derivative(&self, rate: f64) -> (f64, f64) {
        let mut npv = 0.0;
        let mut dnpv = 0.0;

        for &(t, a) in &self.points {
            npv += a * (1.0 + rate).powf(-t);
            if t > 0.0 {
                dnpv -= t * a * (1.0 + rate).powf(-t - 1.0);
            }
        }

        (npv, dnpv)
    }

    pub fn initial_state(&self) -> SolverState {
        SolverState::NewtonStep {
            rate: NEWTON_SEED,
            previous: None,
            iteration: 0,
        }
    }

    /// Advance one iteration. Terminal states map to themselves.
    pub fn step(&self, state: SolverState) -> SolverState {
        match state {
            SolverState::NewtonStep { rate, previous, iteration } => self.newton_step(rate, previous, iteration),
            SolverState::BisectionStep { low, high, iteration, spent, reason } => {
                self.bisection_step(low, high, iteration, spent, reason)
            }
            terminal => terminal,
        }
    }

    /// Run the state machine to completion
    pub fn solve(&self) -> EngineResult<f64> {
        let mut state = self.initial_state();
        let mut reported_fallback = false;

        loop {
            match state {
                SolverState::Converged { rate, iterations } => {
                    log::debug!("XIRR converged to {:.8} in {} iterations", rate, iterations);
                    return Ok(rate);
                }
                SolverState::Failed { iterations, last_npv } => {
                    return Err(EngineError::NoConvergence { iterations, last_npv });
                }
                SolverState::BisectionStep { reason, spent, .. } if !reported_fallback => {
                    log::warn!("Newton stopped after {} iterations ({:?}), falling back to bisection", spent, reason);
                    reported_fallback = true;
                }
                _ => {}
            }
            state = self.step(state);
        }
    }

    fn npv_converged(&self, npv: f64) -> bool {
        npv.abs() <= NPV_TOLERANCE * self.scale
    }

    fn fallback(&self, spent: u32, reason: FallbackReason) -> SolverState {
        SolverState::BisectionStep {
            low: BRACKET_LOW,
            high: BRACKET_HIGH,
            iteration: 0,
            spent,
            reason,
        }
    }

    fn newton_step(&self, rate: f64, previous: Option<f64>, iteration: u32) -> SolverState {
        let (npv, dnpv) = self.npv_and_derivative(rate);

        if !npv.is_finite() || !dnpv.is_finite() {
            return self.fallback(iteration, FallbackReason::NonFinite);
        }
        if self.npv_converged(npv) {
            return SolverState::Converged { rate, iterations: iteration };
        }
        if iteration >= MAX_ITERATIONS {
            return self.fallback(iteration, FallbackReason::IterationBudget);
        }
        if dnpv.abs() <= FLAT_DERIVATIVE * self.scale {
            return self.fallback(iteration, FallbackReason::FlatDerivative);
        }

        let step = npv / dnpv;
        let next = rate - step;

        if !next.is_finite() {
            return self.fallback(iteration + 1, FallbackReason::NonFinite);
        }
        if next <= -1.0 {
            return self.fallback(iteration + 1, FallbackReason::LeftDomain);
        }
        if step.abs() < STEP_TOLERANCE {
            return SolverState::Converged { rate: next, iterations: iteration + 1 };
        }
        if let Some(prev) = previous {
            // back where we were two steps ago
            if (next - prev).abs() < 1e-3 * step.abs() {
                return self.fallback(iteration + 1, FallbackReason::Oscillation);
            }
        }

        SolverState::NewtonStep {
            rate: next,
            previous: Some(rate),
            iteration: iteration + 1,
        }
    }

    fn bisection_step(&self, low: f64, high: f64, iteration: u32, spent: u32, reason: FallbackReason) -> SolverState {
        let npv_low = self.npv(low);

        if iteration == 0 {
            let npv_high = self.npv(high);
            if !npv_low.is_finite() || !npv_high.is_finite() || npv_low * npv_high > 0.0 {
                return SolverState::Failed { iterations: spent, last_npv: npv_high };
            }
            if npv_low == 0.0 {
                return SolverState::Converged { rate: low, iterations: spent };
            }
        }

        let mid = (low + high) / 2.0;
        let npv_mid = self.npv(mid);
        let iterations = spent + iteration + 1;

        if !npv_mid.is_finite() {
            return SolverState::Failed { iterations, last_npv: npv_mid };
        }
        if self.npv_converged(npv_mid) || (high - low) / 2.0 < STEP_TOLERANCE {
            return SolverState::Converged { rate: mid, iterations };
        }
        if iteration + 1 >= MAX_ITERATIONS {
            return SolverState::Failed { iterations, last_npv: npv_mid };
        }

        let (low, high) = if npv_low * npv_mid < 0.0 { (low, mid) } else { (mid, high) };
        SolverState::BisectionStep {
            low,
            high,
            iteration: iteration + 1,
            spent,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xirr::CashFlowKind;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn flows(pairs: &[(i64, f64)]) -> Vec<CashFlowEvent> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        pairs
            .iter()
            .map(|&(days, amount)| CashFlowEvent::new(start + Duration::days(days), amount, CashFlowKind::Exit))
            .collect()
    }

    fn run(pairs: &[(i64, f64)]) -> EngineResult<f64> {
        XirrSolver::new(&flows(pairs))?.solve()
    }

    #[test]
    fn test_one_year_ten_percent() {
        let rate = run(&[(0, -1000.0), (365, 1100.0)]).unwrap();
        assert_relative_eq!(rate, 0.10, max_relative = 1e-6);
    }

    #[test]
    fn test_two_year_compounding() {
        let rate = run(&[(0, -1000.0), (730, 1210.0)]).unwrap();
        assert_relative_eq!(rate, 0.10, max_relative = 1e-6);
    }

    #[test]
    fn test_fifty_percent_needs_several_newton_steps() {
        let rate = run(&[(0, -1000.0), (365, 1500.0)]).unwrap();
        assert_relative_eq!(rate, 0.50, max_relative = 1e-6);
    }

    #[test]
    fn test_short_hold_annualises() {
        // +10% over 73 days (a fifth of a year) is 1.1^5 - 1 annualised
        let rate = run(&[(0, -1000.0), (73, 1100.0)]).unwrap();
        assert_relative_eq!(rate, 1.1_f64.powi(5) - 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_irregular_flows_zero_npv() {
        let pairs = [(0, -5000.0), (45, -2000.0), (200, 500.0), (410, -1000.0), (700, 9800.0)];
        let solver = XirrSolver::new(&flows(&pairs)).unwrap();
        let rate = solver.solve().unwrap();
        assert!(solver.npv(rate).abs() < 1e-5, "NPV at solution: {}", solver.npv(rate));
    }

    #[test]
    fn test_loss_is_negative_rate() {
        let rate = run(&[(0, -1000.0), (365, 800.0)]).unwrap();
        assert_relative_eq!(rate, -0.20, max_relative = 1e-6);
    }

    #[test]
    fn test_single_sign_rejected() {
        assert!(matches!(run(&[(0, 100.0), (365, 200.0)]), Err(EngineError::InvalidCashFlow(_))));
        assert!(matches!(run(&[(0, -100.0), (365, -200.0)]), Err(EngineError::InvalidCashFlow(_))));
    }

    #[test]
    fn test_too_few_events_rejected() {
        assert!(matches!(run(&[(0, -100.0)]), Err(EngineError::InvalidCashFlow(_))));
        assert!(matches!(run(&[]), Err(EngineError::InvalidCashFlow(_))));
    }

    #[test]
    fn test_left_domain_falls_back_to_bisection() {
        let solver = XirrSolver::new(&flows(&[(0, -1000.0), (365, 10.0)])).unwrap();
        let next = solver.step(solver.initial_state());
        assert!(
            matches!(next, SolverState::BisectionStep { reason: FallbackReason::LeftDomain, .. }),
            "got {:?}",
            next
        );

        let rate = solver.solve().unwrap();
        assert_relative_eq!(rate, -0.99, max_relative = 1e-6);
    }

    #[test]
    fn test_root_outside_bracket_fails() {
        // true rate is -99.95%, below the bracket
        let err = run(&[(0, -1000.0), (365, 0.5)]).unwrap_err();
        assert!(matches!(err, EngineError::NoConvergence { .. }), "got {:?}", err);
    }

    #[test]
    fn test_flat_derivative_falls_back() {
        // every flow on day zero: NPV is constant in the rate
        let solver = XirrSolver::new(&flows(&[(0, -100.0), (0, 50.0)])).unwrap();
        let next = solver.step(solver.initial_state());
        assert!(matches!(next, SolverState::BisectionStep { reason: FallbackReason::FlatDerivative, .. }));
        assert!(matches!(solver.step(next), SolverState::Failed { .. }));
    }

    #[test]
    fn test_oscillation_detected() {
        let solver = XirrSolver::new(&flows(&[(0, -1000.0), (365, 1500.0)])).unwrap();
        let first = solver.step(solver.initial_state());
        let SolverState::NewtonStep { rate: next, .. } = first else {
            panic!("expected a Newton step, got {:?}", first);
        };

        // pretend we arrived at the seed from `next`: stepping lands back on it
        let cycling = SolverState::NewtonStep {
            rate: NEWTON_SEED,
            previous: Some(next),
            iteration: 3,
        };
        assert!(matches!(
            solver.step(cycling),
            SolverState::BisectionStep { reason: FallbackReason::Oscillation, .. }
        ));
    }

    #[test]
    fn test_iteration_budget_hands_over() {
        let solver = XirrSolver::new(&flows(&[(0, -1000.0), (365, 1500.0)])).unwrap();
        let exhausted = SolverState::NewtonStep {
            rate: NEWTON_SEED,
            previous: None,
            iteration: MAX_ITERATIONS,
        };
        let next = solver.step(exhausted);
        assert!(matches!(
            next,
            SolverState::BisectionStep { reason: FallbackReason::IterationBudget, spent: MAX_ITERATIONS, .. }
        ));

        let mut state = next;
        while !state.is_terminal() {
            state = solver.step(state);
        }
        match state {
            SolverState::Converged { rate, .. } => assert_relative_eq!(rate, 0.5, max_relative = 1e-6),
            other => panic!("expected convergence, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_states_are_fixed_points() {
        let solver = XirrSolver::new(&flows(&[(0, -1000.0), (365, 1100.0)])).unwrap();
        let done = SolverState::Converged { rate: 0.1, iterations: 2 };
        assert_eq!(solver.step(done), done);
    }

    #[test]
    fn test_deterministic() {
        let pairs = [(0, -5000.0), (45, -2000.0), (700, 9800.0)];
        assert_eq!(run(&pairs).unwrap(), run(&pairs).unwrap());
    }
}
