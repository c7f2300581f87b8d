//! Error taxonomy shared by both engines

use thiserror::Error;

/// Failures the engines report to their callers.
///
/// Every variant is recoverable: hosts surface the message to the user and
/// keep running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Cash flows cannot produce a real rate of return (too few events, or
    /// every amount shares one sign)
    #[error("Cannot compute a rate of return for this cash-flow pattern: {0}")]
    InvalidCashFlow(String),

    /// The solver exhausted both Newton and bisection without a root
    #[error("Rate of return did not converge after {iterations} iterations (last NPV {last_npv:.6})")]
    NoConvergence { iterations: u32, last_npv: f64 },

    /// Nothing to summarize
    #[error("Cash-flow schedule is empty")]
    EmptySchedule,

    /// Structurally invalid inputs, rejected before any computation runs
    #[error("Invalid assumption `{field}`: {reason}")]
    InvalidAssumptions { field: String, reason: String },
}

impl EngineError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidAssumptions {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
