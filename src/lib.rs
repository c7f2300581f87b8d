//! Property Returns - investment return engines for villa and apartment deals
//!
//! This library provides:
//! - XIRR analysis for buy/flip deals with staged payment plans
//! - Ten-year rental pro forma with phased operations and management fees
//! - Deal ratings, currency display and CSV export
//! - Parallel scenario and sensitivity sweeps

pub mod error;
pub mod calendar;
pub mod assumptions;
pub mod xirr;
pub mod projection;
pub mod rating;
pub mod currency;
pub mod input;
pub mod export;
pub mod scenario;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use assumptions::{InvestmentAssumptions, RentalAssumptions, AdditionalCashFlow, FlowDirection};
pub use xirr::{compute_xirr, analyze_investment, generate_schedule, CashFlowEvent, XirrResult, XirrReport};
pub use projection::{compute_rental_projection, analyze_rental, YearlyProjection, AggregateSummary};
pub use currency::{CurrencyCode, ExchangeRates};
pub use scenario::ScenarioRunner;
