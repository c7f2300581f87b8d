//! Investment and rental assumption sets, their validation and file loading

mod investment;
mod occupancy;
mod rental;
pub mod loader;

pub use investment::{AdditionalCashFlow, FlowDirection, InvestmentAssumptions, MAX_INSTALLMENT_MONTHS};
pub use occupancy::{ExhaustionPolicy, OccupancyIncreases};
pub use rental::{RentalAssumptions, Timeline};
pub use loader::LoadError;
