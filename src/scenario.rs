//! Scenario runner for sensitivity analysis
//!
//! Holds a base assumption set and evaluates many variations of it in
//! parallel. Each evaluation is independent, so the runner fans out with
//! rayon and collects results in input order.

use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::assumptions::{InvestmentAssumptions, RentalAssumptions};
use crate::error::EngineResult;
use crate::projection::{analyze_rental, AggregateSummary, YearlyProjection};
use crate::xirr::{compute_xirr, XirrResult};

/// A single change applied on top of the base rental assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RentalAdjustment {
    Y1Occupancy(f64),
    Y1Adr(f64),
    AdrGrowth(f64),
    InitialInvestment(f64),
    RoomsCostPct(f64),
    BaseFeePercent(f64),
}

impl RentalAdjustment {
    pub fn apply(&self, assumptions: &mut RentalAssumptions) {
        match *self {
            RentalAdjustment::Y1Occupancy(v) => assumptions.y1_occupancy = v,
            RentalAdjustment::Y1Adr(v) => assumptions.y1_adr = v,
            RentalAdjustment::AdrGrowth(v) => assumptions.adr_growth = v,
            RentalAdjustment::InitialInvestment(v) => assumptions.initial_investment = v,
            RentalAdjustment::RoomsCostPct(v) => assumptions.rooms_cost_pct = v,
            RentalAdjustment::BaseFeePercent(v) => assumptions.base_fee_percent = v,
        }
    }
}

impl fmt::Display for RentalAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalAdjustment::Y1Occupancy(v) => write!(f, "Y1 occupancy {}%", v),
            RentalAdjustment::Y1Adr(v) => write!(f, "Y1 ADR {}", v),
            RentalAdjustment::AdrGrowth(v) => write!(f, "ADR growth {}%", v),
            RentalAdjustment::InitialInvestment(v) => write!(f, "Investment {}", v),
            RentalAdjustment::RoomsCostPct(v) => write!(f, "Rooms cost {}%", v),
            RentalAdjustment::BaseFeePercent(v) => write!(f, "Base fee {}%", v),
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub adjustments: Vec<RentalAdjustment>,
    pub summary: EngineResult<AggregateSummary>,
}

/// Runs rental projections against a base assumption set
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: RentalAssumptions,
}

impl ScenarioRunner {
    /// Runner over the default villa
    pub fn new() -> Self {
        Self {
            base_assumptions: RentalAssumptions::default_villa(),
        }
    }

    pub fn with_assumptions(assumptions: RentalAssumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Project the base case
    pub fn run(&self) -> EngineResult<(Vec<YearlyProjection>, AggregateSummary)> {
        analyze_rental(&self.base_assumptions)
    }

    /// Summaries for independent assumption sets, in input order
    pub fn run_batch(sets: &[RentalAssumptions]) -> Vec<EngineResult<AggregateSummary>> {
        sets.par_iter()
            .map(|a| analyze_rental(a).map(|(_, summary)| summary))
            .collect()
    }

    /// Apply each group of adjustments to a copy of the base and summarise
    pub fn run_scenarios(&self, scenarios: &[Vec<RentalAdjustment>]) -> Vec<ScenarioOutcome> {
        scenarios
            .par_iter()
            .map(|adjustments| {
                let mut assumptions = self.base_assumptions.clone();
                for adjustment in adjustments {
                    adjustment.apply(&mut assumptions);
                }
                ScenarioOutcome {
                    adjustments: adjustments.clone(),
                    summary: analyze_rental(&assumptions).map(|(_, summary)| summary),
                }
            })
            .collect()
    }

    /// Summaries across a grid: one row per occupancy, one column per ADR
    pub fn occupancy_adr_grid(&self, occupancies: &[f64], adrs: &[f64]) -> Vec<Vec<EngineResult<AggregateSummary>>> {
        let scenarios: Vec<Vec<RentalAdjustment>> = occupancies
            .iter()
            .flat_map(|&occ| {
                adrs.iter()
                    .map(move |&adr| vec![RentalAdjustment::Y1Occupancy(occ), RentalAdjustment::Y1Adr(adr)])
            })
            .collect();

        let mut outcomes = self.run_scenarios(&scenarios).into_iter();
        occupancies
            .iter()
            .map(|_| outcomes.by_ref().take(adrs.len()).map(|o| o.summary).collect())
            .collect()
    }

    pub fn assumptions(&self) -> &RentalAssumptions {
        &self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// XIRR of a flip at each candidate sale price
pub fn sale_price_sweep(base: &InvestmentAssumptions, sale_prices: &[f64]) -> Vec<(f64, EngineResult<XirrResult>)> {
    sale_prices
        .par_iter()
        .map(|&price| {
            let mut assumptions = base.clone();
            assumptions.projected_sales_price = price;
            (price, compute_xirr(&assumptions))
        })
        .collect()
}
