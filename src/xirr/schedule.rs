//! Payment schedule generation
//!
//! Turns an [`InvestmentAssumptions`] into the dated, signed cash-flow sequence
//! the solver consumes: down payment, monthly installments, any additional
//! entries, and the net exit proceeds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assumptions::InvestmentAssumptions;
use crate::calendar::add_months;
use crate::error::{EngineError, EngineResult};

/// What a cash-flow event represents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CashFlowKind {
    DownPayment,
    Installment { number: u32 },
    Additional { description: String },
    Exit,
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashFlowKind::DownPayment => write!(f, "Down Payment"),
            CashFlowKind::Installment { number } => write!(f, "Installment {}", number),
            CashFlowKind::Additional { description } => write!(f, "{}", description),
            CashFlowKind::Exit => write!(f, "Exit (Sale)"),
        }
    }
}

/// A dated cash flow. Negative amounts are outflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEvent {
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: CashFlowKind,
}

impl CashFlowEvent {
    pub fn new(date: NaiveDate, amount: f64, kind: CashFlowKind) -> Self {
        Self { date, amount, kind }
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }
}

/// Build the full cash-flow schedule, sorted by date.
///
/// Ties keep insertion order: down payment, installments, additional entries,
/// exit.
pub fn generate_schedule(assumptions: &InvestmentAssumptions) -> EngineResult<Vec<CashFlowEvent>> {
    assumptions.validate()?;

    // bounded by validate()
    let n = assumptions.installment_months;
    let mut events = Vec::with_capacity(n as usize + assumptions.additional_cash_flows.len() + 2);

    if n == 0 {
        events.push(CashFlowEvent::new(
            assumptions.purchase_date,
            -assumptions.total_price,
            CashFlowKind::DownPayment,
        ));
    } else {
        let down_payment = assumptions.down_payment();
        let installment = (assumptions.total_price - down_payment) / n as f64;

        events.push(CashFlowEvent::new(assumptions.purchase_date, -down_payment, CashFlowKind::DownPayment));

        for number in 1..=n {
            let date = add_months(assumptions.purchase_date, number)
                .ok_or_else(|| EngineError::invalid("installmentMonths", "installment date out of range"))?
                .min(assumptions.handover_date);
            events.push(CashFlowEvent::new(date, -installment, CashFlowKind::Installment { number }));
        }
    }

    for flow in &assumptions.additional_cash_flows {
        events.push(CashFlowEvent::new(
            flow.date,
            flow.signed_amount(),
            CashFlowKind::Additional {
                description: flow.description.clone(),
            },
        ));
    }

    events.push(CashFlowEvent::new(
        assumptions.exit_date(),
        assumptions.net_sale_proceeds(),
        CashFlowKind::Exit,
    ));

    // stable: equal dates keep insertion order
    events.sort_by_key(|e| e.date);

    log::debug!("Generated schedule with {} events", events.len());
    Ok(events)
}
