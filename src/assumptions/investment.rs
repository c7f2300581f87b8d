//! Buy/flip investment assumptions feeding the XIRR engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Longest payment plan accepted, in months
pub const MAX_INSTALLMENT_MONTHS: u32 = 1200;

/// Direction of an ad-hoc cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Outflow,
    Inflow,
}

/// Ad-hoc cash flow such as a furniture package or an interim rental payout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalCashFlow {
    pub date: NaiveDate,
    pub description: String,
    #[serde(rename = "type")]
    pub direction: FlowDirection,
    /// Magnitude; the sign comes from `direction`
    pub amount: f64,
}

impl AdditionalCashFlow {
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            FlowDirection::Outflow => -self.amount.abs(),
            FlowDirection::Inflow => self.amount.abs(),
        }
    }
}

/// Acquisition, payment plan and exit terms for a flip analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAssumptions {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub property_size_sqm: Option<f64>,

    pub total_price: f64,
    pub purchase_date: NaiveDate,
    pub handover_date: NaiveDate,
    /// Sale date; defaults to handover
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,

    pub down_payment_percent: f64,
    pub installment_months: u32,

    pub projected_sales_price: f64,
    pub closing_cost_percent: f64,

    #[serde(default)]
    pub additional_cash_flows: Vec<AdditionalCashFlow>,
}

impl InvestmentAssumptions {
    /// Off-plan villa bought today with handover a year out
    pub fn sample_villa(purchase_date: NaiveDate) -> Self {
        let handover = purchase_date + chrono::Duration::days(365);
        Self {
            project_name: "Villa Matahari Phase 1".to_string(),
            location: "Canggu, Bali".to_string(),
            property_size_sqm: None,
            total_price: 3_500_000_000.0,
            purchase_date,
            handover_date: handover,
            exit_date: None,
            down_payment_percent: 50.0,
            installment_months: 5,
            projected_sales_price: 4_200_000_000.0,
            closing_cost_percent: 2.5,
            additional_cash_flows: vec![AdditionalCashFlow {
                date: purchase_date,
                description: "Furniture Package".to_string(),
                direction: FlowDirection::Outflow,
                amount: 150_000_000.0,
            }],
        }
    }

    /// Date of the exit inflow
    pub fn exit_date(&self) -> NaiveDate {
        self.exit_date.unwrap_or(self.handover_date)
    }

    pub fn down_payment(&self) -> f64 {
        self.total_price * self.down_payment_percent / 100.0
    }

    pub fn closing_costs(&self) -> f64 {
        self.projected_sales_price * self.closing_cost_percent / 100.0
    }

    /// Sale price net of closing costs
    pub fn net_sale_proceeds(&self) -> f64 {
        self.projected_sales_price * (1.0 - self.closing_cost_percent / 100.0)
    }

    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("totalPrice", self.total_price),
            ("projectedSalesPrice", self.projected_sales_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::invalid(field, format!("must be a non-negative amount, got {value}")));
            }
        }

        for (field, value) in [
            ("downPaymentPercent", self.down_payment_percent),
            ("closingCostPercent", self.closing_cost_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(EngineError::invalid(field, format!("must be between 0 and 100, got {value}")));
            }
        }

        if self.installment_months > MAX_INSTALLMENT_MONTHS {
            return Err(EngineError::invalid(
                "installmentMonths",
                format!("at most {MAX_INSTALLMENT_MONTHS} months, got {}", self.installment_months),
            ));
        }

        if self.purchase_date > self.handover_date {
            return Err(EngineError::invalid(
                "handoverDate",
                format!("{} is before the purchase date {}", self.handover_date, self.purchase_date),
            ));
        }
        if self.exit_date() < self.handover_date {
            return Err(EngineError::invalid(
                "exitDate",
                format!("{} is before the handover date {}", self.exit_date(), self.handover_date),
            ));
        }

        for (i, flow) in self.additional_cash_flows.iter().enumerate() {
            if !flow.amount.is_finite() || flow.amount < 0.0 {
                return Err(EngineError::invalid(
                    "additionalCashFlows",
                    format!("entry {i} ({}) needs a non-negative amount", flow.description),
                ));
            }
        }

        Ok(())
    }
}
