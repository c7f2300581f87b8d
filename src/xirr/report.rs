//! Full investment analysis for a flip: schedule, returns and deal quality

use serde::Serialize;

use super::schedule::{CashFlowEvent, CashFlowKind};
use super::summary::XirrResult;
use crate::assumptions::InvestmentAssumptions;
use crate::error::EngineResult;
use crate::rating::{market_risk, RiskLevel, XirrRating};

/// Sale proceeds at exit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExitBreakdown {
    pub gross_sale_price: f64,
    pub closing_costs: f64,
    pub net_proceeds: f64,
}

/// Payment plan figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentPlan {
    pub down_payment: f64,
    pub installment_months: u32,
    /// 0 when there are no installments
    pub monthly_installment: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XirrReport {
    pub project_name: String,
    pub location: String,
    pub schedule: Vec<CashFlowEvent>,
    pub result: XirrResult,
    pub exit: ExitBreakdown,
    pub payment_plan: PaymentPlan,
    /// Net profit over total invested, in %
    pub total_roi_pct: f64,
    /// Sale price over purchase price, in %
    pub appreciation_pct: f64,
    pub price_per_sqm: Option<f64>,
    pub rating: XirrRating,
    pub market_risk: RiskLevel,
}

impl XirrReport {
    /// Sum of the additional entries, signed
    pub fn additional_cash_flow_total(&self) -> f64 {
        self.schedule
            .iter()
            .filter(|e| matches!(e.kind, CashFlowKind::Additional { .. }))
            .map(|e| e.amount)
            .sum()
    }
}

/// Run the XIRR engine and derive the report figures around it
pub fn analyze_investment(assumptions: &InvestmentAssumptions) -> EngineResult<XirrReport> {
    let (schedule, result) = super::solve_schedule(assumptions)?;
    let rate = result.rate;

    let down_payment = if assumptions.installment_months == 0 {
        assumptions.total_price
    } else {
        assumptions.down_payment()
    };
    let remaining_balance = assumptions.total_price - down_payment;
    let monthly_installment = if assumptions.installment_months == 0 {
        0.0
    } else {
        remaining_balance / assumptions.installment_months as f64
    };

    let total_roi_pct = if result.total_invested > 0.0 {
        result.net_profit / result.total_invested * 100.0
    } else {
        0.0
    };
    let appreciation_pct = if assumptions.total_price > 0.0 {
        (assumptions.projected_sales_price - assumptions.total_price) / assumptions.total_price * 100.0
    } else {
        0.0
    };
    let price_per_sqm = assumptions
        .property_size_sqm
        .filter(|sqm| *sqm > 0.0)
        .map(|sqm| assumptions.total_price / sqm);

    let report = XirrReport {
        project_name: assumptions.project_name.clone(),
        location: assumptions.location.clone(),
        schedule,
        result,
        exit: ExitBreakdown {
            gross_sale_price: assumptions.projected_sales_price,
            closing_costs: assumptions.closing_costs(),
            net_proceeds: assumptions.net_sale_proceeds(),
        },
        payment_plan: PaymentPlan {
            down_payment,
            installment_months: assumptions.installment_months,
            monthly_installment,
            remaining_balance,
        },
        total_roi_pct,
        appreciation_pct,
        price_per_sqm,
        rating: XirrRating::from_rate(rate),
        market_risk: market_risk(result.hold_period_months, appreciation_pct),
    };

    log::info!(
        "Analyzed {}: XIRR {:.2}%, ROI {:.2}%, {}",
        if report.project_name.is_empty() { "investment" } else { report.project_name.as_str() },
        rate * 100.0,
        total_roi_pct,
        report.rating
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> InvestmentAssumptions {
        InvestmentAssumptions::sample_villa(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
    }

    #[test]
    fn test_report_figures() {
        let mut a = sample();
        a.property_size_sqm = Some(200.0);
        let report = analyze_investment(&a).unwrap();

        assert_eq!(report.payment_plan.down_payment, 1_750_000_000.0);
        assert_eq!(report.payment_plan.monthly_installment, 350_000_000.0);
        assert!((report.exit.closing_costs - 105_000_000.0).abs() < 1e-3);
        assert!((report.appreciation_pct - 20.0).abs() < 1e-9);
        assert_eq!(report.price_per_sqm, Some(17_500_000.0));
        assert_eq!(report.additional_cash_flow_total(), -150_000_000.0);

        // furniture package counts as invested capital
        assert!((report.result.total_invested - 3_650_000_000.0).abs() < 1e-3);
        let expected_roi = (4_095_000_000.0 - 3_650_000_000.0) / 3_650_000_000.0 * 100.0;
        assert!((report.total_roi_pct - expected_roi).abs() < 1e-9);
        assert_eq!(report.result.hold_period_months, 12);
        assert_eq!(report.market_risk, RiskLevel::Low);
    }

    #[test]
    fn test_zero_installments_plan() {
        let mut a = sample();
        a.installment_months = 0;
        let report = analyze_investment(&a).unwrap();
        assert_eq!(report.payment_plan.down_payment, 3_500_000_000.0);
        assert_eq!(report.payment_plan.monthly_installment, 0.0);
        assert_eq!(report.payment_plan.remaining_balance, 0.0);
    }

    #[test]
    fn test_report_agrees_with_compute_xirr() {
        let a = sample();
        let report = analyze_investment(&a).unwrap();
        assert_eq!(report.result, crate::xirr::compute_xirr(&a).unwrap());
        assert_eq!(report.schedule, crate::xirr::generate_schedule(&a).unwrap());
    }

    #[test]
    fn test_no_size_no_price_per_sqm() {
        let report = analyze_investment(&sample()).unwrap();
        assert!(report.price_per_sqm.is_none());
    }
}
