//! Deal grades and risk levels derived from engine outputs

use serde::Serialize;
use std::fmt;

use crate::projection::PaybackPeriod;

/// Qualitative band for an annualised XIRR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum XirrRating {
    Excellent,
    VeryGood,
    Good,
    Fair,
    BelowAverage,
    Poor,
}

impl XirrRating {
    /// `rate` is a decimal (0.18 = 18%)
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 0.25 {
            XirrRating::Excellent
        } else if rate >= 0.18 {
            XirrRating::VeryGood
        } else if rate >= 0.12 {
            XirrRating::Good
        } else if rate >= 0.08 {
            XirrRating::Fair
        } else if rate >= 0.0 {
            XirrRating::BelowAverage
        } else {
            XirrRating::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            XirrRating::Excellent => "Excellent",
            XirrRating::VeryGood => "Very Good",
            XirrRating::Good => "Good",
            XirrRating::Fair => "Fair",
            XirrRating::BelowAverage => "Below Average",
            XirrRating::Poor => "Poor",
        }
    }
}

impl fmt::Display for XirrRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Market risk of a flip: longer holds and steeper assumed appreciation are riskier
pub fn market_risk(hold_period_months: i32, appreciation_pct: f64) -> RiskLevel {
    if hold_period_months <= 18 && appreciation_pct <= 30.0 {
        RiskLevel::Low
    } else if hold_period_months <= 24 && appreciation_pct <= 40.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

/// Risk of a rental by how long the investment takes to pay back
pub fn payback_risk(payback: PaybackPeriod) -> RiskLevel {
    match payback {
        PaybackPeriod::Years(years) if years <= 5.0 => RiskLevel::Low,
        PaybackPeriod::Years(years) if years <= 8.0 => RiskLevel::Moderate,
        _ => RiskLevel::High,
    }
}

/// Rental grade by average annual net yield (ROI after fees, in %)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RentalGrade {
    Excellent,
    Great,
    Good,
    Average,
    BelowAverage,
    Poor,
}

impl RentalGrade {
    pub fn from_net_yield(avg_net_yield_pct: f64) -> Self {
        if avg_net_yield_pct >= 15.0 {
            RentalGrade::Excellent
        } else if avg_net_yield_pct >= 12.0 {
            RentalGrade::Great
        } else if avg_net_yield_pct >= 9.0 {
            RentalGrade::Good
        } else if avg_net_yield_pct >= 6.0 {
            RentalGrade::Average
        } else if avg_net_yield_pct >= 3.0 {
            RentalGrade::BelowAverage
        } else {
            RentalGrade::Poor
        }
    }

    /// Short letter grade
    pub fn grade(&self) -> &'static str {
        match self {
            RentalGrade::Excellent => "A+",
            RentalGrade::Great => "A",
            RentalGrade::Good | RentalGrade::Average => "OK",
            RentalGrade::BelowAverage => "C",
            RentalGrade::Poor => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RentalGrade::Excellent => "Excellent",
            RentalGrade::Great => "Great",
            RentalGrade::Good => "Good",
            RentalGrade::Average => "Average",
            RentalGrade::BelowAverage => "Below Avg",
            RentalGrade::Poor => "Poor",
        }
    }
}

impl fmt::Display for RentalGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.grade(), self.label())
    }
}

/// Trajectory of take-home profit from the first to the last projected year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GrowthProfile {
    HighGrowth,
    Moderate,
    Stable,
    Declining,
}

impl GrowthProfile {
    pub fn from_profit_growth(growth_pct: f64) -> Self {
        if growth_pct >= 100.0 {
            GrowthProfile::HighGrowth
        } else if growth_pct >= 50.0 {
            GrowthProfile::Moderate
        } else if growth_pct >= 0.0 {
            GrowthProfile::Stable
        } else {
            GrowthProfile::Declining
        }
    }
}

impl fmt::Display for GrowthProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GrowthProfile::HighGrowth => "High Growth",
            GrowthProfile::Moderate => "Moderate",
            GrowthProfile::Stable => "Stable",
            GrowthProfile::Declining => "Declining",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xirr_bands() {
        assert_eq!(XirrRating::from_rate(0.30), XirrRating::Excellent);
        assert_eq!(XirrRating::from_rate(0.25), XirrRating::Excellent);
        assert_eq!(XirrRating::from_rate(0.20), XirrRating::VeryGood);
        assert_eq!(XirrRating::from_rate(0.12), XirrRating::Good);
        assert_eq!(XirrRating::from_rate(0.10), XirrRating::Fair);
        assert_eq!(XirrRating::from_rate(0.0), XirrRating::BelowAverage);
        assert_eq!(XirrRating::from_rate(-0.05), XirrRating::Poor);
        assert_eq!(XirrRating::VeryGood.to_string(), "Very Good");
    }

    #[test]
    fn test_market_risk() {
        assert_eq!(market_risk(12, 20.0), RiskLevel::Low);
        assert_eq!(market_risk(20, 20.0), RiskLevel::Moderate);
        assert_eq!(market_risk(12, 35.0), RiskLevel::Moderate);
        assert_eq!(market_risk(30, 10.0), RiskLevel::High);
        assert_eq!(market_risk(12, 50.0), RiskLevel::High);
    }

    #[test]
    fn test_payback_risk() {
        assert_eq!(payback_risk(PaybackPeriod::Years(4.2)), RiskLevel::Low);
        assert_eq!(payback_risk(PaybackPeriod::Years(8.0)), RiskLevel::Moderate);
        assert_eq!(payback_risk(PaybackPeriod::Years(12.0)), RiskLevel::High);
        assert_eq!(payback_risk(PaybackPeriod::NotRecoverable), RiskLevel::High);
    }

    #[test]
    fn test_rental_grades() {
        assert_eq!(RentalGrade::from_net_yield(16.0).to_string(), "A+ Excellent");
        assert_eq!(RentalGrade::from_net_yield(12.0), RentalGrade::Great);
        assert_eq!(RentalGrade::from_net_yield(10.0).grade(), "OK");
        assert_eq!(RentalGrade::from_net_yield(7.0).label(), "Average");
        assert_eq!(RentalGrade::from_net_yield(3.5).to_string(), "C Below Avg");
        assert_eq!(RentalGrade::from_net_yield(-2.0), RentalGrade::Poor);
    }

    #[test]
    fn test_growth_profile() {
        assert_eq!(GrowthProfile::from_profit_growth(150.0), GrowthProfile::HighGrowth);
        assert_eq!(GrowthProfile::from_profit_growth(60.0), GrowthProfile::Moderate);
        assert_eq!(GrowthProfile::from_profit_growth(0.0), GrowthProfile::Stable);
        assert_eq!(GrowthProfile::from_profit_growth(-10.0), GrowthProfile::Declining);
    }
}
