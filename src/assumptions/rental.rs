//! Rental pro-forma assumptions

use serde::{Deserialize, Serialize};

use super::occupancy::{ExhaustionPolicy, OccupancyIncreases};
use crate::calendar::YearMonth;
use crate::error::{EngineError, EngineResult};

/// Accepted range for purchase and ready years
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Inputs to the ten-year rental projection.
///
/// Percentages are whole numbers (`7.0` = 7%). Money is in the base unit
/// (IDR). Dates are `"YYYY-MM"` text exactly as the host stores them; they are
/// parsed during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalAssumptions {
    pub initial_investment: f64,
    pub purchase_date: String,
    /// Construction completion; `None` means ready at purchase
    #[serde(default)]
    pub property_ready_date: Option<String>,
    pub keys: u32,

    // First operational year bases
    pub y1_occupancy: f64,
    #[serde(rename = "y1ADR")]
    pub y1_adr: f64,
    #[serde(rename = "y1FB")]
    pub y1_fb: f64,
    pub y1_spa: f64,
    #[serde(rename = "y1OODs", default)]
    pub y1_other: f64,
    #[serde(default)]
    pub y1_misc: f64,

    pub occupancy_increases: OccupancyIncreases,
    #[serde(default)]
    pub occupancy_exhaustion: ExhaustionPolicy,

    // Annual growth
    pub adr_growth: f64,
    pub fb_growth: f64,
    pub spa_growth: f64,
    #[serde(default)]
    pub other_growth: f64,
    #[serde(default)]
    pub misc_growth: f64,
    pub cam_growth: f64,
    pub base_fee_growth: f64,
    pub tech_fee_growth: f64,

    // Direct costs, % of own revenue (utilities: % of total revenue)
    pub rooms_cost_pct: f64,
    pub fb_cost_pct: f64,
    pub spa_cost_pct: f64,
    #[serde(default)]
    pub other_cost_pct: f64,
    #[serde(default)]
    pub misc_cost_pct: f64,
    pub utilities_pct: f64,

    // Undistributed, % of total revenue
    pub admin_pct: f64,
    pub sales_pct: f64,
    pub maint_pct: f64,

    // Management fees
    pub cam_fee_per_unit: f64,
    pub base_fee_percent: f64,
    pub tech_fee_per_unit: f64,
    #[serde(default)]
    pub incentive_fee_pct: f64,
}

/// Parsed dates of a validated assumption set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub purchase: YearMonth,
    pub ready: Option<YearMonth>,
}

impl RentalAssumptions {
    /// Single-key Canggu villa used as the calculator's starting point
    pub fn default_villa() -> Self {
        Self {
            initial_investment: 2_375_000_000.0,
            purchase_date: "2026-01".to_string(),
            property_ready_date: None,
            keys: 1,
            y1_occupancy: 70.0,
            y1_adr: 1_600_000.0,
            y1_fb: 12_000_000.0,
            y1_spa: 0.0,
            y1_other: 0.0,
            y1_misc: 0.0,
            occupancy_increases: vec![4.0, 3.0, 2.0, 1.5, 1.5, 1.0, 1.0, 1.0, 1.0].into(),
            occupancy_exhaustion: ExhaustionPolicy::HoldLast,
            adr_growth: 4.0,
            fb_growth: 3.0,
            spa_growth: 0.0,
            other_growth: 0.0,
            misc_growth: 0.0,
            cam_growth: 2.0,
            base_fee_growth: 3.0,
            tech_fee_growth: 3.0,
            rooms_cost_pct: 20.0,
            fb_cost_pct: 85.0,
            spa_cost_pct: 0.0,
            other_cost_pct: 0.0,
            misc_cost_pct: 0.0,
            utilities_pct: 7.0,
            admin_pct: 1.0,
            sales_pct: 5.0,
            maint_pct: 3.0,
            cam_fee_per_unit: 1_250_000.0,
            base_fee_percent: 2.0,
            tech_fee_per_unit: 1_000_000.0,
            incentive_fee_pct: 0.0,
        }
    }

    /// 18-key apartment block from the reference spreadsheet: bought January
    /// 2026, operating from January 2028.
    pub fn reference_apartment() -> Self {
        Self {
            initial_investment: 15_087_472_000.0,
            purchase_date: "2026-01".to_string(),
            property_ready_date: Some("2028-01".to_string()),
            keys: 18,
            y1_occupancy: 70.0,
            y1_adr: 1_900_000.0,
            y1_fb: 216_000_000.0,
            y1_spa: 64_800_000.0,
            y1_other: 0.0,
            y1_misc: 0.0,
            occupancy_increases: vec![5.5, 5.25, 4.5, 3.0, 1.0, 0.5, 0.25, 0.0, 0.0].into(),
            occupancy_exhaustion: ExhaustionPolicy::HoldLast,
            adr_growth: 5.0,
            fb_growth: 3.0,
            spa_growth: 4.0,
            other_growth: 0.0,
            misc_growth: 0.0,
            cam_growth: 2.0,
            base_fee_growth: 3.0,
            tech_fee_growth: 3.0,
            rooms_cost_pct: 20.0,
            fb_cost_pct: 80.0,
            spa_cost_pct: 80.0,
            other_cost_pct: 80.0,
            misc_cost_pct: 80.0,
            utilities_pct: 7.0,
            admin_pct: 1.0,
            sales_pct: 2.5,
            maint_pct: 2.0,
            cam_fee_per_unit: 1_250_000.0,
            base_fee_percent: 2.0,
            tech_fee_per_unit: 1_200_000.0,
            incentive_fee_pct: 0.0,
        }
    }

    /// Reject structurally invalid inputs and parse the dates.
    pub fn validate(&self) -> EngineResult<Timeline> {
        if self.keys == 0 {
            return Err(EngineError::invalid("keys", "must be at least 1"));
        }

        let amounts = [
            ("initialInvestment", self.initial_investment),
            ("y1ADR", self.y1_adr),
            ("y1FB", self.y1_fb),
            ("y1Spa", self.y1_spa),
            ("y1OODs", self.y1_other),
            ("y1Misc", self.y1_misc),
            ("camFeePerUnit", self.cam_fee_per_unit),
            ("techFeePerUnit", self.tech_fee_per_unit),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::invalid(field, format!("must be a non-negative amount, got {value}")));
            }
        }

        for (field, value) in self.percentages() {
            if !value.is_finite() {
                return Err(EngineError::invalid(field, "must be a finite percentage"));
            }
            if value < 0.0 {
                return Err(EngineError::invalid(field, format!("percentage cannot be negative, got {value}")));
            }
        }

        if let Some(pos) = self.occupancy_increases.as_slice().iter().position(|p| !p.is_finite()) {
            return Err(EngineError::invalid("occupancyIncreases", format!("entry {pos} is not a number")));
        }

        let purchase: YearMonth = self
            .purchase_date
            .parse()
            .map_err(|e| EngineError::invalid("purchaseDate", format!("{e}")))?;

        check_year("purchaseDate", purchase)?;

        let ready = match &self.property_ready_date {
            Some(text) => {
                let ready = text
                    .parse::<YearMonth>()
                    .map_err(|e| EngineError::invalid("propertyReadyDate", format!("{e}")))?;
                check_year("propertyReadyDate", ready)?;
                Some(ready)
            }
            None => None,
        };

        Ok(Timeline { purchase, ready })
    }

    fn percentages(&self) -> [(&'static str, f64); 20] {
        [
            ("y1Occupancy", self.y1_occupancy),
            ("adrGrowth", self.adr_growth),
            ("fbGrowth", self.fb_growth),
            ("spaGrowth", self.spa_growth),
            ("otherGrowth", self.other_growth),
            ("miscGrowth", self.misc_growth),
            ("camGrowth", self.cam_growth),
            ("baseFeeGrowth", self.base_fee_growth),
            ("techFeeGrowth", self.tech_fee_growth),
            ("roomsCostPct", self.rooms_cost_pct),
            ("fbCostPct", self.fb_cost_pct),
            ("spaCostPct", self.spa_cost_pct),
            ("otherCostPct", self.other_cost_pct),
            ("miscCostPct", self.misc_cost_pct),
            ("utilitiesPct", self.utilities_pct),
            ("adminPct", self.admin_pct),
            ("salesPct", self.sales_pct),
            ("maintPct", self.maint_pct),
            ("baseFeePercent", self.base_fee_percent),
            ("incentiveFeePct", self.incentive_fee_pct),
        ]
    }
}

fn check_year(field: &str, ym: YearMonth) -> EngineResult<()> {
    if YEAR_RANGE.contains(&ym.year) {
        Ok(())
    } else {
        Err(EngineError::invalid(
            field,
            format!("year {} is outside {}..={}", ym.year, YEAR_RANGE.start(), YEAR_RANGE.end()),
        ))
    }
}
