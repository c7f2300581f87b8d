//! Display-currency conversion and formatting
//!
//! Engines work in IDR only. Conversion happens when results are shown, using
//! rates supplied by the host (or the fallback table).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyCode {
    IDR,
    USD,
    EUR,
    AUD,
    GBP,
    INR,
    CNY,
    AED,
    RUB,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 9] = [
        CurrencyCode::IDR,
        CurrencyCode::USD,
        CurrencyCode::EUR,
        CurrencyCode::AUD,
        CurrencyCode::GBP,
        CurrencyCode::INR,
        CurrencyCode::CNY,
        CurrencyCode::AED,
        CurrencyCode::RUB,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::IDR => "Rp",
            CurrencyCode::USD => "$",
            CurrencyCode::EUR => "€",
            CurrencyCode::AUD => "A$",
            CurrencyCode::GBP => "£",
            CurrencyCode::INR => "₹",
            CurrencyCode::CNY => "¥",
            CurrencyCode::AED => "د.إ",
            CurrencyCode::RUB => "₽",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency code {0:?}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.to_string() == upper)
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

/// IDR per unit of each currency
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    idr_per_unit: [f64; 9],
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::fallback()
    }
}

impl ExchangeRates {
    /// Static table used when live rates are unavailable
    pub fn fallback() -> Self {
        let mut rates = Self { idr_per_unit: [1.0; 9] };
        for (code, idr) in [
            (CurrencyCode::USD, 16_000.0),
            (CurrencyCode::EUR, 17_500.0),
            (CurrencyCode::AUD, 10_500.0),
            (CurrencyCode::GBP, 20_500.0),
            (CurrencyCode::INR, 190.0),
            (CurrencyCode::CNY, 2_200.0),
            (CurrencyCode::AED, 4_350.0),
            (CurrencyCode::RUB, 175.0),
        ] {
            rates.idr_per_unit[code.index()] = idr;
        }
        rates
    }

    /// Replace one rate. IDR is pinned at 1 and non-positive rates are ignored.
    pub fn with_rate(mut self, code: CurrencyCode, idr_per_unit: f64) -> Self {
        if code != CurrencyCode::IDR && idr_per_unit.is_finite() && idr_per_unit > 0.0 {
            self.idr_per_unit[code.index()] = idr_per_unit;
        } else {
            log::warn!("Ignoring exchange rate {} for {}", idr_per_unit, code);
        }
        self
    }

    pub fn idr_per_unit(&self, code: CurrencyCode) -> f64 {
        self.idr_per_unit[code.index()]
    }

    /// Units of `to` per one unit of `from`
    pub fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> f64 {
        self.idr_per_unit(from) / self.idr_per_unit(to)
    }

    pub fn convert(&self, amount: f64, from: CurrencyCode, to: CurrencyCode) -> f64 {
        if from == to {
            return amount;
        }
        amount * self.idr_per_unit(from) / self.idr_per_unit(to)
    }
}

/// Group an integer string with commas
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an IDR amount in `currency`, e.g. `$ 218,750` or `$ 12.50`.
///
/// Whole units for IDR and for anything of 1,000 or more, otherwise cents.
pub fn format_amount(amount_idr: f64, currency: CurrencyCode, rates: &ExchangeRates) -> String {
    let value = rates.convert(amount_idr, CurrencyCode::IDR, currency);
    let decimals = if currency == CurrencyCode::IDR || value.abs() >= 1000.0 { 0 } else { 2 };

    let text = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let sign = if value < 0.0 && value.abs() >= 0.5 * 10f64.powi(-(decimals as i32)) { "-" } else { "" };
    let mut out = format!("{}{} {}", sign, currency.symbol(), group_thousands(&whole));
    if let Some(f) = fraction {
        out.push('.');
        out.push_str(&f);
    }
    out
}

/// Compact form with K / M / B suffixes, e.g. `Rp15.1B`
pub fn format_abbrev(amount_idr: f64, currency: CurrencyCode, rates: &ExchangeRates) -> String {
    let value = rates.convert(amount_idr, CurrencyCode::IDR, currency);
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    let symbol = currency.symbol();

    if abs >= 1e9 {
        format!("{}{}{:.1}B", sign, symbol, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}{}{:.1}M", sign, symbol, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}{}{:.0}K", sign, symbol, abs / 1e3)
    } else {
        format!("{}{}{:.0}", sign, symbol, abs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_convert_through_idr() {
        let rates = ExchangeRates::fallback();
        assert_eq!(rates.convert(16_000_000.0, CurrencyCode::IDR, CurrencyCode::USD), 1000.0);
        assert_eq!(rates.convert(1000.0, CurrencyCode::USD, CurrencyCode::IDR), 16_000_000.0);
        assert_relative_eq!(
            rates.convert(100.0, CurrencyCode::EUR, CurrencyCode::USD),
            109.375,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_round_trip() {
        let rates = ExchangeRates::fallback();
        for code in CurrencyCode::ALL {
            let there = rates.convert(15_087_472_000.0, CurrencyCode::IDR, code);
            let back = rates.convert(there, code, CurrencyCode::IDR);
            assert_relative_eq!(back, 15_087_472_000.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_rate_is_units_of_target() {
        let rates = ExchangeRates::fallback();
        assert_eq!(rates.rate(CurrencyCode::USD, CurrencyCode::IDR), 16_000.0);
        assert_eq!(rates.rate(CurrencyCode::IDR, CurrencyCode::IDR), 1.0);
    }

    #[test]
    fn test_with_rate_overrides() {
        let rates = ExchangeRates::fallback().with_rate(CurrencyCode::USD, 15_500.0);
        assert_eq!(rates.idr_per_unit(CurrencyCode::USD), 15_500.0);

        let unchanged = ExchangeRates::fallback().with_rate(CurrencyCode::USD, -1.0);
        assert_eq!(unchanged.idr_per_unit(CurrencyCode::USD), 16_000.0);
    }

    #[test]
    fn test_parse_code() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!(" IDR ".parse::<CurrencyCode>().unwrap(), CurrencyCode::IDR);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_format_amount() {
        let rates = ExchangeRates::fallback();
        assert_eq!(format_amount(15_087_472_000.0, CurrencyCode::IDR, &rates), "Rp 15,087,472,000");
        assert_eq!(format_amount(3_500_000_000.0, CurrencyCode::USD, &rates), "$ 218,750");
        assert_eq!(format_amount(200_000.0, CurrencyCode::USD, &rates), "$ 12.50");
        assert_eq!(format_amount(-259_200_000.0, CurrencyCode::IDR, &rates), "-Rp 259,200,000");
        assert_eq!(format_amount(0.0, CurrencyCode::IDR, &rates), "Rp 0");
    }

    #[test]
    fn test_format_abbrev() {
        let rates = ExchangeRates::fallback();
        assert_eq!(format_abbrev(15_087_472_000.0, CurrencyCode::IDR, &rates), "Rp15.1B");
        assert_eq!(format_abbrev(259_200_000.0, CurrencyCode::IDR, &rates), "Rp259.2M");
        assert_eq!(format_abbrev(-45_000.0, CurrencyCode::IDR, &rates), "-Rp45K");
        assert_eq!(format_abbrev(3_500_000_000.0, CurrencyCode::USD, &rates), "$219K");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
    }
}
