//! Opportunity-cost projection
//!
//! Shows what an allocation would grow to if invested instead: compound
//! growth at a long-run market return over 10 and 30 years.

use serde::Serialize;

use crate::models::Money;

/// Long-run annual market return used for projections
pub const DEFAULT_GROWTH_RATE: f64 = 0.08;

pub const SHORT_HORIZON_YEARS: u32 = 10;
pub const LONG_HORIZON_YEARS: u32 = 30;

/// Categories where money moved in is growth rather than forgone growth
pub const INVESTING_CATEGORIES: [&str; 3] = ["Savings", "Investments", "Emergency Fund"];

/// `principal * (1 + rate)^years`, rounded to the cent
pub fn future_value(principal: Money, years: u32, rate: f64) -> Money {
    let growth = (1.0 + rate).powf(f64::from(years));
    Money::from_dollars_rounded(principal.to_dollars_f64() * growth)
}

pub fn is_investing_category(category: &str) -> bool {
    let category = category.trim();
    INVESTING_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
}

/// How a projection should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Money placed in an investing bucket
    WealthPotential,
    /// Money spent instead of invested
    OpportunityCost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub amount: Money,
    pub category: String,
    pub mode: ProjectionMode,
    pub rate: f64,
    pub ten_year: Money,
    pub thirty_year: Money,
}

/// Project `amount` over both horizons at `rate`
pub fn project_at(amount: Money, category: &str, rate: f64) -> Projection {
    let mode = if is_investing_category(category) {
        ProjectionMode::WealthPotential
    } else {
        ProjectionMode::OpportunityCost
    };
    Projection {
        amount,
        category: category.trim().to_string(),
        mode,
        rate,
        ten_year: future_value(amount, SHORT_HORIZON_YEARS, rate),
        thirty_year: future_value(amount, LONG_HORIZON_YEARS, rate),
    }
}

pub fn project(amount: Money, category: &str) -> Projection {
    project_at(amount, category, DEFAULT_GROWTH_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_value() {
        assert_eq!(future_value(Money::from_dollars(50), 10, 0.08), Money::from_cents(10_795));
        assert_eq!(future_value(Money::from_dollars(50), 30, 0.08), Money::from_cents(50_313));
        assert_eq!(future_value(Money::from_dollars(50), 0, 0.08), Money::from_dollars(50));
        assert_eq!(future_value(Money::from_dollars(50), 30, 0.0), Money::from_dollars(50));
    }

    #[test]
    fn test_project_modes() {
        let savings = project(Money::from_dollars(1_000), "emergency fund");
        assert_eq!(savings.mode, ProjectionMode::WealthPotential);
        assert_eq!(savings.thirty_year, Money::from_cents(1_006_266));

        let dining = project(Money::from_dollars(50), "Dining Out");
        assert_eq!(dining.mode, ProjectionMode::OpportunityCost);
        assert_eq!(dining.ten_year, Money::from_cents(10_795));
    }
}
