//! Tax configuration models
//!
//! Federal brackets, payroll levies and state rates are plain data loaded
//! from settings. The engine in `services::tax` only reads them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::money::Money;

/// One marginal tier of the federal table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the tier in dollars; `None` means unbounded
    #[serde(default, alias = "limit")]
    pub upper_limit: Option<f64>,
    pub rate: f64,
}

impl TaxBracket {
    pub const fn up_to(limit: f64, rate: f64) -> Self {
        Self {
            upper_limit: Some(limit),
            rate,
        }
    }

    pub const fn unbounded(rate: f64) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }

    /// Upper limit with `None` read as +inf
    pub fn limit(&self) -> f64 {
        self.upper_limit.unwrap_or(f64::INFINITY)
    }
}

/// Problems found when validating a bracket table
#[derive(Debug, Clone, PartialEq)]
pub enum TaxTableError {
    Empty,
    RateOutOfRange { index: usize, rate: f64 },
    DecreasingRate { index: usize },
    NonIncreasingLimit { index: usize },
    BoundedTop,
    UnboundedBeforeTop { index: usize },
}

impl fmt::Display for TaxTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "bracket table is empty"),
            Self::RateOutOfRange { index, rate } => {
                write!(f, "bracket {} has rate {} outside [0, 1]", index, rate)
            }
            Self::DecreasingRate { index } => {
                write!(f, "bracket {} has a lower rate than the one before it", index)
            }
            Self::NonIncreasingLimit { index } => {
                write!(f, "bracket {} does not raise the upper limit", index)
            }
            Self::BoundedTop => write!(f, "last bracket must be unbounded"),
            Self::UnboundedBeforeTop { index } => {
                write!(f, "bracket {} is unbounded but is not the last bracket", index)
            }
        }
    }
}

impl std::error::Error for TaxTableError {}

/// Ordered marginal brackets covering [0, inf) with no gaps
///
/// Construction enforces strictly increasing limits, rates within [0, 1]
/// that never decrease, and an unbounded final tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, TaxTableError> {
        if brackets.is_empty() {
            return Err(TaxTableError::Empty);
        }

        let last = brackets.len() - 1;
        let mut previous_limit = 0.0_f64;
        let mut previous_rate = 0.0_f64;

        for (index, bracket) in brackets.iter().enumerate() {
            if !(0.0..=1.0).contains(&bracket.rate) {
                return Err(TaxTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.rate < previous_rate {
                return Err(TaxTableError::DecreasingRate { index });
            }
            match bracket.upper_limit {
                None if index != last => return Err(TaxTableError::UnboundedBeforeTop { index }),
                None => {}
                Some(_) if index == last => return Err(TaxTableError::BoundedTop),
                Some(limit) => {
                    if !limit.is_finite() || limit <= previous_limit {
                        return Err(TaxTableError::NonIncreasingLimit { index });
                    }
                    previous_limit = limit;
                }
            }
            previous_rate = bracket.rate;
        }

        Ok(Self { brackets })
    }

    /// Build from a compiled-in table. Validity is checked in debug builds
    /// and by the tests of each built-in table.
    pub(crate) fn from_static(brackets: &[TaxBracket]) -> Self {
        debug_assert!(Self::new(brackets.to_vec()).is_ok());
        Self {
            brackets: brackets.to_vec(),
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxBracket> {
        self.brackets.iter()
    }
}

impl TryFrom<Vec<TaxBracket>> for TaxBracketTable {
    type Error = TaxTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<TaxBracketTable> for Vec<TaxBracket> {
    fn from(table: TaxBracketTable) -> Self {
        table.brackets
    }
}

/// Flat payroll levies: a capped social-security style rate and an
/// uncapped medicare style rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayrollLevy {
    pub cap: Money,
    pub social_security_rate: f64,
    pub medicare_rate: f64,
}

/// Flat state income tax rates keyed by 2-letter code
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTaxRates(BTreeMap<String, f64>);

impl StateTaxRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, code: &str, rate: f64) -> Self {
        self.insert(code, rate);
        self
    }

    pub fn insert(&mut self, code: &str, rate: f64) {
        self.0.insert(code.trim().to_uppercase(), rate);
    }

    /// Rate for a state code; unknown codes resolve to 0.0
    pub fn rate(&self, code: &str) -> f64 {
        self.0
            .get(&code.trim().to_uppercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(&code.trim().to_uppercase())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(&'static str, f64)> for StateTaxRates {
    fn from_iter<I: IntoIterator<Item = (&'static str, f64)>>(iter: I) -> Self {
        let mut rates = Self::new();
        for (code, rate) in iter {
            rates.insert(code, rate);
        }
        rates
    }
}

/// Everything the tax engine needs for one tax year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSchedule {
    pub standard_deduction: Money,
    pub federal_brackets: TaxBracketTable,
    pub payroll: PayrollLevy,
    pub state_rates: StateTaxRates,
}
