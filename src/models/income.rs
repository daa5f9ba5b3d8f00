//! Income profile model
//!
//! The income inputs a user enters for a budget: salary with its frequency,
//! a one-off annual bonus, and the state whose flat rate applies.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// How often a salary figure is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum PayFrequency {
    #[default]
    Annual,
    Monthly,
    BiWeekly,
    Weekly,
}

impl PayFrequency {
    /// Number of pay periods in a year
    pub const fn periods_per_year(&self) -> i64 {
        match self {
            Self::Annual => 1,
            Self::Monthly => 12,
            Self::BiWeekly => 26,
            Self::Weekly => 52,
        }
    }

    /// Parse a frequency label. Unknown labels are treated as annual figures.
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "monthly" => Self::Monthly,
            "biweekly" => Self::BiWeekly,
            "weekly" => Self::Weekly,
            _ => Self::Annual,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Annual => "Annual",
            Self::Monthly => "Monthly",
            Self::BiWeekly => "Bi-Weekly",
            Self::Weekly => "Weekly",
        }
    }
}

impl From<String> for PayFrequency {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<PayFrequency> for String {
    fn from(f: PayFrequency) -> Self {
        f.label().to_string()
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lower-case a label and drop separators so "Bi-Weekly", "bi weekly" and
/// "biweekly" compare equal.
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Income inputs for one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeProfile {
    #[serde(default, alias = "salary", alias = "salaryAmount")]
    pub salary_amount: Money,
    #[serde(default, alias = "salaryFrequency")]
    pub salary_frequency: PayFrequency,
    #[serde(default, alias = "bonus", alias = "bonusAmount")]
    pub bonus_amount: Money,
    #[serde(default, alias = "state", alias = "stateCode")]
    pub state_code: String,
}

impl IncomeProfile {
    pub fn new(salary_amount: Money, salary_frequency: PayFrequency) -> Self {
        Self {
            salary_amount,
            salary_frequency,
            bonus_amount: Money::zero(),
            state_code: String::new(),
        }
    }

    pub fn with_bonus(mut self, bonus: Money) -> Self {
        self.bonus_amount = bonus;
        self
    }

    pub fn with_state(mut self, state_code: impl Into<String>) -> Self {
        self.state_code = state_code.into();
        self
    }

    /// Salary scaled to a yearly figure, saturating at the largest amount
    pub fn annual_salary(&self) -> Money {
        let cents = self.salary_amount.cents();
        Money::from_cents(cents.saturating_mul(self.salary_frequency.periods_per_year()))
    }

    /// Annual salary plus bonus, saturating at the largest amount
    pub fn gross_annual(&self) -> Money {
        Money::from_cents(self.annual_salary().cents().saturating_add(self.bonus_amount.cents()))
    }

    /// Annual salary plus bonus; `None` when it does not fit in a `Money`
    pub fn checked_gross_annual(&self) -> Option<Money> {
        self.salary_amount
            .checked_mul(self.salary_frequency.periods_per_year())?
            .checked_add(self.bonus_amount)
    }

    /// Check the profile before it reaches the tax engine
    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if self.salary_amount.is_negative() {
            return Err(IncomeValidationError::NegativeSalary);
        }
        if self.bonus_amount.is_negative() {
            return Err(IncomeValidationError::NegativeBonus);
        }
        if self.checked_gross_annual().is_none() {
            return Err(IncomeValidationError::IncomeTooLarge);
        }
        Ok(())
    }
}

impl Default for IncomeProfile {
    fn default() -> Self {
        Self::new(Money::from_dollars(60_000), PayFrequency::Annual).with_state("TX")
    }
}

/// Validation errors for income profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    NegativeSalary,
    NegativeBonus,
    IncomeTooLarge,
}

impl fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSalary => write!(f, "Salary cannot be negative"),
            Self::NegativeBonus => write!(f, "Bonus cannot be negative"),
            Self::IncomeTooLarge => write!(f, "Annual income is too large to compute"),
        }
    }
}

impl std::error::Error for IncomeValidationError {}
