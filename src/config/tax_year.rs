//! Built-in tax tables
//!
//! The 2025 US figures used when the settings file does not override them.

use crate::models::{Money, PayrollLevy, StateTaxRates, TaxBracket, TaxBracketTable, TaxSchedule};

pub const STANDARD_DEDUCTION_2025: i64 = 15_000;
pub const SOCIAL_SECURITY_CAP_2025: i64 = 176_100;
pub const SOCIAL_SECURITY_RATE: f64 = 0.062;
pub const MEDICARE_RATE: f64 = 0.0145;

const FEDERAL_BRACKETS_2025: [TaxBracket; 7] = [
    TaxBracket::up_to(11_925.0, 0.10),
    TaxBracket::up_to(48_475.0, 0.12),
    TaxBracket::up_to(103_350.0, 0.22),
    TaxBracket::up_to(197_300.0, 0.24),
    TaxBracket::up_to(250_525.0, 0.32),
    TaxBracket::up_to(626_350.0, 0.35),
    TaxBracket::unbounded(0.37),
];

const STATE_RATES_2025: [(&str, f64); 51] = [
    ("AL", 0.05),
    ("AK", 0.00),
    ("AZ", 0.025),
    ("AR", 0.049),
    ("CA", 0.093),
    ("CO", 0.044),
    ("CT", 0.0699),
    ("DE", 0.066),
    ("FL", 0.00),
    ("GA", 0.0575),
    ("HI", 0.11),
    ("ID", 0.058),
    ("IL", 0.0495),
    ("IN", 0.0323),
    ("IA", 0.06),
    ("KS", 0.057),
    ("KY", 0.045),
    ("LA", 0.0425),
    ("ME", 0.0715),
    ("MD", 0.0575),
    ("MA", 0.05),
    ("MI", 0.0425),
    ("MN", 0.0985),
    ("MS", 0.05),
    ("MO", 0.054),
    ("MT", 0.0675),
    ("NE", 0.0684),
    ("NV", 0.00),
    ("NH", 0.00),
    ("NJ", 0.1075),
    ("NM", 0.059),
    ("NY", 0.06),
    ("NC", 0.0475),
    ("ND", 0.029),
    ("OH", 0.0399),
    ("OK", 0.0475),
    ("OR", 0.099),
    ("PA", 0.0307),
    ("RI", 0.0599),
    ("SC", 0.07),
    ("SD", 0.00),
    ("TN", 0.00),
    ("TX", 0.00),
    ("UT", 0.0485),
    ("VT", 0.0875),
    ("VA", 0.0575),
    ("WA", 0.00),
    ("WV", 0.065),
    ("WI", 0.0765),
    ("WY", 0.00),
    ("DC", 0.1075),
];

pub fn federal_brackets_2025() -> TaxBracketTable {
    TaxBracketTable::from_static(&FEDERAL_BRACKETS_2025)
}

pub fn state_rates_2025() -> StateTaxRates {
    STATE_RATES_2025.into_iter().collect()
}

/// The complete 2025 schedule
pub fn us_2025() -> TaxSchedule {
    TaxSchedule {
        standard_deduction: Money::from_dollars(STANDARD_DEDUCTION_2025),
        federal_brackets: federal_brackets_2025(),
        payroll: PayrollLevy {
            cap: Money::from_dollars(SOCIAL_SECURITY_CAP_2025),
            social_security_rate: SOCIAL_SECURITY_RATE,
            medicare_rate: MEDICARE_RATE,
        },
        state_rates: state_rates_2025(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_federal_table_is_valid() {
        assert!(TaxBracketTable::new(FEDERAL_BRACKETS_2025.to_vec()).is_ok());
        assert_eq!(federal_brackets_2025().brackets().len(), 7);
    }

    #[test]
    fn test_state_table_covers_states_and_dc() {
        let rates = state_rates_2025();
        assert_eq!(rates.len(), 51);
        assert_eq!(rates.rate("TX"), 0.0);
        assert_eq!(rates.rate("DC"), 0.1075);
    }
}
