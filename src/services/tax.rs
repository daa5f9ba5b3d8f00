//! Tax engine
//!
//! Turns an income profile into net annual income: progressive federal
//! brackets after the standard deduction, flat payroll levies, and a flat
//! state rate. Pure computation; the schedule is passed in by the caller.

use serde::Serialize;

use crate::models::{IncomeProfile, Money, TaxBracketTable, TaxSchedule};

/// Every intermediate figure of one net-income computation, in dollars
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBreakdown {
    pub gross_annual: f64,
    pub taxable_income: f64,
    pub federal_tax: f64,
    pub social_security: f64,
    pub medicare: f64,
    pub state_tax: f64,
    pub state_rate: f64,
    /// Net income floored to a whole dollar
    pub net_annual: Money,
}

impl TaxBreakdown {
    pub fn payroll_tax(&self) -> f64 {
        self.social_security + self.medicare
    }

    pub fn total_tax(&self) -> f64 {
        self.federal_tax + self.payroll_tax() + self.state_tax
    }

    /// Share of gross income paid in tax; 0 when there is no income
    pub fn effective_rate(&self) -> f64 {
        if self.gross_annual <= 0.0 {
            return 0.0;
        }
        self.total_tax() / self.gross_annual
    }
}

/// Marginal tax on `taxable_income` across the bracket table.
///
/// Each bracket taxes only the slice of income between the previous limit
/// and its own upper limit.
pub fn bracket_tax(taxable_income: f64, table: &TaxBracketTable) -> f64 {
    let mut tax = 0.0;
    let mut previous_limit = 0.0;

    for bracket in table.iter() {
        if taxable_income <= previous_limit {
            break;
        }
        let span = taxable_income.min(bracket.limit()) - previous_limit;
        tax += span * bracket.rate;
        previous_limit = bracket.limit();
    }

    tax
}

/// Full breakdown of the net-income computation
pub fn tax_breakdown(profile: &IncomeProfile, schedule: &TaxSchedule) -> TaxBreakdown {
    let gross_annual = profile.gross_annual().to_dollars_f64().max(0.0);
    let taxable_income = (gross_annual - schedule.standard_deduction.to_dollars_f64()).max(0.0);
    let federal_tax = bracket_tax(taxable_income, &schedule.federal_brackets);

    let payroll = &schedule.payroll;
    let social_security = gross_annual.min(payroll.cap.to_dollars_f64()) * payroll.social_security_rate;
    let medicare = gross_annual * payroll.medicare_rate;

    let state_rate = schedule.state_rates.rate(&profile.state_code);
    let state_tax = gross_annual * state_rate;

    let total = federal_tax + social_security + medicare + state_tax;
    let net_annual = Money::from_dollars_floor(gross_annual - total);

    TaxBreakdown {
        gross_annual,
        taxable_income,
        federal_tax,
        social_security,
        medicare,
        state_tax,
        state_rate,
        net_annual,
    }
}

/// Net annual income for a profile, floored to a whole currency unit
pub fn compute_net_annual_income(profile: &IncomeProfile, schedule: &TaxSchedule) -> Money {
    let breakdown = tax_breakdown(profile, schedule);
    tracing::debug!(
        gross = breakdown.gross_annual,
        taxable = breakdown.taxable_income,
        federal = breakdown.federal_tax,
        state = breakdown.state_tax,
        net = %breakdown.net_annual,
        "computed net annual income"
    );
    breakdown.net_annual
}
