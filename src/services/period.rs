//! Period allocator
//!
//! Computes the calendar window a budget covers and the slice of net annual
//! income attributable to it.

use chrono::{Duration, NaiveDate};

use crate::models::{BudgetWindow, DurationKind, Money, PayFrequency};

/// Window and income share for a budget anchored at `anchor`.
///
/// Weekly and bi-weekly windows start on the anchor, monthly windows cover
/// the anchor's calendar month, annual windows run one year from the anchor.
/// The income share is net annual income divided by the number of such
/// periods in a year, truncated to the cent.
pub fn compute_budget_window(
    net_annual: Money,
    pay_frequency: PayFrequency,
    duration: DurationKind,
    anchor: NaiveDate,
) -> BudgetWindow {
    let (start, end) = duration.bounds(anchor);
    let period_income_total = net_annual.divide_by(duration.periods_per_year());

    tracing::debug!(
        %duration,
        %start,
        %end,
        total = %period_income_total,
        "computed budget window"
    );

    BudgetWindow {
        start,
        end,
        duration,
        anchor,
        pay_frequency,
        period_income_total,
    }
}

/// Same as [`compute_budget_window`] for a raw duration label. Labels that
/// are not a known duration are budgeted monthly.
pub fn compute_budget_window_for_label(
    net_annual: Money,
    pay_frequency: PayFrequency,
    duration_label: &str,
    anchor: NaiveDate,
) -> BudgetWindow {
    compute_budget_window(
        net_annual,
        pay_frequency,
        DurationKind::from_label(duration_label),
        anchor,
    )
}

/// The window immediately after `window`, at the same income level
pub fn next_window(window: &BudgetWindow, net_annual: Money) -> BudgetWindow {
    let anchor = window.end + Duration::days(1);
    compute_budget_window(net_annual, window.pay_frequency, window.duration, anchor)
}

/// Income per paycheck at the window's pay frequency
pub fn paycheck_amount(net_annual: Money, pay_frequency: PayFrequency) -> Money {
    net_annual.divide_by(pay_frequency.periods_per_year())
}
