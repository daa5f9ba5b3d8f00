//! Period planner
//!
//! Assembles a new budget period: net income from the tax engine, the window
//! from the period allocator, and the recurring bills that fall due in it.
//! Bills are pooled from every stored sheet, so the same bill usually shows
//! up several times; only its most recently paid record is kept.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    BudgetItem, BudgetSheet, BudgetWindow, DurationKind, IncomeProfile, Money, RecurringExpense,
    TaxSchedule,
};
use crate::storage::SheetStore;

use super::period::compute_budget_window;
use super::recurrence::{RecurrenceMatcher, ScanOutcome};
use super::tax::{tax_breakdown, TaxBreakdown};

/// Keep one record per bill: the one paid most recently.
///
/// Bills are matched on trimmed, case-insensitive category. Records that
/// cannot recur (inactive, no frequency, no last-paid date) are dropped
/// first. On equal last-paid dates the earlier record wins. Output keeps the
/// order in which each bill was first seen.
pub fn collect_recurring_candidates<I>(expenses: I) -> Vec<RecurringExpense>
where
    I: IntoIterator<Item = RecurringExpense>,
{
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, RecurringExpense> = HashMap::new();

    for expense in expenses.into_iter().filter(RecurringExpense::is_recurring) {
        let key = expense.category_key();
        match latest.get(&key) {
            Some(kept) if kept.last_paid_date >= expense.last_paid_date => {
                tracing::debug!(category = %expense.category, "older duplicate dropped");
            }
            Some(_) => {
                latest.insert(key, expense);
            }
            None => {
                order.push(key.clone());
                latest.insert(key, expense);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| latest.remove(&key))
        .collect()
}

/// Read every named sheet, then pool their items into one candidate list.
///
/// All reads finish before any folding starts. A sheet that fails to read is
/// skipped with a warning rather than failing the whole plan.
pub fn gather_candidates<S: SheetStore + ?Sized>(
    store: &S,
    store_id: &str,
    sheet_names: &[String],
) -> Vec<RecurringExpense> {
    let fetched: Vec<_> = sheet_names
        .iter()
        .map(|name| (name, store.read(store_id, name)))
        .collect();

    let mut pool = Vec::new();
    for (name, result) in fetched {
        match result {
            Ok(snapshot) => pool.extend(snapshot.items.into_iter().map(|item| item.expense)),
            Err(e) => tracing::warn!(store_id, sheet = %name, error = %e, "skipping unreadable sheet"),
        }
    }
    collect_recurring_candidates(pool)
}

/// A bill with an occurrence inside the window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueItem {
    pub expense: RecurringExpense,
    pub due_date: NaiveDate,
}

/// Candidates that come due inside `window`, in candidate order
pub fn due_in_window(
    candidates: &[RecurringExpense],
    window: &BudgetWindow,
    matcher: &RecurrenceMatcher,
) -> Vec<DueItem> {
    candidates
        .iter()
        .filter_map(|expense| match matcher.scan(expense, window.start, window.end) {
            ScanOutcome::Due(due_date) => Some(DueItem {
                expense: expense.clone(),
                due_date,
            }),
            _ => None,
        })
        .collect()
}

/// Everything needed to start a new budget period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodPlan {
    pub window: BudgetWindow,
    pub breakdown: TaxBreakdown,
    pub due_items: Vec<DueItem>,
    /// Period income left after the due bills; negative when they exceed it
    pub unallocated: Money,
}

impl PeriodPlan {
    pub fn due_total(&self) -> Money {
        self.due_items.iter().map(|d| d.expense.budgeted_amount).sum()
    }

    /// A fresh sheet pre-filled with the due bills
    pub fn into_sheet(self, name: impl Into<String>, income: IncomeProfile) -> BudgetSheet {
        let mut sheet = BudgetSheet::new(name, income).with_items(
            self.due_items
                .into_iter()
                .map(|d| BudgetItem::from_expense(d.expense))
                .collect(),
        );
        sheet.duration = self.window.duration;
        sheet.anchor = Some(self.window.anchor);
        sheet
    }
}

/// Build the plan for the period anchored at `anchor`
pub fn plan_period(
    profile: &IncomeProfile,
    schedule: &TaxSchedule,
    duration: DurationKind,
    anchor: NaiveDate,
    candidates: &[RecurringExpense],
    matcher: &RecurrenceMatcher,
) -> PeriodPlan {
    let breakdown = tax_breakdown(profile, schedule);
    let window = compute_budget_window(
        breakdown.net_annual,
        profile.salary_frequency,
        duration,
        anchor,
    );
    let due_items = due_in_window(candidates, &window, matcher);
    let due_total: Money = due_items.iter().map(|d| d.expense.budgeted_amount).sum();

    tracing::info!(
        window = %window,
        candidates = candidates.len(),
        due = due_items.len(),
        "planned budget period"
    );

    PeriodPlan {
        unallocated: window.period_income_total - due_total,
        window,
        breakdown,
        due_items,
    }
}
