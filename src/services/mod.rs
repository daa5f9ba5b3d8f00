//! Service layer for FinFlow
//!
//! The budget period engine (tax, period, recurrence) is pure computation.
//! Planning, import and the sheet service build on it and on the storage
//! layer.

pub mod import;
pub mod period;
pub mod planner;
pub mod projection;
pub mod recurrence;
pub mod sheets;
pub mod tax;

pub use period::{compute_budget_window, compute_budget_window_for_label, next_window};
pub use planner::{
    collect_recurring_candidates, due_in_window, gather_candidates, plan_period, DueItem,
    PeriodPlan,
};
pub use recurrence::{is_due_within_window, RecurrenceMatcher, ScanOutcome};
pub use sheets::SheetService;
pub use tax::{compute_net_annual_income, tax_breakdown, TaxBreakdown};
