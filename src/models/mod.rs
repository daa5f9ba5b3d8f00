//! Core data models for FinFlow
//!
//! Income inputs, tax configuration, budget windows, recurring expenses and
//! the budget sheets that hold them.

pub mod budget;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;
pub mod period;
pub mod tax;

pub use budget::{AllocationError, BudgetItem, BudgetSheet, UNCATEGORIZED};
pub use expense::{RecurrenceFrequency, RecurrenceStep, RecurringExpense};
pub use ids::ItemId;
pub use income::{IncomeProfile, IncomeValidationError, PayFrequency};
pub use money::{Money, MoneyParseError};
pub use period::{BudgetWindow, DurationKind};
pub use tax::{PayrollLevy, StateTaxRates, TaxBracket, TaxBracketTable, TaxSchedule, TaxTableError};
