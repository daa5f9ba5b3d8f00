//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod args;
pub mod import;
pub mod income;
pub mod period;
pub mod project;
pub mod recurring;
pub mod sheet;

pub use import::{handle_import_command, ImportCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use period::{handle_period_command, PeriodCommands};
pub use project::handle_project_command;
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use sheet::{handle_sheet_command, SheetCommands};
