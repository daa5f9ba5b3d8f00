//! FinFlow - budget period engine
//!
//! Turns an income profile into net take-home pay, works out the budget
//! window an anchor date falls in along with the income attributable to
//! it, and finds the recurring bills that fall due inside that window.
//!
//! # Architecture
//!
//! - `config`: Paths, settings and the built-in tax tables
//! - `error`: Custom error types
//! - `models`: Money, income, tax tables, windows, expenses and sheets
//! - `storage`: JSON sheet stores
//! - `services`: Tax engine, period allocator, recurrence matcher and sheet editing
//! - `audit`: Append-only change log
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use finflow::config::tax_year;
//! use finflow::models::{IncomeProfile, Money, PayFrequency};
//! use finflow::services::compute_net_annual_income;
//!
//! let profile = IncomeProfile::new(Money::from_dollars(60_000), PayFrequency::Annual);
//! let net = compute_net_annual_income(&profile, &tax_year::us_2025());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinflowError, FinflowResult};
