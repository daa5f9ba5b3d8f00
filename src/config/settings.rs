//! User settings for FinFlow
//!
//! Budgeting preferences plus the tax tables for the current tax year. Every
//! field is optional in the file so a settings file from an older version, or
//! one that only overrides the state table, still loads.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::FinflowPaths;
use super::tax_year;
use crate::error::FinflowError;
use crate::models::{DurationKind, Money, PayFrequency, TaxSchedule};
use crate::services::recurrence::DEFAULT_ITERATION_CEILING;

/// User settings for FinFlow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Budget period length used when none is given
    #[serde(default)]
    pub default_duration: DurationKind,

    /// Pay frequency used when none is given
    #[serde(default)]
    pub default_pay_frequency: PayFrequency,

    /// Tax tables for the current tax year
    #[serde(default = "tax_year::us_2025")]
    pub tax: TaxSchedule,

    /// Upper bound on due-date advancement steps per expense
    #[serde(default = "default_iteration_ceiling")]
    pub recurrence_iteration_ceiling: u32,

    /// Amount moved per allocation transfer when none is given
    #[serde(default = "default_transfer_amount")]
    pub default_transfer_amount: Money,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format for dates in output
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_iteration_ceiling() -> u32 {
    DEFAULT_ITERATION_CEILING
}

fn default_transfer_amount() -> Money {
    Money::from_dollars(50)
}

fn default_currency() -> String {
    "$".to_string()
}

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Reject strftime patterns chrono cannot render
fn validate_date_format(pattern: &str) -> Result<(), FinflowError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FinflowError::Config(format!(
            "Invalid date_format '{}': not a valid strftime pattern",
            pattern
        )));
    }
    Ok(())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_duration: DurationKind::default(),
            default_pay_frequency: PayFrequency::default(),
            tax: tax_year::us_2025(),
            recurrence_iteration_ceiling: default_iteration_ceiling(),
            default_transfer_amount: default_transfer_amount(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &FinflowPaths) -> Result<Self, FinflowError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            tracing::debug!(path = %settings_path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FinflowError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| FinflowError::Config(format!("Failed to parse settings file: {}", e)))?;

        if settings.recurrence_iteration_ceiling == 0 {
            return Err(FinflowError::Config(
                "recurrence_iteration_ceiling must be greater than zero".into(),
            ));
        }
        validate_date_format(&settings.date_format)?;

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinflowPaths) -> Result<(), FinflowError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinflowError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinflowError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Format a date with the configured pattern, or as `YYYY-MM-DD` when
    /// the pattern cannot be rendered
    pub fn format_date(&self, date: chrono::NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            tracing::warn!(pattern = %self.date_format, "unusable date format, using default");
            return date.format(DEFAULT_DATE_FORMAT).to_string();
        }
        out
    }

    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
