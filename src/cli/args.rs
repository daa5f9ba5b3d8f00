//! Arguments shared by several commands

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::config::settings::Settings;
use crate::models::{DurationKind, IncomeProfile, Money, PayFrequency};
use crate::storage::spreadsheet_id_from_link;

/// Environment variable naming the default store
pub const STORE_ENV: &str = "FINFLOW_STORE";

pub fn parse_money(raw: &str) -> Result<Money, String> {
    Money::parse(raw).map_err(|e| e.to_string())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

/// Income inputs; anything left out keeps the base profile's value
#[derive(Args, Debug, Clone, Default)]
pub struct IncomeArgs {
    /// Salary per pay period (e.g. "60000" or "$2,300.00")
    #[arg(long, value_parser = parse_money)]
    pub salary: Option<Money>,

    /// How often the salary is paid: annual, monthly, bi-weekly, weekly
    #[arg(long)]
    pub frequency: Option<String>,

    /// Annual bonus
    #[arg(long, value_parser = parse_money)]
    pub bonus: Option<Money>,

    /// Two-letter state code
    #[arg(long)]
    pub state: Option<String>,
}

impl IncomeArgs {
    pub fn apply_to(&self, mut base: IncomeProfile) -> IncomeProfile {
        if let Some(salary) = self.salary {
            base.salary_amount = salary;
        }
        if let Some(frequency) = &self.frequency {
            base.salary_frequency = PayFrequency::from_label(frequency);
        }
        if let Some(bonus) = self.bonus {
            base.bonus_amount = bonus;
        }
        if let Some(state) = &self.state {
            base.state_code = state.trim().to_uppercase();
        }
        base
    }

    pub fn is_empty(&self) -> bool {
        self.salary.is_none() && self.frequency.is_none() && self.bonus.is_none() && self.state.is_none()
    }

    /// Profile for a one-off computation, starting from the settings default
    pub fn profile(&self, settings: &Settings) -> IncomeProfile {
        let mut base = IncomeProfile::default();
        base.salary_frequency = settings.default_pay_frequency;
        self.apply_to(base)
    }
}

/// Which budget window to work with
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Budget duration: weekly, bi-weekly, monthly, annual
    #[arg(long)]
    pub duration: Option<String>,

    /// Anchor date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub anchor: Option<NaiveDate>,
}

impl WindowArgs {
    pub fn duration(&self, settings: &Settings) -> DurationKind {
        self.duration
            .as_deref()
            .map(DurationKind::from_label)
            .unwrap_or(settings.default_duration)
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Store to read sheets from: a store id or a spreadsheet link
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    #[arg(long, env = STORE_ENV, default_value = "default")]
    pub store: String,
}

impl StoreArgs {
    pub fn store_id(&self) -> String {
        spreadsheet_id_from_link(&self.store)
    }
}
