//! Recurring expense model
//!
//! An expense row as stored in a budget sheet. Only active rows with both a
//! recurrence frequency and a last-paid date take part in recurrence
//! matching; everything else is simply a non-recurring line.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::income::normalize_label;
use super::money::Money;

/// How often a recurring expense comes due
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceFrequency {
    Weekly,
    BiWeekly,
    Monthly,
    SemiAnnual,
    Annual,
    /// A stored label this version does not understand
    Unrecognized(String),
}

/// One advancement step between due dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceStep {
    Days(u64),
    Months(u32),
}

impl RecurrenceStep {
    /// The date `count` steps after `origin`.
    ///
    /// Month steps are taken from the origin in one jump so a day-31 bill
    /// clamps to short months without drifting earlier in later months.
    pub fn nth_after(&self, origin: NaiveDate, count: u32) -> Option<NaiveDate> {
        match *self {
            Self::Days(days) => origin.checked_add_days(Days::new(days.checked_mul(count as u64)?)),
            Self::Months(months) => {
                origin.checked_add_months(Months::new(months.checked_mul(count)?))
            }
        }
    }
}

impl RecurrenceFrequency {
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "weekly" => Self::Weekly,
            "biweekly" => Self::BiWeekly,
            "monthly" => Self::Monthly,
            "semiannual" | "semiannually" => Self::SemiAnnual,
            "annual" | "annually" | "yearly" => Self::Annual,
            _ => Self::Unrecognized(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Weekly => "Weekly",
            Self::BiWeekly => "Bi-Weekly",
            Self::Monthly => "Monthly",
            Self::SemiAnnual => "Semi-Annual",
            Self::Annual => "Annual",
            Self::Unrecognized(label) => label,
        }
    }

    /// Step between due dates; `None` when the frequency is unrecognized
    pub fn step(&self) -> Option<RecurrenceStep> {
        match self {
            Self::Weekly => Some(RecurrenceStep::Days(7)),
            Self::BiWeekly => Some(RecurrenceStep::Days(14)),
            Self::Monthly => Some(RecurrenceStep::Months(1)),
            Self::SemiAnnual => Some(RecurrenceStep::Months(6)),
            Self::Annual => Some(RecurrenceStep::Months(12)),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<String> for RecurrenceFrequency {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<RecurrenceFrequency> for String {
    fn from(f: RecurrenceFrequency) -> Self {
        f.label().to_string()
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Read the local calendar date from a stored value.
///
/// Sheets hand back either "2026-01-15" or a full timestamp such as
/// "2026-01-15T05:00:00.000Z". Only the leading `YYYY-MM-DD` is used, so no
/// timezone conversion can shift the day.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| {
        let parsed = parse_calendar_date(s);
        if parsed.is_none() && !s.trim().is_empty() {
            tracing::warn!(value = s, "ignoring unparseable last-paid date");
        }
        parsed
    }))
}

fn serialize_calendar_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_some(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Option<RecurrenceFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(RecurrenceFrequency::from))
}

fn default_active() -> bool {
    true
}

/// An expense line that may repeat on a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub category: String,
    #[serde(default, alias = "amount")]
    pub budgeted_amount: Money,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(
        default,
        alias = "frequency",
        deserialize_with = "deserialize_frequency",
        skip_serializing_if = "Option::is_none"
    )]
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    #[serde(
        default,
        alias = "lastPaid",
        deserialize_with = "deserialize_calendar_date",
        serialize_with = "serialize_calendar_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_paid_date: Option<NaiveDate>,
}

impl RecurringExpense {
    /// A plain, non-recurring expense line
    pub fn new(category: impl Into<String>, budgeted_amount: Money) -> Self {
        Self {
            category: category.into(),
            budgeted_amount,
            is_active: true,
            recurrence_frequency: None,
            last_paid_date: None,
        }
    }

    pub fn recurring(
        category: impl Into<String>,
        budgeted_amount: Money,
        frequency: RecurrenceFrequency,
        last_paid: NaiveDate,
    ) -> Self {
        Self {
            recurrence_frequency: Some(frequency),
            last_paid_date: Some(last_paid),
            ..Self::new(category, budgeted_amount)
        }
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether this row carries everything recurrence matching needs
    pub fn is_recurring(&self) -> bool {
        self.is_active && self.recurrence_frequency.is_some() && self.last_paid_date.is_some()
    }

    /// Key used to collapse the same bill across several sheets
    pub fn category_key(&self) -> String {
        self.category.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_frequency_labels() {
        assert_eq!(RecurrenceFrequency::from_label("Bi-Weekly"), RecurrenceFrequency::BiWeekly);
        assert_eq!(
            RecurrenceFrequency::from_label("Semi-Annual"),
            RecurrenceFrequency::SemiAnnual
        );
        assert_eq!(
            RecurrenceFrequency::from_label("Quarterly"),
            RecurrenceFrequency::Unrecognized("Quarterly".into())
        );
        assert!(RecurrenceFrequency::from_label("Quarterly").step().is_none());
    }

    #[test]
    fn test_month_steps_clamp_without_drift() {
        let step = RecurrenceStep::Months(1);
        let origin = date(2026, 1, 31);
        assert_eq!(step.nth_after(origin, 1), Some(date(2026, 2, 28)));
        assert_eq!(step.nth_after(origin, 2), Some(date(2026, 3, 31)));
    }

    #[test]
    fn test_day_steps() {
        let step = RecurrenceStep::Days(14);
        assert_eq!(step.nth_after(date(2026, 1, 1), 2), Some(date(2026, 1, 29)));
        assert_eq!(step.nth_after(date(2026, 1, 1), 0), Some(date(2026, 1, 1)));
    }

    #[test]
    fn test_parse_calendar_date_ignores_time() {
        assert_eq!(parse_calendar_date("2026-01-15"), Some(date(2026, 1, 15)));
        assert_eq!(
            parse_calendar_date("2026-01-15T23:30:00.000Z"),
            Some(date(2026, 1, 15))
        );
        assert_eq!(parse_calendar_date("15/01/2026"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_deserialize_sheet_row() {
        let json = r#"{
            "category": "Internet",
            "amount": 6500,
            "recurrenceFrequency": "Monthly",
            "lastPaidDate": "2026-01-15T05:00:00.000Z"
        }"#;
        let expense: RecurringExpense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.budgeted_amount, Money::from_cents(6500));
        assert!(expense.is_active);
        assert_eq!(expense.recurrence_frequency, Some(RecurrenceFrequency::Monthly));
        assert_eq!(expense.last_paid_date, Some(date(2026, 1, 15)));
        assert!(expense.is_recurring());
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let json = r#"{"category": "Fun", "amount": 0, "recurrenceFrequency": "", "lastPaidDate": "soon"}"#;
        let expense: RecurringExpense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.recurrence_frequency, None);
        assert_eq!(expense.last_paid_date, None);
        assert!(!expense.is_recurring());
    }

    #[test]
    fn test_serialize_date_only() {
        let expense = RecurringExpense::recurring(
            "Rent",
            Money::from_dollars(1200),
            RecurrenceFrequency::Monthly,
            date(2026, 2, 1),
        );
        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("\"lastPaidDate\":\"2026-02-01\""));
        let back: RecurringExpense = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expense);
    }

    #[test]
    fn test_category_key() {
        let expense = RecurringExpense::new("  Car Insurance ", Money::zero());
        assert_eq!(expense.category_key(), "car insurance");
    }
}
