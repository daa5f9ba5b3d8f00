//! Budget window representation
//!
//! A window is the concrete calendar interval one budget covers, together
//! with the share of net income attributable to it.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::income::{normalize_label, PayFrequency};
use super::money::Money;

/// Length of a budgeting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum DurationKind {
    Weekly,
    BiWeekly,
    #[default]
    Monthly,
    Annual,
}

impl DurationKind {
    /// Parse a duration label; anything unrecognised falls back to Monthly.
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "weekly" | "week" => Self::Weekly,
            "biweekly" | "fortnightly" => Self::BiWeekly,
            "annual" | "annually" | "yearly" | "year" => Self::Annual,
            _ => Self::Monthly,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::BiWeekly => "Bi-Weekly",
            Self::Monthly => "Monthly",
            Self::Annual => "Annual",
        }
    }

    /// How many of these periods fit in a year, used to split net income
    pub const fn periods_per_year(&self) -> i64 {
        match self {
            Self::Weekly => 52,
            Self::BiWeekly => 26,
            Self::Monthly => 12,
            Self::Annual => 1,
        }
    }

    /// Inclusive calendar bounds of the period anchored at `anchor`
    pub fn bounds(&self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Weekly => (anchor, anchor + Duration::days(6)),
            Self::BiWeekly => (anchor, anchor + Duration::days(13)),
            Self::Monthly => (first_of_month(anchor), last_of_month(anchor)),
            Self::Annual => (anchor, same_day_next_year(anchor) - Duration::days(1)),
        }
    }
}

impl From<String> for DurationKind {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<DurationKind> for String {
    fn from(kind: DurationKind) -> Self {
        kind.label().to_string()
    }
}

impl fmt::Display for DurationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(date)
}

/// The anniversary of `date` one year on. A Feb 29 anchor rolls to Mar 1
/// so that consecutive annual windows tile without a gap.
fn same_day_next_year(date: NaiveDate) -> NaiveDate {
    match date.checked_add_months(Months::new(12)) {
        Some(next) if next.day() == date.day() => next,
        Some(next) => next + Duration::days(1),
        None => date,
    }
}

/// Last representable instant of a calendar day (23:59:59.999)
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// The calendar interval and income share for one budget period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetWindow {
    pub start: NaiveDate,
    /// Inclusive through end of day
    pub end: NaiveDate,
    pub duration: DurationKind,
    pub anchor: NaiveDate,
    pub pay_frequency: PayFrequency,
    pub period_income_total: Money,
}

impl BudgetWindow {
    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub fn end_instant(&self) -> NaiveDateTime {
        end_of_day(self.end)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn contains_instant(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start_instant() && instant <= self.end_instant()
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Human-readable label, e.g. "Monthly · Mar 2026" or "Weekly · Feb 01, 2026"
    pub fn label(&self) -> String {
        match self.duration {
            DurationKind::Monthly => {
                format!("{} · {}", self.duration, self.anchor.format("%b %Y"))
            }
            _ => format!("{} · {}", self.duration, self.anchor.format("%b %d, %Y")),
        }
    }
}

impl fmt::Display for BudgetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} to {})",
            self.label(),
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
