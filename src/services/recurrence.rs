//! Recurrence matcher
//!
//! Answers "does this recurring bill come due inside this window?". Starting
//! from the last-paid date, due dates are generated one step at a time until
//! one lands in the window, one passes the window end, or the step ceiling is
//! reached.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::models::RecurringExpense;

/// Advancement steps allowed per expense.
///
/// Weekly is the shortest step, and 5,220 weekly steps span just over a
/// century, so no realistic last-paid date can be cut off by the ceiling.
pub const DEFAULT_ITERATION_CEILING: u32 = 5_220;

/// Anything that names a calendar day. Time of day is dropped.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Where a scan for the next due date ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Inactive, or missing a frequency or last-paid date
    NotRecurring,
    /// Frequency label this version cannot step
    UnknownFrequency,
    /// A due date fell inside the window
    Due(NaiveDate),
    /// The first due date on or after the window start is past the window end
    NotDue { next_due: NaiveDate },
    /// The step ceiling or the calendar range ran out before a decision
    Exhausted { steps: u32 },
}

impl ScanOutcome {
    pub fn is_due(&self) -> bool {
        matches!(self, Self::Due(_))
    }
}

/// Recurrence matching with a configurable step ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceMatcher {
    ceiling: u32,
}

impl Default for RecurrenceMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATION_CEILING)
    }
}

impl RecurrenceMatcher {
    /// A ceiling of zero is raised to one so every scan takes at least a step.
    pub fn new(ceiling: u32) -> Self {
        Self {
            ceiling: ceiling.max(1),
        }
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Walk due dates forward from the last-paid date.
    ///
    /// The window is inclusive at both ends; the end bound covers its whole
    /// calendar day.
    pub fn scan(
        &self,
        expense: &RecurringExpense,
        window_start: impl CalendarDay,
        window_end: impl CalendarDay,
    ) -> ScanOutcome {
        if !expense.is_active {
            return ScanOutcome::NotRecurring;
        }
        let (Some(frequency), Some(last_paid)) =
            (expense.recurrence_frequency.as_ref(), expense.last_paid_date)
        else {
            return ScanOutcome::NotRecurring;
        };
        let Some(step) = frequency.step() else {
            tracing::debug!(
                category = %expense.category,
                frequency = %frequency,
                "unrecognized recurrence frequency"
            );
            return ScanOutcome::UnknownFrequency;
        };

        let start = window_start.calendar_day();
        let end = window_end.calendar_day();

        for count in 1..=self.ceiling {
            let Some(due) = step.nth_after(last_paid, count) else {
                return ScanOutcome::Exhausted { steps: count - 1 };
            };
            if due > end {
                return ScanOutcome::NotDue { next_due: due };
            }
            if due >= start {
                return ScanOutcome::Due(due);
            }
        }

        tracing::warn!(
            category = %expense.category,
            %last_paid,
            %end,
            ceiling = self.ceiling,
            "recurrence scan hit the step ceiling"
        );
        ScanOutcome::Exhausted {
            steps: self.ceiling,
        }
    }

    pub fn is_due(
        &self,
        expense: &RecurringExpense,
        window_start: impl CalendarDay,
        window_end: impl CalendarDay,
    ) -> bool {
        self.scan(expense, window_start, window_end).is_due()
    }
}

/// Whether at least one occurrence of `expense` falls in
/// `[window_start, window_end]`, using the default step ceiling.
///
/// Inactive expenses, expenses without a frequency or last-paid date, and
/// unrecognized frequencies are never due.
pub fn is_due_within_window(
    expense: &RecurringExpense,
    window_start: impl CalendarDay,
    window_end: impl CalendarDay,
) -> bool {
    RecurrenceMatcher::default().is_due(expense, window_start, window_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RecurrenceFrequency};
    use chrono::{Duration, Months, Utc};
    use proptest::prelude::{prop_assert, proptest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(frequency: RecurrenceFrequency, last_paid: NaiveDate) -> RecurringExpense {
        RecurringExpense::recurring("Internet", Money::from_dollars(65), frequency, last_paid)
    }

    #[test]
    fn test_monthly_due_next_month() {
        let expense = bill(RecurrenceFrequency::Monthly, date(2026, 1, 15));
        assert!(is_due_within_window(&expense, date(2026, 2, 1), date(2026, 2, 28)));
        assert_eq!(
            RecurrenceMatcher::default().scan(&expense, date(2026, 2, 1), date(2026, 2, 28)),
            ScanOutcome::Due(date(2026, 2, 15))
        );
    }

    #[test]
    fn test_monthly_due_after_several_steps() {
        let expense = bill(RecurrenceFrequency::Monthly, date(2026, 1, 15));
        assert_eq!(
            RecurrenceMatcher::default().scan(&expense, date(2026, 3, 1), date(2026, 3, 31)),
            ScanOutcome::Due(date(2026, 3, 15))
        );
    }

    #[test]
    fn test_boundary_start_is_inclusive() {
        let start = date(2026, 2, 1);
        let end = date(2026, 2, 7);
        let weekly = bill(RecurrenceFrequency::Weekly, start - Duration::days(7));
        assert!(is_due_within_window(&weekly, start, end));

        let monthly = bill(
            RecurrenceFrequency::Monthly,
            start.checked_sub_months(Months::new(1)).unwrap(),
        );
        assert!(is_due_within_window(&monthly, start, end));
    }

    #[test]
    fn test_boundary_end_is_inclusive() {
        let expense = bill(RecurrenceFrequency::Weekly, date(2026, 1, 31));
        assert!(is_due_within_window(&expense, date(2026, 2, 1), date(2026, 2, 7)));
    }

    #[test]
    fn test_day_after_end_is_excluded() {
        let expense = bill(RecurrenceFrequency::Weekly, date(2026, 2, 1));
        assert_eq!(
            RecurrenceMatcher::default().scan(&expense, date(2026, 2, 2), date(2026, 2, 7)),
            ScanOutcome::NotDue {
                next_due: date(2026, 2, 8)
            }
        );
    }

    #[test]
    fn test_timestamps_compare_by_calendar_day() {
        let expense = bill(RecurrenceFrequency::Weekly, date(2026, 1, 31));
        let start = date(2026, 2, 1).and_hms_opt(9, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 2, 7, 0, 0, 0).unwrap();
        assert!(is_due_within_window(&expense, start, end));
    }

    #[test]
    fn test_inactive_is_never_due() {
        let expense = bill(RecurrenceFrequency::Monthly, date(2026, 1, 15)).deactivated();
        assert!(!is_due_within_window(&expense, date(2026, 2, 1), date(2026, 2, 28)));
        assert_eq!(
            RecurrenceMatcher::default().scan(&expense, date(2026, 2, 1), date(2026, 2, 28)),
            ScanOutcome::NotRecurring
        );
    }

    #[test]
    fn test_missing_data_is_never_due() {
        let mut expense = bill(RecurrenceFrequency::Monthly, date(2026, 1, 15));
        expense.last_paid_date = None;
        assert!(!is_due_within_window(&expense, date(2026, 2, 1), date(2026, 2, 28)));

        let mut expense = bill(RecurrenceFrequency::Monthly, date(2026, 1, 15));
        expense.recurrence_frequency = None;
        assert!(!is_due_within_window(&expense, date(2026, 2, 1), date(2026, 2, 28)));
    }

    #[test]
    fn test_unknown_frequency() {
        let expense = bill(RecurrenceFrequency::from_label("Quarterly"), date(2026, 1, 15));
        assert_eq!(
            RecurrenceMatcher::default().scan(&expense, date(2026, 2, 1), date(2026, 2, 28)),
            ScanOutcome::UnknownFrequency
        );
    }

    #[test]
    fn test_semi_annual_and_annual() {
        let semi = bill(RecurrenceFrequency::SemiAnnual, date(2025, 9, 10));
        assert!(is_due_within_window(&semi, date(2026, 3, 1), date(2026, 3, 31)));
        assert!(!is_due_within_window(&semi, date(2026, 4, 1), date(2026, 4, 30)));

        let annual = bill(RecurrenceFrequency::Annual, date(2024, 6, 30));
        assert!(is_due_within_window(&annual, date(2026, 6, 1), date(2026, 6, 30)));
    }

    #[test]
    fn test_window_before_last_paid() {
        let expense = bill(RecurrenceFrequency::Monthly, date(2026, 5, 1));
        assert!(!is_due_within_window(&expense, date(2026, 1, 1), date(2026, 1, 31)));
    }

    #[test]
    fn test_ceiling_stops_scan() {
        let matcher = RecurrenceMatcher::new(3);
        let expense = bill(RecurrenceFrequency::Weekly, date(2020, 1, 1));
        assert_eq!(
            matcher.scan(&expense, date(2026, 1, 1), date(2026, 1, 31)),
            ScanOutcome::Exhausted { steps: 3 }
        );
        assert_eq!(RecurrenceMatcher::new(0).ceiling(), 1);
    }

    #[test]
    fn test_default_ceiling_covers_decades_of_weekly_bills() {
        let expense = bill(RecurrenceFrequency::Weekly, date(1966, 1, 1));
        let window_start = date(2066, 1, 1);
        let window_end = window_start + Duration::days(6);
        assert!(is_due_within_window(&expense, window_start, window_end));
    }

    proptest! {
        #[test]
        fn prop_one_step_before_start_is_due(offset in 0i64..20_000, freq in 0usize..5, len in 0i64..40) {
            let frequency = [
                RecurrenceFrequency::Weekly,
                RecurrenceFrequency::BiWeekly,
                RecurrenceFrequency::Monthly,
                RecurrenceFrequency::SemiAnnual,
                RecurrenceFrequency::Annual,
            ][freq].clone();
            let start = date(2000, 1, 1) + Duration::days(offset);
            let end = start + Duration::days(len);
            let last_paid = match frequency.step().unwrap() {
                crate::models::RecurrenceStep::Days(d) => start - Duration::days(d as i64),
                crate::models::RecurrenceStep::Months(m) => {
                    match start.checked_sub_months(Months::new(m)) {
                        Some(lp) if lp.checked_add_months(Months::new(m)) == Some(start) => lp,
                        _ => return Ok(()),
                    }
                }
            };
            prop_assert!(is_due_within_window(&bill(frequency, last_paid), start, end));
        }

        #[test]
        fn prop_inactive_never_due(offset in 0i64..20_000, len in 0i64..400) {
            let start = date(2000, 1, 1) + Duration::days(offset);
            let expense = bill(RecurrenceFrequency::Weekly, start - Duration::days(7)).deactivated();
            prop_assert!(!is_due_within_window(&expense, start, start + Duration::days(len)));
        }
    }
}
