//! Human-readable change summaries for budget sheets

use crate::models::{BudgetItem, BudgetSheet};

/// Summarize what changed between two versions of a sheet.
///
/// Lines are matched by category, case-insensitively. Returns `None` when
/// nothing a reader would care about changed.
pub fn sheet_diff(before: &BudgetSheet, after: &BudgetSheet) -> Option<String> {
    let mut changes = Vec::new();

    if before.income != after.income {
        changes.push(format!(
            "income: {} {} -> {} {}",
            before.income.salary_amount,
            before.income.salary_frequency,
            after.income.salary_amount,
            after.income.salary_frequency
        ));
    }
    if before.duration != after.duration {
        changes.push(format!("duration: {} -> {}", before.duration, after.duration));
    }

    for old in &before.items {
        match find_line(&after.items, old) {
            Some(new) if new.amount() != old.amount() => changes.push(format!(
                "{}: {} -> {}",
                old.category(),
                old.amount(),
                new.amount()
            )),
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", old.category(), old.amount())),
        }
    }
    for new in &after.items {
        if find_line(&before.items, new).is_none() {
            changes.push(format!("{}: (added) -> {}", new.category(), new.amount()));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn find_line<'a>(items: &'a [BudgetItem], target: &BudgetItem) -> Option<&'a BudgetItem> {
    let key = target.expense.category_key();
    items.iter().find(|i| i.expense.category_key() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DurationKind, IncomeProfile, Money};

    fn sheet(items: &[(&str, i64)]) -> BudgetSheet {
        BudgetSheet::new("Jan-2026", IncomeProfile::default()).with_items(
            items
                .iter()
                .map(|(c, a)| BudgetItem::new(*c, Money::from_dollars(*a)))
                .collect(),
        )
    }

    #[test]
    fn test_amount_change() {
        let before = sheet(&[("Rent", 1_500), ("Groceries", 400)]);
        let after = sheet(&[("Rent", 1_450), ("Groceries", 450)]);
        assert_eq!(
            sheet_diff(&before, &after).unwrap(),
            "Rent: $1,500.00 -> $1,450.00, Groceries: $400.00 -> $450.00"
        );
    }

    #[test]
    fn test_added_and_removed_lines() {
        let before = sheet(&[("Rent", 1_500), ("Gym", 40)]);
        let after = sheet(&[("rent", 1_500), ("Savings", 200)]);
        let diff = sheet_diff(&before, &after).unwrap();
        assert_eq!(diff, "Gym: $40.00 -> (removed), Savings: (added) -> $200.00");
    }

    #[test]
    fn test_duration_change() {
        let before = sheet(&[]);
        let mut after = sheet(&[]);
        after.duration = DurationKind::Weekly;
        assert_eq!(sheet_diff(&before, &after).unwrap(), "duration: Monthly -> Weekly");
    }

    #[test]
    fn test_no_changes() {
        let before = sheet(&[("Rent", 1_500)]);
        assert_eq!(sheet_diff(&before, &before.clone()), None);
    }
}
