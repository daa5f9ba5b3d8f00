//! Budget sheet model
//!
//! A sheet is one saved budget: the income profile it was built from, the
//! period it covers, and the expense lines money has been allocated to.
//! Moving money between lines mirrors dragging coins in the allocation view:
//! amounts are plain arithmetic and may go negative.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::expense::RecurringExpense;
use super::ids::ItemId;
use super::income::IncomeProfile;
use super::money::Money;
use super::period::DurationKind;

/// Category that imported spending lands in when nothing matched
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One allocation line in a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    #[serde(default)]
    pub id: ItemId,
    #[serde(flatten)]
    pub expense: RecurringExpense,
}

impl BudgetItem {
    pub fn new(category: impl Into<String>, amount: Money) -> Self {
        Self::from_expense(RecurringExpense::new(category, amount))
    }

    pub fn from_expense(expense: RecurringExpense) -> Self {
        Self {
            id: ItemId::new(),
            expense,
        }
    }

    pub fn category(&self) -> &str {
        &self.expense.category
    }

    pub fn amount(&self) -> Money {
        self.expense.budgeted_amount
    }
}

/// Errors raised by allocation edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    IndexOutOfRange { index: usize, len: usize },
    EmptyCategory,
    DuplicateCategory(String),
    NegativeTransfer,
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "item {} is out of range ({} items)", index, len)
            }
            Self::EmptyCategory => write!(f, "category name cannot be empty"),
            Self::DuplicateCategory(name) => write!(f, "category '{}' already exists", name),
            Self::NegativeTransfer => write!(f, "transfer amount cannot be negative"),
        }
    }
}

impl std::error::Error for AllocationError {}

/// A saved budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSheet {
    pub name: String,
    #[serde(default)]
    pub income: IncomeProfile,
    #[serde(default)]
    pub duration: DurationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
    /// Free-form scratchpad text
    #[serde(default)]
    pub notes: String,
}

impl BudgetSheet {
    pub fn new(name: impl Into<String>, income: IncomeProfile) -> Self {
        Self {
            name: name.into(),
            income,
            duration: DurationKind::default(),
            anchor: None,
            items: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<BudgetItem>) -> Self {
        self.items = items;
        self
    }

    pub fn total_allocated(&self) -> Money {
        self.items.iter().map(BudgetItem::amount).sum()
    }

    /// Income not yet assigned to any line; negative when over-allocated
    pub fn unallocated(&self, period_income: Money) -> Money {
        period_income - self.total_allocated()
    }

    /// Share of period income allocated, clamped to 0..=100
    pub fn utilization_percent(&self, period_income: Money) -> f64 {
        if !period_income.is_positive() {
            return 0.0;
        }
        let pct = self.total_allocated().cents() as f64 / period_income.cents() as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }

    pub fn find(&self, category: &str) -> Option<usize> {
        let key = category.trim().to_lowercase();
        self.items.iter().position(|i| i.expense.category_key() == key)
    }

    fn check_index(&self, index: usize) -> Result<(), AllocationError> {
        if index >= self.items.len() {
            return Err(AllocationError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Move money from the unallocated pool onto a line
    pub fn allocate_from_unallocated(
        &mut self,
        index: usize,
        amount: Money,
    ) -> Result<(), AllocationError> {
        self.check_index(index)?;
        if amount.is_negative() {
            return Err(AllocationError::NegativeTransfer);
        }
        self.items[index].expense.budgeted_amount += amount;
        Ok(())
    }

    /// Move money between two lines. Returns false when source and
    /// destination are the same line and nothing changed.
    pub fn transfer(&mut self, from: usize, to: usize, amount: Money) -> Result<bool, AllocationError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if amount.is_negative() {
            return Err(AllocationError::NegativeTransfer);
        }
        if from == to {
            return Ok(false);
        }
        self.items[from].expense.budgeted_amount -= amount;
        self.items[to].expense.budgeted_amount += amount;
        Ok(true)
    }

    pub fn set_amount(&mut self, index: usize, amount: Money) -> Result<(), AllocationError> {
        self.check_index(index)?;
        self.items[index].expense.budgeted_amount = amount;
        Ok(())
    }

    pub fn add_category(
        &mut self,
        category: &str,
        amount: Money,
    ) -> Result<&BudgetItem, AllocationError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(AllocationError::EmptyCategory);
        }
        if self.find(category).is_some() {
            return Err(AllocationError::DuplicateCategory(category.to_string()));
        }
        self.items.push(BudgetItem::new(category, amount));
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Replace the line with the same category, keeping its id, or append a
    /// new line. Returns the line's index.
    pub fn upsert(&mut self, expense: RecurringExpense) -> usize {
        match self.find(&expense.category) {
            Some(index) => {
                self.items[index].expense = expense;
                index
            }
            None => {
                self.items.push(BudgetItem::from_expense(expense));
                self.items.len() - 1
            }
        }
    }

    pub fn remove_item(&mut self, index: usize) -> Result<BudgetItem, AllocationError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Add per-category totals (e.g. imported spending) onto matching lines.
    /// Returns the categories that had no matching line; "Uncategorized" is
    /// never applied.
    pub fn apply_category_totals(&mut self, totals: &BTreeMap<String, Money>) -> Vec<String> {
        let mut unmatched = Vec::new();
        for (category, amount) in totals {
            if category == UNCATEGORIZED || !amount.is_positive() {
                continue;
            }
            match self.find(category) {
                Some(index) => self.items[index].expense.budgeted_amount += *amount,
                None => unmatched.push(category.clone()),
            }
        }
        unmatched.sort();
        unmatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> BudgetSheet {
        BudgetSheet::new("Jan-2026", IncomeProfile::default()).with_items(vec![
            BudgetItem::new("Rent", Money::from_dollars(1_500)),
            BudgetItem::new("Groceries", Money::from_dollars(400)),
        ])
    }

    #[test]
    fn test_totals_and_unallocated() {
        let sheet = sheet();
        let income = Money::from_dollars(4_187);
        assert_eq!(sheet.total_allocated(), Money::from_dollars(1_900));
        assert_eq!(sheet.unallocated(income), Money::from_dollars(2_287));
        assert!(sheet.unallocated(Money::from_dollars(1_000)).is_negative());
    }

    #[test]
    fn test_utilization_clamps() {
        let sheet = sheet();
        let pct = sheet.utilization_percent(Money::from_dollars(3_800));
        assert!((pct - 50.0).abs() < 1e-9);
        assert_eq!(sheet.utilization_percent(Money::from_dollars(1_000)), 100.0);
        assert_eq!(sheet.utilization_percent(Money::zero()), 0.0);
    }

    #[test]
    fn test_allocate_from_unallocated() {
        let mut sheet = sheet();
        sheet.allocate_from_unallocated(1, Money::from_dollars(50)).unwrap();
        assert_eq!(sheet.items[1].amount(), Money::from_dollars(450));

        let err = sheet.allocate_from_unallocated(5, Money::from_dollars(50)).unwrap_err();
        assert_eq!(err, AllocationError::IndexOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn test_transfer_between_lines() {
        let mut sheet = sheet();
        assert!(sheet.transfer(1, 0, Money::from_dollars(500)).unwrap());
        assert_eq!(sheet.items[0].amount(), Money::from_dollars(2_000));
        assert_eq!(sheet.items[1].amount(), Money::from_dollars(-100));
        assert_eq!(sheet.total_allocated(), Money::from_dollars(1_900));
    }

    #[test]
    fn test_transfer_same_line_is_noop() {
        let mut sheet = sheet();
        assert!(!sheet.transfer(0, 0, Money::from_dollars(50)).unwrap());
        assert_eq!(sheet.items[0].amount(), Money::from_dollars(1_500));
    }

    #[test]
    fn test_add_and_remove_category() {
        let mut sheet = sheet();
        sheet.add_category("Internet", Money::zero()).unwrap();
        assert_eq!(sheet.items.len(), 3);
        assert_eq!(
            sheet.add_category(" rent ", Money::zero()).unwrap_err(),
            AllocationError::DuplicateCategory("rent".into())
        );
        assert_eq!(
            sheet.add_category("  ", Money::zero()).unwrap_err(),
            AllocationError::EmptyCategory
        );

        let removed = sheet.remove_item(0).unwrap();
        assert_eq!(removed.category(), "Rent");
        assert_eq!(sheet.items.len(), 2);
    }

    #[test]
    fn test_upsert_keeps_id() {
        let mut sheet = sheet();
        let rent_id = sheet.items[0].id;

        let index = sheet.upsert(RecurringExpense::new("rent", Money::from_dollars(1_600)));
        assert_eq!(index, 0);
        assert_eq!(sheet.items[0].id, rent_id);
        assert_eq!(sheet.items[0].amount(), Money::from_dollars(1_600));

        assert_eq!(sheet.upsert(RecurringExpense::new("Gym", Money::from_dollars(40))), 2);
    }

    #[test]
    fn test_apply_category_totals() {
        let mut sheet = sheet();
        let mut totals = BTreeMap::new();
        totals.insert("groceries".to_string(), Money::from_cents(4_250));
        totals.insert(UNCATEGORIZED.to_string(), Money::from_dollars(99));
        totals.insert("Travel".to_string(), Money::from_dollars(10));

        let unmatched = sheet.apply_category_totals(&totals);
        assert_eq!(unmatched, vec!["Travel".to_string()]);
        assert_eq!(sheet.items[1].amount(), Money::from_cents(44_250));
    }

    #[test]
    fn test_item_serializes_flat() {
        let item = BudgetItem::new("Rent", Money::from_dollars(1_500));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "Rent");
        assert_eq!(json["budgetedAmount"], 150_000);
        let back: BudgetItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
