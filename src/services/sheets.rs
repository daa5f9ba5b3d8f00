//! Sheet service
//!
//! Saves sheets and applies allocation edits on top of a [`SheetStore`],
//! recording every change in the audit log.

use std::collections::BTreeMap;

use crate::audit::{sheet_diff, AuditEntry, AuditLogger, EntityType};
use crate::error::{FinflowError, FinflowResult};
use crate::models::{BudgetSheet, Money, TaxSchedule};
use crate::storage::{SheetSnapshot, SheetStore, SheetWrite};

use super::import::{apply_import, ImportSummary};
use super::tax::compute_net_annual_income;

/// Service for saving and editing budget sheets
pub struct SheetService<'a, S: SheetStore + ?Sized> {
    store: &'a S,
    audit: &'a AuditLogger,
    schedule: &'a TaxSchedule,
}

impl<'a, S: SheetStore + ?Sized> SheetService<'a, S> {
    pub fn new(store: &'a S, audit: &'a AuditLogger, schedule: &'a TaxSchedule) -> Self {
        Self {
            store,
            audit,
            schedule,
        }
    }

    pub fn list(&self, store_id: &str) -> FinflowResult<Vec<String>> {
        self.store.list_sheets(store_id)
    }

    pub fn snapshot(&self, store_id: &str, sheet_name: &str) -> FinflowResult<SheetSnapshot> {
        self.store.read(store_id, sheet_name)
    }

    /// Load a sheet that must already be saved
    pub fn load(&self, store_id: &str, sheet_name: &str) -> FinflowResult<BudgetSheet> {
        let snapshot = self.store.read(store_id, sheet_name)?;
        if snapshot.is_empty() {
            return Err(FinflowError::sheet_not_found(snapshot.sheet_name));
        }
        Ok(snapshot.into_sheet())
    }

    /// Net income for one period of the sheet's duration
    pub fn period_income(&self, sheet: &BudgetSheet) -> Money {
        compute_net_annual_income(&sheet.income, self.schedule)
            .divide_by(sheet.duration.periods_per_year())
    }

    /// Save a sheet, returning the name it was stored under
    pub fn save(&self, store_id: &str, sheet: &BudgetSheet, sync_design: bool) -> FinflowResult<String> {
        sheet.income.validate()?;

        let previous = self.store.read(store_id, &sheet.name)?;
        let request = SheetWrite::from_sheet(sheet, self.period_income(sheet), sync_design);
        let saved_as = self.store.write(store_id, request)?;

        let entity_id = format!("{}/{}", store_id, saved_as);
        let mut saved = sheet.clone();
        saved.name = saved_as.clone();

        let entry = if previous.is_empty() {
            AuditEntry::create(EntityType::Sheet, entity_id, Some(saved_as.clone()), &saved)
        } else {
            let before = previous.into_sheet();
            let diff = sheet_diff(&before, &saved);
            AuditEntry::update(EntityType::Sheet, entity_id, Some(saved_as.clone()), &before, &saved, diff)
        };
        self.audit.log(&entry)?;

        Ok(saved_as)
    }

    fn line_index(sheet: &BudgetSheet, category: &str) -> FinflowResult<usize> {
        sheet
            .find(category)
            .ok_or_else(|| FinflowError::item_not_found(category.trim()))
    }

    /// Move money from one line to another and save
    pub fn transfer(
        &self,
        store_id: &str,
        sheet_name: &str,
        from_category: &str,
        to_category: &str,
        amount: Money,
    ) -> FinflowResult<BudgetSheet> {
        let mut sheet = self.load(store_id, sheet_name)?;
        let from = Self::line_index(&sheet, from_category)?;
        let to = Self::line_index(&sheet, to_category)?;

        let before = [sheet.items[from].clone(), sheet.items[to].clone()];
        if !sheet.transfer(from, to, amount)? {
            tracing::debug!(category = from_category, "transfer onto the same line ignored");
            return Ok(sheet);
        }

        self.save(store_id, &sheet, false)?;

        let entries: Vec<_> = before
            .iter()
            .zip([from, to])
            .map(|(old, index)| {
                let new = &sheet.items[index];
                AuditEntry::update(
                    EntityType::BudgetItem,
                    new.id.to_string(),
                    Some(new.category().to_string()),
                    old,
                    new,
                    Some(format!("amount: {} -> {}", old.amount(), new.amount())),
                )
            })
            .collect();
        self.audit.log_batch(&entries)?;

        Ok(sheet)
    }

    /// Move money from the unallocated pool onto a line and save
    pub fn allocate(
        &self,
        store_id: &str,
        sheet_name: &str,
        category: &str,
        amount: Money,
    ) -> FinflowResult<BudgetSheet> {
        let mut sheet = self.load(store_id, sheet_name)?;
        let index = Self::line_index(&sheet, category)?;
        let before = sheet.items[index].clone();

        sheet.allocate_from_unallocated(index, amount)?;
        self.save(store_id, &sheet, false)?;

        let after = &sheet.items[index];
        self.audit.log(&AuditEntry::update(
            EntityType::BudgetItem,
            after.id.to_string(),
            Some(after.category().to_string()),
            &before,
            after,
            Some(format!("amount: {} -> {}", before.amount(), after.amount())),
        ))?;

        Ok(sheet)
    }

    /// Add imported per-category spending to a saved sheet
    pub fn import_totals(
        &self,
        store_id: &str,
        sheet_name: &str,
        totals: &BTreeMap<String, Money>,
    ) -> FinflowResult<(BudgetSheet, ImportSummary)> {
        let mut sheet = self.load(store_id, sheet_name)?;
        let summary = apply_import(&mut sheet, totals);
        if !summary.applied.is_empty() {
            self.save(store_id, &sheet, false)?;
        }
        Ok((sheet, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::tax_year;
    use crate::models::{BudgetItem, IncomeProfile};
    use crate::storage::LocalSheetStore;
    use tempfile::TempDir;

    struct Fixture {
        store: LocalSheetStore,
        audit: AuditLogger,
        schedule: TaxSchedule,
        _temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            Self {
                store: LocalSheetStore::with_root(temp.path().join("sheets")),
                audit: AuditLogger::new(temp.path().join("audit.log")),
                schedule: tax_year::us_2025(),
                _temp: temp,
            }
        }

        fn service(&self) -> SheetService<'_, LocalSheetStore> {
            SheetService::new(&self.store, &self.audit, &self.schedule)
        }
    }

    fn january() -> BudgetSheet {
        BudgetSheet::new("Jan-2026", IncomeProfile::default()).with_items(vec![
            BudgetItem::new("Rent", Money::from_dollars(1_500)),
            BudgetItem::new("Groceries", Money::from_dollars(400)),
        ])
    }

    #[test]
    fn test_save_records_create_then_update() {
        let fixture = Fixture::new();
        let service = fixture.service();

        let mut sheet = january();
        service.save("household", &sheet, false).unwrap();
        sheet.items[0].expense.budgeted_amount = Money::from_dollars(1_450);
        service.save("household", &sheet, true).unwrap();

        let entries = fixture.audit.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("Rent: $1,500.00 -> $1,450.00")
        );

        let saved = fixture.store.read("household", "Jan-2026").unwrap();
        let data = saved.saved_data.unwrap();
        assert!(data.design_synced);
        assert_eq!(data.net_period_income, Money::from_cents(418_733));
    }

    #[test]
    fn test_save_rejects_negative_salary() {
        let fixture = Fixture::new();
        let mut sheet = january();
        sheet.income.salary_amount = Money::from_dollars(-1);
        let err = fixture.service().save("household", &sheet, false).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_transfer_between_categories() {
        let fixture = Fixture::new();
        let service = fixture.service();
        service.save("household", &january(), false).unwrap();

        let sheet = service
            .transfer("household", "Jan-2026", "rent", "Groceries", Money::from_dollars(50))
            .unwrap();
        assert_eq!(sheet.items[0].amount(), Money::from_dollars(1_450));
        assert_eq!(sheet.items[1].amount(), Money::from_dollars(450));

        let reloaded = service.load("household", "Jan-2026").unwrap();
        assert_eq!(reloaded.items[1].amount(), Money::from_dollars(450));

        let entries = fixture.audit.read_all().unwrap();
        let item_entries: Vec<_> = entries
            .iter()
            .filter(|e| e.entity_type == EntityType::BudgetItem)
            .collect();
        assert_eq!(item_entries.len(), 2);
        assert_eq!(
            item_entries[0].diff_summary.as_deref(),
            Some("amount: $1,500.00 -> $1,450.00")
        );
    }

    #[test]
    fn test_transfer_unknown_category() {
        let fixture = Fixture::new();
        let service = fixture.service();
        service.save("household", &january(), false).unwrap();

        let err = service
            .transfer("household", "Jan-2026", "Rent", "Travel", Money::from_dollars(5))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_edit_on_unsaved_sheet_is_not_found() {
        let fixture = Fixture::new();
        let err = fixture
            .service()
            .allocate("household", "Nope", "Rent", Money::from_dollars(5))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_allocate_and_import() {
        let fixture = Fixture::new();
        let service = fixture.service();
        service.save("household", &january(), false).unwrap();

        let sheet = service
            .allocate("household", "Jan-2026", "Groceries", Money::from_dollars(25))
            .unwrap();
        assert_eq!(sheet.items[1].amount(), Money::from_dollars(425));

        let mut totals = BTreeMap::new();
        totals.insert("Groceries".to_string(), Money::from_dollars(75));
        let (sheet, summary) = service.import_totals("household", "Jan-2026", &totals).unwrap();
        assert_eq!(sheet.items[1].amount(), Money::from_dollars(500));
        assert!(summary.unmatched.is_empty());
    }
}
