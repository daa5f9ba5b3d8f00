//! Spreadsheet store
//!
//! A store holds named budget sheets. Each sheet keeps its allocation lines
//! (`items`) and the income settings it was saved with (`saved_data`). The
//! [`SheetStore`] trait is the whole contract the planner relies on;
//! [`LocalSheetStore`] keeps one JSON file per store on disk.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FinflowPaths;
use crate::error::{FinflowError, FinflowResult};
use crate::models::{BudgetItem, BudgetSheet, DurationKind, IncomeProfile, Money};

use super::file_io::{read_json, write_json_atomic};

/// Name used when a sheet is saved without one
pub const DEFAULT_SHEET_NAME: &str = "MyBudget";

/// Lines a brand-new sheet starts with
pub const SEED_CATEGORIES: [&str; 2] = ["Rent", "Groceries"];

/// Whether a read found a saved sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    /// Nothing saved under that name; items are the seed lines
    Empty,
    Loaded,
}

/// Income settings saved alongside a sheet's items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedData {
    #[serde(flatten)]
    pub income: IncomeProfile,
    #[serde(default)]
    pub net_period_income: Money,
    #[serde(default)]
    pub duration: DurationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default)]
    pub design_synced: bool,
    pub saved_at: DateTime<Utc>,
}

/// Result of reading one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub status: SnapshotStatus,
    pub sheet_name: String,
    pub items: Vec<BudgetItem>,
    pub saved_data: Option<SavedData>,
}

impl SheetSnapshot {
    fn empty(sheet_name: String) -> Self {
        Self {
            status: SnapshotStatus::Empty,
            sheet_name,
            items: SEED_CATEGORIES
                .iter()
                .map(|c| BudgetItem::new(*c, Money::zero()))
                .collect(),
            saved_data: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status == SnapshotStatus::Empty
    }

    /// Rebuild the editable sheet. An empty snapshot gets default income.
    pub fn into_sheet(self) -> BudgetSheet {
        let mut sheet = BudgetSheet::new(self.sheet_name, IncomeProfile::default());
        sheet.items = self.items;
        if let Some(saved) = self.saved_data {
            sheet.income = saved.income;
            sheet.duration = saved.duration;
            sheet.anchor = saved.anchor;
            sheet.notes = saved.notes;
        }
        sheet
    }
}

/// Everything needed to save a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetWrite {
    pub sheet_name: String,
    pub net_period_income: Money,
    pub income: IncomeProfile,
    pub items: Vec<BudgetItem>,
    pub duration: DurationKind,
    pub anchor: Option<NaiveDate>,
    pub notes: String,
    /// Also push the sheet's formatting when saving
    pub sync_design: bool,
}

impl SheetWrite {
    pub fn from_sheet(sheet: &BudgetSheet, net_period_income: Money, sync_design: bool) -> Self {
        Self {
            sheet_name: sheet.name.clone(),
            net_period_income,
            income: sheet.income.clone(),
            items: sheet.items.clone(),
            duration: sheet.duration,
            anchor: sheet.anchor,
            notes: sheet.notes.clone(),
            sync_design,
        }
    }
}

/// Read/write access to named sheets inside a store
pub trait SheetStore {
    /// Sheet names in the store, sorted
    fn list_sheets(&self, store_id: &str) -> FinflowResult<Vec<String>>;

    /// Read one sheet. A sheet that was never saved comes back as an
    /// [`SnapshotStatus::Empty`] snapshot rather than an error.
    fn read(&self, store_id: &str, sheet_name: &str) -> FinflowResult<SheetSnapshot>;

    /// Save a sheet, returning the name it was saved under
    fn write(&self, store_id: &str, request: SheetWrite) -> FinflowResult<String>;
}

/// Pull the spreadsheet id out of a share link (`.../d/<id>/edit`).
/// Anything without a `/d/` segment is returned trimmed.
pub fn spreadsheet_id_from_link(link: &str) -> String {
    let trimmed = link.trim();
    trimmed
        .split_once("/d/")
        .and_then(|(_, rest)| rest.split(|c| matches!(c, '/' | '?' | '#')).next())
        .filter(|id| !id.is_empty())
        .unwrap_or(trimmed)
        .to_string()
}

fn resolve_sheet_name(sheet_name: &str) -> String {
    let trimmed = sheet_name.trim();
    if trimmed.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    sheets: BTreeMap<String, StoredSheet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSheet {
    #[serde(default)]
    items: Vec<BudgetItem>,
    saved_data: SavedData,
}

/// A store backed by `<data>/sheets/<store_id>.json`
pub struct LocalSheetStore {
    root: PathBuf,
}

impl LocalSheetStore {
    pub fn new(paths: &FinflowPaths) -> Self {
        Self::with_root(paths.sheets_dir())
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn store_path(&self, store_id: &str) -> FinflowResult<PathBuf> {
        let id = store_id.trim();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FinflowError::Validation(format!(
                "Invalid store id '{}': use letters, digits, '-' or '_'",
                store_id
            )));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    fn load(&self, store_id: &str) -> FinflowResult<StoreFile> {
        read_json(self.store_path(store_id)?)
    }
}

impl SheetStore for LocalSheetStore {
    fn list_sheets(&self, store_id: &str) -> FinflowResult<Vec<String>> {
        Ok(self.load(store_id)?.sheets.into_keys().collect())
    }

    fn read(&self, store_id: &str, sheet_name: &str) -> FinflowResult<SheetSnapshot> {
        let sheet_name = resolve_sheet_name(sheet_name);
        let mut store = self.load(store_id)?;

        let snapshot = match store.sheets.remove(&sheet_name) {
            Some(stored) => SheetSnapshot {
                status: SnapshotStatus::Loaded,
                sheet_name,
                items: stored.items,
                saved_data: Some(stored.saved_data),
            },
            None => {
                tracing::debug!(store_id, %sheet_name, "sheet not saved yet, seeding defaults");
                SheetSnapshot::empty(sheet_name)
            }
        };
        Ok(snapshot)
    }

    fn write(&self, store_id: &str, request: SheetWrite) -> FinflowResult<String> {
        let path = self.store_path(store_id)?;
        let mut store: StoreFile = read_json(&path)?;
        let sheet_name = resolve_sheet_name(&request.sheet_name);

        let stored = StoredSheet {
            items: request.items,
            saved_data: SavedData {
                income: request.income,
                net_period_income: request.net_period_income,
                duration: request.duration,
                anchor: request.anchor,
                notes: request.notes,
                design_synced: request.sync_design,
                saved_at: Utc::now(),
            },
        };
        let item_count = stored.items.len();
        store.sheets.insert(sheet_name.clone(), stored);
        write_json_atomic(&path, &store)?;

        tracing::info!(store_id, %sheet_name, items = item_count, "sheet saved");
        Ok(sheet_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayFrequency, RecurrenceFrequency, RecurringExpense};
    use tempfile::TempDir;

    fn store() -> (LocalSheetStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalSheetStore::with_root(temp_dir.path().join("sheets"));
        (store, temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_request(name: &str) -> SheetWrite {
        let sheet = BudgetSheet::new(name, IncomeProfile::default()).with_items(vec![
            BudgetItem::new("Rent", Money::from_dollars(1_500)),
            BudgetItem::from_expense(RecurringExpense::recurring(
                "Internet",
                Money::from_dollars(65),
                RecurrenceFrequency::Monthly,
                date(2026, 1, 15),
            )),
        ]);
        SheetWrite::from_sheet(&sheet, Money::from_cents(418_733), false)
    }

    #[test]
    fn test_missing_sheet_is_seeded() {
        let (store, _temp) = store();
        let snapshot = store.read("household", "Jan-2026").unwrap();

        assert!(snapshot.is_empty());
        assert!(snapshot.saved_data.is_none());
        let categories: Vec<_> = snapshot.items.iter().map(|i| i.category().to_string()).collect();
        assert_eq!(categories, ["Rent", "Groceries"]);
        assert!(snapshot.items.iter().all(|i| i.amount().is_zero()));
    }

    #[test]
    fn test_write_and_read_back() {
        let (store, _temp) = store();
        let saved_as = store.write("household", write_request("Jan-2026")).unwrap();
        assert_eq!(saved_as, "Jan-2026");

        let snapshot = store.read("household", "Jan-2026").unwrap();
        assert_eq!(snapshot.status, SnapshotStatus::Loaded);
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[1].expense.last_paid_date, Some(date(2026, 1, 15)));

        let saved = snapshot.saved_data.clone().unwrap();
        assert_eq!(saved.net_period_income, Money::from_cents(418_733));
        assert_eq!(saved.income.salary_frequency, PayFrequency::Annual);

        let sheet = snapshot.into_sheet();
        assert_eq!(sheet.name, "Jan-2026");
        assert_eq!(sheet.total_allocated(), Money::from_dollars(1_565));
    }

    #[test]
    fn test_blank_name_saves_as_default() {
        let (store, _temp) = store();
        let saved_as = store.write("household", write_request("   ")).unwrap();
        assert_eq!(saved_as, DEFAULT_SHEET_NAME);
        assert_eq!(store.list_sheets("household").unwrap(), [DEFAULT_SHEET_NAME]);
    }

    #[test]
    fn test_list_sheets_sorted() {
        let (store, _temp) = store();
        assert!(store.list_sheets("household").unwrap().is_empty());
        store.write("household", write_request("Mar-2026")).unwrap();
        store.write("household", write_request("Feb-2026")).unwrap();
        store.write("other", write_request("Jan-2026")).unwrap();
        assert_eq!(store.list_sheets("household").unwrap(), ["Feb-2026", "Mar-2026"]);
    }

    #[test]
    fn test_rejects_path_like_store_id() {
        let (store, _temp) = store();
        let err = store.read("../escape", "x").unwrap_err();
        assert!(err.is_validation());
        assert!(store.list_sheets("").is_err());
    }

    #[test]
    fn test_reads_sheet_written_by_hand() {
        let (store, temp) = store();
        std::fs::create_dir_all(temp.path().join("sheets")).unwrap();
        std::fs::write(
            temp.path().join("sheets").join("legacy.json"),
            r#"{"sheets": {"Budget": {
                "items": [{"category": "Gym", "amount": 4000, "frequency": "Monthly",
                           "lastPaid": "2026-01-15T05:00:00.000Z"}],
                "savedData": {"salary": 5000000, "salaryFrequency": "Annual", "state": "ca",
                              "savedAt": "2026-01-20T00:00:00Z"}
            }}}"#,
        )
        .unwrap();

        let snapshot = store.read("legacy", "Budget").unwrap();
        let item = &snapshot.items[0];
        assert_eq!(item.amount(), Money::from_dollars(40));
        assert_eq!(item.expense.last_paid_date, Some(date(2026, 1, 15)));
        assert_eq!(snapshot.saved_data.unwrap().income.state_code, "ca");
    }

    #[test]
    fn test_spreadsheet_id_from_link() {
        assert_eq!(
            spreadsheet_id_from_link("https://docs.google.com/spreadsheets/d/1AbC-xyz_9/edit#gid=0"),
            "1AbC-xyz_9"
        );
        assert_eq!(spreadsheet_id_from_link("https://host/d/abc?x=1"), "abc");
        assert_eq!(spreadsheet_id_from_link("  plain-id "), "plain-id");
        assert_eq!(spreadsheet_id_from_link("https://host/d/"), "https://host/d/");
    }
}
