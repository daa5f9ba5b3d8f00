//! Storage layer for FinFlow
//!
//! JSON files with atomic writes, and the spreadsheet store that budget
//! sheets are saved to.

pub mod file_io;
pub mod sheets;

pub use file_io::{read_json, write_json_atomic};
pub use sheets::{
    spreadsheet_id_from_link, LocalSheetStore, SavedData, SheetSnapshot, SheetStore, SheetWrite,
    SnapshotStatus, DEFAULT_SHEET_NAME,
};
