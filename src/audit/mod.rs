//! Audit log for FinFlow
//!
//! Every sheet save and allocation transfer is appended to `audit.log` as one
//! JSON object per line, with before/after values and a short change summary.

mod diff;
mod entry;
mod logger;

pub use diff::sheet_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
