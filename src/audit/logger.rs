//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{FinflowError, FinflowResult};

use super::entry::AuditEntry;

/// Writes one JSON object per line and flushes after every append
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, entry: &AuditEntry) -> FinflowResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> FinflowResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| FinflowError::Io(format!("Failed to open audit log: {}", e)))?;
        let mut writer = BufWriter::new(file);

        for entry in entries {
            let line = serde_json::to_string(entry)
                .map_err(|e| FinflowError::Json(format!("Failed to serialize audit entry: {}", e)))?;
            writeln!(writer, "{}", line)
                .map_err(|e| FinflowError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        writer
            .flush()
            .map_err(|e| FinflowError::Io(format!("Failed to flush audit log: {}", e)))?;
        tracing::debug!(count = entries.len(), path = %self.log_path.display(), "audit entries written");
        Ok(())
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> FinflowResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| FinflowError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                FinflowError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                FinflowError::Json(format!("Failed to parse audit entry at line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> FinflowResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let skip = entries.len().saturating_sub(count);
        Ok(entries.split_off(skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("data").join("audit.log"));
        (logger, temp_dir)
    }

    fn sheet_entry(id: &str) -> AuditEntry {
        AuditEntry::create(EntityType::Sheet, id, None, &json!({"name": id}))
    }

    #[test]
    fn test_log_and_read_back() {
        let (logger, _temp) = logger();
        logger.log(&sheet_entry("household/Jan-2026")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Sheet);
    }

    #[test]
    fn test_read_recent_keeps_order() {
        let (logger, _temp) = logger();
        let batch: Vec<_> = (0..6).map(|i| sheet_entry(&format!("s/{}", i))).collect();
        logger.log_batch(&batch).unwrap();

        let recent = logger.read_recent(2).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, ["s/4", "s/5"]);
        assert_eq!(logger.read_recent(50).unwrap().len(), 6);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let (logger, _temp) = logger();
        assert!(logger.read_all().unwrap().is_empty());
        logger.log_batch(&[]).unwrap();
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let (logger, _temp) = logger();
        logger.log(&sheet_entry("a")).unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "not json").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
