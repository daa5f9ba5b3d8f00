//! Path management for FinFlow
//!
//! ## Path Resolution Order
//!
//! 1. `FINFLOW_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/finflow` or `~/.config/finflow`
//! 3. Windows: `%APPDATA%\finflow`

use std::path::PathBuf;

use crate::error::FinflowError;

pub const DATA_DIR_ENV: &str = "FINFLOW_DATA_DIR";

/// Manages all paths used by FinFlow
#[derive(Debug, Clone)]
pub struct FinflowPaths {
    base_dir: PathBuf,
}

impl FinflowPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FinflowError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, `--data-dir`)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding one JSON file per spreadsheet store
    pub fn sheets_dir(&self) -> PathBuf {
        self.data_dir().join("sheets")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Create the base, data and sheets directories
    pub fn ensure_directories(&self) -> Result<(), FinflowError> {
        for dir in [self.base_dir.clone(), self.data_dir(), self.sheets_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                FinflowError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FinflowError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("finflow"));
        }
    }
    let home = std::env::var("HOME")
        .map_err(|_| FinflowError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("finflow"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FinflowError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| FinflowError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("finflow"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinflowPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.sheets_dir(),
            temp_dir.path().join("data").join("sheets")
        );
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinflowPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.sheets_dir().is_dir());
        assert!(!paths.is_initialized());
    }
}
