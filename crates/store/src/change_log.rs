//! Append-only change-log persistence.
//!
//! Semantically append-only: prior entries are never altered. Physically the
//! whole file is rewritten on every append, like the measurement stores, and
//! with the same caveat: no locking, so concurrent appenders can lose
//! entries. Logging failure is an independent failure domain — the caller's
//! measurement write is never rolled back because a log append failed.

use std::path::PathBuf;

use condwatch_core::ChangeLogEntry;

use crate::error::StoreError;

/// The change-log ledger contract.
///
/// `read_all` returns entries in file order; callers wanting chronological
/// order sort by timestamp themselves.
pub trait ChangeLogStore: Send + Sync {
    fn append(&self, entry: &ChangeLogEntry) -> Result<(), StoreError>;
    fn read_all(&self) -> Result<Vec<ChangeLogEntry>, StoreError>;
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Change log stored as one JSON array.
pub struct JsonChangeLog {
    path: PathBuf,
}

impl JsonChangeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChangeLogStore for JsonChangeLog {
    fn append(&self, entry: &ChangeLogEntry) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.push(entry.clone());
        let text = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<ChangeLogEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Change log stored as a flat CSV file.
pub struct CsvChangeLog {
    path: PathBuf,
}

impl CsvChangeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChangeLogStore for CsvChangeLog {
    fn append(&self, entry: &ChangeLogEntry) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.push(entry.clone());

        let mut writer = csv::Writer::from_path(&self.path)?;
        for e in &entries {
            writer.serialize(e)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<ChangeLogEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut entries = Vec::new();
        for entry in reader.deserialize() {
            entries.push(entry?);
        }
        Ok(entries)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
