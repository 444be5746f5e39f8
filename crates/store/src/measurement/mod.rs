//! The measurement store contract and its backends.
//!
//! The backing format (JSON / CSV / Excel) only affects serialization, never
//! semantics: every backend loads the full ordered record set and appends by
//! read-full, add-in-memory, write-full.

use condwatch_core::types::{DATETIME_FORMAT, DATE_FORMAT, TIME_FORMAT};
use condwatch_core::{MeasurementRecord, Timestamp};

use crate::error::StoreError;

pub mod csv;
pub mod excel;
pub mod json;

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Result of loading a store file.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Successfully parsed records, in file order.
    pub records: Vec<MeasurementRecord>,
    /// Rows skipped because of an unparsable timestamp, non-numeric
    /// measurement text, or a missing equipment id.
    pub dropped_rows: usize,
}

/// The measurement store: an ordered, append-only record collection.
///
/// `append_record` is read-full-store / add / write-full-store. There is no
/// locking around that cycle, so concurrent writers can lose updates; this
/// is a known limitation, not something the backends work around.
pub trait MeasurementStore: Send + Sync {
    /// Load every parseable record. A missing file is an empty store.
    fn load(&self) -> Result<LoadOutcome, StoreError>;

    /// Persist one new record at the end of the store.
    fn append_record(&self, record: &MeasurementRecord) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Shared parsing helpers
// ---------------------------------------------------------------------------

/// Parse a combined datetime string (`DateTime` key), tolerating the ISO-T
/// separator and fractional seconds found in files written by other tools.
pub(crate) fn parse_datetime(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    for format in [
        DATETIME_FORMAT,
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }
    None
}

/// Parse a `DATA` cell, tolerating the day-first spelling of older files.
pub(crate) fn parse_date(text: &str) -> Option<chrono::NaiveDate> {
    let text = text.trim();
    // Datetime-shaped cells ("2026-03-14 00:00:00") keep just the date part.
    if let Some(ts) = parse_datetime(text) {
        return Some(ts.date());
    }
    for format in [DATE_FORMAT, "%d/%m/%Y"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

/// Parse a `HORÁRIO` cell.
pub(crate) fn parse_time(text: &str) -> Option<chrono::NaiveTime> {
    let text = text.trim();
    for format in [TIME_FORMAT, "%H:%M"] {
        if let Ok(time) = chrono::NaiveTime::parse_from_str(text, format) {
            return Some(time);
        }
    }
    None
}

/// Parse a measurement cell: empty means absent, numeric text is a value,
/// anything else is malformed (the caller drops the row).
pub(crate) enum CellValue {
    Absent,
    Number(f64),
    Malformed,
}

pub(crate) fn parse_measurement_cell(text: &str) -> CellValue {
    let text = text.trim();
    if text.is_empty() {
        return CellValue::Absent;
    }
    match text.parse::<f64>() {
        Ok(v) => CellValue::Number(v),
        Err(_) => CellValue::Malformed,
    }
}
