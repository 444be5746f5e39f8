//! Flat-CSV measurement store backend.
//!
//! Columns: `DATA`, `HORÁRIO`, `EQUIPAMENTO`, then the five measurement
//! columns. An optional [`PostWriteHook`] (git commit-and-push) runs after
//! each successful write; its failure is swallowed by the hook itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use condwatch_core::types::{DATE_FORMAT, TIME_FORMAT};
use condwatch_core::{MeasurementRecord, Variable};

use crate::error::StoreError;
use crate::measurement::{
    parse_date, parse_measurement_cell, parse_time, CellValue, LoadOutcome, MeasurementStore,
};
use crate::vcs::PostWriteHook;

/// Fixed leading columns before the measurement columns.
const DATE_COLUMN: &str = "DATA";
const TIME_COLUMN: &str = "HORÁRIO";
const EQUIPMENT_COLUMN: &str = "EQUIPAMENTO";

/// Measurement store backed by a single CSV file.
pub struct CsvStore {
    path: PathBuf,
    hook: Option<Box<dyn PostWriteHook>>,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hook: None,
        }
    }

    /// Attach a post-write hook, invoked after each successful write.
    pub fn with_hook(mut self, hook: Box<dyn PostWriteHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[MeasurementRecord]) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(&self.path)?;

        let mut header = vec![DATE_COLUMN, TIME_COLUMN, EQUIPMENT_COLUMN];
        header.extend(Variable::ALL.iter().map(|v| v.column()));
        writer.write_record(&header)?;

        for record in records {
            let mut row = vec![
                record.timestamp.format(DATE_FORMAT).to_string(),
                record.timestamp.format(TIME_FORMAT).to_string(),
                record.equipment_id.clone(),
            ];
            for var in Variable::ALL {
                row.push(match record.value(var) {
                    Some(v) => v.to_string(),
                    None => String::new(),
                });
            }
            writer.write_record(&row)?;
        }
        writer.flush()?;

        if let Some(hook) = &self.hook {
            hook.after_write(&self.path);
        }
        Ok(())
    }
}

impl MeasurementStore for CsvStore {
    fn load(&self) -> Result<LoadOutcome, StoreError> {
        if !self.path.exists() {
            return Ok(LoadOutcome::default());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;

        // Resolve column positions from the header so column order and
        // unknown extra columns do not matter.
        let headers = reader.headers()?.clone();
        let mut date_idx = None;
        let mut time_idx = None;
        let mut equipment_idx = None;
        let mut var_idx: Vec<(Variable, usize)> = Vec::new();
        for (idx, name) in headers.iter().enumerate() {
            match name.trim() {
                DATE_COLUMN => date_idx = Some(idx),
                TIME_COLUMN => time_idx = Some(idx),
                EQUIPMENT_COLUMN => equipment_idx = Some(idx),
                other => {
                    if let Some(var) = Variable::from_column(other) {
                        var_idx.push((var, idx));
                    }
                }
            }
        }
        let (Some(date_idx), Some(time_idx), Some(equipment_idx)) =
            (date_idx, time_idx, equipment_idx)
        else {
            return Err(StoreError::Format(format!(
                "CSV header must contain {DATE_COLUMN}, {TIME_COLUMN} and {EQUIPMENT_COLUMN}"
            )));
        };

        let mut outcome = LoadOutcome::default();
        for row in reader.records() {
            let row = row?;
            match parse_row(&row, date_idx, time_idx, equipment_idx, &var_idx) {
                Some(record) => outcome.records.push(record),
                None => outcome.dropped_rows += 1,
            }
        }
        Ok(outcome)
    }

    fn append_record(&self, record: &MeasurementRecord) -> Result<(), StoreError> {
        let mut records = self.load()?.records;
        records.push(record.clone());
        self.write_all(&records)
    }
}

/// Parse one data row; `None` means the row is malformed and dropped.
fn parse_row(
    row: &csv::StringRecord,
    date_idx: usize,
    time_idx: usize,
    equipment_idx: usize,
    var_idx: &[(Variable, usize)],
) -> Option<MeasurementRecord> {
    let date = parse_date(row.get(date_idx)?)?;
    let time = parse_time(row.get(time_idx)?)?;
    let equipment_id = row.get(equipment_idx)?;

    let mut values = BTreeMap::new();
    for &(var, idx) in var_idx {
        match parse_measurement_cell(row.get(idx).unwrap_or("")) {
            CellValue::Absent => {}
            CellValue::Number(v) => {
                values.insert(var, v);
            }
            CellValue::Malformed => return None,
        }
    }

    MeasurementRecord::new(date.and_time(time), equipment_id, values).ok()
}
