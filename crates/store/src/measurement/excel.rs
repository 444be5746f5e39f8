//! Excel-workbook measurement store backend.
//!
//! Layout (fixed by the historic workbook): sheet `Planilha1`, first row
//! unused, header on the second row, data below. Reading goes through
//! `calamine`, writing rebuilds the whole sheet with `rust_xlsxwriter` —
//! the same full-overwrite model as the other backends.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveTime};
use rust_xlsxwriter::Workbook;

use condwatch_core::types::{DATE_FORMAT, TIME_FORMAT};
use condwatch_core::{MeasurementRecord, Variable};

use crate::error::StoreError;
use crate::measurement::{
    parse_date, parse_measurement_cell, parse_time, CellValue, LoadOutcome, MeasurementStore,
};

/// Sheet holding the measurement table.
const SHEET_NAME: &str = "Planilha1";

/// Zero-based row index the header is written at (first row stays empty).
///
/// Loading does not assume this index: the used range calamine returns is
/// trimmed to the first non-empty cell, so the header is located by scanning
/// for the row that carries the fixed column names.
const HEADER_ROW: usize = 1;

const DATE_COLUMN: &str = "DATA";
const TIME_COLUMN: &str = "HORÁRIO";
const EQUIPMENT_COLUMN: &str = "EQUIPAMENTO";

/// Measurement store backed by a single Excel workbook.
pub struct ExcelStore {
    path: PathBuf,
}

impl ExcelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[MeasurementRecord]) -> Result<(), StoreError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        // Row 0 stays empty; the header lives on the second row.
        let header_row = HEADER_ROW as u32;
        let mut col: u16 = 0;
        for name in [DATE_COLUMN, TIME_COLUMN, EQUIPMENT_COLUMN] {
            sheet.write_string(header_row, col, name)?;
            col += 1;
        }
        for var in Variable::ALL {
            sheet.write_string(header_row, col, var.column())?;
            col += 1;
        }

        for (i, record) in records.iter().enumerate() {
            let row = header_row + 1 + i as u32;
            sheet.write_string(row, 0, record.timestamp.format(DATE_FORMAT).to_string())?;
            sheet.write_string(row, 1, record.timestamp.format(TIME_FORMAT).to_string())?;
            sheet.write_string(row, 2, &record.equipment_id)?;
            for (offset, var) in Variable::ALL.iter().enumerate() {
                if let Some(v) = record.value(*var) {
                    sheet.write_number(row, 3 + offset as u16, v)?;
                }
            }
        }

        workbook.save(&self.path)?;
        Ok(())
    }
}

impl MeasurementStore for ExcelStore {
    fn load(&self) -> Result<LoadOutcome, StoreError> {
        if !self.path.exists() {
            return Ok(LoadOutcome::default());
        }
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let range = workbook.worksheet_range(SHEET_NAME)?;

        let rows: Vec<&[Data]> = range.rows().collect();
        if rows.is_empty() {
            // An empty sheet holds no records.
            return Ok(LoadOutcome::default());
        }
        let Some(header_pos) = rows.iter().position(|row| is_header_row(row)) else {
            return Err(StoreError::Format(format!(
                "sheet {SHEET_NAME} header must contain {DATE_COLUMN}, {TIME_COLUMN} and {EQUIPMENT_COLUMN}"
            )));
        };

        let mut date_idx = None;
        let mut time_idx = None;
        let mut equipment_idx = None;
        let mut var_idx: Vec<(Variable, usize)> = Vec::new();
        for (idx, cell) in rows[header_pos].iter().enumerate() {
            let Data::String(name) = cell else { continue };
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
            // Unreachable once is_header_row matched, kept as a guard.
            return Err(StoreError::Format(format!(
                "sheet {SHEET_NAME} header must contain {DATE_COLUMN}, {TIME_COLUMN} and {EQUIPMENT_COLUMN}"
            )));
        };

        let mut outcome = LoadOutcome::default();
        for row in rows.iter().skip(header_pos + 1) {
            if row.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            match parse_row(row, date_idx, time_idx, equipment_idx, &var_idx) {
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

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// A row is the header row when it carries all three fixed column names.
fn is_header_row(row: &[Data]) -> bool {
    let has = |name: &str| {
        row.iter()
            .any(|cell| matches!(cell, Data::String(s) if s.trim() == name))
    };
    has(DATE_COLUMN) && has(TIME_COLUMN) && has(EQUIPMENT_COLUMN)
}

fn date_from_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) => parse_date(s),
        Data::DateTime(dt) => dt.as_datetime().map(|ts| ts.date()),
        _ => None,
    }
}

fn time_from_cell(cell: &Data) -> Option<NaiveTime> {
    match cell {
        Data::String(s) => parse_time(s),
        Data::DateTime(dt) => dt.as_datetime().map(|ts| ts.time()),
        // A bare fraction of a day, as Excel stores times without a format.
        // Fractions just under 1.0 round to a full day; clamp to 23:59:59.
        Data::Float(f) if (0.0..1.0).contains(f) => {
            let seconds = ((f * 86_400.0).round() as u32).min(86_399);
            NaiveTime::from_hms_opt(seconds / 3600, (seconds / 60) % 60, seconds % 60)
        }
        _ => None,
    }
}

fn measurement_from_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Absent,
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::String(s) => parse_measurement_cell(s),
        _ => CellValue::Malformed,
    }
}

fn parse_row(
    row: &[Data],
    date_idx: usize,
    time_idx: usize,
    equipment_idx: usize,
    var_idx: &[(Variable, usize)],
) -> Option<MeasurementRecord> {
    let date = date_from_cell(row.get(date_idx)?)?;
    let time = time_from_cell(row.get(time_idx)?)?;
    let equipment_id = match row.get(equipment_idx)? {
        Data::String(s) => s.clone(),
        _ => return None,
    };

    let mut values = BTreeMap::new();
    for &(var, idx) in var_idx {
        match measurement_from_cell(row.get(idx).unwrap_or(&Data::Empty)) {
            CellValue::Absent => {}
            CellValue::Number(v) => {
                values.insert(var, v);
            }
            CellValue::Malformed => return None,
        }
    }

    MeasurementRecord::new(date.and_time(time), equipment_id, values).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use tempfile::tempdir;

    fn record(equipment: &str, temp: Option<f64>) -> MeasurementRecord {
        let ts = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(14, 15, 0)
            .unwrap();
        let mut values = BTreeMap::new();
        if let Some(t) = temp {
            values.insert(Variable::Temperature, t);
        }
        values.insert(Variable::RadialXVibration, 4.4);
        MeasurementRecord::new(ts, equipment, values).unwrap()
    }

    #[test]
    fn missing_workbook_loads_as_empty_store() {
        let dir = tempdir().unwrap();
        let store = ExcelStore::new(dir.path().join("absent.xlsx"));
        assert!(store.load().unwrap().records.is_empty());
    }

    #[test]
    fn append_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = ExcelStore::new(dir.path().join("data.xlsx"));
        let r = record("M1", Some(64.0));
        store.append_record(&r).unwrap();

        let outcome = store.load().unwrap();
        assert_eq!(outcome.records, vec![r]);
        assert_eq!(outcome.dropped_rows, 0);
    }

    #[test]
    fn append_keeps_prior_records() {
        let dir = tempdir().unwrap();
        let store = ExcelStore::new(dir.path().join("data.xlsx"));
        store.append_record(&record("M1", Some(60.0))).unwrap();
        store.append_record(&record("M2", None)).unwrap();

        let records = store.load().unwrap().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].equipment_id, "M2");
        assert_eq!(records[1].value(Variable::Temperature), None);
    }

    #[test]
    fn reload_survives_used_range_trimming() {
        // The store writes the header on the second row with an empty first
        // row; the used range comes back trimmed to start at the header.
        // Loading must still find the header and every record below it.
        let dir = tempdir().unwrap();
        let store = ExcelStore::new(dir.path().join("data.xlsx"));
        store.append_record(&record("M1", Some(60.0))).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.records.len(), 1);
        assert_eq!(reloaded.dropped_rows, 0);

        // The second append reads the file it just wrote; this is the spot
        // a fixed header index breaks.
        store.append_record(&record("M2", Some(61.0))).unwrap();
        let records = store.load().unwrap().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].equipment_id, "M1");
        assert_eq!(records[1].equipment_id, "M2");
    }

    #[test]
    fn header_on_first_row_is_also_accepted() {
        // Workbooks produced by other tools may start at the header
        // directly, without the leading empty row.
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).unwrap();
        for (col, name) in [DATE_COLUMN, TIME_COLUMN, EQUIPMENT_COLUMN, "TEMPERATURA(°C)"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_string(1, 0, "2026-03-14").unwrap();
        sheet.write_string(1, 1, "14:15:00").unwrap();
        sheet.write_string(1, 2, "M7").unwrap();
        sheet.write_number(1, 3, 66.5).unwrap();
        workbook.save(&path).unwrap();

        let outcome = ExcelStore::new(path).load().unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].equipment_id, "M7");
        assert_eq!(outcome.records[0].value(Variable::Temperature), Some(66.5));
    }

    #[test]
    fn sheet_without_header_is_a_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).unwrap();
        sheet.write_string(0, 0, "not a measurement table").unwrap();
        workbook.save(&path).unwrap();

        assert!(matches!(
            ExcelStore::new(path).load(),
            Err(StoreError::Format(_))
        ));
    }

    #[test]
    fn time_fraction_cells_convert() {
        // 0.5 of a day is noon.
        let time = time_from_cell(&Data::Float(0.5)).unwrap();
        assert_eq!(time.hour(), 12);
        assert_eq!(time.minute(), 0);
    }

    #[test]
    fn time_fraction_just_under_a_day_clamps_to_last_second() {
        let time = time_from_cell(&Data::Float(0.999_999_9)).unwrap();
        assert_eq!((time.hour(), time.minute(), time.second()), (23, 59, 59));
    }
}
