//! JSON-array measurement store backend.
//!
//! The file is an array of flat objects: `DateTime` (local datetime string),
//! `EQUIPAMENTO`, and one key per variable column header holding a number or
//! `null`. The variable columns are dynamic keys, so rows are mapped by hand
//! through `serde_json::Map` rather than a derived struct.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use condwatch_core::types::DATETIME_FORMAT;
use condwatch_core::{MeasurementRecord, Variable};

use crate::error::StoreError;
use crate::measurement::{parse_datetime, LoadOutcome, MeasurementStore};

/// JSON object key for the combined timestamp.
const DATETIME_KEY: &str = "DateTime";

/// JSON object key for the equipment unit id.
const EQUIPMENT_KEY: &str = "EQUIPAMENTO";

/// Measurement store backed by a single JSON file.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[MeasurementRecord]) -> Result<(), StoreError> {
        let rows: Vec<Value> = records.iter().map(record_to_row).collect();
        let text = serde_json::to_string_pretty(&rows)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl MeasurementStore for JsonStore {
    fn load(&self) -> Result<LoadOutcome, StoreError> {
        if !self.path.exists() {
            return Ok(LoadOutcome::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&text)?;
        let rows = value
            .as_array()
            .ok_or_else(|| StoreError::Format("measurement file is not a JSON array".into()))?;

        let mut outcome = LoadOutcome::default();
        for row in rows {
            match row_to_record(row) {
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

/// Serialize one record to its on-disk object shape.
fn record_to_row(record: &MeasurementRecord) -> Value {
    let mut row = Map::new();
    row.insert(
        DATETIME_KEY.into(),
        Value::String(record.timestamp.format(DATETIME_FORMAT).to_string()),
    );
    row.insert(
        EQUIPMENT_KEY.into(),
        Value::String(record.equipment_id.clone()),
    );
    for var in Variable::ALL {
        let cell = match record.value(var) {
            Some(v) => serde_json::Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            None => Value::Null,
        };
        row.insert(var.column().into(), cell);
    }
    Value::Object(row)
}

/// Parse one row object; `None` means the row is malformed and dropped.
///
/// Public because the ingest binary accepts records in exactly this shape.
pub fn row_to_record(row: &Value) -> Option<MeasurementRecord> {
    let row = row.as_object()?;
    let timestamp = parse_datetime(row.get(DATETIME_KEY)?.as_str()?)?;
    let equipment_id = row.get(EQUIPMENT_KEY)?.as_str()?;

    let mut values = BTreeMap::new();
    for var in Variable::ALL {
        match row.get(var.column()) {
            None | Some(Value::Null) => {}
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    values.insert(var, v);
                }
            }
            // Numeric text is tolerated; anything else poisons the row.
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) => {
                    values.insert(var, v);
                }
                Err(_) => return None,
            },
            Some(_) => return None,
        }
    }

    MeasurementRecord::new(timestamp, equipment_id, values).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(equipment: &str, temp: f64) -> MeasurementRecord {
        let ts = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let mut values = BTreeMap::new();
        values.insert(Variable::Temperature, temp);
        values.insert(Variable::AxialVibration, 1.5);
        MeasurementRecord::new(ts, equipment, values).unwrap()
    }

    #[test]
    fn missing_file_loads_as_empty_store() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("absent.json"));
        let outcome = store.load().unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped_rows, 0);
    }

    #[test]
    fn append_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("data.json"));
        let r = record("M1", 63.2);
        store.append_record(&r).unwrap();

        let outcome = store.load().unwrap();
        assert_eq!(outcome.records, vec![r]);
        assert_eq!(outcome.dropped_rows, 0);
    }

    #[test]
    fn append_preserves_prior_records_in_order() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("data.json"));
        store.append_record(&record("M1", 60.0)).unwrap();
        store.append_record(&record("M2", 61.0)).unwrap();

        let records = store.load().unwrap().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].equipment_id, "M1");
        assert_eq!(records[1].equipment_id, "M2");
    }

    #[test]
    fn absent_values_round_trip_as_null() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("data.json"));
        store.append_record(&record("M1", 60.0)).unwrap();

        let loaded = &store.load().unwrap().records[0];
        assert_eq!(loaded.value(Variable::Current), None);
        assert_eq!(loaded.value(Variable::Temperature), Some(60.0));
    }

    #[test]
    fn malformed_rows_are_dropped_and_counted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[
                {"DateTime": "2026-03-14 09:30:00", "EQUIPAMENTO": "M1", "TEMPERATURA(°C)": 55.0},
                {"DateTime": "garbage", "EQUIPAMENTO": "M2", "TEMPERATURA(°C)": 55.0},
                {"DateTime": "2026-03-14 10:00:00", "EQUIPAMENTO": "M3", "TEMPERATURA(°C)": "hot"},
                {"DateTime": "2026-03-14 10:30:00", "EQUIPAMENTO": "", "TEMPERATURA(°C)": 55.0}
            ]"#,
        )
        .unwrap();

        let outcome = JsonStore::new(path).load().unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].equipment_id, "M1");
        assert_eq!(outcome.dropped_rows, 3);
    }

    #[test]
    fn numeric_text_cells_are_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"DateTime": "2026-03-14 09:30:00", "EQUIPAMENTO": "M1", "CORRENTE ELÉTRICA (A)": "42.5"}]"#,
        )
        .unwrap();

        let outcome = JsonStore::new(path).load().unwrap();
        assert_eq!(outcome.records[0].value(Variable::Current), Some(42.5));
    }

    #[test]
    fn non_array_file_is_a_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        assert!(matches!(
            JsonStore::new(path).load(),
            Err(StoreError::Format(_))
        ));
    }
}
