//! The monitored variable set and the measurement record.
//!
//! Column headers are the canonical (Portuguese) names carried by the store
//! files; they are the wire format, not a display concern. Variable naming in
//! code is English.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Variable
// ---------------------------------------------------------------------------

/// One of the five monitored quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    AxialVibration,
    RadialYVibration,
    RadialXVibration,
    Temperature,
    Current,
}

impl Variable {
    /// All variables, in canonical column order.
    pub const ALL: [Variable; 5] = [
        Variable::AxialVibration,
        Variable::RadialYVibration,
        Variable::RadialXVibration,
        Variable::Temperature,
        Variable::Current,
    ];

    /// Canonical column header as written to every store file.
    pub fn column(self) -> &'static str {
        match self {
            Variable::AxialVibration => "VIBRAÇÃO AXIAL(mm/s)",
            Variable::RadialYVibration => "VIBRAÇÃO RADIAL-Y (mm/s)",
            Variable::RadialXVibration => "VIBRAÇÃO RADIAL-X (mm/s)",
            Variable::Temperature => "TEMPERATURA(°C)",
            Variable::Current => "CORRENTE ELÉTRICA (A)",
        }
    }

    /// Measurement unit for display and alert messages.
    pub fn unit(self) -> &'static str {
        match self {
            Variable::AxialVibration
            | Variable::RadialYVibration
            | Variable::RadialXVibration => "mm/s",
            Variable::Temperature => "°C",
            Variable::Current => "A",
        }
    }

    /// Parse a column header back into a variable.
    ///
    /// Accepts the canonical headers plus the unaccented spellings found in
    /// older workbooks (`VIBRACAO AXIAL(mm/s)`, `TEMPERATURA(C)`, ...).
    /// Returns `None` for unknown columns, which callers skip.
    pub fn from_column(name: &str) -> Option<Variable> {
        match name.trim() {
            "VIBRAÇÃO AXIAL(mm/s)" | "VIBRACAO AXIAL(mm/s)" => Some(Variable::AxialVibration),
            "VIBRAÇÃO RADIAL-Y (mm/s)" | "VIBRACAO RADIAL-Y (mm/s)" => {
                Some(Variable::RadialYVibration)
            }
            "VIBRAÇÃO RADIAL-X (mm/s)" | "VIBRACAO RADIAL-X (mm/s)" => {
                Some(Variable::RadialXVibration)
            }
            "TEMPERATURA(°C)" | "TEMPERATURA(C)" => Some(Variable::Temperature),
            "CORRENTE ELÉTRICA (A)" | "CORRENTE ELETRICA (A)" => Some(Variable::Current),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Variable::from_column(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown variable column '{name}'")))
    }
}

// ---------------------------------------------------------------------------
// MeasurementRecord
// ---------------------------------------------------------------------------

/// One timestamped reading set for one equipment unit.
///
/// Records are append-only: corrections are modeled as a new record plus a
/// change-log entry referencing the prior value, never an in-place edit.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// When the readings were taken (local wall-clock time).
    pub timestamp: Timestamp,
    /// Equipment unit identifier; never empty.
    pub equipment_id: String,
    values: BTreeMap<Variable, f64>,
}

impl MeasurementRecord {
    /// Build a validated record.
    ///
    /// Rejects an empty `equipment_id`. Non-finite values (NaN, ±inf) are
    /// dropped from `values` so that only finite floats or absence ever
    /// reach the threshold evaluator.
    pub fn new(
        timestamp: Timestamp,
        equipment_id: impl Into<String>,
        values: BTreeMap<Variable, f64>,
    ) -> Result<Self, CoreError> {
        let equipment_id = equipment_id.into();
        if equipment_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "equipment_id must not be empty".into(),
            ));
        }
        let values = values.into_iter().filter(|(_, v)| v.is_finite()).collect();
        Ok(Self {
            timestamp,
            equipment_id,
            values,
        })
    }

    /// The reading for `variable`, or `None` if absent.
    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values.get(&variable).copied()
    }

    /// All present readings, in canonical column order.
    pub fn values(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.values.iter().map(|(v, x)| (*v, *x))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn rejects_empty_equipment_id() {
        assert!(MeasurementRecord::new(ts(), "  ", BTreeMap::new()).is_err());
    }

    #[test]
    fn drops_non_finite_values() {
        let mut values = BTreeMap::new();
        values.insert(Variable::Temperature, f64::NAN);
        values.insert(Variable::Current, 42.0);
        let record = MeasurementRecord::new(ts(), "M1", values).unwrap();
        assert_eq!(record.value(Variable::Temperature), None);
        assert_eq!(record.value(Variable::Current), Some(42.0));
    }

    #[test]
    fn column_round_trips_for_all_variables() {
        for var in Variable::ALL {
            assert_eq!(Variable::from_column(var.column()), Some(var));
        }
    }

    #[test]
    fn from_column_accepts_unaccented_legacy_headers() {
        assert_eq!(
            Variable::from_column("VIBRACAO AXIAL(mm/s)"),
            Some(Variable::AxialVibration),
        );
        assert_eq!(Variable::from_column("TEMPERATURA(C)"), Some(Variable::Temperature));
        assert_eq!(
            Variable::from_column("CORRENTE ELETRICA (A)"),
            Some(Variable::Current),
        );
    }

    #[test]
    fn from_column_rejects_unknown_header() {
        assert_eq!(Variable::from_column("PRESSÃO (bar)"), None);
    }
}
