//! Append-only change-log entry types.
//!
//! Every field-level edit (and every full-record insertion) produces one
//! entry: who changed what, the old and new value, and when. Entries are
//! never mutated or deleted; insertion order is the canonical order and any
//! re-sorting by timestamp is a display concern.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::measurement::Variable;
use crate::types::Timestamp;

/// Actor recorded when no explicit user is known.
pub const DEFAULT_ACTOR: &str = "Operador Local";

/// Scope marker written to the change log's variable column.
const ALL_SCOPE: &str = "ALL";

// ---------------------------------------------------------------------------
// ChangeScope
// ---------------------------------------------------------------------------

/// What an entry covers: one variable, or the whole record (`ALL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeScope {
    /// The entry records a whole-record insertion.
    All,
    /// The entry records an edit to a single variable.
    Variable(Variable),
}

impl Serialize for ChangeScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChangeScope::All => serializer.serialize_str(ALL_SCOPE),
            ChangeScope::Variable(var) => serializer.serialize_str(var.column()),
        }
    }
}

impl<'de> Deserialize<'de> for ChangeScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name == ALL_SCOPE {
            return Ok(ChangeScope::All);
        }
        Variable::from_column(&name)
            .map(ChangeScope::Variable)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown change scope '{name}'")))
    }
}

// ---------------------------------------------------------------------------
// ChangeLogEntry
// ---------------------------------------------------------------------------

/// One ledger entry. Field names follow the on-disk log format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    /// When the change was recorded (not the measurement timestamp).
    pub timestamp: Timestamp,
    /// Equipment unit the change belongs to.
    #[serde(rename = "equipment")]
    pub equipment_id: String,
    /// One variable column header, or `ALL` for a whole-record insertion.
    #[serde(rename = "variable")]
    pub scope: ChangeScope,
    /// Prior value as displayed, if there was one.
    pub previous_value: Option<String>,
    /// New value as displayed (for `ALL` scope, a JSON snapshot of the record).
    pub new_value: String,
    /// Who made the change.
    pub actor: String,
}
