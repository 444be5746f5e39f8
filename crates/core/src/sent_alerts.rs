//! Record type for alerts that were actually dispatched.

use serde::{Deserialize, Serialize};

use crate::measurement::Variable;
use crate::types::Timestamp;

/// Maximum entries retained in the sent-alert log; oldest evicted first.
pub const SENT_ALERT_CAP: usize = 1000;

/// One dispatched alert. Appended only after a successful email send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentAlert {
    /// When the alert email was sent.
    pub timestamp: Timestamp,
    /// Equipment unit that triggered the alert.
    #[serde(rename = "equipment")]
    pub equipment_id: String,
    /// Variable whose reading was out of range.
    pub variable: Variable,
    /// The offending value.
    pub value: f64,
    /// Human-readable reason, e.g. `above maximum limit (5)`.
    pub reason: String,
}
