//! Domain types and pure logic for the condwatch monitoring core.
//!
//! This crate has no internal dependencies and no I/O. It provides:
//!
//! - [`measurement`] — the monitored [`Variable`](measurement::Variable) set
//!   and [`MeasurementRecord`](measurement::MeasurementRecord).
//! - [`thresholds`] — the compiled-in alert threshold table and the pure
//!   [`evaluate`](thresholds::evaluate) function.
//! - [`changelog`] — append-only change-log entry types.
//! - [`sent_alerts`] — the dispatched-alert record and its retention cap.

pub mod changelog;
pub mod error;
pub mod measurement;
pub mod sent_alerts;
pub mod thresholds;
pub mod types;

pub use changelog::{ChangeLogEntry, ChangeScope, DEFAULT_ACTOR};
pub use error::CoreError;
pub use measurement::{MeasurementRecord, Variable};
pub use sent_alerts::{SentAlert, SENT_ALERT_CAP};
pub use thresholds::{evaluate, AlertState, Threshold};
pub use types::Timestamp;
