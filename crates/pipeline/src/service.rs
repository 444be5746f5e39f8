//! Orchestration of one measurement submission.
//!
//! Failure domains are deliberately decoupled: the measurement write is the
//! only step that can fail a submit. A change-log or notification failure is
//! reported in the outcome and logged, but never rolls back the record that
//! was already persisted.

use chrono::Local;
use serde_json::{Map, Value};

use condwatch_core::types::DATETIME_FORMAT;
use condwatch_core::{
    evaluate, AlertState, ChangeLogEntry, ChangeScope, MeasurementRecord, Variable,
};
use condwatch_events::{AlertNotifier, NotifyError};
use condwatch_store::{ChangeLogStore, LoadOutcome, MeasurementStore, StoreError};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// What happened to one triggered alert's notification.
#[derive(Debug)]
pub enum DeliveryStatus {
    /// Email dispatched and recorded in the sent-alert log.
    Sent,
    /// Email is not configured; nothing was sent.
    NotConfigured,
    /// Transport failure; not retried.
    Failed(String),
}

/// One out-of-range reading found during a submit.
#[derive(Debug)]
pub struct TriggeredAlert {
    pub variable: Variable,
    pub value: f64,
    pub state: AlertState,
    pub delivery: DeliveryStatus,
}

/// Result of a successful submit (the record was persisted).
#[derive(Debug, Default)]
pub struct SubmitOutcome {
    /// Out-of-range readings and what happened to their notifications.
    pub alerts: Vec<TriggeredAlert>,
    /// Set when the change-log append failed; the record itself is safe.
    pub change_log_error: Option<String>,
}

// ---------------------------------------------------------------------------
// MonitorService
// ---------------------------------------------------------------------------

/// Explicitly passed store handle replacing the original's ambient
/// application state: owns the measurement store, the change log, and the
/// notifier for the lifetime of the process.
pub struct MonitorService {
    store: Box<dyn MeasurementStore>,
    change_log: Box<dyn ChangeLogStore>,
    notifier: AlertNotifier,
}

impl MonitorService {
    pub fn new(
        store: Box<dyn MeasurementStore>,
        change_log: Box<dyn ChangeLogStore>,
        notifier: AlertNotifier,
    ) -> Self {
        Self {
            store,
            change_log,
            notifier,
        }
    }

    /// Persist one record, log the change, and alert on violations.
    ///
    /// Returns `Err` only when the measurement write itself failed; every
    /// downstream failure is carried in the [`SubmitOutcome`].
    pub async fn submit(
        &self,
        record: &MeasurementRecord,
        actor: &str,
    ) -> Result<SubmitOutcome, StoreError> {
        self.store.append_record(record)?;
        tracing::info!(
            equipment = %record.equipment_id,
            timestamp = %record.timestamp,
            "Measurement record persisted"
        );

        let mut outcome = SubmitOutcome::default();

        let entry = ChangeLogEntry {
            timestamp: Local::now().naive_local(),
            equipment_id: record.equipment_id.clone(),
            scope: ChangeScope::All,
            previous_value: None,
            new_value: record_snapshot(record).to_string(),
            actor: actor.to_string(),
        };
        if let Err(e) = self.change_log.append(&entry) {
            tracing::error!(error = %e, "Change-log append failed; record is already persisted");
            outcome.change_log_error = Some(e.to_string());
        }

        for (variable, value) in record.values() {
            let state = evaluate(variable, Some(value));
            if !state.is_alert() {
                continue;
            }
            let delivery = match self
                .notifier
                .notify(&record.equipment_id, record.timestamp, variable, value, state)
                .await
            {
                Ok(()) => DeliveryStatus::Sent,
                Err(NotifyError::NotConfigured) => DeliveryStatus::NotConfigured,
                Err(e) => {
                    tracing::warn!(variable = %variable, error = %e, "Alert email failed");
                    DeliveryStatus::Failed(e.to_string())
                }
            };
            outcome.alerts.push(TriggeredAlert {
                variable,
                value,
                state,
                delivery,
            });
        }

        Ok(outcome)
    }

    /// Load the full history, surfacing (not hiding) the dropped-row count.
    pub fn history(&self) -> Result<LoadOutcome, StoreError> {
        let outcome = self.store.load()?;
        if outcome.dropped_rows > 0 {
            tracing::warn!(
                dropped = outcome.dropped_rows,
                "Malformed rows were skipped while loading the store"
            );
        }
        Ok(outcome)
    }

    /// The change-log ledger, in insertion order.
    pub fn change_log(&self) -> Result<Vec<ChangeLogEntry>, StoreError> {
        self.change_log.read_all()
    }
}

/// JSON snapshot of a record for the change log's `new_value` field.
fn record_snapshot(record: &MeasurementRecord) -> Value {
    let mut row = Map::new();
    row.insert(
        "DateTime".into(),
        Value::String(record.timestamp.format(DATETIME_FORMAT).to_string()),
    );
    row.insert(
        "EQUIPAMENTO".into(),
        Value::String(record.equipment_id.clone()),
    );
    for (variable, value) in record.values() {
        row.insert(
            variable.column().into(),
            serde_json::Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        );
    }
    Value::Object(row)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
