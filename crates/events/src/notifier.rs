//! The alert notifier: dispatch one triggered alert and record it.
//!
//! Failure semantics (deliberately asymmetric): a missing email
//! configuration is a reported no-op, a transport failure is surfaced but
//! never retried, and a sent-log append failure after a successful send is
//! logged and swallowed — the email already went out.

use chrono::Local;

use condwatch_core::thresholds::threshold_for;
use condwatch_core::{AlertState, SentAlert, Timestamp, Variable};
use condwatch_store::SentAlertLog;

use crate::delivery::email::{EmailConfig, EmailDelivery, EmailError};
use crate::message::AlertMessage;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a notification was not delivered.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Sender, credential, or recipients are absent. Non-fatal: the caller
    /// reports it and moves on.
    #[error("email alerting is not configured (sender, password, or recipients missing)")]
    NotConfigured,

    /// SMTP-level failure; surfaced, not retried.
    #[error(transparent)]
    Email(#[from] EmailError),
}

// ---------------------------------------------------------------------------
// AlertNotifier
// ---------------------------------------------------------------------------

/// Formats and dispatches alert emails, appending each successful dispatch
/// to the bounded sent-alert log.
pub struct AlertNotifier {
    delivery: Option<EmailDelivery>,
    sent_log: SentAlertLog,
}

impl AlertNotifier {
    /// `config = None` builds a notifier that always reports
    /// [`NotifyError::NotConfigured`] without touching the network.
    pub fn new(config: Option<EmailConfig>, sent_log: SentAlertLog) -> Self {
        Self {
            delivery: config.map(EmailDelivery::new),
            sent_log,
        }
    }

    /// Dispatch one triggered alert.
    ///
    /// A [`AlertState::NoAlert`] state is a quiet no-op. On success a
    /// [`SentAlert`] is appended to the log; on `NotConfigured` or a
    /// transport failure nothing is appended.
    pub async fn notify(
        &self,
        equipment_id: &str,
        measured_at: Timestamp,
        variable: Variable,
        value: f64,
        state: AlertState,
    ) -> Result<(), NotifyError> {
        if !state.is_alert() {
            return Ok(());
        }
        let threshold = threshold_for(variable);
        let reason = state
            .reason(threshold)
            .unwrap_or_else(|| "out of range".to_string());

        let Some(delivery) = &self.delivery else {
            tracing::warn!(
                equipment = equipment_id,
                variable = %variable,
                value,
                "Alert triggered but email is not configured; nothing sent"
            );
            return Err(NotifyError::NotConfigured);
        };

        let message = AlertMessage {
            equipment_id: equipment_id.to_string(),
            variable,
            value,
            reason: reason.clone(),
            threshold,
            measured_at,
        };
        delivery.deliver(&message.subject(), &message.html_body()).await?;

        let sent = SentAlert {
            timestamp: Local::now().naive_local(),
            equipment_id: equipment_id.to_string(),
            variable,
            value,
            reason,
        };
        if let Err(e) = self.sent_log.append(&sent) {
            // The email is already out; losing the log entry is acceptable.
            tracing::warn!(error = %e, "Failed to record sent alert");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn ts() -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn unconfigured_notifier_reports_not_configured() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("alerts.json");
        let notifier = AlertNotifier::new(None, SentAlertLog::new(&log_path));

        let state = condwatch_core::evaluate(Variable::AxialVibration, Some(6.0));
        let result = notifier
            .notify("M1", ts(), Variable::AxialVibration, 6.0, state)
            .await;

        assert_matches!(result, Err(NotifyError::NotConfigured));
        // No sent-alert record is written when nothing was sent.
        assert!(SentAlertLog::new(&log_path).read_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_alert_state_is_a_quiet_no_op() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("alerts.json");
        let notifier = AlertNotifier::new(None, SentAlertLog::new(&log_path));

        let result = notifier
            .notify("M1", ts(), Variable::Current, 50.0, AlertState::NoAlert)
            .await;

        assert!(result.is_ok());
        assert!(SentAlertLog::new(&log_path).read_all().unwrap().is_empty());
    }
}
