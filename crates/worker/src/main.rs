//! Ingest binary: reads one JSON measurement object per stdin line and
//! submits it through the monitor service.
//!
//! Input rows use the store's own wire shape, e.g.
//! `{"DateTime": "2026-03-14 09:30:00", "EQUIPAMENTO": "M1", "TEMPERATURA(°C)": 75.0}`.

use std::io::BufRead;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use condwatch_core::changelog::DEFAULT_ACTOR;
use condwatch_events::{AlertNotifier, EmailConfig};
use condwatch_pipeline::{DeliveryStatus, MonitorService};
use condwatch_store::measurement::json::row_to_record;
use condwatch_store::StoreConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "condwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store_config = StoreConfig::from_env()?;
    tracing::info!(backend = ?store_config.backend, data_file = %store_config.data_file.display(), "Store configured");

    let email_config = EmailConfig::from_env();
    if email_config.is_none() {
        tracing::warn!("Email alerting not configured; alerts will be evaluated but not sent");
    }

    let service = MonitorService::new(
        store_config.open_store(),
        store_config.open_change_log(),
        AlertNotifier::new(email_config, store_config.open_sent_alerts()),
    );
    let actor = std::env::var("CONDWATCH_ACTOR").unwrap_or_else(|_| DEFAULT_ACTOR.to_string());

    let existing = service.history()?;
    tracing::info!(records = existing.records.len(), "Store loaded");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = match serde_json::from_str::<serde_json::Value>(&line) {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(error = %e, "Skipping line that is not a JSON object");
                continue;
            }
        };
        let Some(record) = row_to_record(&row) else {
            tracing::error!(%line, "Skipping malformed measurement row");
            continue;
        };

        let outcome = service.submit(&record, &actor).await?;
        if let Some(e) = outcome.change_log_error {
            tracing::error!(error = %e, "Change log was not updated for this record");
        }
        for alert in outcome.alerts {
            match alert.delivery {
                DeliveryStatus::Sent => tracing::warn!(
                    variable = %alert.variable,
                    value = alert.value,
                    "ALERT dispatched by email"
                ),
                DeliveryStatus::NotConfigured => tracing::warn!(
                    variable = %alert.variable,
                    value = alert.value,
                    "ALERT triggered (email not configured, nothing sent)"
                ),
                DeliveryStatus::Failed(reason) => tracing::error!(
                    variable = %alert.variable,
                    value = alert.value,
                    %reason,
                    "ALERT triggered but email delivery failed"
                ),
            }
        }
    }

    Ok(())
}
