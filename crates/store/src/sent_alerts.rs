//! Bounded JSON log of alerts actually dispatched.

use std::path::PathBuf;

use condwatch_core::{SentAlert, SENT_ALERT_CAP};

use crate::error::StoreError;

/// JSON-array log of sent alerts, truncated to the most recent
/// [`SENT_ALERT_CAP`] entries (plain FIFO, oldest evicted first).
pub struct SentAlertLog {
    path: PathBuf,
}

impl SentAlertLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one dispatched alert, evicting the oldest beyond the cap.
    pub fn append(&self, alert: &SentAlert) -> Result<(), StoreError> {
        let mut alerts = self.read_all()?;
        alerts.push(alert.clone());
        if alerts.len() > SENT_ALERT_CAP {
            let excess = alerts.len() - SENT_ALERT_CAP;
            alerts.drain(..excess);
        }
        let text = serde_json::to_string_pretty(&alerts)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    /// All retained alerts, oldest first.
    pub fn read_all(&self) -> Result<Vec<SentAlert>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The `limit` most recent alerts, oldest of those first.
    pub fn recent(&self, limit: usize) -> Result<Vec<SentAlert>, StoreError> {
        let mut alerts = self.read_all()?;
        if alerts.len() > limit {
            let excess = alerts.len() - limit;
            alerts.drain(..excess);
        }
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use condwatch_core::Variable;
    use tempfile::tempdir;

    fn alert(n: u32) -> SentAlert {
        SentAlert {
            timestamp: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + chrono::Duration::seconds(n as i64),
            equipment_id: format!("M{n}"),
            variable: Variable::Temperature,
            value: 75.0,
            reason: "above maximum limit (70)".into(),
        }
    }

    #[test]
    fn append_and_read_back() {
        let dir = tempdir().unwrap();
        let log = SentAlertLog::new(dir.path().join("alerts.json"));
        log.append(&alert(1)).unwrap();
        log.append(&alert(2)).unwrap();

        let alerts = log.read_all().unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].equipment_id, "M1");
    }

    #[test]
    fn log_never_exceeds_cap_and_evicts_oldest() {
        let dir = tempdir().unwrap();
        let log = SentAlertLog::new(dir.path().join("alerts.json"));

        // Seed a file already at capacity, then append once more.
        let full: Vec<SentAlert> = (0..SENT_ALERT_CAP as u32).map(alert).collect();
        std::fs::write(
            dir.path().join("alerts.json"),
            serde_json::to_string(&full).unwrap(),
        )
        .unwrap();

        log.append(&alert(9999)).unwrap();
        let alerts = log.read_all().unwrap();
        assert_eq!(alerts.len(), SENT_ALERT_CAP);
        assert_eq!(alerts.first().unwrap().equipment_id, "M1"); // M0 evicted
        assert_eq!(alerts.last().unwrap().equipment_id, "M9999");
    }

    #[test]
    fn recent_returns_newest_entries() {
        let dir = tempdir().unwrap();
        let log = SentAlertLog::new(dir.path().join("alerts.json"));
        for n in 0..5 {
            log.append(&alert(n)).unwrap();
        }
        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].equipment_id, "M3");
        assert_eq!(recent[1].equipment_id, "M4");
    }
}
