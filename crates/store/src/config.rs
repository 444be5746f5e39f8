//! Environment-driven store configuration and backend selection.
//!
//! The backend is a startup choice (strategy selection), not a runtime one:
//! [`StoreConfig::from_env`] reads the environment once and
//! [`StoreConfig::open_store`] hands back the chosen implementation behind
//! the [`MeasurementStore`] trait.

use std::path::PathBuf;

use crate::change_log::{ChangeLogStore, CsvChangeLog, JsonChangeLog};
use crate::error::StoreError;
use crate::measurement::csv::CsvStore;
use crate::measurement::excel::ExcelStore;
use crate::measurement::json::JsonStore;
use crate::measurement::MeasurementStore;
use crate::sent_alerts::SentAlertLog;
use crate::vcs::GitHook;

// ---------------------------------------------------------------------------
// StoreBackend
// ---------------------------------------------------------------------------

/// Default data file per backend, matching the historic file names.
const DEFAULT_JSON_FILE: &str = "dados_dashboard.json";
const DEFAULT_CSV_FILE: &str = "dados_medicoes.csv";
const DEFAULT_EXCEL_FILE: &str = "DADOSWEGSCAN.xlsx";

/// Default change-log and sent-alert files.
const DEFAULT_CHANGE_LOG_FILE: &str = "alteracoes_log.json";
const DEFAULT_SENT_ALERTS_FILE: &str = "alertas_enviados.json";

/// Which serialization the measurement store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Json,
    Csv,
    Excel,
}

impl StoreBackend {
    /// Parse the `CONDWATCH_BACKEND` value.
    pub fn from_name(name: &str) -> Result<Self, StoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(StoreError::Config(format!(
                "Unknown store backend '{other}'. Must be one of: json, csv, excel"
            ))),
        }
    }

    fn default_data_file(self) -> &'static str {
        match self {
            Self::Json => DEFAULT_JSON_FILE,
            Self::Csv => DEFAULT_CSV_FILE,
            Self::Excel => DEFAULT_EXCEL_FILE,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// File locations and backend choice for every store this crate owns.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_file: PathBuf,
    pub change_log_file: PathBuf,
    pub sent_alerts_file: PathBuf,
    /// Git checkout for the best-effort post-write hook (CSV backend only).
    pub git_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                    | Required | Default                       |
    /// |-----------------------------|----------|-------------------------------|
    /// | `CONDWATCH_BACKEND`         | no       | `json`                        |
    /// | `CONDWATCH_DATA_FILE`       | no       | backend-specific (see above)  |
    /// | `CONDWATCH_CHANGE_LOG_FILE` | no       | `alteracoes_log.json`         |
    /// | `CONDWATCH_SENT_ALERTS_FILE`| no       | `alertas_enviados.json`       |
    /// | `CONDWATCH_GIT_DIR`         | no       | — (hook disabled)             |
    pub fn from_env() -> Result<Self, StoreError> {
        let backend = match std::env::var("CONDWATCH_BACKEND") {
            Ok(name) => StoreBackend::from_name(&name)?,
            Err(_) => StoreBackend::Json,
        };
        let data_file = std::env::var("CONDWATCH_DATA_FILE")
            .unwrap_or_else(|_| backend.default_data_file().to_string())
            .into();
        let change_log_file = std::env::var("CONDWATCH_CHANGE_LOG_FILE")
            .unwrap_or_else(|_| DEFAULT_CHANGE_LOG_FILE.to_string())
            .into();
        let sent_alerts_file = std::env::var("CONDWATCH_SENT_ALERTS_FILE")
            .unwrap_or_else(|_| DEFAULT_SENT_ALERTS_FILE.to_string())
            .into();
        let git_dir = std::env::var("CONDWATCH_GIT_DIR").ok().map(PathBuf::from);

        Ok(Self {
            backend,
            data_file,
            change_log_file,
            sent_alerts_file,
            git_dir,
        })
    }

    /// Open the configured measurement store.
    pub fn open_store(&self) -> Box<dyn MeasurementStore> {
        match self.backend {
            StoreBackend::Json => Box::new(JsonStore::new(&self.data_file)),
            StoreBackend::Csv => {
                let store = CsvStore::new(&self.data_file);
                match &self.git_dir {
                    Some(dir) => Box::new(store.with_hook(Box::new(GitHook::new(dir)))),
                    None => Box::new(store),
                }
            }
            StoreBackend::Excel => Box::new(ExcelStore::new(&self.data_file)),
        }
    }

    /// Open the change log; the file extension picks the serialization.
    pub fn open_change_log(&self) -> Box<dyn ChangeLogStore> {
        let is_csv = self
            .change_log_file
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            Box::new(CsvChangeLog::new(&self.change_log_file))
        } else {
            Box::new(JsonChangeLog::new(&self.change_log_file))
        }
    }

    /// Open the bounded sent-alert log.
    pub fn open_sent_alerts(&self) -> SentAlertLog {
        SentAlertLog::new(&self.sent_alerts_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse() {
        assert_eq!(StoreBackend::from_name("json").unwrap(), StoreBackend::Json);
        assert_eq!(StoreBackend::from_name(" CSV ").unwrap(), StoreBackend::Csv);
        assert_eq!(StoreBackend::from_name("xlsx").unwrap(), StoreBackend::Excel);
        assert!(StoreBackend::from_name("sqlite").is_err());
    }

    #[test]
    fn default_data_file_tracks_backend() {
        assert_eq!(StoreBackend::Json.default_data_file(), DEFAULT_JSON_FILE);
        assert_eq!(StoreBackend::Csv.default_data_file(), DEFAULT_CSV_FILE);
        assert_eq!(StoreBackend::Excel.default_data_file(), DEFAULT_EXCEL_FILE);
    }

    #[test]
    fn change_log_serialization_follows_extension() {
        let mut config = StoreConfig {
            backend: StoreBackend::Json,
            data_file: "data.json".into(),
            change_log_file: "log.json".into(),
            sent_alerts_file: "alerts.json".into(),
            git_dir: None,
        };
        // Both extensions open without touching the filesystem.
        config.open_change_log();
        config.change_log_file = "log.csv".into();
        config.open_change_log();
    }
}
