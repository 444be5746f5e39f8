//! File-backed persistence for the condwatch monitoring core.
//!
//! Three interchangeable [`MeasurementStore`] backends (JSON array, flat
//! CSV, Excel workbook) implement the same two-method contract, selected at
//! startup via [`StoreConfig`]. Alongside the measurement store live the
//! append-only [`ChangeLogStore`] (JSON or CSV), the bounded
//! [`SentAlertLog`], and the best-effort git post-write hook.
//!
//! Durability model: every store is a single file rewritten whole on each
//! append. There is no locking; two concurrent writers can lose one write.
//! That is a documented limitation of the design, and single-writer use is
//! the deployment assumption.

pub mod change_log;
pub mod config;
pub mod error;
pub mod measurement;
pub mod sent_alerts;
pub mod vcs;

pub use change_log::{ChangeLogStore, CsvChangeLog, JsonChangeLog};
pub use config::{StoreBackend, StoreConfig};
pub use error::StoreError;
pub use measurement::csv::CsvStore;
pub use measurement::excel::ExcelStore;
pub use measurement::json::JsonStore;
pub use measurement::{LoadOutcome, MeasurementStore};
pub use sent_alerts::SentAlertLog;
pub use vcs::{GitHook, PostWriteHook};
