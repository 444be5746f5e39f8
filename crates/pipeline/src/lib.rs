//! The condwatch submit flow.
//!
//! [`MonitorService`] ties the stores and the notifier together:
//! persist the record, append the change-log entry, evaluate every reading
//! against the thresholds, and dispatch alerts for the violations.

pub mod service;

pub use service::{DeliveryStatus, MonitorService, SubmitOutcome, TriggeredAlert};
