//! Alert notification for the condwatch monitoring core.
//!
//! - [`delivery`] — SMTP email configuration and transport (lettre).
//! - [`message`] — subject and HTML body rendering for alert emails.
//! - [`notifier`] — [`AlertNotifier`], which short-circuits when email is
//!   not configured and records every successful dispatch in the bounded
//!   sent-alert log.

pub mod delivery;
pub mod message;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use notifier::{AlertNotifier, NotifyError};
