/// All measurement and log timestamps are zone-less local wall-clock times.
///
/// The store files (JSON `DateTime`, CSV/Excel `DATA` + `HORÁRIO`) carry no
/// timezone information, so the domain keeps naive datetimes throughout.
pub type Timestamp = chrono::NaiveDateTime;

/// Canonical `strftime` format for combined datetimes (JSON `DateTime` key).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Canonical format for the `DATA` column (CSV/Excel stores).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical format for the `HORÁRIO` column (CSV/Excel stores).
pub const TIME_FORMAT: &str = "%H:%M:%S";
