//! Error type for store operations.

/// Failures surfaced by the persistence layer.
///
/// Malformed *rows* on load are not errors: they are dropped and counted in
/// [`LoadOutcome::dropped_rows`](crate::measurement::LoadOutcome). An error
/// here means the operation as a whole failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not valid JSON.
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file exists but is not valid CSV.
    #[error("Store CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be opened or its sheet read.
    #[error("Workbook read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// The workbook could not be written.
    #[error("Workbook write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The file has an unusable shape (not an array, missing sheet, ...).
    #[error("Store format error: {0}")]
    Format(String),

    /// Invalid store configuration (unknown backend name, ...).
    #[error("Store configuration error: {0}")]
    Config(String),
}
