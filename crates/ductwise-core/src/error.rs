#[derive(Debug, thiserror::Error)]
pub enum DuctError {
    #[error("failed to read workbook '{name}': {reason}")]
    Workbook { name: String, reason: String },

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no usable data found in the uploaded files")]
    NoUsableData,

    #[error("no data after filters. Adjust Unit/Vendor selections")]
    EmptyAfterFilter,

    #[error("failed to write spreadsheet: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DuctError {
    /// Empty-result states halt report generation without being failures.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, DuctError::NoUsableData | DuctError::EmptyAfterFilter)
    }
}
