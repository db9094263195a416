use uuid::Uuid;

/// Errors surfaced by the record collection, persistence and import paths.
#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("assignment not found: {0}")]
    NotFound(Uuid),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid {field} '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("csv is missing required columns, found {found:?}; need unit code, task name, start date, due date")]
    MissingColumns { found: Vec<String> },
    #[error("no importable rows ({skipped} skipped)")]
    NoRows { skipped: usize },
}

pub type Result<T> = std::result::Result<T, TrackerError>;
