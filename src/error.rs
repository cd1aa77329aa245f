use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Unknown row id: {0}")]
    UnknownRow(String),

    #[error("Unsupported state version: {0}")]
    UnsupportedVersion(u32),

    #[error("Storage Error: {0}")]
    Storage(String),
}

pub type TallyResult<T> = Result<T, TallyError>;
