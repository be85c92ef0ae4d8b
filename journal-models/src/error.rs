use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Serialization Error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage Error: {0}")]
    Storage(String),
    #[error("Export Error: {0}")]
    Export(String),
}

pub type Result<T, E = JournalError> = std::result::Result<T, E>;
