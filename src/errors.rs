use thiserror::Error;
use uuid::Uuid;

/// Error type shared by the form engine, storage, configuration and CLI layers.
///
/// Validation failures and cancellations are not errors: they are handled
/// inside the form and never surface here.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),
    #[error("No record at position {0}")]
    IndexOutOfRange(usize),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
