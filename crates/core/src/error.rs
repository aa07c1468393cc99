use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("patient already exists: {0}")]
    AlreadyExists(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read records file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write records file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize records: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize records: {0}")]
    Deserialization(String),
    #[error("stored record {id} is invalid: {source}")]
    CorruptRecord {
        id: String,
        #[source]
        source: ValidationError,
    },
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
