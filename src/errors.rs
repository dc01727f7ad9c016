use thiserror::Error;

/// Failures reported by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
    #[error("Record is referenced by {0}")]
    Referenced(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

/// Failures while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors that escape the interactive flows and end the program.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
