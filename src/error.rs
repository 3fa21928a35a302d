use thiserror::Error;

#[derive(Error, Debug)]
pub enum SrtSyncError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("Shifting {timestamp} by {offset}ms leaves the representable range")]
    OutOfRange { timestamp: String, offset: i64 },

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Invalid output name: {0:?}")]
    InvalidName(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SrtSyncError>;
