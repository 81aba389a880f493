use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinderError>;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response shape: {0}")]
    DecodeAnomaly(String),

    #[error("Stored data in slot '{slot}' is unreadable: {reason}")]
    StorageCorrupt { slot: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for FinderError {
    fn from(err: serde_json::Error) -> Self {
        FinderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for FinderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FinderError::RequestFailed {
                status: status.as_u16(),
            },
            None if err.is_decode() => FinderError::DecodeAnomaly(err.to_string()),
            None => FinderError::Transport(err.to_string()),
        }
    }
}

impl From<std::io::Error> for FinderError {
    fn from(err: std::io::Error) -> Self {
        FinderError::Storage(err.to_string())
    }
}

impl From<config::ConfigError> for FinderError {
    fn from(err: config::ConfigError) -> Self {
        FinderError::Config(err.to_string())
    }
}
