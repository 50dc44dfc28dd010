use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("record file not found at: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("index {index} out of range for dataset of {len} records")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
