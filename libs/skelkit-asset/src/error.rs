use std::io;
use std::path::PathBuf;

use skelkit_anim::AnimError;
use thiserror::Error;

/// Errors raised while reading files or interpreting model documents
#[derive(Error, Debug)]
pub enum AssetError {
    /// File does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other I/O failure while reading a file
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Caller passed an unusable argument (e.g. an empty path)
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// Document is not valid JSON or does not match the model schema
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document parsed but its contents are inconsistent
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Skeleton or clip construction failed
    #[error(transparent)]
    Anim(#[from] AnimError),
}

/// Result type using AssetError
pub type Result<T> = std::result::Result<T, AssetError>;
